mod adapter;

pub use adapter::{FakerValueSource, MAX_SAFE_INTEGER};
