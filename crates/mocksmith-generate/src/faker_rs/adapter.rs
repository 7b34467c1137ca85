use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::Name;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mocksmith_core::TextFlavor;

use crate::generators::ValueSource;

/// Largest integer a JSON consumer can hold without precision loss (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

const SENTENCE_WORDS: std::ops::Range<usize> = 4..10;
const PARAGRAPH_SENTENCES: std::ops::Range<usize> = 3..7;

/// [`ValueSource`] backed by the `fake` crate over a seeded ChaCha RNG.
#[derive(Debug, Clone)]
pub struct FakerValueSource {
    rng: ChaCha8Rng,
}

impl FakerValueSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ValueSource for FakerValueSource {
    fn integer(&mut self) -> i64 {
        self.rng.random_range(0..=MAX_SAFE_INTEGER)
    }

    fn boolean(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn text(&mut self, flavor: TextFlavor) -> String {
        match flavor {
            TextFlavor::Name => Name().fake_with_rng(&mut self.rng),
            TextFlavor::Sentence => Sentence(SENTENCE_WORDS).fake_with_rng(&mut self.rng),
            TextFlavor::Paragraph => Paragraph(PARAGRAPH_SENTENCES).fake_with_rng(&mut self.rng),
            TextFlavor::Word | TextFlavor::Generic => Word().fake_with_rng(&mut self.rng),
        }
    }
}
