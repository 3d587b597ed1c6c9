//! Shared corpus generators for the integration tests.
//!
//! Deterministic by construction: the pseudo-random corpus comes from a
//! fixed-seed xorshift generator and the text corpus from a small word pool,
//! so every run sees identical inputs.
#![allow(dead_code)] // each test binary uses its own subset

/// Deterministic xorshift32 stream.
pub struct XorShift(pub u32);

impl XorShift {
    pub fn next_u32(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| (self.next_u32() >> 16) as u8).collect()
    }
}

/// Uniform pseudo-random bytes from a fixed seed.
pub fn random_bytes(seed: u32, len: usize) -> Vec<u8> {
    XorShift(seed.max(1)).bytes(len)
}

const WORDS: &[&str] = &[
    "the", "of", "and", "a", "to", "in", "is", "you", "that", "it", "he", "was", "for", "on",
    "are", "as", "with", "his", "they", "i", "at", "be", "this", "have", "from", "or", "one",
    "had", "by", "word", "but", "not", "what", "all", "were", "we", "when", "your", "can",
    "said", "there", "use", "an", "each", "which", "she", "do", "how", "their", "if",
];

/// English-looking filler text of at least `len` bytes.
pub fn text(seed: u32, len: usize) -> Vec<u8> {
    let mut rng = XorShift(seed.max(1));
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        let word = WORDS[(rng.next_u32() as usize) % WORDS.len()];
        out.extend_from_slice(word.as_bytes());
        if rng.next_u32() % 13 == 0 {
            out.extend_from_slice(b".\n");
        } else {
            out.push(b' ');
        }
    }
    out.truncate(len);
    out
}
