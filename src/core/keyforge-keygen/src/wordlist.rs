//! Wordlist for human-readable passphrases.
//!
//! The list is public and not security-sensitive. Its size is what bounds the
//! strength of a passphrase: each word contributes `log2(len)` bits, so the
//! built-in 64-word list gives 6 bits per word. A 4-word passphrase from it
//! carries only 24 bits of entropy, which is fine for a memorable demo key and
//! far too weak for anything an attacker can brute-force offline. Use a
//! Diceware-sized list (7776 words, ~12.9 bits/word) for real secrets.

/// An ordered, fixed set of passphrase tokens.
#[derive(Debug, Clone, Copy)]
pub struct Wordlist {
    words: &'static [&'static str],
}

/// Built-in demo wordlist.
pub const DEFAULT_WORDS: [&str; 64] = [
    "alpha", "amber", "anchor", "archer", "aspen", "atlas", "badger", "basalt",
    "beacon", "beta", "birch", "bison", "cedar", "cinder", "cobalt", "comet",
    "copper", "coral", "delta", "dune", "ember", "epsilon", "falcon", "fern",
    "fjord", "galaxy", "gamma", "garnet", "glacier", "granite", "harbor", "hazel",
    "heron", "indigo", "iris", "jasper", "juniper", "kestrel", "lagoon", "lana",
    "lantern", "lichen", "lotus", "maple", "meadow", "moon", "nebula", "oasis",
    "ocean", "onyx", "orchid", "otter", "pebble", "quartz", "raven", "sierra",
    "summit", "thistle", "tiger", "tundra", "valley", "willow", "yarrow", "zebra",
];

impl Wordlist {
    /// Creates a wordlist over a static slice of tokens.
    ///
    /// Returns `None` if the slice is empty.
    pub const fn new(words: &'static [&'static str]) -> Option<Self> {
        if words.is_empty() {
            None
        } else {
            Some(Self { words })
        }
    }

    /// Number of tokens in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; empty wordlists cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Tokens in order.
    pub fn words(&self) -> &'static [&'static str] {
        self.words
    }

    /// Entropy per word, in bits.
    pub fn bits_per_word(&self) -> f64 {
        (self.words.len() as f64).log2()
    }

    /// Entropy of a passphrase of `num_words` independently sampled tokens.
    pub fn entropy_bits(&self, num_words: usize) -> f64 {
        num_words as f64 * self.bits_per_word()
    }
}

impl Default for Wordlist {
    fn default() -> Self {
        Self {
            words: &DEFAULT_WORDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_words_unique() {
        let unique: HashSet<_> = DEFAULT_WORDS.iter().collect();
        assert_eq!(unique.len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_default_words_are_lowercase_ascii() {
        for word in DEFAULT_WORDS {
            assert!(word.bytes().all(|b| b.is_ascii_lowercase()), "{word}");
        }
    }

    #[test]
    fn test_entropy_bits() {
        let list = Wordlist::default();
        assert_eq!(list.len(), 64);
        assert!((list.bits_per_word() - 6.0).abs() < f64::EPSILON);
        assert!((list.entropy_bits(4) - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_wordlist_rejected() {
        assert!(Wordlist::new(&[]).is_none());
        assert!(Wordlist::new(&["solo"]).is_some());
    }
}
