//! Cryptographically secure random generation.
//!
//! Uses the operating system's CSPRNG for all random number generation.
//! Nothing in this crate draws from a seeded or thread-local generator.

use rand::{rngs::OsRng, Rng, RngCore};
use zeroize::Zeroizing;

/// Generates cryptographically secure random bytes.
///
/// The buffer is wrapped in `Zeroizing` so it is cleared from memory when dropped.
///
/// # Arguments
///
/// * `len` - Number of random bytes to generate
pub fn generate_bytes(len: usize) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generates a fixed-size array of secure random bytes.
pub fn generate_array<const N: usize>() -> Zeroizing<[u8; N]> {
    let mut bytes = Zeroizing::new([0u8; N]);
    OsRng.fill_bytes(&mut *bytes);
    bytes
}

/// Picks an element of `items` uniformly at random.
///
/// `gen_range` samples without modulo bias, so every element is equally likely
/// regardless of whether `items.len()` divides the generator's range.
///
/// # Panics
///
/// Panics if `items` is empty. Callers only pass non-empty constant tables.
pub fn choose<T: Copy>(items: &[T]) -> T {
    items[OsRng.gen_range(0..items.len())]
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_bytes_length() {
        for len in [0, 1, 16, 32, 64, 128] {
            let bytes = generate_bytes(len);
            assert_eq!(bytes.len(), len);
        }
    }

    #[test]
    fn test_generate_array_unique() {
        let a = generate_array::<32>();
        let b = generate_array::<32>();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_randomness_distribution() {
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let bytes = generate_bytes(8);
            assert!(seen.insert(bytes.to_vec()), "duplicate bytes generated");
        }
    }

    #[test]
    fn test_choose_covers_all_items() {
        let items = [b'a', b'b', b'c', b'd'];
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            seen.insert(choose(&items));
        }
        assert_eq!(seen.len(), items.len());
    }
}
