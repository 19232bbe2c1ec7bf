//! # KeyForge Keygen
//!
//! Secure key generation for KeyForge.
//!
//! This crate maps a [`KeyKind`] to a [`GeneratedSecret`]:
//! - Random alphanumeric, hex, Base64 and numeric keys
//! - UUID-based keys
//! - SHA-256 digests of random input
//! - Human-readable passphrases
//! - HMAC-SHA256 derived keys (deterministic)
//!
//! All randomness comes from the operating system CSPRNG.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod generator;
pub mod kind;
pub mod random;
pub mod secret;
pub mod wordlist;

pub use error::KeygenError;
pub use generator::generate_key;
pub use kind::{catalog, KeyKind, KindInfo, KindName};
pub use secret::{GeneratedSecret, WIPE_FILLER};
pub use wordlist::Wordlist;
