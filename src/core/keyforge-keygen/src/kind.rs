//! Key kinds and their parameters.

use std::str::FromStr;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::KeygenError;
use crate::wordlist::Wordlist;

/// Number of symbols in the alphanumeric alphabet.
pub const ALPHANUMERIC_SYMBOLS: usize = 62;

/// Parameterless name of a key kind, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindName {
    /// Random alphanumeric string.
    Alphanumeric,
    /// Version-4 UUID without hyphens.
    Uuid,
    /// Random hexadecimal string.
    Hex,
    /// SHA-256 digest of random bytes.
    Sha256,
    /// URL-safe Base64 of random bytes.
    Base64,
    /// Numeric code (OTP / PIN).
    Numeric,
    /// Human-readable passphrase.
    Passphrase,
    /// HMAC-SHA256 derived from a caller key.
    Hmac,
}

impl KindName {
    /// All kinds, in menu order.
    pub const ALL: [KindName; 8] = [
        Self::Alphanumeric,
        Self::Uuid,
        Self::Hex,
        Self::Sha256,
        Self::Base64,
        Self::Numeric,
        Self::Passphrase,
        Self::Hmac,
    ];

    /// Looks up a kind by its 1-based menu position.
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Alphanumeric => "Random alphanumeric key",
            Self::Uuid => "UUID-based key",
            Self::Hex => "Secure hexadecimal key",
            Self::Sha256 => "SHA-256 hashed key",
            Self::Base64 => "Secure Base64 key",
            Self::Numeric => "Secure numeric key (OTP or PIN)",
            Self::Passphrase => "Passphrase (human-readable)",
            Self::Hmac => "HMAC-SHA256 key (deterministic)",
        }
    }

    /// Parameter used when the caller supplies none, if the kind takes one.
    ///
    /// Length in characters for alphanumeric, hex and numeric keys, in random
    /// bytes for Base64, and in words for passphrases.
    pub fn default_param(&self) -> Option<usize> {
        match self {
            Self::Alphanumeric | Self::Hex | Self::Base64 => Some(32),
            Self::Numeric => Some(6),
            Self::Passphrase => Some(4),
            Self::Uuid | Self::Sha256 | Self::Hmac => None,
        }
    }
}

impl std::fmt::Display for KindName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Alphanumeric => "alphanumeric",
            Self::Uuid => "uuid",
            Self::Hex => "hex",
            Self::Sha256 => "sha256",
            Self::Base64 => "base64",
            Self::Numeric => "numeric",
            Self::Passphrase => "passphrase",
            Self::Hmac => "hmac",
        };
        f.write_str(name)
    }
}

impl FromStr for KindName {
    type Err = KeygenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| KeygenError::invalid("kind", format!("unknown key kind `{s}`")))
    }
}

/// A key kind together with its kind-specific parameter.
///
/// Immutable once built. `HmacDerived` is the odd one out: its output is a
/// pure function of the supplied key, so it reproduces the same value every
/// time it is given the same key.
#[derive(Clone)]
pub enum KeyKind {
    /// `length` characters from `[A-Za-z0-9]`.
    RandomAlphanumeric(usize),
    /// 32 uppercase hex characters of a random v4 UUID.
    UuidLike,
    /// `length` hex characters (odd lengths round down).
    Hex(usize),
    /// Hex SHA-256 digest of 32 random bytes.
    Sha256Digest,
    /// URL-safe Base64 of `length` random bytes.
    Base64(usize),
    /// `length` decimal digits.
    Numeric(usize),
    /// `num_words` space-separated words from the default wordlist.
    Passphrase(usize),
    /// Hex HMAC-SHA256 of a fixed message keyed by the given secret.
    HmacDerived(Zeroizing<String>),
}

impl KeyKind {
    /// Builds a kind from its name and optional parameters.
    ///
    /// A missing length falls back to [`KindName::default_param`]. A length
    /// that is present but out of range is rejected, never replaced.
    pub fn from_parts(
        name: KindName,
        param: Option<usize>,
        hmac_key: Option<Zeroizing<String>>,
    ) -> Result<Self, KeygenError> {
        let param = param.or(name.default_param()).unwrap_or_default();

        let kind = match name {
            KindName::Alphanumeric => Self::RandomAlphanumeric(param),
            KindName::Uuid => Self::UuidLike,
            KindName::Hex => Self::Hex(param),
            KindName::Sha256 => Self::Sha256Digest,
            KindName::Base64 => Self::Base64(param),
            KindName::Numeric => Self::Numeric(param),
            KindName::Passphrase => Self::Passphrase(param),
            KindName::Hmac => Self::HmacDerived(
                hmac_key.ok_or_else(|| KeygenError::invalid("secret", "an HMAC key is required"))?,
            ),
        };

        kind.validate()?;
        Ok(kind)
    }

    /// Returns the parameterless name of this kind.
    pub fn name(&self) -> KindName {
        match self {
            Self::RandomAlphanumeric(_) => KindName::Alphanumeric,
            Self::UuidLike => KindName::Uuid,
            Self::Hex(_) => KindName::Hex,
            Self::Sha256Digest => KindName::Sha256,
            Self::Base64(_) => KindName::Base64,
            Self::Numeric(_) => KindName::Numeric,
            Self::Passphrase(_) => KindName::Passphrase,
            Self::HmacDerived(_) => KindName::Hmac,
        }
    }

    /// Checks kind-specific parameters without generating anything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the offending field.
    pub fn validate(&self) -> Result<(), KeygenError> {
        match self {
            Self::RandomAlphanumeric(0) | Self::Base64(0) | Self::Numeric(0) => {
                Err(KeygenError::invalid("length", "must be at least 1"))
            },
            Self::Hex(len) if *len < 2 => Err(KeygenError::invalid(
                "length",
                format!("hex keys need at least 2 characters, got {len}"),
            )),
            Self::Passphrase(0) => Err(KeygenError::invalid("num_words", "must be at least 1")),
            Self::HmacDerived(secret) if secret.is_empty() => {
                Err(KeygenError::invalid("secret", "HMAC key must not be empty"))
            },
            _ => Ok(()),
        }
    }

    /// Returns true if the output depends only on the inputs, not on fresh randomness.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::HmacDerived(_))
    }

    /// Estimated entropy of the generated key, in bits.
    ///
    /// `None` for `HmacDerived`, whose strength is bounded by the caller's key.
    pub fn entropy_bits(&self) -> Option<f64> {
        let bits = match self {
            Self::RandomAlphanumeric(len) => *len as f64 * (ALPHANUMERIC_SYMBOLS as f64).log2(),
            // 6 of the 128 bits are fixed version and variant markers.
            Self::UuidLike => 122.0,
            Self::Hex(len) => (len / 2 * 8) as f64,
            Self::Sha256Digest => 256.0,
            Self::Base64(len) => (len * 8) as f64,
            Self::Numeric(len) => *len as f64 * 10f64.log2(),
            Self::Passphrase(words) => Wordlist::default().entropy_bits(*words),
            Self::HmacDerived(_) => return None,
        };
        Some(bits)
    }
}

impl std::fmt::Debug for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RandomAlphanumeric(len) => f.debug_tuple("RandomAlphanumeric").field(len).finish(),
            Self::UuidLike => f.write_str("UuidLike"),
            Self::Hex(len) => f.debug_tuple("Hex").field(len).finish(),
            Self::Sha256Digest => f.write_str("Sha256Digest"),
            Self::Base64(len) => f.debug_tuple("Base64").field(len).finish(),
            Self::Numeric(len) => f.debug_tuple("Numeric").field(len).finish(),
            Self::Passphrase(words) => f.debug_tuple("Passphrase").field(words).finish(),
            Self::HmacDerived(_) => f.debug_tuple("HmacDerived").field(&"[REDACTED]").finish(),
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.name(), f)
    }
}

/// Summary of a kind, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct KindInfo {
    /// 1-based menu position.
    pub index: usize,
    /// Kind name.
    pub name: KindName,
    /// Human-readable description.
    pub description: &'static str,
    /// Default parameter, if the kind takes one.
    pub default_param: Option<usize>,
    /// Entropy at the default parameter, if it does not depend on caller input.
    pub entropy_bits: Option<f64>,
    /// True if the same input always yields the same key.
    pub deterministic: bool,
}

/// Describes every kind at its default parameters.
pub fn catalog() -> Vec<KindInfo> {
    KindName::ALL
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let (entropy_bits, deterministic) = match name {
                KindName::Hmac => (None, true),
                _ => {
                    let kind = KeyKind::from_parts(name, None, None).ok();
                    (kind.and_then(|k| k.entropy_bits()), false)
                },
            };
            KindInfo {
                index: i + 1,
                name,
                description: name.description(),
                default_param: name.default_param(),
                entropy_bits,
                deterministic,
            }
        })
        .collect()
}
