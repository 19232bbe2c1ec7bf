//! Key generators, one per [`KeyKind`].
//!
//! Every generator writes straight into the buffer that becomes the
//! [`GeneratedSecret`]; intermediate random material lives in `Zeroizing`
//! buffers and is cleared as soon as it has been encoded.

use base64::{engine::general_purpose::URL_SAFE, Engine};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::error::KeygenError;
use crate::kind::KeyKind;
use crate::random::{choose, generate_array, generate_bytes};
use crate::secret::GeneratedSecret;
use crate::wordlist::Wordlist;

type HmacSha256 = Hmac<Sha256>;

/// Alphabet for alphanumeric keys: upper case, digits, lower case.
const ALPHANUMERIC: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcdefghijklmnopqrstuvwxyz";

const DIGITS: &[u8; 10] = b"0123456789";

/// Fixed message authenticated by `HmacDerived` keys.
pub const HMAC_MESSAGE: &[u8] = b"secure_data";

/// Generates a key of the given kind.
///
/// # Errors
///
/// Returns `InvalidParameter` if the kind's parameter is out of range.
pub fn generate_key(kind: &KeyKind) -> Result<GeneratedSecret, KeygenError> {
    kind.validate()?;

    let secret = match kind {
        KeyKind::RandomAlphanumeric(len) => generate_alphanumeric(*len)?,
        KeyKind::UuidLike => generate_uuid(),
        KeyKind::Hex(len) => generate_hex(*len)?,
        KeyKind::Sha256Digest => generate_sha256()?,
        KeyKind::Base64(len) => generate_base64(*len)?,
        KeyKind::Numeric(len) => generate_numeric(*len)?,
        KeyKind::Passphrase(words) => generate_passphrase(*words)?,
        KeyKind::HmacDerived(secret) => derive_hmac(secret.as_bytes())?,
    };

    debug!(kind = %kind, len = secret.len(), "Generated key");

    Ok(secret)
}

/// Generates `len` characters drawn uniformly from `[A-Za-z0-9]`.
pub fn generate_alphanumeric(len: usize) -> Result<GeneratedSecret, KeygenError> {
    if len == 0 {
        return Err(KeygenError::invalid("length", "must be at least 1"));
    }

    let out = (0..len).map(|_| choose(ALPHANUMERIC)).collect();
    Ok(GeneratedSecret::from_ascii(out))
}

/// Generates a random version-4 UUID as 32 uppercase hex characters.
pub fn generate_uuid() -> GeneratedSecret {
    let mut bytes = generate_array::<16>();
    // Version 4, RFC 4122 variant. Set in place so the random bytes are never
    // copied out of the zeroizing buffer.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let uuid = uuid::Uuid::from_bytes_ref(&bytes);
    let mut out = vec![0u8; uuid::fmt::Simple::LENGTH];
    uuid.as_simple().encode_upper(&mut out);
    GeneratedSecret::from_ascii(out)
}

/// Generates `len` lowercase hex characters from `len / 2` random bytes.
///
/// Odd lengths round down to the nearest even number.
pub fn generate_hex(len: usize) -> Result<GeneratedSecret, KeygenError> {
    if len < 2 {
        return Err(KeygenError::invalid(
            "length",
            format!("hex keys need at least 2 characters, got {len}"),
        ));
    }

    let bytes = generate_bytes(len / 2);
    hex_secret(&bytes)
}

/// Generates the hex SHA-256 digest of 32 random bytes.
pub fn generate_sha256() -> Result<GeneratedSecret, KeygenError> {
    let input = generate_array::<32>();
    let mut digest = Sha256::digest(&*input);

    let secret = hex_secret(&digest);
    digest.as_mut_slice().zeroize();
    secret
}

/// Encodes `len` random bytes as URL-safe, padded Base64.
pub fn generate_base64(len: usize) -> Result<GeneratedSecret, KeygenError> {
    if len == 0 {
        return Err(KeygenError::invalid("length", "must be at least 1"));
    }

    let bytes = generate_bytes(len);
    let encoded_len = base64::encoded_len(len, true)
        .ok_or_else(|| KeygenError::invalid("length", "too large to encode"))?;

    let mut out = vec![0u8; encoded_len];
    let written = URL_SAFE
        .encode_slice(&*bytes, &mut out)
        .map_err(|e| KeygenError::Encoding(e.to_string()))?;
    out.truncate(written);

    Ok(GeneratedSecret::from_ascii(out))
}

/// Generates `len` decimal digits, each uniform over 0-9.
pub fn generate_numeric(len: usize) -> Result<GeneratedSecret, KeygenError> {
    if len == 0 {
        return Err(KeygenError::invalid("length", "must be at least 1"));
    }

    let out = (0..len).map(|_| choose(DIGITS)).collect();
    Ok(GeneratedSecret::from_ascii(out))
}

/// Generates a passphrase of `num_words` words from the default wordlist.
pub fn generate_passphrase(num_words: usize) -> Result<GeneratedSecret, KeygenError> {
    generate_passphrase_from(&Wordlist::default(), num_words)
}

/// Generates a passphrase of `num_words` words sampled with replacement from `wordlist`.
pub fn generate_passphrase_from(
    wordlist: &Wordlist,
    num_words: usize,
) -> Result<GeneratedSecret, KeygenError> {
    if num_words == 0 {
        return Err(KeygenError::invalid("num_words", "must be at least 1"));
    }

    let words = wordlist.words();
    if !words.iter().all(|w| w.is_ascii() && !w.contains(' ')) {
        return Err(KeygenError::invalid(
            "wordlist",
            "words must be ASCII without spaces",
        ));
    }

    // Sized up front so the secret is never reallocated (and left behind) while growing.
    let longest = words.iter().map(|w| w.len()).max().unwrap_or_default();
    let capacity = num_words
        .checked_mul(longest + 1)
        .ok_or_else(|| KeygenError::invalid("num_words", "too large"))?;
    let mut out = Vec::with_capacity(capacity);

    for i in 0..num_words {
        if i > 0 {
            out.push(b' ');
        }
        out.extend_from_slice(choose(words).as_bytes());
    }

    Ok(GeneratedSecret::from_ascii(out))
}

/// Derives a key as hex HMAC-SHA256 of [`HMAC_MESSAGE`] keyed by `secret`.
///
/// This is NOT a fresh secret: the same `secret` always yields the same key.
pub fn derive_hmac(secret: &[u8]) -> Result<GeneratedSecret, KeygenError> {
    if secret.is_empty() {
        return Err(KeygenError::invalid("secret", "HMAC key must not be empty"));
    }

    warn!("HMAC-derived keys are deterministic: the same input key reproduces the same output");

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| KeygenError::invalid("secret", e.to_string()))?;
    mac.update(HMAC_MESSAGE);
    let mut tag = mac.finalize().into_bytes();

    let secret = hex_secret(&tag);
    tag.as_mut_slice().zeroize();
    secret
}

/// Hex-encodes `bytes` directly into a new secret buffer.
fn hex_secret(bytes: &[u8]) -> Result<GeneratedSecret, KeygenError> {
    let mut out = vec![0u8; bytes.len() * 2];
    hex::encode_to_slice(bytes, &mut out).map_err(|e| KeygenError::Encoding(e.to_string()))?;
    Ok(GeneratedSecret::from_ascii(out))
}
