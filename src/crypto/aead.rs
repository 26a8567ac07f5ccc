use chacha20poly1305::{
    Key, XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::random::random_array;
use super::{SYMMETRIC_KEY_LEN, SYMMETRIC_NONCE_LEN, Scheme};
use crate::EncryptedData;
use crate::error::{CryptoError, Result};

pub(crate) fn check_len(field: &str, expected: usize, buf: &[u8]) -> Result<()> {
    if buf.len() != expected {
        warn!(field, expected, actual = buf.len(), "rejecting input with wrong length");
        return Err(CryptoError::length(field, expected, buf.len()));
    }
    Ok(())
}

/// Reject cipher texts that do not carry at least one byte past the tag.
pub(crate) fn check_tag_room(scheme: Scheme, cipher_text: &[u8]) -> Result<()> {
    if cipher_text.len() <= scheme.mac_len() {
        warn!(?scheme, len = cipher_text.len(), "cipher text too short");
        return Err(CryptoError::TooShort {
            len: cipher_text.len(),
            min: scheme.mac_len() + 1,
        });
    }
    Ok(())
}

/// Encrypt under `key` with a fresh random nonce.
pub(crate) fn seal(scheme: Scheme, key: &Key, message: &[u8]) -> Result<EncryptedData> {
    let expected_len = scheme
        .cipher_text_len(message.len())
        .ok_or(CryptoError::EncryptionFailed)?;

    // both schemes use XChaCha20-Poly1305 nonces
    let nonce = random_array::<SYMMETRIC_NONCE_LEN>()?;
    debug_assert_eq!(nonce.len(), scheme.nonce_len());
    let cipher = XChaCha20Poly1305::new(key);
    let cipher_text = cipher
        .encrypt(XNonce::from_slice(&nonce), message)
        .map_err(|_| {
            warn!(?scheme, message_len = message.len(), "encryption failed");
            CryptoError::EncryptionFailed
        })?;
    debug_assert_eq!(cipher_text.len(), expected_len);

    debug!(?scheme, message_len = message.len(), "sealed message");
    Ok(EncryptedData::new(cipher_text, nonce.to_vec()))
}

/// Verify the tag and decrypt; nothing is released unless the tag matches.
pub(crate) fn open(
    scheme: Scheme,
    key: &Key,
    cipher_text: &[u8],
    nonce: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    check_tag_room(scheme, cipher_text)?;

    let cipher = XChaCha20Poly1305::new(key);
    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce), cipher_text)
        .map_err(|_| {
            warn!(?scheme, len = cipher_text.len(), "authentication failed");
            CryptoError::AuthenticationFailed
        })?;

    debug!(?scheme, message_len = plaintext.len(), "opened message");
    Ok(Zeroizing::new(plaintext))
}

/// Encrypt `message` under a shared secret key.
///
/// The nonce is drawn fresh for every call, so encrypting the same message
/// twice gives different cipher texts.
pub fn encrypt(message: &[u8], key: &[u8]) -> Result<EncryptedData> {
    crate::ensure_initialized()?;
    check_len("key", SYMMETRIC_KEY_LEN, key)?;

    seal(Scheme::Symmetric, Key::from_slice(key), message)
}

/// Decrypt a cipher text produced by [`encrypt`].
///
/// Cipher texts no longer than the tag are rejected with
/// [`CryptoError::TooShort`] before any verification, so an encrypted empty
/// message does not decrypt.
pub fn decrypt(cipher_text: &[u8], nonce: &[u8], key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    crate::ensure_initialized()?;
    check_len("key", SYMMETRIC_KEY_LEN, key)?;
    check_len("nonce", SYMMETRIC_NONCE_LEN, nonce)?;

    open(Scheme::Symmetric, Key::from_slice(key), cipher_text, nonce)
}
