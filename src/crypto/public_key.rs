//! Public-key authenticated encryption.
//!
//! The sender's secret key and the receiver's public key agree on an X25519
//! shared secret, which HKDF-SHA256 turns into an XChaCha20-Poly1305 key.
//! The receiver computes the same key from the sender's public key and its
//! own secret key, so only the receiver can open the box and a successful
//! open proves the box was sealed by the holder of the sender's secret key.

use chacha20poly1305::Key;
use hkdf::Hkdf;
use sha2::Sha256;
use tracing::warn;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::aead::{check_len, check_tag_room, open, seal};
use super::{BOX_NONCE_LEN, PUBLIC_KEY_LEN, SECRET_KEY_LEN, Scheme};
use crate::EncryptedData;
use crate::error::{CryptoError, Result};

/// HKDF info string for the box key
const BOX_KEY_INFO: &[u8] = b"saltbox-public-key-box-v1";

fn key_bytes<'a, const N: usize>(field: &str, buf: &'a [u8]) -> Result<&'a [u8; N]> {
    check_len(field, N, buf)?;
    buf.try_into()
        .map_err(|_| CryptoError::length(field, N, buf.len()))
}

/// Derive the box key, or `None` if the public key has low order.
fn box_key(
    public_key: &[u8; PUBLIC_KEY_LEN],
    secret_key: &[u8; SECRET_KEY_LEN],
) -> Result<Option<Zeroizing<[u8; 32]>>> {
    // the by-value copy moves into the StaticSecret, which wipes itself on drop
    let secret = StaticSecret::from(*secret_key);
    let shared = secret.diffie_hellman(&PublicKey::from(*public_key));
    if !shared.was_contributory() {
        return Ok(None);
    }

    let hk = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut key = Zeroizing::new([0u8; 32]);
    hk.expand(BOX_KEY_INFO, &mut key[..])
        .map_err(|_| CryptoError::InvalidParameters("box key length".into()))?;
    Ok(Some(key))
}

/// Encrypt `message` to `receiver_public_key`, authenticated by `sender_secret_key`.
pub fn encrypt(
    message: &[u8],
    receiver_public_key: &[u8],
    sender_secret_key: &[u8],
) -> Result<EncryptedData> {
    crate::ensure_initialized()?;
    let public_key = key_bytes::<PUBLIC_KEY_LEN>("receiver public key", receiver_public_key)?;
    let secret_key = key_bytes::<SECRET_KEY_LEN>("sender secret key", sender_secret_key)?;

    let key = box_key(public_key, secret_key)?.ok_or_else(|| {
        warn!("rejecting low-order receiver public key");
        CryptoError::InvalidInput("receiver public key has low order".into())
    })?;

    seal(Scheme::PublicKey, Key::from_slice(&key[..]), message)
}

/// Decrypt a box sealed by the holder of `sender_public_key`'s secret key.
///
/// Short cipher texts are rejected before the key agreement runs.
pub fn decrypt(
    cipher_text: &[u8],
    nonce: &[u8],
    sender_public_key: &[u8],
    receiver_secret_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    crate::ensure_initialized()?;
    let public_key = key_bytes::<PUBLIC_KEY_LEN>("sender public key", sender_public_key)?;
    let secret_key = key_bytes::<SECRET_KEY_LEN>("receiver secret key", receiver_secret_key)?;
    check_len("nonce", BOX_NONCE_LEN, nonce)?;
    check_tag_room(Scheme::PublicKey, cipher_text)?;

    // a low-order key can never have produced a valid box
    let key = box_key(public_key, secret_key)?.ok_or_else(|| {
        warn!("low-order sender public key");
        CryptoError::AuthenticationFailed
    })?;

    open(Scheme::PublicKey, Key::from_slice(&key[..]), cipher_text, nonce)
}
