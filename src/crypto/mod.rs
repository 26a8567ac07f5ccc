//! Cryptographic primitives.
//!
//! Provides randomness, password stretching, keypair generation, secret-key
//! and public-key authenticated encryption, and the envelope wire format.

pub mod aead;
pub mod envelope;
pub mod kdf;
pub mod keypair;
pub mod public_key;
pub mod random;

pub use envelope::Envelope;
pub use kdf::{PwHashAlgorithm, PwHashLimit, PwHashParams, stretch, stretch_with_params};
pub use keypair::KeyPair;
pub use random::{fill, generate_salt};

use serde::{Deserialize, Serialize};

/// Length of a password-hash salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of a symmetric key (32 bytes / 256 bits).
pub const SYMMETRIC_KEY_LEN: usize = 32;
/// Length of the symmetric nonce (24 bytes for XChaCha20-Poly1305).
pub const SYMMETRIC_NONCE_LEN: usize = 24;
/// Length of the symmetric authentication tag (16 bytes).
pub const SYMMETRIC_MAC_LEN: usize = 16;
/// Length of an X25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of an X25519 secret key.
pub const SECRET_KEY_LEN: usize = 32;
/// Length of the public-key box nonce.
pub const BOX_NONCE_LEN: usize = 24;
/// Length of the public-key box authentication tag.
pub const BOX_MAC_LEN: usize = 16;

// both schemes seal with XChaCha20-Poly1305
const _: () = assert!(BOX_NONCE_LEN == SYMMETRIC_NONCE_LEN);
const _: () = assert!(BOX_MAC_LEN == SYMMETRIC_MAC_LEN);

/// The two authenticated encryption schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Symmetric,
    PublicKey,
}

impl Scheme {
    pub const fn nonce_len(self) -> usize {
        match self {
            Scheme::Symmetric => SYMMETRIC_NONCE_LEN,
            Scheme::PublicKey => BOX_NONCE_LEN,
        }
    }

    pub const fn mac_len(self) -> usize {
        match self {
            Scheme::Symmetric => SYMMETRIC_MAC_LEN,
            Scheme::PublicKey => BOX_MAC_LEN,
        }
    }

    /// Cipher text length for a message of `message_len` bytes, `None` on overflow.
    pub const fn cipher_text_len(self, message_len: usize) -> Option<usize> {
        message_len.checked_add(self.mac_len())
    }

    /// Plaintext length carried by a cipher text, `None` if it cannot hold a tag.
    pub const fn message_len(self, cipher_text_len: usize) -> Option<usize> {
        cipher_text_len.checked_sub(self.mac_len())
    }

    pub(crate) const fn tag(self) -> u8 {
        match self {
            Scheme::Symmetric => 1,
            Scheme::PublicKey => 2,
        }
    }

    pub(crate) const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Scheme::Symmetric),
            2 => Some(Scheme::PublicKey),
            _ => None,
        }
    }
}

/// Every length a caller needs, in one serializable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constants {
    pub salt_len: usize,
    pub symmetric_key_len: usize,
    pub symmetric_nonce_len: usize,
    pub symmetric_mac_len: usize,
    pub public_key_len: usize,
    pub secret_key_len: usize,
    pub box_nonce_len: usize,
    pub box_mac_len: usize,
    pub pwhash_output_len_min: usize,
    pub pwhash_output_len_max: usize,
    pub pwhash_memlimit_min: u64,
    pub pwhash_memlimit_max: u64,
    pub pwhash_opslimit_max: u64,
}

pub const fn constants() -> Constants {
    Constants {
        salt_len: SALT_LEN,
        symmetric_key_len: SYMMETRIC_KEY_LEN,
        symmetric_nonce_len: SYMMETRIC_NONCE_LEN,
        symmetric_mac_len: SYMMETRIC_MAC_LEN,
        public_key_len: PUBLIC_KEY_LEN,
        secret_key_len: SECRET_KEY_LEN,
        box_nonce_len: BOX_NONCE_LEN,
        box_mac_len: BOX_MAC_LEN,
        pwhash_output_len_min: kdf::OUTPUT_LEN_MIN,
        pwhash_output_len_max: kdf::OUTPUT_LEN_MAX,
        pwhash_memlimit_min: kdf::MEMLIMIT_MIN,
        pwhash_memlimit_max: kdf::MEMLIMIT_MAX,
        pwhash_opslimit_max: kdf::OPSLIMIT_MAX,
    }
}
