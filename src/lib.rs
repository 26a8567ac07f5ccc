//! Password stretching, secret-key and public-key authenticated encryption.
//!
//! Every operation takes plain byte slices and returns owned buffers or a
//! [`CryptoError`]. Call [`initialize`] once before anything else.
//!
//! ```no_run
//! use saltbox::{KeyPair, public_key};
//!
//! assert!(saltbox::initialize());
//! let alice = KeyPair::generate()?;
//! let bob = KeyPair::generate()?;
//!
//! let sealed = public_key::encrypt(b"hi bob", bob.public_key(), alice.secret_key())?;
//! let opened = public_key::decrypt(
//!     sealed.cipher_text(),
//!     sealed.nonce(),
//!     alice.public_key(),
//!     bob.secret_key(),
//! )?;
//! assert_eq!(opened.as_slice(), b"hi bob");
//! # Ok::<(), saltbox::CryptoError>(())
//! ```

pub mod crypto;
mod error;
mod types;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error};

pub use crate::crypto::{
    BOX_MAC_LEN, BOX_NONCE_LEN, Constants, Envelope, KeyPair, PUBLIC_KEY_LEN, PwHashAlgorithm,
    PwHashLimit, PwHashParams, SALT_LEN, SECRET_KEY_LEN, SYMMETRIC_KEY_LEN, SYMMETRIC_MAC_LEN,
    SYMMETRIC_NONCE_LEN, Scheme, aead as symmetric, constants, fill, generate_salt, public_key,
    stretch, stretch_with_params,
};
pub use crate::error::{CryptoError, Result};
pub use crate::types::EncryptedData;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// One-time process-wide setup.
///
/// Checks that the OS random generator answers. Returns `true` once the
/// library is ready; later calls return `true` without repeating the check.
/// On `false` every operation keeps failing with [`CryptoError::NotInitialized`]
/// and the call may be retried.
pub fn initialize() -> bool {
    if INITIALIZED.load(Ordering::Acquire) {
        return true;
    }

    let mut probe = [0u8; 32];
    match crypto::random::secure_random(&mut probe) {
        Ok(()) => {
            INITIALIZED.store(true, Ordering::Release);
            debug!("saltbox initialized");
            true
        }
        Err(e) => {
            error!(kind = e.kind(), "saltbox initialization failed");
            false
        }
    }
}

pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

pub(crate) fn ensure_initialized() -> Result<()> {
    if is_initialized() {
        Ok(())
    } else {
        Err(CryptoError::NotInitialized)
    }
}
