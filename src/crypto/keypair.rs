//! X25519 keypairs for the public-key box.

use std::fmt;

use tracing::{debug, error};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::random::random_array;
use super::{PUBLIC_KEY_LEN, SECRET_KEY_LEN};
use crate::error::{CryptoError, Result};

/// A public key and the secret key it belongs to.
///
/// The secret half is wiped when the pair is dropped and never printed by `Debug`.
pub struct KeyPair {
    public_key: [u8; PUBLIC_KEY_LEN],
    secret_key: Zeroizing<[u8; SECRET_KEY_LEN]>,
}

impl KeyPair {
    /// Generate a new random keypair.
    ///
    /// All randomness comes from the OS generator; if it is unavailable the
    /// call fails instead of producing a weak key.
    pub fn generate() -> Result<Self> {
        let secret_bytes = Zeroizing::new(random_array::<SECRET_KEY_LEN>()?);
        if secret_bytes.iter().all(|&b| b == 0) {
            error!("random generator returned an all-zero secret key");
            return Err(CryptoError::ResourceExhausted(
                "random generator returned an all-zero secret key",
            ));
        }

        // the by-value copy moves into the StaticSecret, which wipes itself on drop
        let secret = StaticSecret::from(*secret_bytes);
        let public = PublicKey::from(&secret);
        debug!("generated keypair");

        Ok(Self {
            public_key: public.to_bytes(),
            secret_key: secret_bytes,
        })
    }

    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public_key
    }

    pub fn secret_key(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.secret_key
    }

    pub fn into_parts(self) -> ([u8; PUBLIC_KEY_LEN], Zeroizing<[u8; SECRET_KEY_LEN]>) {
        (self.public_key, self.secret_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key))
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        assert!(crate::initialize());
        let kp = KeyPair::generate().unwrap();
        assert_eq!(kp.public_key().len(), PUBLIC_KEY_LEN);
        assert_eq!(kp.secret_key().len(), SECRET_KEY_LEN);
        assert_ne!(kp.secret_key(), &[0u8; SECRET_KEY_LEN]);
    }

    #[test]
    fn public_key_matches_secret_key() {
        assert!(crate::initialize());
        let kp = KeyPair::generate().unwrap();
        let derived = PublicKey::from(&StaticSecret::from(*kp.secret_key()));
        assert_eq!(derived.as_bytes(), kp.public_key());
    }

    #[test]
    fn secret_holders_wipe_on_drop() {
        fn wipes_on_drop<T: zeroize::ZeroizeOnDrop>() {}
        wipes_on_drop::<StaticSecret>();
        wipes_on_drop::<x25519_dalek::SharedSecret>();
        wipes_on_drop::<Zeroizing<[u8; SECRET_KEY_LEN]>>();
    }

    #[test]
    fn stored_secret_key_is_the_generated_scalar() {
        assert!(crate::initialize());
        let kp = KeyPair::generate().unwrap();
        let secret = StaticSecret::from(*kp.secret_key());
        assert_eq!(&secret.to_bytes(), kp.secret_key());
    }

    #[test]
    fn keypairs_are_unique() {
        assert!(crate::initialize());
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        assert_ne!(a.public_key(), b.public_key());
        assert_ne!(a.secret_key(), b.secret_key());
    }

    #[test]
    fn debug_redacts_secret_key() {
        assert!(crate::initialize());
        let kp = KeyPair::generate().unwrap();
        let printed = format!("{kp:?}");
        assert!(printed.contains(&hex::encode(kp.public_key())));
        assert!(!printed.contains(&hex::encode(kp.secret_key())));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn into_parts_keeps_both_halves() {
        assert!(crate::initialize());
        let kp = KeyPair::generate().unwrap();
        let public = *kp.public_key();
        let secret = *kp.secret_key();
        let (p, s) = kp.into_parts();
        assert_eq!(p, public);
        assert_eq!(*s, secret);
    }
}
