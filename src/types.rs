use serde::{Deserialize, Serialize};

/// Cipher text together with the nonce it was sealed under.
///
/// Both parts are fixed once produced; the caller stores or transmits the
/// nonce next to the cipher text and hands both back for decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    #[serde(with = "hex::serde")]
    cipher_text: Vec<u8>,
    #[serde(with = "hex::serde")]
    nonce: Vec<u8>,
}

impl EncryptedData {
    pub fn new(cipher_text: Vec<u8>, nonce: Vec<u8>) -> Self {
        Self { cipher_text, nonce }
    }

    pub fn cipher_text(&self) -> &[u8] {
        &self.cipher_text
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.cipher_text, self.nonce)
    }
}
