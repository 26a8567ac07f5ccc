use super::Scheme;
use crate::EncryptedData;
use crate::error::{CryptoError, Result};

pub const VERSION_V1: u8 = 1;
pub const MAGIC_LEN: usize = 4;
pub const MAGIC: &[u8; MAGIC_LEN] = b"SBOX";
/// Length of the version field (1 byte).
pub const VER_LEN: usize = 1;
/// Length of the scheme field (1 byte).
pub const SCHEME_LEN: usize = 1;

/// Single-buffer encoding of an [`EncryptedData`].
///
/// Layout: `magic | version | scheme | nonce | cipher text`. The nonce
/// length is implied by the scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    version: u8,
    scheme: Scheme,
    data: EncryptedData,
}

impl Envelope {
    pub const HEADER_LEN: usize = MAGIC_LEN + VER_LEN + SCHEME_LEN;

    pub fn new(scheme: Scheme, data: EncryptedData) -> Result<Self> {
        if data.nonce().len() != scheme.nonce_len() {
            return Err(CryptoError::length(
                "nonce",
                scheme.nonce_len(),
                data.nonce().len(),
            ));
        }
        Ok(Self {
            version: VERSION_V1,
            scheme,
            data,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn data(&self) -> &EncryptedData {
        &self.data
    }

    pub fn into_data(self) -> EncryptedData {
        self.data
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            Self::HEADER_LEN + self.data.nonce().len() + self.data.cipher_text().len(),
        );

        buf.extend_from_slice(MAGIC);
        buf.push(self.version);
        buf.push(self.scheme.tag());

        buf.extend_from_slice(self.data.nonce());
        buf.extend_from_slice(self.data.cipher_text());

        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::HEADER_LEN {
            return Err(CryptoError::MalformedEnvelope("envelope too short"));
        }

        if &data[..MAGIC_LEN] != MAGIC {
            return Err(CryptoError::MalformedEnvelope("invalid magic"));
        }

        let version = data[MAGIC_LEN];
        if version != VERSION_V1 {
            return Err(CryptoError::MalformedEnvelope("unsupported version"));
        }

        let scheme = Scheme::from_tag(data[MAGIC_LEN + VER_LEN])
            .ok_or(CryptoError::MalformedEnvelope("unknown scheme"))?;

        let offset = Self::HEADER_LEN;
        let body = &data[offset..];
        if body.len() < scheme.nonce_len() {
            return Err(CryptoError::MalformedEnvelope("envelope too short"));
        }
        let (nonce, cipher_text) = body.split_at(scheme.nonce_len());

        Ok(Self {
            version,
            scheme,
            data: EncryptedData::new(cipher_text.to_vec(), nonce.to_vec()),
        })
    }
}
