use thiserror::Error;

/// Failure outcomes of every saltbox operation.
///
/// Decryption failures are deliberately coarse: anything that makes a tag
/// check fail is reported as [`CryptoError::AuthenticationFailed`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("saltbox has not been initialized")]
    NotInitialized,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("cipher text too short: {len} bytes (minimum {min})")]
    TooShort { len: usize, min: usize },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("resource exhausted: {0}")]
    ResourceExhausted(&'static str),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),
}

impl CryptoError {
    pub(crate) fn length(field: &str, expected: usize, actual: usize) -> Self {
        CryptoError::InvalidInput(format!(
            "{field} must be {expected} bytes, got {actual}"
        ))
    }

    /// Short, stable name of the failure kind, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            CryptoError::NotInitialized => "not_initialized",
            CryptoError::InvalidInput(_) => "invalid_input",
            CryptoError::TooShort { .. } => "too_short",
            CryptoError::AuthenticationFailed => "authentication_failed",
            CryptoError::ResourceExhausted(_) => "resource_exhausted",
            CryptoError::InvalidParameters(_) => "invalid_parameters",
            CryptoError::EncryptionFailed => "encryption_failed",
            CryptoError::MalformedEnvelope(_) => "malformed_envelope",
        }
    }
}

pub type Result<T, E = CryptoError> = std::result::Result<T, E>;
