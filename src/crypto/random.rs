use getrandom::fill as os_fill;
use tracing::error;

use super::SALT_LEN;
use crate::error::{CryptoError, Result};

/// Fill buffer from the OS generator without checking initialization.
pub(crate) fn secure_random(buf: &mut [u8]) -> Result<()> {
    os_fill(buf).map_err(|_| {
        error!(len = buf.len(), "OS random generator unavailable");
        CryptoError::ResourceExhausted("OS random generator unavailable")
    })
}

/// Fill buffer with cryptographically secure random bytes.
///
/// Fails rather than falling back to a weaker source.
pub fn fill(buf: &mut [u8]) -> Result<()> {
    crate::ensure_initialized()?;
    secure_random(buf)
}

/// Fresh random array, used for nonces and secret keys.
pub(crate) fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut out = [0u8; N];
    fill(&mut out)?;
    Ok(out)
}

/// Generate salt
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_produces_distinct_buffers() {
        assert!(crate::initialize());
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fill(&mut a).unwrap();
        fill(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn fill_empty_buffer_is_ok() {
        assert!(crate::initialize());
        fill(&mut []).unwrap();
    }

    #[test]
    fn salts_are_fresh() {
        assert!(crate::initialize());
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
