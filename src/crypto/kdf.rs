use argon2::{Algorithm, Argon2, Block, Params, Version};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::SALT_LEN;
use crate::error::{CryptoError, Result};

/// Shortest derived key accepted.
pub const OUTPUT_LEN_MIN: usize = 16;
/// Longest derived key accepted.
pub const OUTPUT_LEN_MAX: usize = u32::MAX as usize;
/// Longest password accepted.
pub const PASSWORD_LEN_MAX: usize = u32::MAX as usize;
/// Smallest memory limit in bytes.
pub const MEMLIMIT_MIN: u64 = 8192;
/// Largest memory limit in bytes (`u32::MAX` KiB).
pub const MEMLIMIT_MAX: u64 = u32::MAX as u64 * 1024;
/// Largest number of passes.
pub const OPSLIMIT_MAX: u64 = u32::MAX as u64;

/// Password hashing algorithm, numbered like libsodium's `crypto_pwhash_ALG_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PwHashAlgorithm {
    Argon2i13,
    #[default]
    Argon2id13,
}

impl PwHashAlgorithm {
    pub const fn id(self) -> i32 {
        match self {
            PwHashAlgorithm::Argon2i13 => 1,
            PwHashAlgorithm::Argon2id13 => 2,
        }
    }

    /// Fewest passes the algorithm accepts.
    pub const fn opslimit_min(self) -> u64 {
        match self {
            PwHashAlgorithm::Argon2i13 => 3,
            PwHashAlgorithm::Argon2id13 => 1,
        }
    }

    fn argon2(self) -> Algorithm {
        match self {
            PwHashAlgorithm::Argon2i13 => Algorithm::Argon2i,
            PwHashAlgorithm::Argon2id13 => Algorithm::Argon2id,
        }
    }
}

impl TryFrom<i32> for PwHashAlgorithm {
    type Error = CryptoError;

    fn try_from(id: i32) -> Result<Self> {
        match id {
            1 => Ok(PwHashAlgorithm::Argon2i13),
            2 => Ok(PwHashAlgorithm::Argon2id13),
            other => Err(CryptoError::InvalidParameters(format!(
                "unknown password hash algorithm id {other}"
            ))),
        }
    }
}

/// Cost presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PwHashLimit {
    #[default]
    Interactive,
    Moderate,
    Sensitive,
}

impl PwHashLimit {
    pub const fn ops_limit(self, algorithm: PwHashAlgorithm) -> u64 {
        match (algorithm, self) {
            (PwHashAlgorithm::Argon2id13, PwHashLimit::Interactive) => 2,
            (PwHashAlgorithm::Argon2id13, PwHashLimit::Moderate) => 3,
            (PwHashAlgorithm::Argon2id13, PwHashLimit::Sensitive) => 4,
            (PwHashAlgorithm::Argon2i13, PwHashLimit::Interactive) => 4,
            (PwHashAlgorithm::Argon2i13, PwHashLimit::Moderate) => 6,
            (PwHashAlgorithm::Argon2i13, PwHashLimit::Sensitive) => 8,
        }
    }

    pub const fn mem_limit(self, algorithm: PwHashAlgorithm) -> u64 {
        const MIB: u64 = 1024 * 1024;
        match (algorithm, self) {
            (PwHashAlgorithm::Argon2id13, PwHashLimit::Interactive) => 64 * MIB,
            (PwHashAlgorithm::Argon2id13, PwHashLimit::Moderate) => 256 * MIB,
            (PwHashAlgorithm::Argon2id13, PwHashLimit::Sensitive) => 1024 * MIB,
            (PwHashAlgorithm::Argon2i13, PwHashLimit::Interactive) => 32 * MIB,
            (PwHashAlgorithm::Argon2i13, PwHashLimit::Moderate) => 128 * MIB,
            (PwHashAlgorithm::Argon2i13, PwHashLimit::Sensitive) => 512 * MIB,
        }
    }
}

/// Algorithm and cost parameters for [`stretch_with_params`].
///
/// `mem_limit` is in bytes; it is rounded down to whole KiB for Argon2.
/// Lanes are fixed at one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwHashParams {
    algorithm: PwHashAlgorithm,
    ops_limit: u64,
    mem_limit: u64,
}

impl Default for PwHashParams {
    fn default() -> Self {
        Self::preset(PwHashAlgorithm::default(), PwHashLimit::default())
    }
}

impl PwHashParams {
    pub fn new(algorithm: PwHashAlgorithm, ops_limit: u64, mem_limit: u64) -> Result<Self> {
        let params = Self {
            algorithm,
            ops_limit,
            mem_limit,
        };
        params.validate()?;
        Ok(params)
    }

    pub const fn preset(algorithm: PwHashAlgorithm, limit: PwHashLimit) -> Self {
        Self {
            algorithm,
            ops_limit: limit.ops_limit(algorithm),
            mem_limit: limit.mem_limit(algorithm),
        }
    }

    pub fn algorithm(&self) -> PwHashAlgorithm {
        self.algorithm
    }

    pub fn ops_limit(&self) -> u64 {
        self.ops_limit
    }

    pub fn mem_limit(&self) -> u64 {
        self.mem_limit
    }

    pub fn validate(&self) -> Result<()> {
        if self.ops_limit < self.algorithm.opslimit_min() {
            return Err(CryptoError::InvalidParameters(format!(
                "opslimit {} below minimum {}",
                self.ops_limit,
                self.algorithm.opslimit_min()
            )));
        }
        if self.ops_limit > OPSLIMIT_MAX {
            return Err(CryptoError::InvalidParameters(format!(
                "opslimit {} above maximum {OPSLIMIT_MAX}",
                self.ops_limit
            )));
        }
        if self.mem_limit < MEMLIMIT_MIN {
            return Err(CryptoError::InvalidParameters(format!(
                "memlimit {} below minimum {MEMLIMIT_MIN}",
                self.mem_limit
            )));
        }
        if self.mem_limit > MEMLIMIT_MAX {
            return Err(CryptoError::InvalidParameters(format!(
                "memlimit {} above maximum {MEMLIMIT_MAX}",
                self.mem_limit
            )));
        }
        Ok(())
    }

    fn argon2_params(&self, output_len: usize) -> Result<Params> {
        // both casts are in range once validate() has passed
        let m_cost = (self.mem_limit / 1024) as u32;
        let t_cost = self.ops_limit as u32;
        Params::new(m_cost, t_cost, 1, Some(output_len))
            .map_err(|e| CryptoError::InvalidParameters(format!("argon2 params: {e}")))
    }
}

/// Stretch `password` into `output_len` bytes of key material.
///
/// Deterministic in all six arguments.
pub fn stretch(
    password: &[u8],
    salt: &[u8],
    output_len: usize,
    algorithm: PwHashAlgorithm,
    ops_limit: u64,
    mem_limit: u64,
) -> Result<Zeroizing<Vec<u8>>> {
    let params = PwHashParams {
        algorithm,
        ops_limit,
        mem_limit,
    };
    stretch_with_params(password, salt, output_len, &params)
}

pub fn stretch_with_params(
    password: &[u8],
    salt: &[u8],
    output_len: usize,
    params: &PwHashParams,
) -> Result<Zeroizing<Vec<u8>>> {
    crate::ensure_initialized()?;

    if salt.len() != SALT_LEN {
        warn!(salt_len = salt.len(), "rejecting password hash salt");
        return Err(CryptoError::length("salt", SALT_LEN, salt.len()));
    }
    if password.len() > PASSWORD_LEN_MAX {
        return Err(CryptoError::InvalidInput("password too long".into()));
    }
    if !(OUTPUT_LEN_MIN..=OUTPUT_LEN_MAX).contains(&output_len) {
        return Err(CryptoError::InvalidParameters(format!(
            "output length {output_len} outside {OUTPUT_LEN_MIN}..={OUTPUT_LEN_MAX}"
        )));
    }
    if let Err(e) = params.validate() {
        warn!(kind = e.kind(), algorithm = ?params.algorithm, "rejecting password hash parameters");
        return Err(e);
    }

    debug!(
        algorithm = ?params.algorithm,
        ops_limit = params.ops_limit,
        mem_limit = params.mem_limit,
        output_len,
        "stretching password"
    );

    let argon2_params = params.argon2_params(output_len)?;
    let block_count = argon2_params.block_count();
    let argon2 = Argon2::new(params.algorithm.argon2(), Version::V0x13, argon2_params);

    let mut memory: Vec<Block> = Vec::new();
    memory.try_reserve_exact(block_count).map_err(|_| {
        warn!(block_count, "argon2 working memory unavailable");
        CryptoError::ResourceExhausted("argon2 working memory")
    })?;
    memory.resize(block_count, Block::default());

    let mut key = Zeroizing::new(Vec::new());
    key.try_reserve_exact(output_len)
        .map_err(|_| CryptoError::ResourceExhausted("derived key buffer"))?;
    key.resize(output_len, 0u8);

    argon2
        .hash_password_into_with_memory(password, salt, key.as_mut_slice(), &mut memory)
        .map_err(|e| {
            warn!(error = %e, "argon2 key derivation failed");
            match e {
                argon2::Error::MemoryTooMuch => {
                    CryptoError::ResourceExhausted("argon2 memory limit")
                }
                other => CryptoError::InvalidParameters(other.to_string()),
            }
        })?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const PASSWORD: &[u8] = b"correct horse";
    const ZERO_SALT: [u8; SALT_LEN] = [0u8; SALT_LEN];
    const SMALL_MEM: u64 = 64 * 1024;

    fn init() {
        assert!(crate::initialize());
    }

    #[test]
    fn known_vector_interactive_argon2id() {
        init();
        let key = stretch(
            PASSWORD,
            &ZERO_SALT,
            32,
            PwHashAlgorithm::Argon2id13,
            2,
            67_108_864,
        )
        .unwrap();
        assert_eq!(
            hex::encode(&*key),
            "45e967cef210393ba938027f2e22f0144a622c9ff3ac6d630f73377d5f98c18d"
        );
    }

    #[test]
    fn known_vector_small_argon2id() {
        init();
        let key = stretch(PASSWORD, &ZERO_SALT, 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM)
            .unwrap();
        assert_eq!(
            hex::encode(&*key),
            "5a3339cf491692197a0361eb10b2b0dacc78dbe65ecc7053023b1a316a92ca49"
        );
    }

    #[test]
    fn known_vector_small_argon2i() {
        init();
        let key = stretch(PASSWORD, &ZERO_SALT, 32, PwHashAlgorithm::Argon2i13, 3, SMALL_MEM)
            .unwrap();
        assert_eq!(
            hex::encode(&*key),
            "0863114825f45f83259af96d00bd1e34c0cbd96461912dbf72c3cc90ac70d577"
        );
    }

    #[test]
    fn output_length_is_part_of_the_hash() {
        init();
        let key = stretch(PASSWORD, &ZERO_SALT, 16, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM)
            .unwrap();
        assert_eq!(hex::encode(&*key), "268fb323a6961414489e96896ad32502");
    }

    #[test]
    fn kdf_is_deterministic() {
        init();
        let salt = [42u8; SALT_LEN];
        let params = PwHashParams::new(PwHashAlgorithm::Argon2id13, 1, SMALL_MEM).unwrap();

        let k1 = stretch_with_params(b"password", &salt, 32, &params).unwrap();
        let k2 = stretch_with_params(b"password", &salt, 32, &params).unwrap();

        assert_eq!(k1, k2);
    }

    #[test]
    fn kdf_params_affect_output() {
        init();
        let salt = [7u8; SALT_LEN];
        let base = stretch(b"pw", &salt, 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM).unwrap();

        let more_mem =
            stretch(b"pw", &salt, 32, PwHashAlgorithm::Argon2id13, 1, 2 * SMALL_MEM).unwrap();
        let more_ops = stretch(b"pw", &salt, 32, PwHashAlgorithm::Argon2id13, 3, SMALL_MEM).unwrap();
        let other_alg = stretch(b"pw", &salt, 32, PwHashAlgorithm::Argon2i13, 3, SMALL_MEM).unwrap();
        let other_salt =
            stretch(b"pw", &[8u8; SALT_LEN], 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM)
                .unwrap();
        let other_pw = stretch(b"pW", &salt, 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM).unwrap();

        assert_ne!(base, more_mem);
        assert_ne!(base, more_ops);
        assert_ne!(more_ops, other_alg);
        assert_ne!(base, other_salt);
        assert_ne!(base, other_pw);
    }

    #[test]
    fn empty_password_is_accepted() {
        init();
        let key = stretch(b"", &ZERO_SALT, 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM).unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn wrong_salt_length_is_invalid_input() {
        init();
        let err = stretch(PASSWORD, &[0u8; 8], 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM)
            .unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));

        let err = stretch(PASSWORD, &[], 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM)
            .unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }

    #[test]
    fn kdf_invalid_params_fail_gracefully() {
        init();
        assert!(matches!(
            PwHashParams::new(PwHashAlgorithm::Argon2i13, 2, SMALL_MEM),
            Err(CryptoError::InvalidParameters(_))
        ));
        assert!(matches!(
            PwHashParams::new(PwHashAlgorithm::Argon2id13, 0, SMALL_MEM),
            Err(CryptoError::InvalidParameters(_))
        ));
        assert!(matches!(
            PwHashParams::new(PwHashAlgorithm::Argon2id13, 1, MEMLIMIT_MIN - 1),
            Err(CryptoError::InvalidParameters(_))
        ));
        assert!(matches!(
            PwHashParams::new(PwHashAlgorithm::Argon2id13, OPSLIMIT_MAX + 1, SMALL_MEM),
            Err(CryptoError::InvalidParameters(_))
        ));
        assert!(matches!(
            stretch(PASSWORD, &ZERO_SALT, 32, PwHashAlgorithm::Argon2id13, 1, 1024),
            Err(CryptoError::InvalidParameters(_))
        ));
    }

    #[test]
    fn output_length_bounds() {
        init();
        let err = stretch(PASSWORD, &ZERO_SALT, OUTPUT_LEN_MIN - 1, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM)
            .unwrap_err();
        assert!(matches!(err, CryptoError::InvalidParameters(_)));
    }

    #[test]
    fn algorithm_ids_follow_libsodium() {
        assert_eq!(PwHashAlgorithm::Argon2i13.id(), 1);
        assert_eq!(PwHashAlgorithm::Argon2id13.id(), 2);
        assert_eq!(PwHashAlgorithm::try_from(2).unwrap(), PwHashAlgorithm::Argon2id13);
        assert!(PwHashAlgorithm::try_from(0).is_err());
        assert!(PwHashAlgorithm::try_from(3).is_err());
    }

    #[test]
    fn presets_are_valid() {
        for alg in [PwHashAlgorithm::Argon2i13, PwHashAlgorithm::Argon2id13] {
            for limit in [PwHashLimit::Interactive, PwHashLimit::Moderate, PwHashLimit::Sensitive] {
                PwHashParams::preset(alg, limit).validate().unwrap();
            }
        }
        let default = PwHashParams::default();
        assert_eq!(default.algorithm(), PwHashAlgorithm::Argon2id13);
        assert_eq!(default.ops_limit(), 2);
        assert_eq!(default.mem_limit(), 67_108_864);
    }

    #[test]
    #[traced_test]
    fn password_never_reaches_the_logs() {
        init();
        stretch(b"hunter2-secret", &ZERO_SALT, 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM)
            .unwrap();
        let _ = stretch(b"hunter2-secret", &[1u8; 3], 32, PwHashAlgorithm::Argon2id13, 1, SMALL_MEM);

        assert!(logs_contain("stretching password"));
        assert!(logs_contain("rejecting password hash salt"));
        assert!(!logs_contain("hunter2"));
    }
}
