//! Error taxonomy, tagged with the pipeline stage that failed.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Building the scheme parameters.
    Configure,
    /// Secret and public key generation.
    KeyGen,
    /// Batch-encoding the fill vectors.
    Encode,
    /// Public-key encryption.
    Encrypt,
    /// Homomorphic addition.
    Evaluate,
    /// Secret-key decryption.
    Decrypt,
    /// Batch-decoding the result.
    Decode,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 7] = [
        Stage::Configure,
        Stage::KeyGen,
        Stage::Encode,
        Stage::Encrypt,
        Stage::Evaluate,
        Stage::Decrypt,
        Stage::Decode,
    ];

    /// Lowercase stage name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::KeyGen => "keygen",
            Stage::Encode => "encode",
            Stage::Encrypt => "encrypt",
            Stage::Evaluate => "evaluate",
            Stage::Decrypt => "decrypt",
            Stage::Decode => "decode",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a parameter set is refused.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Degree is not a key of the default coefficient-modulus table.
    #[error("unsupported polynomial degree {0}: expected a power of two between 1024 and 32768")]
    UnsupportedDegree(usize),

    /// The coefficient-modulus table yielded nothing for this degree.
    #[error("no coefficient moduli available for degree {0}")]
    EmptyModuli(usize),

    /// Plaintext modulus is not prime.
    #[error("plaintext modulus {0} is not prime")]
    NotPrime(u64),

    /// Plaintext modulus is not congruent to 1 modulo 2·degree.
    #[error("plaintext modulus {modulus} does not support batching at degree {degree}")]
    NoBatching {
        /// Rejected plaintext modulus.
        modulus: u64,
        /// Requested degree.
        degree: usize,
    },

    /// The library refused to build the parameters.
    #[error("parameter construction failed: {0}")]
    Library(#[source] fhe::Error),
}

/// Any failure of one pipeline invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// Scheme parameters could not be configured.
    #[error("configure: {0}")]
    Configuration(#[from] ConfigError),

    /// A fill value does not fit below the plaintext modulus.
    #[error("encode: value {value} is out of range for plaintext modulus {modulus}")]
    Encoding {
        /// Offending value.
        value: u64,
        /// Plaintext modulus in force.
        modulus: u64,
    },

    /// Fill length is zero or exceeds the slot count.
    #[error("encode: fill length {length} must be between 1 and {slots}")]
    InvalidLength {
        /// Requested length.
        length: usize,
        /// Available slots.
        slots: usize,
    },

    /// A caller passed a negative integer through the C interface.
    #[error("encode: negative input {0}")]
    NegativeInput(i64),

    /// Operands come from different parameter sets or key pairs.
    #[error("{stage}: operand mismatch: {reason}")]
    Mismatch {
        /// Stage that rejected the operands.
        stage: Stage,
        /// What did not match.
        reason: &'static str,
    },

    /// Decryption produced a plaintext without any slots.
    #[error("decode: decrypted plaintext holds no slots")]
    EmptyDecode,

    /// Opaque failure reported by the encryption library.
    #[error("{stage}: {source}")]
    Crypto {
        /// Stage in which the library failed.
        stage: Stage,
        /// Library error.
        #[source]
        source: fhe::Error,
    },
}

impl Error {
    /// Stage at which the invocation failed.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Error::Configuration(_) => Stage::Configure,
            Error::Encoding { .. } | Error::InvalidLength { .. } | Error::NegativeInput(_) => {
                Stage::Encode
            }
            Error::EmptyDecode => Stage::Decode,
            Error::Mismatch { stage, .. } | Error::Crypto { stage, .. } => *stage,
        }
    }

    /// Wraps a library error with the stage it occurred in.
    pub(crate) fn crypto(stage: Stage) -> impl FnOnce(fhe::Error) -> Error {
        move |source| Error::Crypto { stage, source }
    }
}
