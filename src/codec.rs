//! Batching codec: slot vectors to library plaintexts and back.

use fhe::bfv::{Encoding, Plaintext};
use fhe_traits::{FheDecoder, FheEncoder};

use crate::{
    error::{Error, Result, Stage},
    params::SchemeParameters,
};

/// Slot values, each below the plaintext modulus they were checked against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaintextVector {
    values: Vec<u64>,
    modulus: u64,
}

impl PlaintextVector {
    /// Checked vector of slot values.
    pub fn new(values: Vec<u64>, params: &SchemeParameters) -> Result<Self> {
        let modulus = params.plaintext_modulus();
        check_length(values.len(), params)?;
        if let Some(&value) = values.iter().find(|&&v| v >= modulus) {
            return Err(Error::Encoding { value, modulus });
        }
        Ok(Self { values, modulus })
    }

    /// `value` replicated across `length` slots.
    pub fn fill(value: u64, length: usize, params: &SchemeParameters) -> Result<Self> {
        let modulus = params.plaintext_modulus();
        if value >= modulus {
            return Err(Error::Encoding { value, modulus });
        }
        check_length(length, params)?;
        Ok(Self {
            values: vec![value; length],
            modulus,
        })
    }

    /// Slot values.
    #[must_use]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Number of slots in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; empty vectors are refused at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// SIMD-encode into one plaintext. Unused slots are zero.
    pub fn encode(&self, params: &SchemeParameters) -> Result<Plaintext> {
        if self.modulus != params.plaintext_modulus() {
            return Err(Error::Mismatch {
                stage: Stage::Encode,
                reason: "vector was checked against another plaintext modulus",
            });
        }
        Plaintext::try_encode(self.values.as_slice(), Encoding::simd(), params.bfv())
            .map_err(Error::crypto(Stage::Encode))
    }
}

fn check_length(length: usize, params: &SchemeParameters) -> Result<()> {
    let slots = params.degree();
    if length == 0 || length > slots {
        return Err(Error::InvalidLength { length, slots });
    }
    Ok(())
}

/// Every slot of a SIMD-encoded plaintext.
pub fn decode(plaintext: &Plaintext) -> Result<Vec<u64>> {
    Vec::<u64>::try_decode(plaintext, Encoding::simd()).map_err(Error::crypto(Stage::Decode))
}
