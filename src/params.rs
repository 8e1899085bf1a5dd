//! Scheme parameters: degree, coefficient moduli and plaintext modulus.

use std::sync::Arc;

use fhe::bfv::{BfvParameters, BfvParametersBuilder};
use fhe_util::is_prime;
use log::debug;
use num_integer::Integer;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Degree used by the demo.
pub const DEFAULT_DEGREE: usize = 4096;

/// Batching-friendly prime used by the demo (40961 ≡ 1 mod 8192).
pub const DEFAULT_PLAINTEXT_MODULUS: u64 = 40961;

/// Default coefficient-modulus bit sizes keyed by degree (128-bit security).
const DEFAULT_MODULI: [(usize, &[usize]); 6] = [
    (1024, &[27]),
    (2048, &[54]),
    (4096, &[36, 36, 37]),
    (8192, &[43, 43, 44, 44, 44]),
    (16384, &[48, 48, 48, 49, 49, 49, 49, 49, 49]),
    (32768, &[55; 16]),
];

/// Coefficient-modulus bit sizes for `degree`, if the degree is supported.
#[must_use]
pub fn default_moduli_sizes(degree: usize) -> Option<&'static [usize]> {
    DEFAULT_MODULI
        .iter()
        .find(|(d, _)| *d == degree)
        .map(|(_, sizes)| *sizes)
}

/// Plain, serializable description of a parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// Polynomial degree (power of two).
    pub degree: usize,
    /// Plaintext modulus.
    pub plaintext_modulus: u64,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            plaintext_modulus: DEFAULT_PLAINTEXT_MODULUS,
        }
    }
}

/// Validated BFV parameters. Cloning shares the underlying library handle,
/// so clones count as the same parameter set.
#[derive(Clone, Debug)]
pub struct SchemeParameters {
    degree: usize,
    moduli_sizes: &'static [usize],
    plaintext_modulus: u64,
    bfv: Arc<BfvParameters>,
}

impl SchemeParameters {
    /// Parameters for `degree` with the default plaintext modulus.
    pub fn configure(degree: usize) -> Result<Self> {
        Self::configure_with(degree, DEFAULT_PLAINTEXT_MODULUS)
    }

    /// Parameters described by `config`.
    pub fn from_config(config: &SchemeConfig) -> Result<Self> {
        Self::configure_with(config.degree, config.plaintext_modulus)
    }

    /// Parameters for `degree` with plaintext modulus `t`.
    ///
    /// `t` must be prime and congruent to 1 modulo `2 * degree` so the
    /// batching codec is available.
    pub fn configure_with(degree: usize, t: u64) -> Result<Self> {
        let moduli_sizes =
            default_moduli_sizes(degree).ok_or(ConfigError::UnsupportedDegree(degree))?;
        if moduli_sizes.is_empty() {
            return Err(ConfigError::EmptyModuli(degree).into());
        }
        if t < 2 || !is_prime(t) {
            return Err(ConfigError::NotPrime(t).into());
        }
        if !supports_batching(t, degree) {
            return Err(ConfigError::NoBatching { modulus: t, degree }.into());
        }

        let bfv = BfvParametersBuilder::new()
            .set_degree(degree)
            .set_plaintext_modulus(t)
            .set_moduli_sizes(moduli_sizes)
            .build_arc()
            .map_err(ConfigError::Library)?;
        debug!("configured degree={degree} t={t} moduli_bits={moduli_sizes:?}");

        Ok(Self {
            degree,
            moduli_sizes,
            plaintext_modulus: t,
            bfv,
        })
    }

    /// Polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Bit sizes of the coefficient moduli.
    #[must_use]
    pub fn moduli_sizes(&self) -> &[usize] {
        self.moduli_sizes
    }

    /// Plaintext modulus `t`.
    #[must_use]
    pub fn plaintext_modulus(&self) -> u64 {
        self.plaintext_modulus
    }

    /// Length of one fill vector (one batching row, `degree / 2`).
    #[must_use]
    pub fn fill_length(&self) -> usize {
        self.degree / 2
    }

    /// The library handle.
    #[must_use]
    pub fn bfv(&self) -> &Arc<BfvParameters> {
        &self.bfv
    }

    /// Whether `other` is this very parameter set.
    #[must_use]
    pub fn same_as(&self, other: &SchemeParameters) -> bool {
        Arc::ptr_eq(&self.bfv, &other.bfv)
    }
}

/// `t ≡ 1 (mod 2n)`
fn supports_batching(t: u64, degree: usize) -> bool {
    let two_n = 2 * degree as u64;
    t > 1 && Integer::is_multiple_of(&(t - 1), &two_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn default_configuration() {
        let params = SchemeParameters::configure(DEFAULT_DEGREE).unwrap();
        assert_eq!(params.degree(), 4096);
        assert_eq!(params.plaintext_modulus(), 40961);
        assert_eq!(params.moduli_sizes(), &[36, 36, 37]);
        assert_eq!(params.fill_length(), 2048);
        assert_eq!(params.bfv().degree(), 4096);
        assert_eq!(params.bfv().plaintext(), 40961);
        assert_eq!(params.bfv().moduli().len(), 3);
    }

    #[test]
    fn from_default_config() {
        let params = SchemeParameters::from_config(&SchemeConfig::default()).unwrap();
        assert_eq!(params.degree(), DEFAULT_DEGREE);
        assert_eq!(params.plaintext_modulus(), DEFAULT_PLAINTEXT_MODULUS);
    }

    #[test]
    fn clones_are_the_same_parameter_set() {
        let a = SchemeParameters::configure(1024).unwrap();
        let b = SchemeParameters::configure(1024).unwrap();
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn unsupported_degrees_are_rejected() {
        for degree in [0, 8, 512, 1000, 4095, 65536] {
            assert!(matches!(
                SchemeParameters::configure(degree),
                Err(Error::Configuration(ConfigError::UnsupportedDegree(d))) if d == degree
            ));
        }
    }

    #[test]
    fn every_table_entry_is_non_empty() {
        for (degree, sizes) in DEFAULT_MODULI {
            assert!(degree.is_power_of_two());
            assert!(!sizes.is_empty());
            assert!(sizes.iter().all(|&s| (10..=62).contains(&s)));
        }
    }

    #[test]
    fn plaintext_modulus_must_be_prime() {
        assert!(matches!(
            SchemeParameters::configure_with(4096, 40960),
            Err(Error::Configuration(ConfigError::NotPrime(40960)))
        ));
    }

    #[test]
    fn plaintext_modulus_must_support_batching() {
        // 40961 - 1 = 2^13 * 5, so batching stops at degree 4096.
        assert!(matches!(
            SchemeParameters::configure(8192),
            Err(Error::Configuration(ConfigError::NoBatching { modulus: 40961, degree: 8192 }))
        ));
        assert!(SchemeParameters::configure_with(2048, 12289).is_ok());
    }

    #[test]
    fn largest_u64_prime_is_refused_without_overflow() {
        // 2^64 - 59 is prime but 2^64 - 60 is not a multiple of 8192.
        let t = 18_446_744_073_709_551_557;
        let err = SchemeParameters::configure_with(4096, t).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigError::NoBatching { modulus, degree: 4096 }) if modulus == t
        ));
    }

    #[test]
    fn tiny_and_composite_moduli_are_refused() {
        for t in [0, 1, 40963 * 3] {
            assert!(matches!(
                SchemeParameters::configure_with(2048, t),
                Err(Error::Configuration(ConfigError::NotPrime(m))) if m == t
            ));
        }
    }

    #[test]
    fn config_round_trips_through_csv() {
        let config = SchemeConfig {
            degree: 2048,
            plaintext_modulus: 12289,
        };
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(config).unwrap();
        let bytes = wtr.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "degree,plaintext_modulus\n2048,12289\n"
        );

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let back: SchemeConfig = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(back, config);
        assert!(SchemeParameters::from_config(&back).is_ok());
    }

    #[test]
    fn batching_congruence() {
        assert!(supports_batching(40961, 4096));
        assert!(supports_batching(40961, 1024));
        assert!(!supports_batching(40961, 8192));
        assert!(!supports_batching(1, 1024));
    }
}
