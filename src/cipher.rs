//! Ciphertext container.

use crate::{params::SchemeParameters, scheme::KeyLineage};

/// A library ciphertext tagged with the parameters and key pair it was
/// produced under.
#[derive(Clone, Debug)]
pub struct Ciphertext {
    pub(crate) inner: fhe::bfv::Ciphertext,
    pub(crate) params: SchemeParameters,
    pub(crate) lineage: KeyLineage,
}

impl Ciphertext {
    /// Parameters this ciphertext was encrypted under.
    #[must_use]
    pub fn params(&self) -> &SchemeParameters {
        &self.params
    }

    /// Key pair this ciphertext belongs to.
    #[must_use]
    pub fn lineage(&self) -> KeyLineage {
        self.lineage
    }

    /// Whether `other` may be combined with this ciphertext.
    #[must_use]
    pub fn compatible_with(&self, other: &Ciphertext) -> bool {
        self.params.same_as(&other.params) && self.lineage == other.lineage
    }
}
