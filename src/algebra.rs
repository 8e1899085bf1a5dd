//! Homomorphic addition.

use log::debug;

use crate::{
    cipher::Ciphertext,
    error::{Error, Result, Stage},
};

/// `a + b` evaluated on ciphertexts. Both operands must come from the same
/// parameter set and key pair; the result is a new ciphertext.
pub fn add(a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
    if !a.params.same_as(&b.params) {
        return Err(Error::Mismatch {
            stage: Stage::Evaluate,
            reason: "ciphertexts use different parameters",
        });
    }
    if a.lineage != b.lineage {
        return Err(Error::Mismatch {
            stage: Stage::Evaluate,
            reason: "ciphertexts were encrypted under different key pairs",
        });
    }
    debug!("adding ciphertexts under key pair {}", a.lineage);
    Ok(Ciphertext {
        inner: &a.inner + &b.inner,
        params: a.params.clone(),
        lineage: a.lineage,
    })
}
