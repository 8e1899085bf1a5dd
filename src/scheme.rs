//! Key generation, encryption & decryption.

use std::fmt;

use fhe::bfv::{Plaintext, PublicKey, SecretKey};
use fhe_traits::{FheDecrypter, FheEncrypter};
use log::debug;
use rand::{CryptoRng, RngCore};

use crate::{
    cipher::Ciphertext,
    error::{Error, Result, Stage},
    params::SchemeParameters,
};

/// Identifies the key pair a ciphertext was produced under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyLineage(u64);

impl fmt::Display for KeyLineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Public key for encryption, secret key for decryption.
pub struct KeyPair {
    public: PublicKey,
    secret: SecretKey,
    params: SchemeParameters,
    lineage: KeyLineage,
}

impl KeyPair {
    /// Lineage tag shared by every ciphertext this pair produces.
    #[must_use]
    pub fn lineage(&self) -> KeyLineage {
        self.lineage
    }

    /// Parameters the pair was generated under.
    #[must_use]
    pub fn params(&self) -> &SchemeParameters {
        &self.params
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("degree", &self.params.degree())
            .field("lineage", &self.lineage)
            .finish_non_exhaustive()
    }
}

/// Fresh secret key and the public key derived from it.
pub fn generate_keys<R: RngCore + CryptoRng>(params: &SchemeParameters, rng: &mut R) -> KeyPair {
    let secret = SecretKey::random(params.bfv(), rng);
    let public = PublicKey::new(&secret, rng);
    let lineage = KeyLineage(rng.next_u64());
    debug!("generated key pair {lineage} at degree {}", params.degree());
    KeyPair {
        public,
        secret,
        params: params.clone(),
        lineage,
    }
}

/// Encrypt an encoded plaintext under the pair's public key.
pub fn encrypt<R: RngCore + CryptoRng>(
    plaintext: &Plaintext,
    keys: &KeyPair,
    rng: &mut R,
) -> Result<Ciphertext> {
    let inner = keys
        .public
        .try_encrypt(plaintext, rng)
        .map_err(Error::crypto(Stage::Encrypt))?;
    Ok(Ciphertext {
        inner,
        params: keys.params.clone(),
        lineage: keys.lineage,
    })
}

/// Decrypt with the pair's secret key. The ciphertext must belong to `keys`.
pub fn decrypt(ciphertext: &Ciphertext, keys: &KeyPair) -> Result<Plaintext> {
    if !ciphertext.params.same_as(&keys.params) {
        return Err(Error::Mismatch {
            stage: Stage::Decrypt,
            reason: "ciphertext and secret key use different parameters",
        });
    }
    if ciphertext.lineage != keys.lineage {
        return Err(Error::Mismatch {
            stage: Stage::Decrypt,
            reason: "ciphertext was encrypted under another key pair",
        });
    }
    keys.secret
        .try_decrypt(&ciphertext.inner)
        .map_err(Error::crypto(Stage::Decrypt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, PlaintextVector};
    use rand::{rngs::StdRng, SeedableRng};

    fn small_params() -> SchemeParameters {
        SchemeParameters::configure(2048).unwrap()
    }

    #[test]
    fn encrypt_then_decrypt() {
        let params = small_params();
        let mut rng = StdRng::seed_from_u64(7);
        let keys = generate_keys(&params, &mut rng);

        let pt = PlaintextVector::fill(123, params.fill_length(), &params)
            .unwrap()
            .encode(&params)
            .unwrap();
        let ct = encrypt(&pt, &keys, &mut rng).unwrap();
        assert_eq!(ct.lineage(), keys.lineage());
        assert!(ct.params().same_as(&params));

        let slots = decode(&decrypt(&ct, &keys).unwrap()).unwrap();
        assert!(slots[..params.fill_length()].iter().all(|&v| v == 123));
    }

    #[test]
    fn independent_key_pairs_have_distinct_lineage() {
        let params = small_params();
        let mut rng = rand::rng();
        let a = generate_keys(&params, &mut rng);
        let b = generate_keys(&params, &mut rng);
        assert_ne!(a.lineage(), b.lineage());
    }

    #[test]
    fn foreign_secret_key_is_rejected() {
        let params = small_params();
        let mut rng = rand::rng();
        let alice = generate_keys(&params, &mut rng);
        let bob = generate_keys(&params, &mut rng);

        let pt = PlaintextVector::fill(1, 4, &params).unwrap().encode(&params).unwrap();
        let ct = encrypt(&pt, &alice, &mut rng).unwrap();
        let err = decrypt(&ct, &bob).unwrap_err();
        assert!(matches!(err, Error::Mismatch { stage: Stage::Decrypt, .. }));
    }

    #[test]
    fn foreign_parameters_are_rejected() {
        let mut rng = rand::rng();
        let p1 = small_params();
        let p2 = small_params();
        let k1 = generate_keys(&p1, &mut rng);
        let k2 = generate_keys(&p2, &mut rng);

        let pt = PlaintextVector::fill(1, 4, &p1).unwrap().encode(&p1).unwrap();
        let ct = encrypt(&pt, &k1, &mut rng).unwrap();
        let err = decrypt(&ct, &k2).unwrap_err();
        assert_eq!(err.stage(), Stage::Decrypt);
        assert!(err.to_string().contains("different parameters"));
    }

    #[test]
    fn key_pair_debug_hides_key_material() {
        let params = small_params();
        let keys = generate_keys(&params, &mut rand::rng());
        let shown = format!("{keys:?}");
        assert!(shown.contains("degree: 2048"));
        assert!(shown.contains(".."));
    }
}
