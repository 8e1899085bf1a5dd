//! The encrypted addition pipeline.
//!
//! Configure → KeyGen → Encode → Encrypt → Evaluate → Decrypt → Decode.
//! Every invocation builds its own parameters and keys and drops them on
//! return; nothing is shared between calls.

use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, info};
use rand::{CryptoRng, RngCore};

use crate::{
    algebra,
    codec::{self, PlaintextVector},
    error::{Error, Result, Stage},
    params::{SchemeConfig, SchemeParameters},
    scheme,
};

/// Result of one pipeline invocation.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// First decoded slot.
    pub sum: u64,
    /// The decoded fill-length slots.
    pub slots: Vec<u64>,
    /// Wall-clock time spent in each stage, in pipeline order.
    pub timings: Vec<(Stage, Duration)>,
}

impl Outcome {
    /// Whether every decoded slot holds the same value.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.slots.iter().all_equal()
    }
}

/// Line printed by both entry points.
#[must_use]
pub fn report_line(sum: u64) -> String {
    format!("Result of homomorphic addition: {sum}")
}

/// `value1 + value2 (mod t)` computed on ciphertexts with the default
/// parameters (degree 4096, t = 40961) and the thread CSPRNG.
pub fn run(value1: u64, value2: u64) -> Result<u64> {
    let outcome = run_with(&SchemeConfig::default(), value1, value2, &mut rand::rng())?;
    Ok(outcome.sum)
}

/// Runs every stage in order. The reported sum is slot 0; with uniform fills
/// all slots agree.
pub fn run_with<R: RngCore + CryptoRng>(
    config: &SchemeConfig,
    value1: u64,
    value2: u64,
    rng: &mut R,
) -> Result<Outcome> {
    let mut timings = Vec::with_capacity(Stage::ALL.len());

    let params = timed(&mut timings, Stage::Configure, || SchemeParameters::from_config(config))?;
    let keys = timed(&mut timings, Stage::KeyGen, || Ok(scheme::generate_keys(&params, rng)))?;

    let length = params.fill_length();
    let (pt1, pt2) = timed(&mut timings, Stage::Encode, || {
        let pt1 = PlaintextVector::fill(value1, length, &params)?.encode(&params)?;
        let pt2 = PlaintextVector::fill(value2, length, &params)?.encode(&params)?;
        Ok((pt1, pt2))
    })?;
    let (ct1, ct2) = timed(&mut timings, Stage::Encrypt, || {
        Ok((
            scheme::encrypt(&pt1, &keys, rng)?,
            scheme::encrypt(&pt2, &keys, rng)?,
        ))
    })?;
    let ct_sum = timed(&mut timings, Stage::Evaluate, || algebra::add(&ct1, &ct2))?;
    let pt_sum = timed(&mut timings, Stage::Decrypt, || scheme::decrypt(&ct_sum, &keys))?;
    let mut slots = timed(&mut timings, Stage::Decode, || codec::decode(&pt_sum))?;

    slots.truncate(length);
    let sum = slots.first().copied().ok_or(Error::EmptyDecode)?;
    info!(
        "{value1} + {value2} = {sum} (degree {}, t = {})",
        params.degree(),
        params.plaintext_modulus()
    );

    Ok(Outcome {
        sum,
        slots,
        timings,
    })
}

fn timed<T>(
    timings: &mut Vec<(Stage, Duration)>,
    stage: Stage,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    match &out {
        Ok(_) => debug!("{stage} done in {elapsed:?}"),
        Err(e) => debug!("{stage} failed after {elapsed:?}: {e}"),
    }
    timings.push((stage, elapsed));
    out
}
