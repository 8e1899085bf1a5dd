//! Encrypted addition showcase ― two uniform fills added under BFV
//!
//! All cryptography is delegated to the `fhe` crate; this crate wires the
//! pipeline, checks its inputs and reports which stage failed.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, missing_docs)]

pub mod algebra;
pub mod cipher;
pub mod codec;
pub mod error;
pub mod ffi;
pub mod params;
pub mod pipeline;
pub mod scheme;

pub use cipher::Ciphertext;
pub use codec::PlaintextVector;
pub use error::{ConfigError, Error, Result, Stage};
pub use params::{SchemeConfig, SchemeParameters};
pub use pipeline::{run, run_with, Outcome};
pub use scheme::{KeyLineage, KeyPair};
