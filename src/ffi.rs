//! C-callable entry points, declared in `include/homomorphic_lib.h`.
//!
//! Each call builds its own parameters and keys, so the exports may be
//! called from several host threads at once. Panics are caught here and
//! never unwind into the caller.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::os::raw::c_int;
use std::panic;

use log::error;

use crate::{
    error::{Error, Result},
    pipeline,
};

fn add_inputs(input1: c_int, input2: c_int) -> Result<u64> {
    let value1 = u64::try_from(input1).map_err(|_| Error::NegativeInput(input1.into()))?;
    let value2 = u64::try_from(input2).map_err(|_| Error::NegativeInput(input2.into()))?;
    pipeline::run(value1, value2)
}

fn guarded(input1: c_int, input2: c_int) -> Option<u64> {
    match panic::catch_unwind(|| add_inputs(input1, input2)) {
        Ok(Ok(sum)) => Some(sum),
        Ok(Err(e)) => {
            error!("homomorphic addition of {input1} and {input2} failed at {}: {e}", e.stage());
            eprintln!("homomorphic addition failed: {e}");
            None
        }
        Err(_) => {
            error!("homomorphic addition of {input1} and {input2} panicked");
            eprintln!("homomorphic addition failed: internal error");
            None
        }
    }
}

/// Prints `Result of homomorphic addition: <sum>` to stdout, or the failing
/// stage to stderr.
#[export_name = "performHomomorphicAddition"]
pub extern "C" fn perform_homomorphic_addition(input1: c_int, input2: c_int) {
    write_sum(&mut io::stdout().lock(), input1, input2);
}

fn write_sum(out: &mut impl Write, input1: c_int, input2: c_int) {
    if let Some(sum) = guarded(input1, input2) {
        let line = pipeline::report_line(sum);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            error!("could not write result of {input1} + {input2}: {e}");
        }
    }
}

/// Returns the sum, or -1 on any failure.
#[export_name = "performHomomorphicAdditionSum"]
pub extern "C" fn perform_homomorphic_addition_sum(input1: c_int, input2: c_int) -> i64 {
    guarded(input1, input2)
        .and_then(|sum| i64::try_from(sum).ok())
        .unwrap_or(-1)
}
