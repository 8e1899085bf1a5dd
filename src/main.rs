//! Fixed demo: adds the fills 10 and 20 under encryption and prints the sum.

use std::io::{self, Write};
use std::process::ExitCode;

use encrypted_addition::{
    pipeline::{self, report_line},
    Result,
};
use log::error;

fn main() -> ExitCode {
    env_logger::init();

    let result = pipeline::run(10, 20);
    ExitCode::from(report(result, &mut io::stdout().lock(), &mut io::stderr().lock()))
}

/// Result line on `out`, or the stage-tagged error on `err`. Returns the
/// process exit status.
fn report(result: Result<u64>, out: &mut impl Write, err: &mut impl Write) -> u8 {
    let written = match result {
        Ok(sum) => writeln!(out, "{}", report_line(sum)).map(|()| 0),
        Err(e) => {
            error!("demo failed at stage {}", e.stage());
            writeln!(err, "error: {e}").map(|()| 1)
        }
    };
    written.unwrap_or(1)
}
