//! Runs the default pipeline repeatedly and records per-stage times.

use std::collections::HashMap;
use std::error::Error;
use std::time::Duration;

use csv::Writer;
use encrypted_addition::{pipeline, SchemeConfig, Stage};
use log::info;
use serde::Serialize;

const RUNS: usize = 20;
const OUTPUT: &str = "stage_timings.csv";

#[derive(Serialize)]
struct Row {
    run: usize,
    stage: Stage,
    time_ms: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = SchemeConfig::default();
    let mut wtr = Writer::from_path(OUTPUT)?;
    let mut totals: HashMap<Stage, Duration> = HashMap::new();
    let mut rng = rand::rng();

    println!(
        "Timing {RUNS} runs at degree {}, t = {}",
        config.degree, config.plaintext_modulus
    );
    for run in 0..RUNS {
        let outcome = pipeline::run_with(&config, 10, 20, &mut rng)?;
        if outcome.sum != 30 {
            return Err(format!("run {run}: expected 30, got {}", outcome.sum).into());
        }
        for (stage, elapsed) in outcome.timings {
            wtr.serialize(Row {
                run,
                stage,
                time_ms: elapsed.as_secs_f64() * 1000.0,
            })?;
            *totals.entry(stage).or_default() += elapsed;
        }
    }
    wtr.flush()?;
    info!("wrote {OUTPUT}");

    println!("\nAverage per stage:");
    for stage in Stage::ALL {
        let total = totals.get(&stage).copied().unwrap_or_default();
        let avg_ms = total.as_secs_f64() * 1000.0 / RUNS as f64;
        println!("{stage:>10}: {avg_ms:.3} ms");
    }
    Ok(())
}
