use anyhow::Context;
use clap::Parser;
use generator::capture::{write_capture_file, CaptureConfig};
use pulsecore::telemetry::timing::append_timing_entry;
use std::path::PathBuf;
use std::time::Instant;
use workflow::config::RunConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Dual-polarization pulse capture processor")]
struct Args {
    /// Capture file to process
    #[arg(long, default_value = "pulses.iq")]
    input: PathBuf,
    /// Destination for the per-gate autocorrelation results
    #[arg(long, default_value = "out.txt")]
    output: PathBuf,
    /// Worker threads (clamped to 1..=16)
    #[arg(long, default_value_t = 4)]
    threads: usize,
    /// Print the total execution time
    #[arg(short = 't', long, default_value_t = false)]
    time: bool,
    /// Append "<threads> <seconds>" to the timing log
    #[arg(short = 's', long, default_value_t = false)]
    save_timing: bool,
    /// Timing log used with --save-timing
    #[arg(long, default_value = "timing.log")]
    timing_log: PathBuf,
    /// Load a run config from YAML instead of the flags above
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a synthetic capture with this many pulses to the input path
    /// and exit
    #[arg(long)]
    generate: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        RunConfig::load(path)?
    } else {
        RunConfig::from_args(args.input, args.output, args.threads)
    };

    if let Some(pulse_count) = args.generate {
        let capture = CaptureConfig::with_pulses(pulse_count);
        write_capture_file(&config.input, &capture)
            .with_context(|| format!("writing synthetic capture {}", config.input.display()))?;
        println!(
            "Synthetic capture with {} pulses written to '{}'",
            pulse_count,
            config.input.display()
        );
        return Ok(());
    }

    let started = Instant::now();
    let runner = Runner::new(config.clone());
    let summary = runner.execute()?;
    let elapsed = started.elapsed().as_secs_f64();

    println!(
        "Processed {} pulses -> '{}'",
        summary.pulse_count,
        config.output.display()
    );
    if args.time {
        println!(
            "Total time = {:.6} seconds ({} threads)",
            elapsed,
            config.normalized_threads()
        );
    }
    if args.save_timing {
        append_timing_entry(&args.timing_log, config.normalized_threads(), elapsed)
            .context("appending timing entry")?;
    }

    Ok(())
}
