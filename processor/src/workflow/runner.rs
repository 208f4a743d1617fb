use crate::workflow::config::RunConfig;
use anyhow::Context;
use pulsecore::capture::{PulseDecoder, ResultEncoder};
use pulsecore::processing::{AutocorrEngine, GateReducer, GateStore};

pub struct RunSummary {
    pub pulse_count: usize,
}

/// Runs the pipeline end to end: decode, allocate, reduce, correlate,
/// encode. The stages are strictly sequential; only the loops inside the
/// reducer and the autocorrelation engine fan out across the worker pool.
#[derive(Clone)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<RunSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.normalized_threads())
            .build()
            .context("building worker pool")?;

        let decoder = PulseDecoder::new();
        let (pulses, index) = decoder
            .decode_file(&self.config.input)
            .with_context(|| format!("decoding capture {}", self.config.input.display()))?;

        let mut store =
            GateStore::allocate(index.pulse_count).context("allocating gate store")?;
        pool.install(|| GateReducer::new().execute(&pulses, &mut store))
            .context("reducing pulses into gates")?;
        pool.install(|| AutocorrEngine::new().execute(&mut store));
        store.release_magnitudes();

        ResultEncoder::new()
            .encode_file(&self.config.output, &store)
            .with_context(|| format!("writing results to {}", self.config.output.display()))?;

        log::info!(
            "run complete: {} pulses -> {}",
            index.pulse_count,
            self.config.output.display()
        );
        Ok(RunSummary {
            pulse_count: index.pulse_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::capture::{write_capture_file, CaptureConfig};
    use pulsecore::processing::NUM_GATES;
    use std::fs;
    use tempfile::tempdir;

    fn run_with_threads(threads: usize, dir: &std::path::Path, tag: &str) -> Vec<u8> {
        let input = dir.join("pulses.iq");
        let output = dir.join(format!("out_{}.bin", tag));
        let capture = CaptureConfig::with_sample_counts(vec![500, 501, 499]);
        write_capture_file(&input, &capture).unwrap();

        let runner = Runner::new(RunConfig::from_args(input, output.clone(), threads));
        let summary = runner.execute().unwrap();
        assert_eq!(summary.pulse_count, 3);
        fs::read(output).unwrap()
    }

    #[test]
    fn end_to_end_output_has_the_mandated_size_and_header() {
        let dir = tempdir().unwrap();
        let bytes = run_with_threads(4, dir.path(), "e2e");
        // u16 header + 500 * (u16 index + 3 pulses * 4 bytes * 2 channels)
        assert_eq!(bytes.len(), 2 + NUM_GATES * (2 + 3 * 4 * 2));
        assert_eq!(&bytes[0..2], &3u16.to_le_bytes());
        assert_eq!(&bytes[2..4], &0u16.to_le_bytes());
    }

    #[test]
    fn output_bytes_do_not_depend_on_thread_count() {
        let dir = tempdir().unwrap();
        let single = run_with_threads(1, dir.path(), "st");
        let multi = run_with_threads(4, dir.path(), "mt");
        assert_eq!(single, multi);
    }

    #[test]
    fn missing_capture_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let runner = Runner::new(RunConfig::from_args(
            dir.path().join("absent.iq"),
            dir.path().join("out.bin"),
            2,
        ));
        assert!(runner.execute().is_err());
    }
}
