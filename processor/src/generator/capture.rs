use pulsecore::prelude::PipelineResult;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Configuration for generating a synthetic dual-polarization capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Per-record sample counts; one record is written per entry.
    pub pulse_samples: Vec<u16>,
    pub amplitude: f32,
    pub noise: f32,
    pub seed: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            pulse_samples: vec![5000; 16],
            amplitude: 1.0,
            noise: 0.05,
            seed: 0,
        }
    }
}

impl CaptureConfig {
    /// Varies the record lengths so remainder gates get exercised.
    pub fn with_pulses(pulse_count: usize) -> Self {
        let pulse_samples = (0..pulse_count)
            .map(|index| (4800 + (index % 7) * 50) as u16)
            .collect();
        Self {
            pulse_samples,
            ..Default::default()
        }
    }

    pub fn with_sample_counts(pulse_samples: Vec<u16>) -> Self {
        Self {
            pulse_samples,
            ..Default::default()
        }
    }
}

/// Builds the raw capture byte stream: per record a `u16` sample count,
/// then that many (I,Q) f32 pairs for the vertical channel followed by the
/// horizontal channel, little-endian throughout.
pub fn build_capture_bytes(config: &CaptureConfig) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut bytes = Vec::new();
    for &valid_samples in &config.pulse_samples {
        bytes.extend_from_slice(&valid_samples.to_le_bytes());
        for channel in 0..2u16 {
            let phase_offset = channel as f32 * 0.5;
            for sample in 0..valid_samples as usize {
                let phase = sample as f32 / valid_samples.max(1) as f32 * 2.0 * PI + phase_offset;
                let jitter = if config.noise > 0.0 {
                    rng.gen_range(-config.noise..config.noise)
                } else {
                    0.0
                };
                let i = config.amplitude * phase.cos() + jitter;
                let q = config.amplitude * phase.sin() + jitter;
                bytes.extend_from_slice(&i.to_le_bytes());
                bytes.extend_from_slice(&q.to_le_bytes());
            }
        }
    }
    bytes
}

pub fn write_capture_file<P: AsRef<Path>>(path: P, config: &CaptureConfig) -> PipelineResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writer.write_all(&build_capture_bytes(config))?;
    writer.flush()?;
    Ok(())
}
