use crate::capture::pulse::Pulse;
use crate::prelude::{PipelineError, PipelineResult};
use crate::processing::gates::{bucket_size, GateStore, NUM_GATES};
use crate::telemetry::log::LogManager;
use rayon::prelude::*;

/// Partitions each pulse's samples across the 500 gates and stores the
/// averaged sample magnitude per gate per pulse.
///
/// The loop over pulses is data-parallel: every task owns one pulse-major
/// magnitude row per channel, so no two tasks ever touch the same cell.
/// Within one pulse the gate loop is sequential because the sample cursor
/// threads through all 500 buckets.
pub struct GateReducer {
    logger: LogManager,
}

impl GateReducer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::for_stage("gate-reducer"),
        }
    }

    pub fn execute(&self, pulses: &[Pulse], store: &mut GateStore) -> PipelineResult<()> {
        if pulses.len() != store.pulse_count() {
            return Err(PipelineError::InvalidInput(format!(
                "store sized for {} pulses, got {}",
                store.pulse_count(),
                pulses.len()
            )));
        }

        let (rows_v, rows_h) = store.magnitude_rows_mut();
        rows_v
            .par_chunks_mut(NUM_GATES)
            .zip(rows_h.par_chunks_mut(NUM_GATES))
            .zip(pulses.par_iter())
            .for_each(|((row_v, row_h), pulse)| reduce_pulse(pulse, row_v, row_h));

        self.logger
            .record(&format!("reduced {} pulses into {} gates", pulses.len(), NUM_GATES));
        Ok(())
    }
}

impl Default for GateReducer {
    fn default() -> Self {
        Self::new()
    }
}

fn reduce_pulse(pulse: &Pulse, row_v: &mut [f32], row_h: &mut [f32]) {
    let valid_samples = pulse.valid_samples();
    let mut cursor = 0usize;
    for gate in 0..NUM_GATES {
        let width = bucket_size(valid_samples, gate);
        let mut sum_v = 0.0f32;
        let mut sum_h = 0.0f32;
        for sample in cursor..cursor + width {
            sum_v += pulse.vertical[sample].norm();
            sum_h += pulse.horizontal[sample].norm();
        }
        cursor += width;

        // An empty bucket reports a defined zero rather than 0/0.
        if width > 0 {
            row_v[gate] = sum_v / width as f32;
            row_h[gate] = sum_h / width as f32;
        } else {
            row_v[gate] = 0.0;
            row_h[gate] = 0.0;
        }
    }
    debug_assert_eq!(cursor, valid_samples);
}
