use crate::processing::gates::{GateStore, NUM_GATES};
use crate::telemetry::log::LogManager;
use rayon::prelude::*;

/// One-sided normalized autocorrelation of `series` into `out`:
/// `out[k] = (1/N) * sum_{i=0}^{N-1-k} series[i] * series[i+k]`.
///
/// Accumulation stays in f32, no mean subtraction, no FFT; a direct O(N²)
/// double sum as the reduction output lengths are pulse counts, not sample
/// counts.
pub fn autocorrelate(series: &[f32], out: &mut [f32]) {
    let len = series.len();
    debug_assert_eq!(len, out.len());
    for lag in 0..len {
        let mut sum = 0.0f32;
        for i in 0..len - lag {
            sum += series[i] * series[i + lag];
        }
        out[lag] = sum / len as f32;
    }
}

/// Computes each gate's autocorrelation series for both channels.
///
/// Gates are independent, so the gate loop is data-parallel over disjoint
/// gate-major output rows; the two channels of one gate run as a fork-join
/// pair.
pub struct AutocorrEngine {
    logger: LogManager,
}

impl AutocorrEngine {
    pub fn new() -> Self {
        Self {
            logger: LogManager::for_stage("autocorr-engine"),
        }
    }

    pub fn execute(&self, store: &mut GateStore) {
        let pulse_count = store.pulse_count;
        if pulse_count == 0 {
            return;
        }

        let magnitude_v = &store.magnitude_v;
        let magnitude_h = &store.magnitude_h;
        store
            .autocorr_v
            .par_chunks_mut(pulse_count)
            .zip(store.autocorr_h.par_chunks_mut(pulse_count))
            .enumerate()
            .for_each(|(gate, (out_v, out_h))| {
                rayon::join(
                    || autocorrelate(&gate_series(magnitude_v, gate, pulse_count), out_v),
                    || autocorrelate(&gate_series(magnitude_h, gate, pulse_count), out_h),
                );
            });

        self.logger
            .record(&format!("autocorrelated {} gates", NUM_GATES));
    }
}

impl Default for AutocorrEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Gathers one gate's pulse-indexed magnitude column out of the pulse-major
/// matrix.
fn gate_series(rows: &[f32], gate: usize, pulse_count: usize) -> Vec<f32> {
    (0..pulse_count)
        .map(|pulse| rows[pulse * NUM_GATES + gate])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_decays_linearly_with_lag() {
        let c = 3.0f32;
        let n = 8usize;
        let series = vec![c; n];
        let mut out = vec![0.0f32; n];
        autocorrelate(&series, &mut out);
        for (lag, &value) in out.iter().enumerate() {
            let expected = c * c * (n - lag) as f32 / n as f32;
            assert!((value - expected).abs() < 1e-5, "lag {}", lag);
        }
    }

    #[test]
    fn small_series_matches_hand_computation() {
        let series = [1.0f32, 2.0, 3.0];
        let mut out = [0.0f32; 3];
        autocorrelate(&series, &mut out);
        // (1+4+9)/3, (2+6)/3, 3/3
        assert_eq!(out[0], 14.0 / 3.0);
        assert_eq!(out[1], 8.0 / 3.0);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn empty_series_is_a_no_op() {
        let mut out: [f32; 0] = [];
        autocorrelate(&[], &mut out);
    }

    #[test]
    fn engine_fills_every_gate_independently() {
        let pulse_count = 3;
        let mut store = GateStore::allocate(pulse_count).unwrap();
        // Give gate 7 a constant magnitude of 2.0 on the vertical channel.
        for pulse in 0..pulse_count {
            store.magnitude_v[pulse * NUM_GATES + 7] = 2.0;
        }

        AutocorrEngine::new().execute(&mut store);

        let (gate7_v, gate7_h) = store.autocorr_gate(7);
        assert_eq!(gate7_v, &[4.0, 8.0 / 3.0, 4.0 / 3.0]);
        assert_eq!(gate7_h, &[0.0, 0.0, 0.0]);
        let (other_v, _) = store.autocorr_gate(8);
        assert_eq!(other_v, &[0.0, 0.0, 0.0]);
    }
}
