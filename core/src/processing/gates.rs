use crate::prelude::{PipelineError, PipelineResult};

/// Number of range gates the radar discriminates.
pub const NUM_GATES: usize = 500;

/// Samples assigned to gate `gate` out of a pulse with `valid_samples`
/// samples. The `valid_samples % NUM_GATES` lowest-indexed gates take one
/// extra sample, so the buckets tile the pulse exactly.
pub fn bucket_size(valid_samples: usize, gate: usize) -> usize {
    let remainder = valid_samples % NUM_GATES;
    if gate < remainder {
        valid_samples / NUM_GATES + 1
    } else {
        valid_samples / NUM_GATES
    }
}

/// Per-gate storage for one run, sized from the scanned pulse count.
///
/// Magnitudes are stored pulse-major (a contiguous `NUM_GATES` row per
/// pulse) so the reducer can hand each parallel task its own row;
/// autocorrelation results are gate-major (a contiguous `pulse_count` lag
/// series per gate) for the same reason on the gate axis, and so the
/// encoder can stream gates in order. Disjoint-write parallelism falls out
/// of `chunks_mut` over these layouts instead of index arithmetic.
pub struct GateStore {
    pub(crate) pulse_count: usize,
    pub(crate) magnitude_v: Vec<f32>,
    pub(crate) magnitude_h: Vec<f32>,
    pub(crate) autocorr_v: Vec<f32>,
    pub(crate) autocorr_h: Vec<f32>,
}

impl GateStore {
    /// Allocates all four matrices up front. Out-of-memory is surfaced as
    /// `PipelineError::Allocation`; there is no partial-allocation recovery.
    pub fn allocate(pulse_count: usize) -> PipelineResult<Self> {
        let cells = pulse_count
            .checked_mul(NUM_GATES)
            .ok_or_else(|| PipelineError::Allocation("gate cell count overflow".into()))?;
        Ok(Self {
            pulse_count,
            magnitude_v: zeroed(cells)?,
            magnitude_h: zeroed(cells)?,
            autocorr_v: zeroed(cells)?,
            autocorr_h: zeroed(cells)?,
        })
    }

    pub fn pulse_count(&self) -> usize {
        self.pulse_count
    }

    /// Mutable pulse-major magnitude matrices for the reducer.
    pub(crate) fn magnitude_rows_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.magnitude_v, &mut self.magnitude_h)
    }

    /// Averaged magnitude stored at `(gate, pulse)` for each channel.
    pub fn magnitude_at(&self, gate: usize, pulse: usize) -> (f32, f32) {
        let cell = pulse * NUM_GATES + gate;
        (self.magnitude_v[cell], self.magnitude_h[cell])
    }

    /// One gate's autocorrelation series per channel, lag-indexed.
    pub fn autocorr_gate(&self, gate: usize) -> (&[f32], &[f32]) {
        let start = gate * self.pulse_count;
        let end = start + self.pulse_count;
        (&self.autocorr_v[start..end], &self.autocorr_h[start..end])
    }

    /// Releases the magnitude matrices once autocorrelation has consumed
    /// them; the autocorrelation matrices stay until encoding is done.
    pub fn release_magnitudes(&mut self) {
        self.magnitude_v = Vec::new();
        self.magnitude_h = Vec::new();
    }
}

fn zeroed(len: usize) -> PipelineResult<Vec<f32>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|err| PipelineError::Allocation(err.to_string()))?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_cover_every_sample_exactly_once() {
        for &n in &[0usize, 1, 4, 499, 500, 501, 999, 1000, 5900] {
            let total: usize = (0..NUM_GATES).map(|gate| bucket_size(n, gate)).sum();
            assert_eq!(total, n, "coverage broken for n={}", n);
        }
    }

    #[test]
    fn bucket_sizes_differ_by_at_most_one() {
        let n = 1234;
        let floor = n / NUM_GATES;
        let remainder = n % NUM_GATES;
        for gate in 0..NUM_GATES {
            let size = bucket_size(n, gate);
            if gate < remainder {
                assert_eq!(size, floor + 1);
            } else {
                assert_eq!(size, floor);
            }
        }
    }

    #[test]
    fn remainder_gates_are_the_lowest_indexed() {
        // 501 = 500 + 1: only gate 0 takes the extra sample.
        assert_eq!(bucket_size(501, 0), 2);
        assert_eq!(bucket_size(501, 1), 1);
        assert_eq!(bucket_size(501, 499), 1);
        // 499 leaves gate 499 empty.
        assert_eq!(bucket_size(499, 498), 1);
        assert_eq!(bucket_size(499, 499), 0);
    }

    #[test]
    fn store_is_sized_from_pulse_count() {
        let store = GateStore::allocate(3).unwrap();
        assert_eq!(store.pulse_count(), 3);
        assert_eq!(store.magnitude_v.len(), 3 * NUM_GATES);
        assert_eq!(store.autocorr_h.len(), 3 * NUM_GATES);
        let (v, h) = store.autocorr_gate(NUM_GATES - 1);
        assert_eq!(v.len(), 3);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn releasing_magnitudes_keeps_autocorrelation_storage() {
        let mut store = GateStore::allocate(2).unwrap();
        store.release_magnitudes();
        assert!(store.magnitude_v.is_empty());
        assert_eq!(store.autocorr_v.len(), 2 * NUM_GATES);
    }
}
