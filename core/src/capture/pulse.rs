use crate::prelude::{PipelineError, PipelineResult};
use num_complex::Complex32;
use serde::{Deserialize, Serialize};

/// One in-phase/quadrature measurement.
pub type IqSample = Complex32;

/// One transmit/receive cycle's capture: the same number of I/Q samples
/// for the vertical and horizontal polarization channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pulse {
    pub vertical: Vec<IqSample>,
    pub horizontal: Vec<IqSample>,
}

impl Pulse {
    /// The reducer walks both channels with one cursor, so the channel
    /// lengths must agree.
    pub fn new(vertical: Vec<IqSample>, horizontal: Vec<IqSample>) -> PipelineResult<Self> {
        if vertical.len() != horizontal.len() {
            return Err(PipelineError::InvalidInput(format!(
                "channel length mismatch: vertical {}, horizontal {}",
                vertical.len(),
                horizontal.len()
            )));
        }
        Ok(Self {
            vertical,
            horizontal,
        })
    }

    /// Number of samples per channel; varies from record to record.
    pub fn valid_samples(&self) -> usize {
        self.vertical.len()
    }
}

/// Metadata discovered by the decoder's first pass over a capture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CaptureIndex {
    pub pulse_count: usize,
    pub end_offset: u64,
}
