use crate::prelude::{PipelineError, PipelineResult};
use crate::processing::gates::{GateStore, NUM_GATES};
use crate::telemetry::log::LogManager;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializes the per-gate autocorrelation results.
///
/// Layout: `u16` pulse count, then for each gate in order a `u16` gate
/// index followed by the vertical and then horizontal autocorrelation
/// series, all little-endian f32. The first write failure aborts the rest;
/// a partial file may be left behind.
pub struct ResultEncoder {
    logger: LogManager,
}

impl ResultEncoder {
    pub fn new() -> Self {
        Self {
            logger: LogManager::for_stage("result-encoder"),
        }
    }

    pub fn encode<W: Write>(&self, writer: &mut W, store: &GateStore) -> PipelineResult<()> {
        let pulse_count = u16::try_from(store.pulse_count()).map_err(|_| {
            PipelineError::InvalidInput(format!(
                "pulse count {} exceeds the u16 output header",
                store.pulse_count()
            ))
        })?;

        writer.write_all(&pulse_count.to_le_bytes())?;
        for gate in 0..NUM_GATES {
            writer.write_all(&(gate as u16).to_le_bytes())?;
            let (autocorr_v, autocorr_h) = store.autocorr_gate(gate);
            for &value in autocorr_v.iter().chain(autocorr_h.iter()) {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        Ok(())
    }

    pub fn encode_file<P: AsRef<Path>>(&self, path: P, store: &GateStore) -> PipelineResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.encode(&mut writer, store)?;
        writer.flush()?;
        self.logger.record(&format!(
            "wrote {} gate series to '{}'",
            NUM_GATES,
            path.display()
        ));
        Ok(())
    }
}

impl Default for ResultEncoder {
    fn default() -> Self {
        Self::new()
    }
}
