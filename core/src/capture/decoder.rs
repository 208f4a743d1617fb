use crate::capture::pulse::{CaptureIndex, IqSample, Pulse};
use crate::prelude::{PipelineError, PipelineResult};
use crate::telemetry::log::LogManager;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes occupied by one sample on the wire: two f32 components per channel,
/// two channels.
const BYTES_PER_SAMPLE: usize = 16;

/// Two-pass decoder for the `pulses.iq` capture format.
///
/// Each record is a little-endian `u16` sample count `n` followed by `n`
/// interleaved (I,Q) f32 pairs for the vertical channel and `n` pairs for
/// the horizontal channel. The first pass (`scan`) only reads the counts
/// and skips the payloads, so the pulse total is known before any per-gate
/// storage is sized; the second pass (`decode`) materializes the pulses.
pub struct PulseDecoder {
    logger: LogManager,
}

impl PulseDecoder {
    pub fn new() -> Self {
        Self {
            logger: LogManager::for_stage("pulse-decoder"),
        }
    }

    /// First pass: counts records and finds the capture's end offset
    /// without materializing any sample data.
    pub fn scan<R: Read + Seek>(&self, reader: &mut R) -> PipelineResult<CaptureIndex> {
        let end_offset = reader
            .seek(SeekFrom::End(0))
            .map_err(|_| PipelineError::Seek(0))?;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|_| PipelineError::Seek(0))?;

        let mut pulse_count = 0usize;
        let mut position = 0u64;
        while position < end_offset {
            let valid_samples = read_sample_count(reader, pulse_count)?;
            let payload_len = valid_samples as u64 * BYTES_PER_SAMPLE as u64;
            position = reader
                .seek(SeekFrom::Current(payload_len as i64))
                .map_err(|_| PipelineError::Seek(position))?;
            if position > end_offset {
                return Err(PipelineError::TruncatedRecord {
                    pulse: pulse_count,
                    needed: payload_len as usize,
                });
            }
            pulse_count += 1;
        }

        self.logger.record(&format!(
            "capture scan found {} pulses in {} bytes",
            pulse_count, end_offset
        ));
        Ok(CaptureIndex {
            pulse_count,
            end_offset,
        })
    }

    /// Second pass: re-reads the capture from the start, materializing one
    /// pulse per record until the scanned count is reached.
    pub fn decode<R: Read + Seek>(
        &self,
        reader: &mut R,
        index: &CaptureIndex,
    ) -> PipelineResult<Vec<Pulse>> {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|_| PipelineError::Seek(0))?;

        let mut pulses = Vec::new();
        pulses
            .try_reserve_exact(index.pulse_count)
            .map_err(|err| PipelineError::Allocation(err.to_string()))?;

        let mut payload = Vec::new();
        for pulse_index in 0..index.pulse_count {
            let valid_samples = read_sample_count(reader, pulse_index)? as usize;
            let payload_len = valid_samples * BYTES_PER_SAMPLE;

            payload.resize(payload_len, 0);
            reader.read_exact(&mut payload).map_err(|err| {
                map_short_read(err, pulse_index, payload_len)
            })?;

            // Vertical pairs occupy the first half of the record payload,
            // horizontal pairs the second half.
            let half = payload_len / 2;
            let vertical = decode_iq_pairs(&payload[..half]);
            let horizontal = decode_iq_pairs(&payload[half..]);
            pulses.push(Pulse::new(vertical, horizontal)?);
        }

        self.logger
            .record(&format!("decoded {} pulses", pulses.len()));
        Ok(pulses)
    }

    /// Scans and decodes a capture file in the two mandated passes.
    pub fn decode_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> PipelineResult<(Vec<Pulse>, CaptureIndex)> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let index = self.scan(&mut reader)?;
        let pulses = self.decode(&mut reader, &index)?;
        self.logger.record(&format!(
            "capture '{}': {} pulses, {} bytes",
            path.display(),
            index.pulse_count,
            index.end_offset
        ));
        Ok((pulses, index))
    }
}

impl Default for PulseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn read_sample_count<R: Read>(reader: &mut R, pulse: usize) -> PipelineResult<u16> {
    let mut count_bytes = [0u8; 2];
    reader
        .read_exact(&mut count_bytes)
        .map_err(|err| map_short_read(err, pulse, count_bytes.len()))?;
    Ok(u16::from_le_bytes(count_bytes))
}

fn map_short_read(err: std::io::Error, pulse: usize, needed: usize) -> PipelineError {
    if err.kind() == ErrorKind::UnexpectedEof {
        PipelineError::TruncatedRecord { pulse, needed }
    } else {
        PipelineError::Io(err)
    }
}

fn decode_iq_pairs(bytes: &[u8]) -> Vec<IqSample> {
    bytes
        .chunks_exact(8)
        .map(|pair| {
            let i = f32::from_le_bytes([pair[0], pair[1], pair[2], pair[3]]);
            let q = f32::from_le_bytes([pair[4], pair[5], pair[6], pair[7]]);
            IqSample::new(i, q)
        })
        .collect()
}
