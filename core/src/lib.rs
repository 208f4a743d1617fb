//! Core pipeline for dual-polarization radar pulse captures.
//!
//! The modules follow the capture's processing order: a two-pass binary
//! decode, reduction of each pulse's samples into 500 range gates, a
//! per-gate autocorrelation pass, and a compact binary encode of the
//! per-gate results.

pub mod capture;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{PipelineError, PipelineResult};
