pub mod decoder;
pub mod encoder;
pub mod pulse;

pub use decoder::PulseDecoder;
pub use encoder::ResultEncoder;
pub use pulse::{CaptureIndex, IqSample, Pulse};
