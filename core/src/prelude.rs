/// Common error type for every pipeline stage.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("seek failure at byte offset {0}")]
    Seek(u64),
    #[error("truncated record in pulse {pulse}: {needed} bytes expected, stream ended early")]
    TruncatedRecord { pulse: usize, needed: usize },
    #[error("allocation failure: {0}")]
    Allocation(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
