pub mod log;
pub mod timing;

pub use log::LogManager;
