pub mod autocorr;
pub mod gates;
pub mod reducer;

pub use autocorr::AutocorrEngine;
pub use gates::{bucket_size, GateStore, NUM_GATES};
pub use reducer::GateReducer;
