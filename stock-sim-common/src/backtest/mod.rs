pub mod metrics;
pub mod simulator;
pub mod types;

pub use simulator::simulate;
pub use types::*;
