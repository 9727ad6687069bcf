pub mod dose_log;
pub mod prescription;

pub use dose_log::*;
pub use prescription::*;
