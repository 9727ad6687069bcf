pub mod dose;
pub mod enums;
pub mod prescription;

pub use dose::*;
pub use enums::*;
pub use prescription::*;
