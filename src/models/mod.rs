pub mod analysis;
pub mod enums;
pub mod prescription;

pub use analysis::*;
pub use enums::*;
pub use prescription::*;
