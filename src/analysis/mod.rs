//! Cross-record views over a batch of structured prescriptions.
//!
//! Every function here is a pure read-only fold over the slice it is given.

mod frequency;

pub mod aggregate;
pub mod visits;

pub use aggregate::{analyze_prescriptions, TOP_N};
pub use visits::{find_repeat_patients, find_same_day_visits};
