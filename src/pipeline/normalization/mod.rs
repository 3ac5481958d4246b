//! Clinical shorthand normalization.
//!
//! Static abbreviation tables (medicine, frequency, diagnosis, route, clinical
//! shorthand) and the lookups that map a token onto its canonical term.

pub mod dictionaries;
pub mod normalizer;

pub use dictionaries::TermCategory;
pub use normalizer::*;
