//! Domain models for the MedVice diagnosis system.

mod diagnosis;
mod saved;
mod symptom;

pub use diagnosis::*;
pub use saved::*;
pub use symptom::*;
