//! Core types: sector identity, the label universe, and error types.

mod error;
mod sector;

pub use error::{DataIntegrityError, SingularSystemError};
pub use sector::{LabelUniverse, SectorKey};
