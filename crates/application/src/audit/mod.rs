//! Audit Use Cases
//!
//! Registro, consulta y retención del rastro de auditoría

pub mod cleanup;
pub mod queries;
pub mod recorder;

pub use cleanup::*;
pub use queries::*;
pub use recorder::*;
