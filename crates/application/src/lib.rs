// Denda Admin - Application Layer
// Use Cases y Servicios de Aplicación

#![allow(ambiguous_glob_reexports)]

pub mod audit;
pub mod employees;
pub mod establishments;
pub mod iam;
pub mod testing;

pub use audit::*;
pub use employees::*;
pub use establishments::*;
pub use iam::*;
