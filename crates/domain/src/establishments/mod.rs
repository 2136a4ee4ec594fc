//! Establishments Bounded Context
//!
//! Maneja el ciclo de vida de establecimientos y sus puntos de contacto

pub mod aggregate;
pub mod contact_points;

pub use aggregate::*;
pub use contact_points::*;
