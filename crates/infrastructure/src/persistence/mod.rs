// Persistence Layer - Implementaciones de repositorios por tecnología

pub mod in_memory;
pub mod postgres;

pub use in_memory::*;
pub use postgres::*;
