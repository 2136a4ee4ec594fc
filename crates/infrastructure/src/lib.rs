// Denda Admin - Infrastructure Layer
// Adaptadores concretos para los puertos del dominio
// Módulos:
// - persistence: repositorios PostgreSQL y en memoria
// - security: hash de contraseñas
// - health: comprobaciones de salud de componentes

pub mod health;
pub mod persistence;
pub mod security;

pub use persistence::*;
pub use security::*;
