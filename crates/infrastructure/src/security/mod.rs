// Security - Adaptadores de seguridad

pub mod password;

pub use password::*;
