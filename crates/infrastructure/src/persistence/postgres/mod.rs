pub mod audit_repository;
pub mod establishment_repository;
pub mod employee_repository;
pub mod migrations;
pub mod pool;
pub mod user_repository;

pub use audit_repository::*;
pub use establishment_repository::*;
pub use employee_repository::*;
pub use migrations::*;
pub use pool::*;
pub use user_repository::*;
