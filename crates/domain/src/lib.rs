// Denda Admin - Domain Layer
// Bounded Contexts:
// - shared_kernel: Tipos base, IDs y errores compartidos
// - values: Value objects autovalidados (nombres, emails, teléfonos, direcciones)
// - establishments: Establishment aggregate y puntos de contacto
// - employees: Employee aggregate y ciclo de vida laboral
// - iam: Cuentas de usuario, roles y tokens de acceso
// - audit: Registro de auditoría de operaciones administrativas
// - health: Contratos de health checking

#![allow(ambiguous_glob_reexports)]

pub mod audit;
pub mod employees;
pub mod establishments;
pub mod health;
pub mod iam;
pub mod request_context;
pub mod shared_kernel;
pub mod values;

pub use audit::*;
pub use employees::*;
pub use establishments::*;
pub use health::*;
pub use iam::*;
pub use request_context::*;
pub use shared_kernel::*;
pub use values::*;
