//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Serialize` projections for API output where the row holds secrets
//! - A create DTO for inserts

pub mod company;
pub mod login_log;
pub mod orchestration;
pub mod report;
pub mod role;
pub mod user;
