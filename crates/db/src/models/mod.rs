//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod automation;
pub mod company;
pub mod contact;
pub mod dashboard;
pub mod deal;
pub mod outbox;
pub mod role;
pub mod session;
pub mod task;
pub mod team;
pub mod user;
