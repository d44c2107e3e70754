//! Request handlers, one submodule per resource.
//!
//! Each submodule provides async handler functions (create, list, get_by_id,
//! update, delete and resource-specific operations) for a single resource.
//! Handlers delegate to the corresponding repository in `hiperflow_db` and
//! map errors via [`AppError`](crate::error::AppError).

pub mod ai;
pub mod auth;
pub mod automation;
pub mod company;
pub mod contact;
pub mod dashboard;
pub mod deal;
pub mod saleflow;
pub mod task;
