//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Tenant-owned tables are
//! always filtered by `team_id`; a row from another team behaves exactly
//! like a row that does not exist.

pub mod automation_repo;
pub mod company_repo;
pub mod contact_repo;
pub mod dashboard_repo;
pub mod deal_repo;
pub mod outbox_repo;
pub mod role_repo;
pub mod session_repo;
pub mod task_repo;
pub mod team_repo;
pub mod user_repo;

pub use automation_repo::AutomationRepo;
pub use company_repo::CompanyRepo;
pub use contact_repo::ContactRepo;
pub use dashboard_repo::DashboardRepo;
pub use deal_repo::DealRepo;
pub use outbox_repo::OutboxRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use team_repo::TeamRepo;
pub use user_repo::UserRepo;
