//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod company_repo;
pub mod login_log_repo;
pub mod orchestration_repo;
pub mod report_repo;
pub mod role_repo;
pub mod user_repo;

pub use company_repo::CompanyRepo;
pub use login_log_repo::LoginLogRepo;
pub use orchestration_repo::OrchestrationRepo;
pub use report_repo::ReportRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
