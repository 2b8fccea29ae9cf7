//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a `&mut PgConnection` inside a transaction) as the
//! first argument and the owning `user_id` as the second.

pub mod client_repo;
pub mod dashboard_repo;
pub mod meeting_repo;
pub mod profile_repo;
pub mod reminder_repo;

pub use client_repo::ClientRepo;
pub use dashboard_repo::DashboardRepo;
pub use meeting_repo::MeetingRepo;
pub use profile_repo::ProfileRepo;
pub use reminder_repo::ReminderRepo;
