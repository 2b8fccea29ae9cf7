pub mod client;
pub mod dashboard;
pub mod meeting;
pub mod profile;
pub mod reminder;
