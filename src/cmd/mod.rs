pub mod commits;
pub mod config;
pub mod report;
