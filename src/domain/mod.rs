pub mod commit;
pub mod report;
pub mod request;
