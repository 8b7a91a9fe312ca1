//! Reading commit history out of git, one subprocess per query.

pub mod commands;
pub mod details;
pub mod excerpt;
pub mod resolver;

pub use details::CommitDetailFetcher;
pub use excerpt::DiffSummarizer;
pub use resolver::CommitListResolver;
