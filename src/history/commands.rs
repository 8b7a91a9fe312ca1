//! Argument vectors for every git query the pipeline issues.
//!
//! Arguments go straight to the process without a shell, so no value is quoted.
//! Every query turns off `core.quotePath`, so non-ASCII paths come back verbatim
//! and can be handed to a later pathspec unchanged.

use chrono::NaiveDate;

/// `%H|%an|%ad|%s`: the subject comes last because it may contain `|`.
pub const METADATA_FORMAT: &str = "%H|%an|%ad|%s";

fn git(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut argv = vec!["-c".to_string(), "core.quotePath=false".to_string()];
    argv.extend(args);
    argv
}

pub fn day_log(date: NaiveDate) -> Vec<String> {
    let day = date.format("%Y-%m-%d");
    git([
        "log".to_string(),
        format!("--after={day} 00:00:00"),
        format!("--before={day} 23:59:59"),
        "--pretty=format:%H".to_string(),
    ])
}

pub fn recent_log(days: u32) -> Vec<String> {
    git([
        "log".to_string(),
        format!("--since={days} days ago"),
        format!("--pretty=format:{METADATA_FORMAT}"),
        "--name-only".to_string(),
    ])
}

pub fn commit_metadata(id: &str) -> Vec<String> {
    git([
        "show".to_string(),
        "--no-patch".to_string(),
        format!("--pretty=format:{METADATA_FORMAT}"),
        id.to_string(),
    ])
}

pub fn changed_files(id: &str) -> Vec<String> {
    git([
        "show".to_string(),
        "--pretty=".to_string(),
        "--name-only".to_string(),
        id.to_string(),
    ])
}

pub fn diff_stat(id: &str) -> Vec<String> {
    git([
        "show".to_string(),
        "--stat".to_string(),
        "--format=".to_string(),
        id.to_string(),
    ])
}

pub fn file_diff(id: &str, path: &str) -> Vec<String> {
    git([
        "show".to_string(),
        "--pretty=format:".to_string(),
        "--unified=1".to_string(),
        id.to_string(),
        "--".to_string(),
        path.to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_log_covers_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            day_log(date),
            vec![
                "-c",
                "core.quotePath=false",
                "log",
                "--after=2024-05-01 00:00:00",
                "--before=2024-05-01 23:59:59",
                "--pretty=format:%H",
            ]
        );
    }

    #[test]
    fn recent_log_lists_names() {
        assert_eq!(
            recent_log(7),
            vec![
                "-c",
                "core.quotePath=false",
                "log",
                "--since=7 days ago",
                "--pretty=format:%H|%an|%ad|%s",
                "--name-only",
            ]
        );
    }

    #[test]
    fn file_diff_separates_path() {
        assert_eq!(
            file_diff("abc", "-weird name.rs"),
            vec![
                "-c",
                "core.quotePath=false",
                "show",
                "--pretty=format:",
                "--unified=1",
                "abc",
                "--",
                "-weird name.rs",
            ]
        );
    }
}
