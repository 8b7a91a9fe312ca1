use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::commit::CommitRecord;

/// Everything the language model needs to draft one daily report.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub date: NaiveDate,
    pub repo_path: PathBuf,
    pub note: Option<String>,
    pub commits: Vec<CommitRecord>,
}

impl ReportRequest {
    /// Plain-text rendering of the commits, fed to the model as evidence.
    pub fn render_commits(&self) -> String {
        let mut out = String::new();
        for (index, commit) in self.commits.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} {} ({}, {})",
                index + 1,
                commit.short_id(),
                commit.subject,
                commit.author,
                commit.raw_timestamp
            );
            if !commit.changed_files.is_empty() {
                let _ = writeln!(out, "   Files: {}", commit.changed_files.join(", "));
            }
            let stat = commit.diff_stat_text.trim();
            if !stat.is_empty() {
                for line in stat.lines() {
                    let _ = writeln!(out, "   {}", line.trim());
                }
            }
            for change in &commit.file_changes {
                let _ = writeln!(out, "   Changes in {}:", change.path);
                for line in &change.excerpt_lines {
                    let _ = writeln!(out, "     {line}");
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commit::FileChange;

    #[test]
    fn renders_commits_in_order() {
        let mut first = CommitRecord::new(
            "aaaaaaaaaa".to_string(),
            "Alice".to_string(),
            "Wed May 1".to_string(),
            "Fix bug".to_string(),
        );
        first.changed_files = vec!["a.js".to_string()];
        first.file_changes = vec![FileChange {
            path: "a.js".to_string(),
            excerpt_lines: vec!["+x".to_string()],
        }];
        let second = CommitRecord::new(
            "bbbbbbbbbb".to_string(),
            "Bob".to_string(),
            "Wed May 1".to_string(),
            "Add docs".to_string(),
        );
        let request = ReportRequest {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            repo_path: PathBuf::from("/tmp/repo"),
            note: None,
            commits: vec![first, second],
        };

        let text = request.render_commits();
        let fix = text.find("aaaaaaa Fix bug").expect("first commit");
        let docs = text.find("bbbbbbb Add docs").expect("second commit");
        assert!(fix < docs);
        assert!(text.contains("Files: a.js"));
        assert!(text.contains("     +x"));
    }
}
