use serde::{Serialize, Serializer};

/// Upper bound on the number of diff lines kept per file.
pub const MAX_EXCERPT_LINES: usize = 10;

/// One commit as extracted from the repository history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    #[serde(rename = "hash")]
    pub id: String,
    pub author: String,
    /// Date string as printed by git, never reparsed.
    #[serde(rename = "date")]
    pub raw_timestamp: String,
    #[serde(rename = "message")]
    pub subject: String,
    #[serde(rename = "files")]
    pub changed_files: Vec<String>,
    #[serde(rename = "diffStat")]
    pub diff_stat_text: String,
    #[serde(rename = "fileChanges")]
    pub file_changes: Vec<FileChange>,
}

impl CommitRecord {
    pub fn new(id: String, author: String, raw_timestamp: String, subject: String) -> Self {
        Self {
            id,
            author,
            raw_timestamp,
            subject,
            changed_files: Vec::new(),
            diff_stat_text: String::new(),
            file_changes: Vec::new(),
        }
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(7) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }
}

/// Bounded excerpt of the added and removed lines of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    #[serde(rename = "file")]
    pub path: String,
    #[serde(rename = "changes", serialize_with = "join_lines")]
    pub excerpt_lines: Vec<String>,
}

fn join_lines<S: Serializer>(lines: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CommitRecord {
        let mut record = CommitRecord::new(
            "1945ab9c752534e733c38ba0109dc3b741f0a6eb".to_string(),
            "Alice".to_string(),
            "Wed May 1 10:00:00 2024 +0200".to_string(),
            "Fix bug".to_string(),
        );
        record.changed_files = vec!["a.js".to_string(), "b.js".to_string()];
        record.diff_stat_text = " a.js | 2 +-\n".to_string();
        record.file_changes = vec![FileChange {
            path: "a.js".to_string(),
            excerpt_lines: vec!["+x".to_string(), "-y".to_string()],
        }];
        record
    }

    #[test]
    fn serializes_with_external_field_names() {
        let value = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(value["hash"], "1945ab9c752534e733c38ba0109dc3b741f0a6eb");
        assert_eq!(value["author"], "Alice");
        assert_eq!(value["date"], "Wed May 1 10:00:00 2024 +0200");
        assert_eq!(value["message"], "Fix bug");
        assert_eq!(value["files"], serde_json::json!(["a.js", "b.js"]));
        assert_eq!(value["diffStat"], " a.js | 2 +-\n");
        assert_eq!(
            value["fileChanges"],
            serde_json::json!([{ "file": "a.js", "changes": "+x\n-y" }])
        );
    }

    #[test]
    fn short_id_handles_short_hashes() {
        let mut record = sample();
        assert_eq!(record.short_id(), "1945ab9");
        record.id = "abc".to_string();
        assert_eq!(record.short_id(), "abc");
        record.id = "é".repeat(10);
        assert_eq!(record.short_id(), "é".repeat(7));
    }
}
