// ============================================================================
// Archive Service - persists ranked search results to timestamped JSON files
// ============================================================================

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::error::ApiError;
use crate::models::{Post, SearchArchive};

pub struct ArchiveService {
    root: PathBuf,
}

impl ArchiveService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write the full ranked result set for `term` to a timestamped file and
    /// return its path.
    ///
    /// The filename has second granularity: two saves of the same term within
    /// the same second target the same file and the later write wins. Known
    /// limitation, accepted for this tool.
    pub fn save(&self, term: &str, posts: &[Post]) -> Result<PathBuf, ApiError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            ApiError::Storage(format!(
                "Failed to create archive directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let now = Utc::now();
        let filename = format!(
            "{}_{}.json",
            sanitize_term(term),
            now.format("%Y%m%d_%H%M%S")
        );
        let path = self.root.join(filename);

        let archive = SearchArchive {
            search_term: term.to_string(),
            search_timestamp: now,
            total_results: posts.len(),
            tweets: posts.to_vec(),
        };

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| ApiError::Storage(format!("Failed to serialize results: {}", e)))?;

        fs::write(&path, json)
            .map_err(|e| ApiError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;

        log::info!(
            "Saved {} results to {}",
            archive.total_results,
            path.display()
        );

        Ok(path)
    }
}

/// Filesystem-safe token for a search term: every non-alphanumeric character
/// becomes an underscore.
pub fn sanitize_term(term: &str) -> String {
    term.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, like_count: u32) -> Post {
        Post {
            id: id.to_string(),
            text: "a post".to_string(),
            author_username: "someone".to_string(),
            author_name: "Someone".to_string(),
            created_at: None,
            like_count,
            retweet_count: 1,
            reply_count: 2,
            quote_count: 3,
            url: Post::build_url(Some("someone"), id),
        }
    }

    #[test]
    fn sanitize_replaces_every_non_alphanumeric_character() {
        assert_eq!(sanitize_term("hello world!"), "hello_world_");
        assert_eq!(sanitize_term("rust"), "rust");
        assert_eq!(sanitize_term("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_term("#rust2024"), "_rust2024");
    }

    #[test]
    fn save_writes_envelope_with_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ArchiveService::new(dir.path());

        let path = archive.save("rust", &[post("1", 9), post("2", 5)]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["search_term"], "rust");
        assert_eq!(value["total_results"], 2);
        assert!(value["search_timestamp"].is_string());
        assert_eq!(value["tweets"][0]["id"], "1");
        assert_eq!(value["tweets"][0]["like_count"], 9);
        assert_eq!(value["tweets"][0]["author_username"], "someone");
        assert_eq!(value["tweets"][0]["url"], "https://twitter.com/someone/status/1");
        assert!(value["tweets"][0]["created_at"].is_null());
    }

    #[test]
    fn save_empty_results_still_writes_a_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ArchiveService::new(dir.path());

        let path = archive.save("zzzqqqunlikely", &[]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["total_results"], 0);
        assert_eq!(value["tweets"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn save_uses_sanitized_term_and_timestamp_in_filename() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ArchiveService::new(dir.path());

        let path = archive.save("hello world!", &[post("1", 1)]).unwrap();

        let filename = path.file_name().unwrap().to_str().unwrap();
        assert!(filename.starts_with("hello_world__"));
        assert!(filename.ends_with(".json"));
        // hello_world_ + _ + YYYYMMDD_HHMMSS + .json
        assert_eq!(filename.len(), "hello_world_".len() + 1 + 15 + 5);
    }

    #[test]
    fn save_creates_archive_directory_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("searches");
        let archive = ArchiveService::new(&nested);

        assert!(!nested.exists());
        archive.save("rust", &[post("1", 1)]).unwrap();
        assert!(nested.exists());
    }
}
