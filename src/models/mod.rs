use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized X post with engagement metrics and a canonical URL.
///
/// Field names match the persisted archive format, so this struct serializes
/// straight into the saved JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_username: String,
    pub author_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub like_count: u32,
    pub retweet_count: u32,
    pub reply_count: u32,
    pub quote_count: u32,
    pub url: String,
}

impl Post {
    /// Canonical post URL, falling back to the identifier-only form when the
    /// author handle is unknown.
    pub fn build_url(username: Option<&str>, id: &str) -> String {
        match username {
            Some(name) if !name.is_empty() => {
                format!("https://twitter.com/{}/status/{}", name, id)
            }
            _ => format!("https://twitter.com/i/status/{}", id),
        }
    }
}

/// Envelope written to disk for every archived search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArchive {
    pub search_term: String,
    pub search_timestamp: DateTime<Utc>,
    pub total_results: usize,
    pub tweets: Vec<Post>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_uses_author_handle() {
        assert_eq!(
            Post::build_url(Some("rustlang"), "123"),
            "https://twitter.com/rustlang/status/123"
        );
    }

    #[test]
    fn build_url_falls_back_without_handle() {
        assert_eq!(
            Post::build_url(None, "123"),
            "https://twitter.com/i/status/123"
        );
        assert_eq!(
            Post::build_url(Some(""), "123"),
            "https://twitter.com/i/status/123"
        );
    }
}
