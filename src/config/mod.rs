use std::env;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_SESSION_FILE: &str = "cookies.json";
const DEFAULT_ARCHIVE_DIR: &str = "searches";

/// Runtime configuration, read once at startup from the environment.
///
/// A bearer token selects the API client; otherwise the cookie-session
/// client is used. Missing session credentials are not a startup error,
/// they surface per request when a login is actually needed.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bearer_token: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub session_file: PathBuf,
    pub archive_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            bearer_token: non_empty(env::var("TWITTER_BEARER_TOKEN").ok()),
            username: non_empty(env::var("TWITTER_USERNAME").ok()),
            email: non_empty(env::var("TWITTER_EMAIL").ok()),
            password: non_empty(env::var("TWITTER_PASSWORD").ok()),
            session_file: PathBuf::from(env_or("SESSION_FILE", DEFAULT_SESSION_FILE)),
            archive_dir: PathBuf::from(env_or("ARCHIVE_DIR", DEFAULT_ARCHIVE_DIR)),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    non_empty(env::var(key).ok()).unwrap_or_else(|| default.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_filters_blank_values() {
        assert_eq!(non_empty(Some("token".to_string())), Some("token".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn env_or_returns_default_for_unset_key() {
        assert_eq!(env_or("X_TOP_POSTS_TEST_UNSET_KEY", "fallback"), "fallback");
    }
}
