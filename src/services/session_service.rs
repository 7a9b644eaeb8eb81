// ============================================================================
// Session Client - cookie-session X client
// ============================================================================
// Logs in once with account credentials, persists the resulting session
// state to disk and reuses it across restarts. The in-memory session is
// initialized at most once per process; concurrent first callers all wait on
// the same login attempt.
// ============================================================================

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::Post;
use crate::services::platform_trait::{PostSource, CANDIDATE_POOL};
use crate::services::ranking::rank_top;

const API_BASE: &str = "https://api.twitter.com";

pub struct SessionClient {
    client: Client,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    session_file: PathBuf,
    session: OnceCell<SessionState>,
}

/// Authenticated session cookies, persisted as JSON for reuse by future
/// process instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub auth_token: String,
    pub csrf_token: String,
}

impl SessionClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .user_agent("x-top-posts/0.1.0")
            .timeout(std::time::Duration::from_secs(45))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            username: config.username.clone(),
            email: config.email.clone(),
            password: config.password.clone(),
            session_file: config.session_file.clone(),
            session: OnceCell::new(),
        }
    }

    /// Get the authenticated session, initializing it at most once per
    /// process. If initialization fails nothing is cached and the next
    /// request attempts it again.
    async fn session(&self) -> Result<&SessionState, ApiError> {
        self.session
            .get_or_try_init(|| self.establish_session())
            .await
    }

    async fn establish_session(&self) -> Result<SessionState, ApiError> {
        if self.session_file.exists() {
            log::info!(
                "Loading persisted session from {}",
                self.session_file.display()
            );

            let raw = std::fs::read_to_string(&self.session_file).map_err(|e| {
                ApiError::UpstreamAuth(format!(
                    "Failed to read persisted session {}: {}",
                    self.session_file.display(),
                    e
                ))
            })?;

            let state: SessionState = serde_json::from_str(&raw).map_err(|e| {
                ApiError::UpstreamAuth(format!(
                    "Persisted session {} is not valid: {}",
                    self.session_file.display(),
                    e
                ))
            })?;

            return Ok(state);
        }

        let (username, email, password) = match (&self.username, &self.email, &self.password) {
            (Some(username), Some(email), Some(password)) => (username, email, password),
            _ => {
                return Err(ApiError::Configuration(
                    "Twitter credentials not set. Please set TWITTER_USERNAME, \
                     TWITTER_EMAIL, and TWITTER_PASSWORD environment variables."
                        .to_string(),
                ))
            }
        };

        let state = self.login(username, email, password).await?;
        self.persist_session(&state);

        Ok(state)
    }

    async fn login(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionState, ApiError> {
        log::info!("No persisted session found, logging in as {}", username);

        let url = format!("{}/1.1/onboarding/login.json", API_BASE);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| {
                ApiError::UpstreamAuth(format!("Failed to contact login endpoint: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamAuth(format!(
                "Login failed: {}. Response: {}",
                status, body
            )));
        }

        let login: LoginResponse = response.json().await.map_err(|e| {
            ApiError::UpstreamAuth(format!("Failed to decode login response: {}", e))
        })?;

        Ok(SessionState {
            auth_token: login.auth_token,
            csrf_token: login.csrf_token,
        })
    }

    // The session itself stays valid if the write fails, so this only warns.
    fn persist_session(&self, state: &SessionState) {
        match serde_json::to_string_pretty(state) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.session_file, json) {
                    log::warn!(
                        "Failed to persist session to {}: {}",
                        self.session_file.display(),
                        e
                    );
                } else {
                    log::info!("Session persisted to {}", self.session_file.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize session state: {}", e),
        }
    }

    async fn search_recent(&self, term: &str) -> Result<Vec<Post>, ApiError> {
        let session = self.session().await?;

        let url = format!("{}/1.1/search/tweets.json", API_BASE);
        let count = CANDIDATE_POOL.to_string();

        let response = self
            .client
            .get(&url)
            .header(
                "Cookie",
                format!(
                    "auth_token={}; ct0={}",
                    session.auth_token, session.csrf_token
                ),
            )
            .header("x-csrf-token", &session.csrf_token)
            .query(&[
                ("q", term),
                ("result_type", "popular"),
                ("count", count.as_str()),
                ("tweet_mode", "extended"),
            ])
            .send()
            .await
            .map_err(|e| ApiError::UpstreamQuery(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamAuth(format!(
                "Session rejected: {}. Response: {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamQuery(format!(
                "Search failed: {}. Response: {}",
                status, body
            )));
        }

        let payload: V1SearchResponse = response.json().await.map_err(|e| {
            ApiError::UpstreamQuery(format!("Failed to decode search response: {}", e))
        })?;

        Ok(payload.statuses.into_iter().map(convert_status).collect())
    }
}

#[async_trait]
impl PostSource for SessionClient {
    fn label(&self) -> &'static str {
        "cookie-session"
    }

    async fn search_top(&self, term: &str, limit: usize) -> Result<Vec<Post>, ApiError> {
        let candidates = self.search_recent(term).await?;
        log::info!("Fetched {} candidates for '{}'", candidates.len(), term);
        Ok(rank_top(candidates, limit))
    }
}

fn convert_status(status: V1Status) -> Post {
    let handle = status
        .user
        .as_ref()
        .and_then(|user| user.screen_name.as_deref())
        .filter(|value| !value.is_empty());

    let url = Post::build_url(handle, &status.id_str);
    let author_username = handle.unwrap_or("unknown").to_string();
    let author_name = status
        .user
        .as_ref()
        .and_then(|user| user.name.as_deref())
        .filter(|value| !value.is_empty())
        .unwrap_or("Unknown")
        .to_string();
    let created_at = status.created_at.as_deref().and_then(parse_v1_timestamp);

    Post {
        id: status.id_str,
        text: status.full_text.or(status.text).unwrap_or_default(),
        author_username,
        author_name,
        created_at,
        like_count: status.favorite_count.unwrap_or(0),
        retweet_count: status.retweet_count.unwrap_or(0),
        reply_count: status.reply_count.unwrap_or(0),
        quote_count: status.quote_count.unwrap_or(0),
        url,
    }
}

/// v1.1 timestamps look like "Wed Oct 10 20:19:24 +0000 2018".
fn parse_v1_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, "%a %b %d %H:%M:%S %z %Y")
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth_token: String,
    #[serde(rename = "ct0")]
    csrf_token: String,
}

#[derive(Debug, Deserialize)]
struct V1SearchResponse {
    #[serde(default)]
    statuses: Vec<V1Status>,
}

#[derive(Debug, Deserialize)]
struct V1Status {
    id_str: String,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    favorite_count: Option<u32>,
    #[serde(default)]
    retweet_count: Option<u32>,
    #[serde(default)]
    reply_count: Option<u32>,
    #[serde(default)]
    quote_count: Option<u32>,
    #[serde(default)]
    user: Option<V1User>,
}

#[derive(Debug, Deserialize)]
struct V1User {
    #[serde(default)]
    screen_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}
