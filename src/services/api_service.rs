// ============================================================================
// API Client - bearer-token X client (API v2)
// ============================================================================
// Alternate backing client for deployments holding an official API bearer
// token. Speaks the v2 recent-search endpoint; there is no interactive login
// and no persisted session state, the token itself is the session.
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::Post;
use crate::services::platform_trait::{PostSource, CANDIDATE_POOL};
use crate::services::ranking::rank_top;

const API_BASE: &str = "https://api.twitter.com";

pub struct ApiClient {
    client: Client,
    bearer_token: String,
}

impl ApiClient {
    pub fn new(bearer_token: String) -> Self {
        let client = Client::builder()
            .user_agent("x-top-posts/0.1.0")
            .timeout(std::time::Duration::from_secs(45))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            bearer_token,
        }
    }

    async fn search_recent(&self, term: &str) -> Result<Vec<Post>, ApiError> {
        let url = format!("{}/2/tweets/search/recent", API_BASE);
        let max_results = CANDIDATE_POOL.to_string();

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", term),
                ("max_results", max_results.as_str()),
                ("tweet.fields", "created_at,public_metrics"),
                ("expansions", "author_id"),
                ("user.fields", "name,username"),
            ])
            .send()
            .await
            .map_err(|e| ApiError::UpstreamQuery(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamAuth(format!(
                "Bearer token rejected: {}. Response: {}",
                status, body
            )));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::UpstreamQuery(
                "Rate limited by the search API".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamQuery(format!(
                "Search failed: {}. Response: {}",
                status, body
            )));
        }

        let payload: RecentSearchResponse = response.json().await.map_err(|e| {
            ApiError::UpstreamQuery(format!("Failed to decode search response: {}", e))
        })?;

        Ok(convert_response(payload))
    }
}

#[async_trait]
impl PostSource for ApiClient {
    fn label(&self) -> &'static str {
        "bearer-token"
    }

    async fn search_top(&self, term: &str, limit: usize) -> Result<Vec<Post>, ApiError> {
        let candidates = self.search_recent(term).await?;
        log::info!("Fetched {} candidates for '{}'", candidates.len(), term);
        Ok(rank_top(candidates, limit))
    }
}

fn convert_response(payload: RecentSearchResponse) -> Vec<Post> {
    let authors: HashMap<String, ApiUser> = payload
        .includes
        .map(|includes| {
            includes
                .users
                .into_iter()
                .map(|user| (user.id.clone(), user))
                .collect()
        })
        .unwrap_or_default();

    payload
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|tweet| convert_tweet(tweet, &authors))
        .collect()
}

fn convert_tweet(tweet: ApiTweet, authors: &HashMap<String, ApiUser>) -> Post {
    let author = tweet
        .author_id
        .as_deref()
        .and_then(|id| authors.get(id));

    let handle = author
        .map(|user| user.username.as_str())
        .filter(|value| !value.is_empty());

    let url = Post::build_url(handle, &tweet.id);
    let author_username = handle.unwrap_or("unknown").to_string();
    let author_name = author
        .map(|user| user.name.as_str())
        .filter(|value| !value.is_empty())
        .unwrap_or("Unknown")
        .to_string();

    let created_at = tweet
        .created_at
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let metrics = tweet.public_metrics.unwrap_or_default();

    Post {
        id: tweet.id,
        text: tweet.text,
        author_username,
        author_name,
        created_at,
        like_count: metrics.like_count,
        retweet_count: metrics.retweet_count,
        reply_count: metrics.reply_count,
        quote_count: metrics.quote_count,
        url,
    }
}

#[derive(Debug, Deserialize)]
struct RecentSearchResponse {
    #[serde(default)]
    data: Option<Vec<ApiTweet>>,
    #[serde(default)]
    includes: Option<Includes>,
}

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: String,
    text: String,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    like_count: u32,
    #[serde(default)]
    retweet_count: u32,
    #[serde(default)]
    reply_count: u32,
    #[serde(default)]
    quote_count: u32,
}

#[derive(Debug, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    username: String,
}
