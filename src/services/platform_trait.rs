// ============================================================================
// Post Source Trait - Unified interface over the backing X clients
// ============================================================================
// The service ships two mutually exclusive client implementations: a
// cookie-session client that logs in with account credentials, and a
// bearer-token client that speaks the official v2 API. Configuration picks
// one at startup; the HTTP layer only ever sees this trait.
// ============================================================================

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::Post;

/// Fixed candidate pool requested upstream. Larger than the served limit so
/// ranking has a meaningful sample to pick from.
pub const CANDIDATE_POOL: u32 = 20;

/// Common interface for the backing X clients.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Short client name for startup logging.
    fn label(&self) -> &'static str;

    /// Search recent posts matching `term` and return the top `limit`
    /// entries ranked by like count. An empty Vec means zero matches, not a
    /// failure.
    async fn search_top(&self, term: &str, limit: usize) -> Result<Vec<Post>, ApiError>;
}
