use thiserror::Error;

/// Error taxonomy for the search pipeline.
///
/// Downstream services return these unmodified; only the `api` module
/// translates them into HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request input. Rejected before any downstream component runs.
    #[error("{0}")]
    Validation(String),

    /// Required credentials missing from the environment.
    #[error("{0}")]
    Configuration(String),

    /// Login or session failure against the platform.
    #[error("{0}")]
    UpstreamAuth(String),

    /// Query rejected, rate limited, or transport failure.
    #[error("{0}")]
    UpstreamQuery(String),

    /// Result persistence failure.
    #[error("{0}")]
    Storage(String),

    /// Zero matching posts. A valid empty outcome, not a failure.
    #[error("{0}")]
    NotFound(String),
}
