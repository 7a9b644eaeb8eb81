pub mod api_service;
pub mod archive_service;
pub mod platform_trait;
pub mod ranking;
pub mod session_service;

pub use api_service::ApiClient;
pub use archive_service::ArchiveService;
pub use platform_trait::PostSource;
pub use session_service::SessionClient;
