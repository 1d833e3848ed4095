//! Access-token acquisition for internal-app robots.
//!
//! [`app_credentials::AppCredentials`] performs the actual exchange against
//! the DingTalk authorization endpoint; [`token_cache::CachedTokenProvider`]
//! wraps any provider with a best-effort token cache. Application-mode
//! clients only see the [`TokenProvider`] trait.

pub mod app_credentials;
pub mod token_cache;

#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    type Error: Send + Sync;

    /// A bearer token valid for the `x-acs-dingtalk-access-token` header.
    async fn access_token(&self) -> Result<String, Self::Error>;
}
