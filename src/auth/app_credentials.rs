//! Exchange an internal app's key/secret for an access token.

use serde::{Deserialize, Serialize};

use crate::util::{check_status, ServerError, REQUEST_TIMEOUT};

pub const ACCESS_TOKEN_URL: &str = "https://api.dingtalk.com/v1.0/oauth2/accessToken";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
}

/// Internal-app credentials, as found under the app's "credentials and basic
/// information" page.
pub struct AppCredentials {
    pub client: reqwest::Client,
    pub app_key: String,
    pub app_secret: String,
    /// Authorization endpoint, [`ACCESS_TOKEN_URL`] unless overridden.
    pub endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    app_key: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// The generated access token. Opaque, treat as a secret.
    pub access_token: String,
    /// Remaining lifetime in seconds (7200 for DingTalk at the time of
    /// writing). Informational only; the cache keeps its own TTL.
    pub expire_in: i64,
}

impl AppCredentials {
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            endpoint: ACCESS_TOKEN_URL.to_owned(),
        }
    }

    /// Cache key for tokens obtained with these credentials. Derived from the
    /// app key so that two apps sharing a process do not collide.
    pub fn cache_key(&self) -> String {
        format!("ding-access-token/{}", self.app_key)
    }

    /// Ask the authorization endpoint for a fresh token.
    pub async fn fetch(&self) -> Result<TokenResponse, Error> {
        let body = TokenRequest {
            app_key: &self.app_key,
            app_secret: &self.app_secret,
        };

        let res = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::CONTENT_TYPE, crate::CONTENT_TYPE_JSON)
            .json(&body)
            .send()
            .await?;
        check_status(&res)?;
        let token_response = res.json().await?;
        Ok(token_response)
    }
}

#[async_trait::async_trait]
impl super::TokenProvider for AppCredentials {
    type Error = Error;

    async fn access_token(&self) -> Result<String, Self::Error> {
        let token_response = self.fetch().await?;
        Ok(token_response.access_token)
    }
}
