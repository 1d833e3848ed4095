//! Webhook-mode client. Group chat only, no application identity needed:
//! create a custom robot in the group and use its webhook access token, or
//! reply through the session webhook carried by an inbound request.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::message::{At, Btn, BtnOrientation, Link, WebhookMessage};
use crate::sign;
use crate::util::{check_status, ServerError, REQUEST_TIMEOUT};

use super::Reply;

pub const WEBHOOK_SEND_URL: &str = "https://oapi.dingtalk.com/robot/send";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
    #[error("query string: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

enum Target {
    /// Pre-shared webhook token, with the robot's "sign" secret if that
    /// security setting is enabled.
    AccessToken {
        token: String,
        secret: Option<String>,
    },
    /// Session webhook from an inbound request, used verbatim until its
    /// expiry.
    Session { url: String },
}

pub struct WebhookClient {
    pub client: reqwest::Client,
    /// Send endpoint, [`WEBHOOK_SEND_URL`] unless overridden. Ignored for
    /// session-webhook targets.
    pub endpoint: String,
    target: Target,
}

impl WebhookClient {
    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self::from_target(Target::AccessToken {
            token: token.into(),
            secret: None,
        })
    }

    pub fn with_secret(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::from_target(Target::AccessToken {
            token: token.into(),
            secret: Some(secret.into()),
        })
    }

    pub fn from_session_webhook(url: impl Into<String>) -> Self {
        Self::from_target(Target::Session { url: url.into() })
    }

    fn from_target(target: Target) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: WEBHOOK_SEND_URL.to_owned(),
            target,
        }
    }

    /// The URL to post to, signed when a secret is configured.
    pub fn send_url(&self) -> Result<String, Error> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or(0);
        self.send_url_at(timestamp)
    }

    fn send_url_at(&self, timestamp: i64) -> Result<String, Error> {
        match &self.target {
            Target::Session { url } => Ok(url.clone()),
            Target::AccessToken { token, secret } => {
                let query = match secret {
                    None => serde_urlencoded::to_string([("access_token", token.as_str())])?,
                    Some(secret) => {
                        let timestamp_str = timestamp.to_string();
                        let sign = sign::webhook_sign(timestamp, secret);
                        serde_urlencoded::to_string([
                            ("access_token", token.as_str()),
                            ("timestamp", timestamp_str.as_str()),
                            ("sign", sign.as_str()),
                        ])?
                    }
                };
                Ok(format!("{}?{}", self.endpoint, query))
            }
        }
    }

    pub async fn send(&self, msg: &WebhookMessage) -> Result<(), Error> {
        let url = self.send_url()?;
        let res = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::CONTENT_TYPE, crate::CONTENT_TYPE_JSON)
            .json(msg)
            .send()
            .await?;
        check_status(&res)?;
        let reply: Reply = res.json().await?;
        debug!(
            message = "DingTalk replied to webhook send",
            errcode = reply.errcode,
            errmsg = %reply.errmsg,
        );
        Ok(())
    }

    pub async fn send_text(&self, content: &str) -> Result<(), Error> {
        self.send(&WebhookMessage::text(content)).await
    }

    pub async fn send_text_at_mobiles(&self, content: &str, mobiles: &[&str]) -> Result<(), Error> {
        self.send(&WebhookMessage::text_at(content, At::mobiles(mobiles.iter().copied())))
            .await
    }

    pub async fn send_text_at_user_ids(
        &self,
        content: &str,
        user_ids: &[&str],
    ) -> Result<(), Error> {
        self.send(&WebhookMessage::text_at(content, At::user_ids(user_ids.iter().copied())))
            .await
    }

    pub async fn send_text_at_all(&self, content: &str) -> Result<(), Error> {
        self.send(&WebhookMessage::text_at(content, At::all())).await
    }

    pub async fn send_markdown(&self, title: &str, text: &str) -> Result<(), Error> {
        self.send(&WebhookMessage::markdown(title, text)).await
    }

    pub async fn send_markdown_at_mobiles(
        &self,
        title: &str,
        text: &str,
        mobiles: &[&str],
    ) -> Result<(), Error> {
        self.send(&WebhookMessage::markdown_at(title, text, At::mobiles(mobiles.iter().copied())))
            .await
    }

    pub async fn send_markdown_at_user_ids(
        &self,
        title: &str,
        text: &str,
        user_ids: &[&str],
    ) -> Result<(), Error> {
        self.send(&WebhookMessage::markdown_at(title, text, At::user_ids(user_ids.iter().copied())))
            .await
    }

    pub async fn send_markdown_at_all(&self, title: &str, text: &str) -> Result<(), Error> {
        self.send(&WebhookMessage::markdown_at(title, text, At::all()))
            .await
    }

    /// Link cards cannot @-mention anyone.
    pub async fn send_link(&self, link: Link) -> Result<(), Error> {
        self.send(&WebhookMessage::link(link)).await
    }

    pub async fn send_action_card(
        &self,
        title: &str,
        text: &str,
        single_title: &str,
        single_url: &str,
    ) -> Result<(), Error> {
        self.send(&WebhookMessage::action_card(title, text, single_title, single_url))
            .await
    }

    pub async fn send_independent_action_card(
        &self,
        title: &str,
        text: &str,
        btn_orientation: Option<BtnOrientation>,
        btns: Vec<Btn>,
    ) -> Result<(), Error> {
        self.send(&WebhookMessage::independent_action_card(
            title,
            text,
            btn_orientation,
            btns,
        ))
        .await
    }

    pub async fn send_feed_card(&self, links: Vec<Link>) -> Result<(), Error> {
        self.send(&WebhookMessage::feed_card(links)).await
    }
}
