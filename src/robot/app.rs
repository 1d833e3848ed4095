//! Application-mode client. Needs an internal-app robot; supports one-on-one
//! batch sends and group sends, but cannot @-mention.

use serde::Serialize;
use tracing::debug;

use crate::auth::app_credentials::AppCredentials;
use crate::auth::token_cache::{CachedTokenProvider, MemoryStore};
use crate::auth::TokenProvider;
use crate::message::AppMessage;
use crate::util::{check_status, ServerError, REQUEST_TIMEOUT};

pub const OTO_BATCH_SEND_URL: &str = "https://api.dingtalk.com/v1.0/robot/oToMessages/batchSend";
pub const GROUP_SEND_URL: &str = "https://api.dingtalk.com/v1.0/robot/groupMessages/send";

const ACCESS_TOKEN_HEADER: &str = "x-acs-dingtalk-access-token";

#[derive(Debug, thiserror::Error)]
pub enum Error<AuthError> {
    #[error("auth: {0}")]
    Auth(#[source] AuthError),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtoMessageBody<'a> {
    robot_code: &'a str,
    msg_key: &'a str,
    msg_param: String,
    user_ids: &'a [&'a str],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupMessageBody<'a> {
    robot_code: &'a str,
    msg_key: &'a str,
    msg_param: String,
    open_conversation_id: &'a str,
}

pub struct AppClient<AuthTokenProvider> {
    pub client: reqwest::Client,
    pub robot_code: String,
    pub auth_token_provider: AuthTokenProvider,
    /// One-on-one batch endpoint, [`OTO_BATCH_SEND_URL`] unless overridden.
    pub oto_endpoint: String,
    /// Group endpoint, [`GROUP_SEND_URL`] unless overridden.
    pub group_endpoint: String,
}

impl AppClient<CachedTokenProvider<AppCredentials, MemoryStore>> {
    /// Client wired the usual way: credential exchange behind an in-memory
    /// token cache keyed by the app key.
    pub fn new(
        robot_code: impl Into<String>,
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        let credentials = AppCredentials::new(app_key, app_secret);
        let cache_key = credentials.cache_key();
        let provider = CachedTokenProvider::new(credentials, MemoryStore::default(), cache_key);
        Self::with_token_provider(robot_code, provider)
    }
}

impl<AuthTokenProvider> AppClient<AuthTokenProvider>
where
    AuthTokenProvider: TokenProvider,
{
    pub fn with_token_provider(
        robot_code: impl Into<String>,
        auth_token_provider: AuthTokenProvider,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            robot_code: robot_code.into(),
            auth_token_provider,
            oto_endpoint: OTO_BATCH_SEND_URL.to_owned(),
            group_endpoint: GROUP_SEND_URL.to_owned(),
        }
    }

    /// Send `msg` one-on-one to each of `user_ids` (staff userids, see
    /// [`crate::incoming::IncomingMessage::sender_staff_id`]).
    pub async fn send_to_users(
        &self,
        msg: &AppMessage,
        user_ids: &[&str],
    ) -> Result<(), Error<AuthTokenProvider::Error>> {
        let body = OtoMessageBody {
            robot_code: &self.robot_code,
            msg_key: msg.msg_key(),
            msg_param: msg.msg_param()?,
            user_ids,
        };
        self.post(&self.oto_endpoint, &body).await
    }

    /// Send `msg` to a group by its encrypted conversation id (see
    /// [`crate::incoming::IncomingMessage::conversation_id`]).
    pub async fn send_to_group(
        &self,
        msg: &AppMessage,
        open_conversation_id: &str,
    ) -> Result<(), Error<AuthTokenProvider::Error>> {
        let body = GroupMessageBody {
            robot_code: &self.robot_code,
            msg_key: msg.msg_key(),
            msg_param: msg.msg_param()?,
            open_conversation_id,
        };
        self.post(&self.group_endpoint, &body).await
    }

    async fn post<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(), Error<AuthTokenProvider::Error>> {
        let access_token = self
            .auth_token_provider
            .access_token()
            .await
            .map_err(Error::Auth)?;

        let res = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .header(ACCESS_TOKEN_HEADER, access_token)
            .header(reqwest::header::CONTENT_TYPE, crate::CONTENT_TYPE_JSON)
            .json(body)
            .send()
            .await?;
        check_status(&res)?;

        let reply = res.text().await?;
        debug!(message = "DingTalk replied to app send", reply = %reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn oto_body_wire_shape() {
        let msg = AppMessage::text("hi");
        let body = OtoMessageBody {
            robot_code: "normal",
            msg_key: msg.msg_key(),
            msg_param: msg.msg_param().unwrap(),
            user_ids: &["042", "043"],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "robotCode": "normal",
                "msgKey": "sampleText",
                "msgParam": "{\"content\":\"hi\"}",
                "userIds": ["042", "043"],
            }),
        );
    }

    #[test]
    fn group_body_wire_shape() {
        let msg = AppMessage::markdown("t", "b");
        let body = GroupMessageBody {
            robot_code: "normal",
            msg_key: msg.msg_key(),
            msg_param: msg.msg_param().unwrap(),
            open_conversation_id: "cidXXX==",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["msgKey"], "sampleMarkdown");
        assert_eq!(value["openConversationId"], "cidXXX==");
        assert_eq!(
            value["msgParam"],
            json!(r#"{"title":"t","text":"b"}"#),
        );
    }
}
