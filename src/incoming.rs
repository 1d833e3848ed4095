//! The payload DingTalk POSTs to a robot's callback endpoint when someone
//! @-mentions it.
//!
//! This module only deserializes; interpretation is left to the application.
//! The interesting fields for replying are `session_webhook` (a webhook URL
//! scoped to the conversation, usable with
//! [`WebhookClient::from_session_webhook`]), `sender_staff_id` (addressee for
//! one-on-one app-mode sends) and `conversation_id` (addressee for group
//! app-mode sends).
//!
//! [`WebhookClient::from_session_webhook`]: crate::robot::webhook::WebhookClient::from_session_webhook

use serde::{Deserialize, Serialize};

use crate::message::Text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationType {
    #[serde(rename = "1")]
    Direct,
    #[serde(rename = "2")]
    Group,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtUser {
    pub dingtalk_id: String,
    /// Staff userid within the enterprise, absent outside it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMessage {
    /// Encrypted conversation id; group sends via the app API address this.
    pub conversation_id: String,
    pub conversation_type: ConversationType,
    /// Only present for group conversations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_title: Option<String>,
    #[serde(default)]
    pub at_users: Vec<AtUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chatbot_corp_id: Option<String>,
    pub chatbot_user_id: String,
    pub msg_id: String,
    /// Usually `text`.
    #[serde(rename = "msgtype")]
    pub msg_type: String,
    pub sender_nick: String,
    pub sender_id: String,
    /// Only returned once the robot has a published release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_staff_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_corp_id: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    /// Reply webhook scoped to this conversation.
    pub session_webhook: String,
    /// Expiry of `session_webhook`, unix milliseconds.
    pub session_webhook_expired_time: i64,
    /// When the message was sent, unix milliseconds.
    pub create_at: i64,
    #[serde(default)]
    pub is_in_at_list: bool,
    pub text: Text,
    pub robot_code: String,
}

impl IncomingMessage {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Pretty-printed JSON form, for logs.
    pub fn pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
