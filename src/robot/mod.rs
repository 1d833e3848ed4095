//! Sending clients.
//!
//! [`webhook::WebhookClient`] posts to a group custom robot's webhook URL;
//! [`app::AppClient`] drives the internal-app robot endpoints with a bearer
//! token from [`crate::auth`].

pub mod app;
pub mod webhook;

use serde::Deserialize;

/// The `{errcode, errmsg}` envelope webhook endpoints answer with. Logged,
/// not interpreted.
#[derive(Debug, Default, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}
