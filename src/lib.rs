//! Client library for the DingTalk robot APIs.
//!
//! Two sending modes are supported:
//!
//! - **Webhook mode** ([`robot::webhook`]): a group custom robot addressed by
//!   a pre-shared `access_token` (optionally HMAC-signed), or a short-lived
//!   session-webhook URL taken from an inbound request. Group chat only.
//! - **Application mode** ([`robot::app`]): an internal-app robot
//!   authenticated with a cached access token ([`auth`]). Supports both
//!   one-on-one and group messages.
//!
//! [`incoming`] deserializes the payload DingTalk POSTs to a robot's callback
//! endpoint, and [`sign`] implements the webhook HMAC signature.

pub mod auth;
pub mod incoming;
pub mod message;
pub mod robot;
pub mod sign;
mod util;

pub use util::ServerError;

/// Content type DingTalk expects on every request.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
