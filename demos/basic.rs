//! Send a couple of messages with each mode.
//!
//! ```sh
//! DING_WEBHOOK_TOKEN=... DING_WEBHOOK_SECRET=... \
//! DING_ROBOT_CODE=... DING_APP_KEY=... DING_APP_SECRET=... \
//! DING_USER_ID=... cargo run --example basic
//! ```

use dingbot::message::{AppMessage, Link};
use dingbot::robot::{app::AppClient, webhook::WebhookClient};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let webhook_token = getenv("DING_WEBHOOK_TOKEN");
    let webhook_secret = getenv("DING_WEBHOOK_SECRET");

    let webhook = WebhookClient::with_secret(webhook_token, webhook_secret);
    webhook.send_text("hello from dingbot").await?;
    webhook
        .send_link(Link::new(
            "dingbot",
            "webhook link message",
            "",
            "https://open.dingtalk.com/",
        ))
        .await?;
    info!("webhook messages sent");

    let robot_code = getenv("DING_ROBOT_CODE");
    let app_key = getenv("DING_APP_KEY");
    let app_secret = getenv("DING_APP_SECRET");
    let user_id = getenv("DING_USER_ID");

    let app = AppClient::new(robot_code, app_key, app_secret);
    app.send_to_users(&AppMessage::text("hello one-on-one"), &[&user_id])
        .await?;
    // The second send reuses the cached access token.
    app.send_to_users(&AppMessage::markdown("dingbot", "**hello again**"), &[&user_id])
        .await?;
    info!("app messages sent");

    Ok(())
}

fn getenv(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("env var {} is not set", key))
}
