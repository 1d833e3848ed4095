//! Message payload types.
//!
//! Wire shapes follow the DingTalk "message types and data format" document.
//! [`WebhookMessage`] is the self-describing body posted to webhook URLs
//! (`msgtype` discriminant); [`AppMessage`] is the template-key form used by
//! the internal-app endpoints, where the inner payload travels as a JSON
//! string under `msgParam`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markdown {
    /// Shown in the conversation list preview.
    pub title: String,
    /// Markdown body.
    pub text: String,
}

/// Image message, internal-app mode only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub title: String,
    /// Body text, truncated by the client if long. Feed-card links carry
    /// none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pic_url: String,
    /// Opened in the DingTalk client on mobile, external browser on PC.
    pub message_url: String,
}

impl Link {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        pic_url: impl Into<String>,
        message_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            pic_url: pic_url.into(),
            message_url: message_url.into(),
        }
    }

    /// Feed-card entry: title and target only, optional picture.
    pub fn for_feed_card(
        title: impl Into<String>,
        pic_url: impl Into<String>,
        message_url: impl Into<String>,
    ) -> Self {
        Self::new(title, "", pic_url, message_url)
    }
}

/// Who to @-mention. Mentions only render when the message content also
/// carries the matching `@139...` / `@userId` text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct At {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub at_mobiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub at_user_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_at_all: bool,
}

impl At {
    pub fn mobiles(mobiles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            at_mobiles: mobiles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn user_ids(user_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            at_user_ids: user_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self {
            is_at_all: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleActionCard {
    pub title: String,
    /// Markdown body.
    pub text: String,
    /// Label of the single jump button.
    pub single_title: String,
    #[serde(rename = "singleURL")]
    pub single_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BtnOrientation {
    #[serde(rename = "0")]
    Vertical,
    #[serde(rename = "1")]
    Horizontal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Btn {
    pub title: String,
    #[serde(rename = "actionURL")]
    pub action_url: String,
}

impl Btn {
    pub fn new(title: impl Into<String>, action_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            action_url: action_url.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndependentActionCard {
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btn_orientation: Option<BtnOrientation>,
    pub btns: Vec<Btn>,
}

/// Action card, either one whole-card jump button or independent buttons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionCard {
    Single(SingleActionCard),
    Independent(IndependentActionCard),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedCard {
    pub links: Vec<Link>,
}

/// Body posted to a webhook URL. The variant name doubles as the `msgtype`
/// discriminant on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "msgtype", rename_all = "camelCase")]
pub enum WebhookMessage {
    Text {
        text: Text,
        #[serde(default)]
        at: At,
    },
    Markdown {
        markdown: Markdown,
        #[serde(default)]
        at: At,
    },
    Link {
        link: Link,
    },
    #[serde(rename_all = "camelCase")]
    ActionCard {
        action_card: ActionCard,
    },
    #[serde(rename_all = "camelCase")]
    FeedCard {
        feed_card: FeedCard,
    },
}

impl WebhookMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self::text_at(content, At::default())
    }

    pub fn text_at(content: impl Into<String>, at: At) -> Self {
        Self::Text {
            text: Text {
                content: content.into(),
            },
            at,
        }
    }

    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::markdown_at(title, text, At::default())
    }

    pub fn markdown_at(title: impl Into<String>, text: impl Into<String>, at: At) -> Self {
        // Markdown only renders user-id mentions that appear in the body, so
        // append them.
        let mut text = text.into();
        for user_id in &at.at_user_ids {
            text.push_str(" @");
            text.push_str(user_id);
        }
        Self::Markdown {
            markdown: Markdown {
                title: title.into(),
                text,
            },
            at,
        }
    }

    pub fn link(link: Link) -> Self {
        Self::Link { link }
    }

    pub fn action_card(
        title: impl Into<String>,
        text: impl Into<String>,
        single_title: impl Into<String>,
        single_url: impl Into<String>,
    ) -> Self {
        Self::ActionCard {
            action_card: ActionCard::Single(SingleActionCard {
                title: title.into(),
                text: text.into(),
                single_title: single_title.into(),
                single_url: single_url.into(),
            }),
        }
    }

    pub fn independent_action_card(
        title: impl Into<String>,
        text: impl Into<String>,
        btn_orientation: Option<BtnOrientation>,
        btns: Vec<Btn>,
    ) -> Self {
        Self::ActionCard {
            action_card: ActionCard::Independent(IndependentActionCard {
                title: title.into(),
                text: text.into(),
                btn_orientation,
                btns,
            }),
        }
    }

    pub fn feed_card(links: Vec<Link>) -> Self {
        Self::FeedCard {
            feed_card: FeedCard { links },
        }
    }
}

/// Body content for the internal-app endpoints, which address messages by
/// template key.
#[derive(Debug, Clone)]
pub enum AppMessage {
    Text(Text),
    Markdown(Markdown),
    Image(Image),
    Link(Link),
    ActionCard(SingleActionCard),
}

impl AppMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(Text {
            content: content.into(),
        })
    }

    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Markdown(Markdown {
            title: title.into(),
            text: text.into(),
        })
    }

    pub fn image(photo_url: impl Into<String>) -> Self {
        Self::Image(Image {
            photo_url: photo_url.into(),
        })
    }

    /// Template key, `sampleText` and friends.
    pub fn msg_key(&self) -> &'static str {
        match self {
            Self::Text(_) => "sampleText",
            Self::Markdown(_) => "sampleMarkdown",
            Self::Image(_) => "sampleImageMsg",
            Self::Link(_) => "sampleLink",
            Self::ActionCard(_) => "sampleActionCard",
        }
    }

    /// The payload as the JSON string the `msgParam` field expects.
    pub fn msg_param(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Text(text) => serde_json::to_string(text),
            Self::Markdown(markdown) => serde_json::to_string(markdown),
            Self::Image(image) => serde_json::to_string(image),
            Self::Link(link) => serde_json::to_string(link),
            Self::ActionCard(card) => serde_json::to_string(card),
        }
    }
}
