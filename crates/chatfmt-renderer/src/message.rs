//! Chat message and transcript wrappers.
//!
//! Conversation history is stored as raw text only. Rendering a stored
//! transcript re-runs [`format`] on every entry and wraps each result in a
//! `<div class="msg {role}">` container.

use std::borrow::Cow;

use crate::renderer::format;

/// Author of a chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(from = "String"))]
pub enum Role {
    /// Message typed by the user.
    User,
    /// Reply from the assistant.
    Bot,
    /// Client-generated notice.
    System,
    /// Any other role name found in stored history.
    Other(String),
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        match name.as_str() {
            "user" => Self::User,
            "bot" => Self::Bot,
            "system" => Self::System,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl Role {
    /// CSS class for the message container.
    ///
    /// Only ASCII alphanumerics, `-` and `_` survive from custom role names.
    pub fn class_name(&self) -> Cow<'_, str> {
        match self {
            Self::User => Cow::Borrowed("user"),
            Self::Bot => Cow::Borrowed("bot"),
            Self::System => Cow::Borrowed("system"),
            Self::Other(name) => {
                if name.chars().all(is_class_char) {
                    Cow::Borrowed(name)
                } else {
                    Cow::Owned(name.chars().filter(|&c| is_class_char(c)).collect())
                }
            }
        }
    }
}

fn is_class_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// A stored chat history entry.
///
/// Accepts both `{"type": …, "content": …, "timestamp": …}` and
/// `{"role": …, "content": …}` shapes when deserialized.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ChatMessage {
    /// Who wrote the message.
    #[cfg_attr(feature = "serde", serde(alias = "type"))]
    pub role: Role,
    /// Raw message text, never pre-rendered HTML.
    pub content: String,
    /// When the message was recorded, as stored by the client.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    /// Create a message without a timestamp.
    pub fn new(role: impl Into<Role>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Render one message inside its role container.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::{ChatMessage, render_message};
///
/// assert_eq!(
///     render_message(&ChatMessage::new("user", "hi")),
///     r#"<div class="msg user"><p class="msg-paragraph">hi</p></div>"#
/// );
/// ```
pub fn render_message(message: &ChatMessage) -> String {
    let class = message.role.class_name();
    let body = format(&message.content);

    let mut out = String::with_capacity(body.len() + class.len() + 24);
    out.push_str(r#"<div class="msg"#);
    if !class.is_empty() {
        out.push(' ');
        out.push_str(&class);
    }
    out.push_str(r#"">"#);
    out.push_str(&body);
    out.push_str("</div>");
    out
}

/// Render a whole conversation, in stored order.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    let html: String = messages.iter().map(render_message).collect();
    tracing::debug!(messages = messages.len(), output_bytes = html.len(), "Rendered transcript");
    html
}
