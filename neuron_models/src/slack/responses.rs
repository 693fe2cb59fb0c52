use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SlackResponse {
    #[serde(untagged)]
    PostMessage(PostMessageResponse),
    #[serde(untagged)]
    Error(SlackError),
    #[serde(untagged)]
    UnknownResponse(Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    pub channel: String,
    pub ts: String,
    pub message: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackError {
    pub ok: bool,
    pub error: String,
}

/// `users.list`. A reply without `members` (e.g. `ok: false`) reads as an
/// empty directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersListResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub members: Vec<Member>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// `channels.list`, same leniency as [`UsersListResponse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsListResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub channels: Vec<Channel>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Option<Vec<HistoryMessage>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    #[serde(default)]
    pub text: String,
    pub username: Option<String>,
    pub user: Option<String>,
}

impl HistoryMessage {
    pub fn from_user(user: &str, text: &str) -> Self {
        Self {
            text: text.to_string(),
            username: None,
            user: Some(user.to_string()),
        }
    }

    pub fn from_username(username: &str, text: &str) -> Self {
        Self {
            text: text.to_string(),
            username: Some(username.to_string()),
            user: None,
        }
    }
}
