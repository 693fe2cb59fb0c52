use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::SlackAction;

/// One read message keyed by its author's display name. Serialized as a JSON
/// object with a single entry, `{"alice": "hi"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct AuthoredMessage {
    pub author: String,
    pub text: String,
}

impl AuthoredMessage {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

impl From<AuthoredMessage> for BTreeMap<String, String> {
    fn from(message: AuthoredMessage) -> Self {
        BTreeMap::from([(message.author, message.text)])
    }
}

impl TryFrom<BTreeMap<String, String>> for AuthoredMessage {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "expected a single author entry, found {}",
                map.len()
            ));
        }
        match map.into_iter().next() {
            Some((author, text)) => Ok(Self { author, text }),
            None => Err("empty author entry".to_string()),
        }
    }
}

/// What the neuron hands back to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum SlackOutput {
    #[serde(rename = "POST")]
    Post { text: String, channel: String },
    #[serde(rename = "READ")]
    Read {
        messages: Vec<AuthoredMessage>,
        channel: String,
    },
}

impl SlackOutput {
    pub fn action(&self) -> SlackAction {
        match self {
            SlackOutput::Post { .. } => SlackAction::Post,
            SlackOutput::Read { .. } => SlackAction::Read,
        }
    }

    pub fn channel(&self) -> &str {
        match self {
            SlackOutput::Post { channel, .. } | SlackOutput::Read { channel, .. } => channel,
        }
    }
}
