use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Operation the neuron performs against Slack. Textual form is the exact,
/// upper-case name used in host configuration (`"POST"`, `"READ"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SlackAction {
    /// Post a message to a channel.
    Post,
    /// Read the most recent messages of a channel.
    Read,
}
