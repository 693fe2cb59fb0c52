use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

pub const DEFAULT_NB_MESSAGES: u32 = 10;

/// Raw neuron parameters as delivered by the host. Every field is optional
/// here; presence is checked when the parameters are turned into a request.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeuronParameters {
    pub action: Option<String>,
    #[serde(alias = "token")]
    pub slack_token: Option<String>,
    pub channel: Option<String>,
    pub message: Option<String>,
    /// Hosts often pass numbers as strings, so both `10` and `"10"` are accepted.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub nb_messages: Option<u32>,
}

impl NeuronParameters {
    pub fn nb_messages_or_default(&self) -> u32 {
        self.nb_messages.unwrap_or(DEFAULT_NB_MESSAGES)
    }
}
