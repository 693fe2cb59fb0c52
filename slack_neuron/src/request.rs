use std::{fmt, str::FromStr};

use error_stack::report;
use neuron_models::neuron::{NeuronParameters, SlackAction};

use crate::error::{Error, NeuronResult};

/// What a validated invocation does, with only the fields that branch needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlackCommand {
    Post { channel: String, message: String },
    Read { channel: String, limit: usize },
}

impl SlackCommand {
    pub fn action(&self) -> SlackAction {
        match self {
            SlackCommand::Post { .. } => SlackAction::Post,
            SlackCommand::Read { .. } => SlackAction::Read,
        }
    }
}

/// A fully validated neuron invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct SlackRequest {
    pub token: String,
    pub command: SlackCommand,
}

impl fmt::Debug for SlackRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackRequest")
            .field("token", &"<redacted>")
            .field("command", &self.command)
            .finish()
    }
}

fn required(value: Option<String>, what: &str) -> NeuronResult<String> {
    value.ok_or_else(|| report!(Error::MissingParameter(format!("{what} required"))))
}

impl SlackRequest {
    /// Validates raw host parameters.
    ///
    /// Token and action are always checked first, then only the fields of the
    /// selected action. Nothing here touches the network.
    pub fn from_parameters(parameters: NeuronParameters) -> NeuronResult<Self> {
        let nb_messages = parameters.nb_messages_or_default();
        let NeuronParameters {
            action,
            slack_token,
            channel,
            message,
            ..
        } = parameters;

        let token = required(slack_token, "token")?;
        let action = required(action, "action")?;
        let action = SlackAction::from_str(&action)
            .map_err(|_| report!(Error::InvalidParameter(format!("unknown action: {action}"))))?;

        let command = match action {
            SlackAction::Post => SlackCommand::Post {
                channel: required(channel, "channel")?,
                message: required(message, "message")?,
            },
            SlackAction::Read => {
                let channel = required(channel, "channel")?;
                if nb_messages == 0 {
                    return Err(report!(Error::InvalidParameter(
                        "nb_messages must be a positive integer".to_string()
                    )));
                }
                SlackCommand::Read {
                    channel,
                    limit: nb_messages as usize,
                }
            }
        };

        Ok(Self { token, command })
    }

    pub fn action(&self) -> SlackAction {
        self.command.action()
    }
}
