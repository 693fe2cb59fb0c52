//! The Slack neuron itself: run one validated request against the Slack API
//! and shape the replies into a [`SlackOutput`].

use error_stack::ResultExt;
use neuron_models::{
    neuron::{AuthoredMessage, NeuronParameters, SlackOutput},
    slack::{
        SlackApi,
        responses::{Channel, HistoryMessage, Member, SlackResponse},
    },
};

use crate::{
    error::{Error, NeuronResult},
    host::NeuronHost,
    request::{SlackCommand, SlackRequest},
};

/// Posts to or reads from a Slack channel through `A`.
///
/// A relay holds no per-invocation state; the same instance can serve any
/// number of requests.
#[derive(Debug, Clone)]
pub struct ChatRelay<A> {
    api: A,
}

impl<A: SlackApi> ChatRelay<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Validates `parameters`, executes the selected action and hands the
    /// output to `host`. Validation failures return before any Slack call.
    pub async fn run<H>(&self, parameters: NeuronParameters, host: &H) -> NeuronResult<SlackOutput>
    where
        H: NeuronHost + ?Sized,
    {
        let request = SlackRequest::from_parameters(parameters)?;
        let output = self.execute(&request, host).await?;
        host.say(&output);
        tracing::debug!(
            action = %output.action(),
            channel = %output.channel(),
            "Neuron output delivered."
        );
        Ok(output)
    }

    /// Executes an already validated request. `host` only receives warnings.
    pub async fn execute<H>(&self, request: &SlackRequest, host: &H) -> NeuronResult<SlackOutput>
    where
        H: NeuronHost + ?Sized,
    {
        tracing::debug!(action = %request.action(), "Executing Slack request.");
        match &request.command {
            SlackCommand::Post { channel, message } => {
                self.post(&request.token, channel, message).await
            }
            SlackCommand::Read { channel, limit } => {
                self.read(&request.token, channel, *limit, host).await
            }
        }
    }

    async fn post(&self, token: &str, channel: &str, message: &str) -> NeuronResult<SlackOutput> {
        let reply = self
            .api
            .post_message(token, channel, message)
            .await
            .change_context(Error::SlackApi("chat.postMessage".to_string()))?;

        // The reply status is informational only.
        match reply {
            SlackResponse::PostMessage(_) => {
                tracing::info!(channel = %channel, "Slack message sent successfully.");
            }
            SlackResponse::Error(slack_error) => {
                tracing::warn!(
                    channel = %channel,
                    "chat.postMessage was not acknowledged: {}",
                    slack_error.error
                );
            }
            SlackResponse::UnknownResponse(value) => {
                tracing::warn!(channel = %channel, "Unknown chat.postMessage reply: {value}");
            }
        }

        Ok(SlackOutput::Post {
            text: message.to_string(),
            channel: channel.to_string(),
        })
    }

    async fn read<H>(
        &self,
        token: &str,
        channel: &str,
        limit: usize,
        host: &H,
    ) -> NeuronResult<SlackOutput>
    where
        H: NeuronHost + ?Sized,
    {
        let users = self
            .api
            .list_users(token)
            .await
            .change_context(Error::SlackApi("users.list".to_string()))?;
        let channels = self
            .api
            .list_channels(token)
            .await
            .change_context(Error::SlackApi("channels.list".to_string()))?;

        let channel_id = resolve_channel_id(&channels.channels, channel);
        if channel_id.is_none() {
            host.warn(&Error::ChannelNotFound(channel.to_string()).to_string());
        }

        let history = self
            .api
            .channel_history(token, channel_id)
            .await
            .change_context(Error::SlackApi("channels.history".to_string()))?;
        let latest = take_latest(history, limit);

        let messages = resolve_authors(&latest, &users.members);
        tracing::info!(
            channel = %channel,
            fetched = latest.len(),
            resolved = messages.len(),
            "Slack channel read."
        );

        Ok(SlackOutput::Read {
            messages,
            channel: channel.to_string(),
        })
    }
}

/// Id of the channel named exactly `name`. Names are unique in a workspace;
/// should the directory repeat one, the last entry wins.
pub fn resolve_channel_id<'a>(channels: &'a [Channel], name: &str) -> Option<&'a str> {
    channels
        .iter()
        .filter(|c| c.name.as_deref() == Some(name))
        .filter_map(|c| c.id.as_deref())
        .last()
}

/// Keeps the first `limit` messages in the order the service returned them.
pub fn take_latest(mut messages: Vec<HistoryMessage>, limit: usize) -> Vec<HistoryMessage> {
    messages.truncate(limit);
    messages
}

/// Pairs each message with its author's display name.
///
/// An explicit `username` is used as-is. Otherwise `user` is looked up in the
/// member directory by id. Messages matching neither are dropped.
pub fn resolve_authors(messages: &[HistoryMessage], members: &[Member]) -> Vec<AuthoredMessage> {
    messages
        .iter()
        .filter_map(|message| {
            let author = match (&message.username, &message.user) {
                (Some(username), _) => Some(username.as_str()),
                (None, Some(user_id)) => member_name(members, user_id),
                (None, None) => None,
            }?;
            Some(AuthoredMessage::new(author, message.text.as_str()))
        })
        .collect()
}

fn member_name<'a>(members: &'a [Member], user_id: &str) -> Option<&'a str> {
    members
        .iter()
        .find(|m| m.id.as_deref() == Some(user_id))
        .and_then(|m| m.name.as_deref())
}
