use crate::{
    error::{Error, ModelResult},
    network::http::{HttpMethod, handle_reqwest_response, value_to_form_pairs},
};
use async_trait::async_trait;
use error_stack::ResultExt;
use once_cell::sync::Lazy;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::{
    constants::{
        CHANNELS_HISTORY_PATH, CHANNELS_LIST_PATH, POST_MESSAGE_PATH, SLACK_API_URL,
        SLACK_API_URL_ENV, USERS_LIST_PATH,
    },
    responses::{
        ChannelsListResponse, HistoryMessage, HistoryResponse, SlackResponse, UsersListResponse,
    },
};

pub static HTTP_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| Arc::new(Client::new()));

/// The Slack Web API calls the neuron depends on.
///
/// Every call is authenticated with the token passed in; implementations keep
/// no per-invocation state.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `chat.postMessage` with `as_user = true`. The reply is returned as-is;
    /// a Slack-level `ok: false` is not an error here.
    async fn post_message(&self, token: &str, channel: &str, text: &str)
    -> ModelResult<SlackResponse>;

    /// Full `users.list` directory.
    async fn list_users(&self, token: &str) -> ModelResult<UsersListResponse>;

    /// Full `channels.list` directory.
    async fn list_channels(&self, token: &str) -> ModelResult<ChannelsListResponse>;

    /// First page of `channels.history`, newest first.
    ///
    /// Only transport failures are errors. A non-success status, a body that
    /// is not JSON, or a reply without `messages` all yield an empty list.
    async fn channel_history(
        &self,
        token: &str,
        channel_id: Option<&str>,
    ) -> ModelResult<Vec<HistoryMessage>>;
}

/// [`SlackApi`] over HTTP with the shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct SlackHttpApi {
    client: Arc<Client>,
    base_url: String,
}

impl Default for SlackHttpApi {
    fn default() -> Self {
        Self::new()
    }
}

impl SlackHttpApi {
    pub fn new() -> Self {
        Self::with_base_url(SLACK_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses `SLACK_API_URL` when set, the public Slack endpoint otherwise.
    pub fn from_env() -> Self {
        match std::env::var(SLACK_API_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::with_base_url(url),
            _ => Self::new(),
        }
    }

    /// Sends a bearer-authenticated request to `uri_path` and deserializes a
    /// successful JSON reply.
    ///
    /// # Errors
    ///
    /// Will return an error if the request cannot be sent, the status is not
    /// a success, or the body does not deserialize into `T`.
    async fn send_slack_api_request<T: DeserializeOwned>(
        &self,
        token: &str,
        uri_path: &str,
        body: Option<Value>,
        method: HttpMethod,
    ) -> ModelResult<T> {
        let url = format!("{}{uri_path}", self.base_url);
        let request = match method {
            HttpMethod::GET => self.client.get(&url),
            HttpMethod::POST => match body {
                Some(body) => self
                    .client
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(&body),
                None => self.client.post(&url),
            },
        };

        tracing::debug!(method = method.as_str(), path = uri_path, "Sending Slack API request");

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .change_context(Error::ReqwestError("Failed to send request".to_string()))
            .attach_printable(format!("{} {uri_path}", method.as_str()))?;

        handle_reqwest_response(response)
            .await
            .attach_printable(format!("Failed to handle {uri_path} response"))
    }
}

#[async_trait]
impl SlackApi for SlackHttpApi {
    async fn post_message(
        &self,
        token: &str,
        channel: &str,
        text: &str,
    ) -> ModelResult<SlackResponse> {
        let body = serde_json::json!({
            "channel": channel,
            "text": text,
            "as_user": true,
        });
        self.send_slack_api_request(token, POST_MESSAGE_PATH, Some(body), HttpMethod::POST)
            .await
    }

    async fn list_users(&self, token: &str) -> ModelResult<UsersListResponse> {
        self.send_slack_api_request(token, USERS_LIST_PATH, None, HttpMethod::GET)
            .await
    }

    async fn list_channels(&self, token: &str) -> ModelResult<ChannelsListResponse> {
        self.send_slack_api_request(token, CHANNELS_LIST_PATH, None, HttpMethod::GET)
            .await
    }

    async fn channel_history(
        &self,
        token: &str,
        channel_id: Option<&str>,
    ) -> ModelResult<Vec<HistoryMessage>> {
        let url = format!("{}{CHANNELS_HISTORY_PATH}", self.base_url);
        let form = value_to_form_pairs(&serde_json::json!({
            "token": token,
            "channel": channel_id,
        }))?;

        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .change_context(Error::ReqwestError("Failed to send request".to_string()))
            .attach_printable(format!("POST {CHANNELS_HISTORY_PATH}"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "channels.history returned a non-success status");
            return Ok(Vec::new());
        }

        let body = response
            .text()
            .await
            .change_context(Error::ReqwestError(
                "Failed to get text from response".to_string(),
            ))?;

        Ok(parse_history_body(&body))
    }
}

/// Extracts the `messages` array of a `channels.history` body, or nothing if
/// the body is not a history reply.
pub fn parse_history_body(body: &str) -> Vec<HistoryMessage> {
    match serde_json::from_str::<HistoryResponse>(body) {
        Ok(history) => history.messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Unparseable channels.history body: {e}");
            Vec::new()
        }
    }
}
