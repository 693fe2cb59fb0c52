use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use error_stack::report;
use neuron_models::{
    error::{Error as ModelError, ModelResult},
    log::init_tracing_in_tests,
    neuron::{AuthoredMessage, NeuronParameters, SlackOutput},
    slack::{
        SlackApi,
        responses::{
            ChannelsListResponse, HistoryMessage, PostMessageResponse, SlackError, SlackResponse,
            UsersListResponse,
        },
    },
};
use serde_json::json;
use tracing_subscriber::fmt::MakeWriter;

use crate::{ChatRelay, NeuronHost, error::Error};

/// Log lines captured from a scoped plain-text subscriber.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Routes events of this thread into the buffer until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    PostMessage {
        token: String,
        channel: String,
        text: String,
    },
    ListUsers,
    ListChannels,
    ChannelHistory {
        channel_id: Option<String>,
    },
}

/// In-memory Slack that serves canned directories and records every call.
#[derive(Debug, Default)]
pub struct MockSlackApi {
    pub users: serde_json::Value,
    pub channels: serde_json::Value,
    pub history: Vec<HistoryMessage>,
    pub post_reply: Option<SlackResponse>,
    pub fail_directories: bool,
    pub calls: Mutex<Vec<ApiCall>>,
}

impl MockSlackApi {
    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlackApi for MockSlackApi {
    async fn post_message(
        &self,
        token: &str,
        channel: &str,
        text: &str,
    ) -> ModelResult<SlackResponse> {
        self.record(ApiCall::PostMessage {
            token: token.to_string(),
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(self.post_reply.clone().unwrap_or_else(|| {
            SlackResponse::PostMessage(PostMessageResponse {
                ok: true,
                channel: "C1".to_string(),
                ts: "1503435956.000247".to_string(),
                message: json!({ "text": text }),
            })
        }))
    }

    async fn list_users(&self, _token: &str) -> ModelResult<UsersListResponse> {
        self.record(ApiCall::ListUsers);
        if self.fail_directories {
            return Err(report!(ModelError::ReqwestError("connection refused".to_string())));
        }
        serde_json::from_value(self.users.clone())
            .map_err(|e| report!(ModelError::SerdeDeserialize(e.to_string())))
    }

    async fn list_channels(&self, _token: &str) -> ModelResult<ChannelsListResponse> {
        self.record(ApiCall::ListChannels);
        serde_json::from_value(self.channels.clone())
            .map_err(|e| report!(ModelError::SerdeDeserialize(e.to_string())))
    }

    async fn channel_history(
        &self,
        _token: &str,
        channel_id: Option<&str>,
    ) -> ModelResult<Vec<HistoryMessage>> {
        self.record(ApiCall::ChannelHistory {
            channel_id: channel_id.map(str::to_string),
        });
        match channel_id {
            Some(_) => Ok(self.history.clone()),
            None => Ok(Vec::new()),
        }
    }
}

/// Host that keeps everything it was handed.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub said: Mutex<Vec<SlackOutput>>,
    pub warnings: Mutex<Vec<String>>,
}

impl NeuronHost for RecordingHost {
    fn say(&self, output: &SlackOutput) {
        self.said.lock().unwrap().push(output.clone());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

fn parameters(value: serde_json::Value) -> NeuronParameters {
    serde_json::from_value(value).unwrap()
}

fn general_workspace() -> MockSlackApi {
    MockSlackApi {
        users: json!({ "members": [{ "id": "U1", "name": "alice" }] }),
        channels: json!({ "channels": [{ "id": "C1", "name": "general" }] }),
        history: vec![
            HistoryMessage::from_user("U1", "hi"),
            HistoryMessage::from_username("bob", "yo"),
            HistoryMessage::from_user("U2", "ignored"),
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_post_issues_one_call_and_echoes_message() {
    init_tracing_in_tests();
    let relay = ChatRelay::new(MockSlackApi::default());
    let host = RecordingHost::default();

    let output = relay
        .run(
            parameters(json!({
                "slack_token": "T",
                "action": "POST",
                "channel": "general",
                "message": "hello team"
            })),
            &host,
        )
        .await
        .unwrap();

    let expected = SlackOutput::Post {
        text: "hello team".to_string(),
        channel: "general".to_string(),
    };
    assert_eq!(output, expected);
    assert_eq!(
        relay.api().calls(),
        vec![ApiCall::PostMessage {
            token: "T".to_string(),
            channel: "general".to_string(),
            text: "hello team".to_string(),
        }]
    );
    assert_eq!(*host.said.lock().unwrap(), vec![expected]);
}

#[tokio::test]
async fn test_post_slack_error_reply_still_produces_output() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let relay = ChatRelay::new(MockSlackApi {
        post_reply: Some(SlackResponse::Error(SlackError {
            ok: false,
            error: "not_in_channel".to_string(),
        })),
        ..Default::default()
    });
    let host = RecordingHost::default();

    let output = relay
        .run(
            parameters(json!({
                "slack_token": "T",
                "action": "POST",
                "channel": "general",
                "message": "hello"
            })),
            &host,
        )
        .await
        .unwrap();

    assert_eq!(output.channel(), "general");
    assert_eq!(host.said.lock().unwrap().len(), 1);

    let captured = logs.contents();
    assert!(captured.contains("WARN"));
    assert!(captured.contains("not_in_channel"));
    assert!(!captured.contains("ERROR"));
}

#[tokio::test]
async fn test_post_without_message_fails_before_network() {
    let relay = ChatRelay::new(MockSlackApi::default());
    let host = RecordingHost::default();

    let err = relay
        .run(
            parameters(json!({ "slack_token": "T", "action": "POST", "channel": "general" })),
            &host,
        )
        .await
        .unwrap_err();

    assert_eq!(
        *err.current_context(),
        Error::MissingParameter("message required".to_string())
    );
    assert!(relay.api().calls().is_empty());
    assert!(host.said.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_read_without_channel_fails() {
    let relay = ChatRelay::new(general_workspace());
    let host = RecordingHost::default();

    let err = relay
        .run(parameters(json!({ "slack_token": "T", "action": "READ" })), &host)
        .await
        .unwrap_err();

    assert_eq!(
        *err.current_context(),
        Error::MissingParameter("channel required".to_string())
    );
    assert!(relay.api().calls().is_empty());
}

#[tokio::test]
async fn test_unknown_action_fails_before_network() {
    let relay = ChatRelay::new(general_workspace());
    let host = RecordingHost::default();

    let err = relay
        .run(
            parameters(json!({ "slack_token": "T", "action": "SHOUT", "channel": "general" })),
            &host,
        )
        .await
        .unwrap_err();

    assert!(matches!(err.current_context(), Error::InvalidParameter(_)));
    assert!(relay.api().calls().is_empty());
}

#[tokio::test]
async fn test_read_round_trip() {
    init_tracing_in_tests();
    let relay = ChatRelay::new(general_workspace());
    let host = RecordingHost::default();

    let output = relay
        .run(
            parameters(json!({
                "slack_token": "T",
                "action": "READ",
                "channel": "general",
                "nb_messages": 2
            })),
            &host,
        )
        .await
        .unwrap();

    assert_eq!(
        output,
        SlackOutput::Read {
            messages: vec![
                AuthoredMessage::new("alice", "hi"),
                AuthoredMessage::new("bob", "yo"),
            ],
            channel: "general".to_string(),
        }
    );
    assert_eq!(
        serde_json::to_value(&output).unwrap()["messages"],
        json!([{ "alice": "hi" }, { "bob": "yo" }])
    );
    assert_eq!(
        relay.api().calls(),
        vec![
            ApiCall::ListUsers,
            ApiCall::ListChannels,
            ApiCall::ChannelHistory {
                channel_id: Some("C1".to_string())
            },
        ]
    );
    assert!(host.warnings.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_read_limit_counts_raw_messages() {
    let relay = ChatRelay::new(MockSlackApi {
        history: vec![
            HistoryMessage::from_user("U2", "unknown author"),
            HistoryMessage::from_user("U1", "hi"),
            HistoryMessage::from_user("U1", "beyond the limit"),
        ],
        ..general_workspace()
    });
    let host = RecordingHost::default();

    let output = relay
        .run(
            parameters(json!({
                "slack_token": "T",
                "action": "READ",
                "channel": "general",
                "nb_messages": "2"
            })),
            &host,
        )
        .await
        .unwrap();

    assert_eq!(
        output,
        SlackOutput::Read {
            messages: vec![AuthoredMessage::new("alice", "hi")],
            channel: "general".to_string(),
        }
    );
}

#[tokio::test]
async fn test_read_unknown_channel_warns_and_returns_empty() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let relay = ChatRelay::new(general_workspace());
    let host = RecordingHost::default();

    let output = relay
        .run(
            parameters(json!({
                "slack_token": "T",
                "action": "READ",
                "channel": "nonexistent"
            })),
            &host,
        )
        .await
        .unwrap();

    assert_eq!(
        output,
        SlackOutput::Read {
            messages: Vec::new(),
            channel: "nonexistent".to_string(),
        }
    );
    assert_eq!(
        *host.warnings.lock().unwrap(),
        vec![Error::ChannelNotFound("nonexistent".to_string()).to_string()]
    );
    assert_eq!(
        relay.api().calls().last(),
        Some(&ApiCall::ChannelHistory { channel_id: None })
    );
    assert_eq!(host.said.lock().unwrap().len(), 1);
    // Reported through the host only; the relay does not log it again.
    assert!(!logs.contents().contains("has not been found"));
}

#[tokio::test]
async fn test_read_directory_failure_propagates() {
    let relay = ChatRelay::new(MockSlackApi {
        fail_directories: true,
        ..general_workspace()
    });
    let host = RecordingHost::default();

    let err = relay
        .run(
            parameters(json!({
                "slack_token": "T",
                "action": "READ",
                "channel": "general"
            })),
            &host,
        )
        .await
        .unwrap_err();

    assert_eq!(
        *err.current_context(),
        Error::SlackApi("users.list".to_string())
    );
    assert_eq!(relay.api().calls(), vec![ApiCall::ListUsers]);
    assert!(host.said.lock().unwrap().is_empty());
}
