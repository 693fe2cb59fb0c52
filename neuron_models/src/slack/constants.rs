pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Environment variable that overrides [`SLACK_API_URL`].
pub const SLACK_API_URL_ENV: &str = "SLACK_API_URL";

pub const POST_MESSAGE_PATH: &str = "/chat.postMessage";
pub const USERS_LIST_PATH: &str = "/users.list";
pub const CHANNELS_LIST_PATH: &str = "/channels.list";
pub const CHANNELS_HISTORY_PATH: &str = "/channels.history";
