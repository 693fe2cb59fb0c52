pub mod error;
pub mod host;
pub mod relay;
pub mod request;
#[cfg(test)]
pub mod tests;

pub use host::{NeuronHost, StdoutHost};
pub use relay::ChatRelay;
pub use request::{SlackCommand, SlackRequest};
