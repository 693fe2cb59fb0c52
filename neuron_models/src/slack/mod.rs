//! Slack Web API access used by the neuron.

pub mod api;
pub mod constants;
pub mod responses;

pub use api::{SlackApi, SlackHttpApi};
