//! Parameters a host hands to the Slack neuron and the output it gets back.

pub mod action;
pub mod output;
pub mod parameters;

pub use action::SlackAction;
pub use output::{AuthoredMessage, SlackOutput};
pub use parameters::{DEFAULT_NB_MESSAGES, NeuronParameters};
