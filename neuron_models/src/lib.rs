pub mod error;
pub mod log;
pub mod network;
pub mod neuron;
pub mod slack;
