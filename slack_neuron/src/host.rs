use std::io::{self, Write};

use neuron_models::neuron::SlackOutput;

/// The host side of one neuron invocation.
pub trait NeuronHost {
    /// Routes the produced output onward (speech, templates, ...).
    fn say(&self, output: &SlackOutput);

    /// Reports a non-fatal problem to the user.
    fn warn(&self, message: &str);
}

/// Host used by the `slack-neuron` binary: output goes to stdout as one JSON
/// line, warnings to the log. Logs must therefore not be written to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutHost;

impl StdoutHost {
    /// Writes `output` as a single JSON line.
    pub fn write_output<W: Write>(writer: &mut W, output: &SlackOutput) -> io::Result<()> {
        serde_json::to_writer(&mut *writer, output)?;
        writeln!(writer)?;
        writer.flush()
    }
}

impl NeuronHost for StdoutHost {
    fn say(&self, output: &SlackOutput) {
        if let Err(e) = Self::write_output(&mut io::stdout().lock(), output) {
            tracing::error!("Failed to write neuron output: {e}");
        }
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
