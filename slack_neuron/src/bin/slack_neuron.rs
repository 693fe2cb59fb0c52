use std::process;

use neuron_models::{log::init_tracing, neuron::NeuronParameters, slack::SlackHttpApi};
use slack_neuron::{ChatRelay, StdoutHost, error::ReportDisplayExt};
use tokio::io::{self, AsyncReadExt};

const TOKEN_ENV: &str = "SLACK_BOT_TOKEN";
const PROD_LOG_ENV: &str = "SLACK_NEURON_PROD_LOG";

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("slack-neuron error: {err}");
        process::exit(1);
    }
}

/// Reads one JSON parameter object (first argument, or stdin) and runs it.
async fn run() -> Result<(), String> {
    dotenv::dotenv().ok();
    init_tracing(std::env::var(PROD_LOG_ENV).is_ok(), std::io::stderr);

    let raw = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .await
                .map_err(|e| format!("failed to read parameters from stdin: {e}"))?;
            buffer
        }
    };

    let mut parameters: NeuronParameters =
        serde_json::from_str(&raw).map_err(|e| format!("invalid parameters: {e}"))?;
    if parameters.slack_token.is_none() {
        parameters.slack_token = std::env::var(TOKEN_ENV).ok();
    }

    let relay = ChatRelay::new(SlackHttpApi::from_env());
    relay
        .run(parameters, &StdoutHost)
        .await
        .map(|_| ())
        .map_err(|report| {
            tracing::error!("{report:?}");
            report.format()
        })
}
