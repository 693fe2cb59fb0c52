use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt as _,
};

/// Builds the workspace subscriber writing to `writer`. `prod_format`
/// switches to flattened, uncoloured JSON lines suitable for log collectors.
pub fn subscriber<W>(prod_format: bool, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if prod_format {
        Box::new(
            tracing_subscriber::registry().with(EnvFilter::from_default_env()).with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_ansi(false)
                    .with_writer(writer),
            ),
        )
    } else {
        Box::new(
            tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(fmt::layer().json().pretty().with_ansi(true).with_writer(writer)),
        )
    }
}

/// Installs [`subscriber`] globally. Binaries whose stdout is a data channel
/// pass `std::io::stderr`.
pub fn init_tracing<W>(prod_format: bool, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    subscriber(prod_format, writer).init();
}

/// Development format routed through the test harness; safe to call from
/// every test.
pub fn init_tracing_in_tests() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().pretty().with_ansi(true).with_test_writer())
        .try_init()
        .ok();
}
