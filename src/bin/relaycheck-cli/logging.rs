use anyhow::{Context, Result};
use tracing_subscriber::{
    Layer, filter::FilterFn, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Installs the stderr subscriber. Only `relaycheck` events are shown;
/// each `-v` raises the level by one step from WARN.
pub fn init(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_ansi(true)
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_filter(level)
                .with_filter(FilterFn::new(|metadata| {
                    metadata.target().starts_with("relaycheck")
                })),
        )
        .try_init()
        .context("install log subscriber")
}
