use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the stderr log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per event, for log collectors.
    Json,
}

/// Filter used when `RUST_LOG` is unset. ONNX Runtime logs through `ort`
/// and is noisy at info.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "apt_price_predictor=debug,ort=warn,info"
    } else {
        "apt_price_predictor=warn,ort=error"
    }
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    // stdout carries the prediction; logs go to stderr.
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
    }
}
