use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FALLBACK_DIRECTIVE: &str = "heart_predict=info";

/// The filter directive for one `[logging] level` value.
pub fn filter_directive(level: &str) -> String {
    format!("heart_predict={}", level)
}

/// `RUST_LOG` wins over the configured level. An unknown level falls back to info.
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(filter_directive(level))
            .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
    })
}

pub fn init_cli_logger(level: &str) {
    // stdout 留給表單輸出
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// Picks the subscriber from the `[logging] format` value.
pub fn init_logger(format: &str, level: &str) {
    match format {
        "json" => init_json_logger(level),
        _ => init_cli_logger(level),
    }
}
