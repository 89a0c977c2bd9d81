use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON stdout subscriber for a service.
///
/// `RUST_LOG` wins when set and parseable; otherwise `default_directives`
/// (e.g. `"tollgate_lifecycle=info,warn"`). Event fields are flattened to the
/// top level and the current span (request id, route) rides along. Only the
/// first call installs a subscriber.
pub fn init_tracing(default_directives: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::registry()
        .with(filter(rust_log.as_deref(), default_directives))
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false),
        )
        .try_init();
}

fn filter(rust_log: Option<&str>, default_directives: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(default_directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
