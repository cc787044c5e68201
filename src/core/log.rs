use tracing_subscriber::{EnvFilter, fmt};

/// Directive used when `RUST_LOG` is unset. Only this crate logs with `--verbose`.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "fxview=debug" } else { "off" }
}

fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber, writing to stderr so table output on
/// stdout stays clean.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    fmt()
        .with_env_filter(build_filter(rust_log.as_deref(), verbose))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
