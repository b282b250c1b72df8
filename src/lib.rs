pub mod error;
pub mod service;

#[cfg(test)]
mod test_util;

pub use error::{Diagnostic, Error, Severity};
pub use service::provider::{ConfiguredProvider, Provider, Request, Response};

/// Logs are written on stderr, stdout being reserved to the host responses.
pub fn init_logs(
    directive: &str,
    color: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(color)
                .with_writer(std::io::stderr),
        )
        .try_init()
}

#[cfg(test)]
pub(crate) fn try_init_logs() {
    let level = std::env::var("LOG").unwrap_or_else(|_| "sparkpost_provider=debug".into());
    let _ = init_logs(&level, true);
}
