//! Tracing subscriber setup.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter from `RUST_LOG`, falling back to `default_directives`.
pub fn env_filter(default_directives: &str) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directives),
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(default_directives: &str) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(default_directives)?)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test so nothing else in this binary races on RUST_LOG.
    #[test]
    fn test_env_filter_prefers_rust_log() {
        std::env::set_var("RUST_LOG", "da_monitor=trace");
        let filter = env_filter("info").unwrap();
        assert!(filter.to_string().contains("da_monitor=trace"));

        std::env::remove_var("RUST_LOG");
        let filter = env_filter("warn").unwrap();
        assert_eq!(filter.to_string(), "warn");

        assert!(env_filter("da_monitor=debug,da_rpc=trace").is_ok());
        assert!(env_filter("da_monitor=loud").is_err());
    }
}
