//! Command-line arguments.

use std::time::Duration;

use clap::Parser;
use da_types::{blob_namespace, GasPrice, Namespace};

use crate::config::{MonitorConfig, Variant, DEFAULT_URL};
use crate::domain::MonitorError;

/// Celestia data availability monitor
#[derive(Parser, Debug)]
#[command(name = "da-monitor")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Node RPC endpoint (ws:// or http://, the other is derived)
    #[arg(long, env = "DA_MONITOR_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Node API auth token
    #[arg(long, env = "DA_MONITOR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Deployment variant
    #[arg(long, env = "DA_MONITOR_VARIANT", value_enum, default_value_t = Variant::Celestia)]
    pub variant: Variant,

    /// Namespace id in hex, up to 10 bytes (variant default if unset)
    #[arg(long, env = "DA_MONITOR_NAMESPACE")]
    pub namespace: Option<String>,

    /// Submit a blob at startup (variant default if unset)
    #[arg(long)]
    pub bootstrap: Option<bool>,

    /// Submit a blob for every header (variant default if unset)
    #[arg(long)]
    pub submit_per_header: Option<bool>,

    /// Filler bytes appended to submitted payloads
    #[arg(long, default_value = "0")]
    pub padding_bytes: usize,

    /// Gas price for submissions (node default if unset)
    #[arg(long)]
    pub gas_price: Option<f64>,

    /// RPC request timeout in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    /// Headers buffered ahead of the event loop
    #[arg(long, default_value = "16")]
    pub queue_capacity: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Resolve arguments against the variant defaults.
    pub fn into_config(self) -> Result<MonitorConfig, MonitorError> {
        let defaults = MonitorConfig::for_variant(self.variant)?;

        let namespace = match self.namespace.as_deref() {
            Some(hex_id) => parse_namespace(hex_id)?,
            None => defaults.namespace,
        };

        let config = MonitorConfig {
            url: self.url,
            token: self.token.filter(|t| !t.is_empty()),
            namespace,
            bootstrap: self.bootstrap.unwrap_or(defaults.bootstrap),
            submit_per_header: self.submit_per_header.unwrap_or(defaults.submit_per_header),
            padding_bytes: self.padding_bytes,
            gas_price: self.gas_price.map(GasPrice).unwrap_or(defaults.gas_price),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            queue_capacity: self.queue_capacity,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a hex namespace id such as `c0de` or `0xDEADBEEF`.
pub fn parse_namespace(hex_id: &str) -> Result<Namespace, MonitorError> {
    let trimmed = hex_id
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    let padded = if trimmed.len() % 2 == 1 {
        format!("0{trimmed}")
    } else {
        trimmed.to_string()
    };
    let id = hex::decode(&padded)
        .map_err(|e| MonitorError::Config(format!("namespace {hex_id:?} is not hex: {e}")))?;
    blob_namespace(&id)
        .map_err(|e| MonitorError::Config(format!("namespace {hex_id:?}: {e}")))
}
