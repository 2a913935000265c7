//! # Monitor Configuration
//!
//! Resolved settings consumed by the monitor core.

use std::time::Duration;

use clap::ValueEnum;
use da_types::{blob_namespace, GasPrice, Namespace, NamespaceExt};

use crate::domain::MonitorError;

/// Default node endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:26658";

const TEST_NAMESPACE: Namespace = Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0xC0, 0xDE]);

/// Deployment flavour. Selects the default namespace and which submissions run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Plain Celestia node: bootstrap and per-header submissions enabled.
    #[default]
    Celestia,
    /// Rollkit deployment: read-only monitoring.
    Rollkit,
}

impl Variant {
    /// Raw namespace id used when none is configured.
    pub fn default_namespace_id(&self) -> &'static [u8] {
        match self {
            Variant::Celestia => &[0xC0, 0xDE],
            Variant::Rollkit => &[0xDE, 0xAD, 0xBE, 0xEF],
        }
    }

    pub fn bootstrap(&self) -> bool {
        matches!(self, Variant::Celestia)
    }

    pub fn submit_per_header(&self) -> bool {
        matches!(self, Variant::Celestia)
    }
}

/// Monitor configuration.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Node RPC endpoint.
    pub url: String,

    /// Bearer token for the node API.
    pub token: Option<String>,

    pub variant: Variant,

    /// Namespace monitored and submitted to.
    pub namespace: Namespace,

    /// Submit and verify one blob at startup.
    pub bootstrap: bool,

    /// Submit and verify one blob per received header.
    pub submit_per_header: bool,

    /// Filler bytes appended to each submitted payload.
    pub padding_bytes: usize,

    pub gas_price: GasPrice,

    /// Per-request timeout of the RPC client.
    pub request_timeout: Duration,

    /// Headers buffered between the subscription and the event loop.
    pub queue_capacity: usize,
}

impl MonitorConfig {
    /// Configuration with the defaults of `variant`.
    pub fn for_variant(variant: Variant) -> Result<Self, MonitorError> {
        let namespace = blob_namespace(variant.default_namespace_id())
            .map_err(|e| MonitorError::Config(e.to_string()))?;
        Ok(Self {
            url: DEFAULT_URL.to_string(),
            token: None,
            variant,
            namespace,
            bootstrap: variant.bootstrap(),
            submit_per_header: variant.submit_per_header(),
            padding_bytes: 0,
            gas_price: GasPrice::NODE_DEFAULT,
            request_timeout: Duration::from_secs(30),
            queue_capacity: 16,
        })
    }

    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            url: "ws://127.0.0.1:26658".to_string(),
            token: None,
            variant: Variant::Celestia,
            namespace: TEST_NAMESPACE,
            bootstrap: true,
            submit_per_header: true,
            padding_bytes: 0,
            gas_price: GasPrice::NODE_DEFAULT,
            request_timeout: Duration::from_secs(5),
            queue_capacity: 4,
        }
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.queue_capacity == 0 {
            return Err(MonitorError::Config("queue capacity must be at least 1".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(MonitorError::Config("request timeout must be non-zero".into()));
        }
        self.namespace
            .validate_for_blob()
            .map_err(|e| MonitorError::Config(e.to_string()))
    }
}
