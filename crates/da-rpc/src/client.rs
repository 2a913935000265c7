//! JSON-RPC client for a Celestia node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use da_types::{
    Blob, ExtendedDataSquare, ExtendedHeader, GasPrice, Namespace, RawExtendedDataSquare,
    TypesError,
};

use crate::endpoint::Endpoints;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::subscription::{self, RpcHeaderSubscription};
use crate::RpcError;

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default capacity of the subscription queue.
const DEFAULT_SUBSCRIPTION_CAPACITY: usize = 16;

/// Connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Node RPC URL (`ws://`, `wss://`, `http://` or `https://`).
    pub url: String,
    /// Bearer token; `None` when the node runs with auth disabled.
    pub token: Option<String>,
    /// HTTP request timeout; also bounds subscription setup.
    pub request_timeout: Duration,
    /// Headers buffered between the socket reader and the consumer.
    pub subscription_capacity: usize,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            subscription_capacity: DEFAULT_SUBSCRIPTION_CAPACITY,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_subscription_capacity(mut self, capacity: usize) -> Self {
        self.subscription_capacity = capacity;
        self
    }
}

/// Node RPC client. Cheap to share behind an `Arc`; calls may run
/// concurrently.
pub struct NodeClient {
    http_client: reqwest::Client,
    endpoints: Endpoints,
    token: Option<String>,
    request_timeout: Duration,
    subscription_capacity: usize,
    request_id: AtomicU64,
}

impl NodeClient {
    /// Build a client. No request is sent until the first call.
    pub fn connect(config: ClientConfig) -> Result<Self, RpcError> {
        let endpoints = Endpoints::from_url(&config.url)?;
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(RpcError::HttpClientCreation)?;

        debug!(http = %endpoints.http, ws = %endpoints.ws, "Node client created");

        Ok(Self {
            http_client,
            endpoints,
            token: config.token,
            request_timeout: config.request_timeout,
            subscription_capacity: config.subscription_capacity,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Make a JSON-RPC call; a `null` result is returned as `None`.
    async fn call_nullable<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<Option<R>, RpcError> {
        let request = JsonRpcRequest::new(method, params, self.next_id());

        let mut builder = self.http_client.post(&self.endpoints.http).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let body = builder
            .send()
            .await
            .map_err(|source| RpcError::Http { method, source })?
            .bytes()
            .await
            .map_err(|source| RpcError::Http { method, source })?;

        let response: JsonRpcResponse<R> = serde_json::from_slice(&body)
            .map_err(|source| RpcError::Decode { method, source })?;

        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                method,
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }

    /// Make a JSON-RPC call that must produce a result.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<R, RpcError> {
        self.call_nullable(method, params)
            .await?
            .ok_or(RpcError::MissingResult { method })
    }

    /// header.GetByHeight - Header at `height`, waiting for it if needed.
    pub async fn header_get_by_height(&self, height: u64) -> Result<ExtendedHeader, RpcError> {
        self.call("header.GetByHeight", (height,)).await
    }

    /// header.Subscribe - Stream of new headers.
    ///
    /// Setup (connect plus confirmation) is bounded by the request timeout
    /// and abandoned when `cancel` fires.
    pub async fn header_subscribe(
        &self,
        cancel: CancellationToken,
    ) -> Result<RpcHeaderSubscription, RpcError> {
        subscription::subscribe_headers(
            &self.endpoints.ws,
            self.token.as_deref(),
            self.next_id(),
            self.subscription_capacity,
            self.request_timeout,
            cancel,
        )
        .await
    }

    /// blob.GetAll - Blobs at `height` in any of `namespaces`.
    ///
    /// An empty height is reported as an empty vector, whether the node
    /// answers `null` or a "blob: not found" error.
    pub async fn blob_get_all(
        &self,
        height: u64,
        namespaces: &[Namespace],
    ) -> Result<Vec<Blob>, RpcError> {
        match self
            .call_nullable::<_, Vec<Blob>>("blob.GetAll", (height, namespaces))
            .await
        {
            Ok(blobs) => Ok(blobs.unwrap_or_default()),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// blob.Submit - Submit blobs; returns the inclusion height.
    pub async fn blob_submit(&self, blobs: &[Blob], gas_price: GasPrice) -> Result<u64, RpcError> {
        self.call("blob.Submit", (blobs, gas_price)).await
    }

    /// share.GetEDS - Extended data square for the block of `header`.
    pub async fn share_get_eds(
        &self,
        header: &ExtendedHeader,
    ) -> Result<ExtendedDataSquare, RpcError> {
        const METHOD: &str = "share.GetEDS";
        let invalid = |source: TypesError| RpcError::Invalid {
            method: METHOD,
            source,
        };

        let raw: RawExtendedDataSquare = self.call(METHOD, (header,)).await?;
        let app_version = header.app_version().map_err(|e| invalid(e.into()))?;
        ExtendedDataSquare::from_raw(raw, app_version).map_err(|e| invalid(e.into()))
    }
}
