//! Blob payload production.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use da_types::{build_blob, Blob, Namespace, TypesError};

/// Source of blobs for monitoring submissions.
pub trait BlobProducer: Send + Sync {
    /// Build the next blob for `namespace`.
    fn produce(&self, namespace: Namespace) -> Result<Blob, TypesError>;
}

/// Produces `Hello, World! <timestamp> #<seq>` payloads, optionally padded.
///
/// The timestamp and sequence number make every payload distinct, so two
/// submissions never share a commitment.
#[derive(Debug, Default)]
pub struct GreetingBlobProducer {
    padding_bytes: usize,
    sequence: AtomicU64,
}

impl GreetingBlobProducer {
    pub fn new(padding_bytes: usize) -> Self {
        Self {
            padding_bytes,
            sequence: AtomicU64::new(0),
        }
    }

    /// Payload for sequence number `seq`.
    pub fn payload(&self, seq: u64) -> Vec<u8> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let mut data = format!("Hello, World! {now} #{seq}").into_bytes();
        data.resize(data.len() + self.padding_bytes, b'x');
        data
    }
}

impl BlobProducer for GreetingBlobProducer {
    fn produce(&self, namespace: Namespace) -> Result<Blob, TypesError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        build_blob(namespace, self.payload(seq))
    }
}

/// Always produces the same payload.
#[derive(Debug, Clone)]
pub struct FixedBlobProducer {
    data: Vec<u8>,
}

impl FixedBlobProducer {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl BlobProducer for FixedBlobProducer {
    fn produce(&self, namespace: Namespace) -> Result<Blob, TypesError> {
        build_blob(namespace, self.data.clone())
    }
}
