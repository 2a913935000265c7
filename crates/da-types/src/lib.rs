//! # DA Types Crate
//!
//! Value types exchanged with a Celestia data-availability node.
//!
//! ## Contents
//!
//! - `Namespace`, `Blob`, `Commitment`, `ExtendedHeader`,
//!   `ExtendedDataSquare` - re-exported from `celestia-types`
//! - `namespace` - rules for namespaces that may carry user blobs
//! - `blob` - blob construction at the monitor's app version, `GasPrice`
//!
//! Wire encoding follows the node's JSON and is handled by the
//! `celestia-types` serde impls.

pub mod blob;
pub mod errors;
pub mod namespace;

pub use celestia_types::eds::RawExtendedDataSquare;
pub use celestia_types::hash::Hash as BlockHash;
pub use celestia_types::nmt::Namespace;
pub use celestia_types::{Blob, Commitment, ExtendedDataSquare, ExtendedHeader};

pub use blob::{build_blob, commitment_hex, GasPrice, APP_VERSION};
pub use errors::TypesError;
pub use namespace::{blob_namespace, NamespaceExt};
