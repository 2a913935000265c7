//! # Blob
//!
//! Blob construction for the monitor and the submission fee policy.

use celestia_types::nmt::Namespace;
use celestia_types::{AppVersion, Blob, Commitment};
use serde::{Deserialize, Serialize};

use crate::namespace::NamespaceExt;
use crate::TypesError;

/// App version used to compute commitments of locally built blobs.
pub const APP_VERSION: AppVersion = AppVersion::V3;

/// Build a share-version-0 blob and compute its commitment.
pub fn build_blob(namespace: Namespace, data: Vec<u8>) -> Result<Blob, TypesError> {
    namespace.validate_for_blob()?;
    if data.is_empty() {
        return Err(TypesError::EmptyBlob);
    }
    Ok(Blob::new(namespace, data, APP_VERSION)?)
}

/// Lowercase hex of a commitment, for logs and error messages.
pub fn commitment_hex(commitment: &Commitment) -> String {
    hex::encode(commitment.hash())
}

/// Fee policy for `blob.Submit`. Negative means "let the node decide".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GasPrice(pub f64);

impl GasPrice {
    pub const NODE_DEFAULT: Self = Self(-1.0);

    pub fn is_node_default(&self) -> bool {
        self.0 < 0.0
    }
}

impl Default for GasPrice {
    fn default() -> Self {
        Self::NODE_DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_namespace;

    fn ns() -> Namespace {
        blob_namespace(&[0xC0, 0xDE]).unwrap()
    }

    #[test]
    fn test_built_blob_has_valid_commitment() {
        let blob = build_blob(ns(), b"Hello, World!".to_vec()).unwrap();
        assert_eq!(blob.share_version, 0);
        assert_eq!(blob.index, None);
        assert!(blob.validate(APP_VERSION).is_ok());
    }

    #[test]
    fn test_tampered_blob_fails_validation() {
        let mut blob = build_blob(ns(), b"Hello, World!".to_vec()).unwrap();
        blob.data = b"Goodbye".to_vec();
        assert!(blob.validate(APP_VERSION).is_err());
    }

    #[test]
    fn test_empty_blob_rejected() {
        assert!(matches!(
            build_blob(ns(), Vec::new()),
            Err(TypesError::EmptyBlob)
        ));
    }

    #[test]
    fn test_reserved_namespace_rejected() {
        let reserved = Namespace::const_v0([0; 10]);
        assert!(matches!(
            build_blob(reserved, b"hi".to_vec()),
            Err(TypesError::ReservedNamespace(_))
        ));
    }

    #[test]
    fn test_node_json_decodes() {
        let blob = build_blob(ns(), b"hi".to_vec()).unwrap();
        let mut value = serde_json::to_value(&blob).unwrap();
        value["index"] = serde_json::json!(12);
        let decoded: Blob = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.commitment, blob.commitment);
        assert_eq!(decoded.data, b"hi");
        assert_eq!(decoded.index, Some(12));
    }

    #[test]
    fn test_commitment_hex_is_lowercase() {
        assert_eq!(commitment_hex(&Commitment::new([0xAB; 32])), "ab".repeat(32));
    }

    #[test]
    fn test_gas_price_default_is_node_choice() {
        assert!(GasPrice::default().is_node_default());
        assert_eq!(serde_json::to_string(&GasPrice(0.002)).unwrap(), "0.002");
    }
}
