//! # Namespace
//!
//! A namespace is 1 version byte followed by a 28-byte id. Version-0 ids
//! reserve their first 18 bytes (always zero) and leave 10 bytes for users.

use celestia_types::nmt::Namespace;

use crate::TypesError;

/// User-controlled bytes of a version-0 id.
const NAMESPACE_VERSION_ZERO_ID_SIZE: usize = 10;

const NAMESPACE_VERSION_ZERO: u8 = 0;

/// Build a version-0 namespace that may carry user blobs.
///
/// Shorter ids are left-padded with zeros, so `[0xC0, 0xDE]` becomes
/// `00..00C0DE`. Reserved namespaces are rejected.
pub fn blob_namespace(id: &[u8]) -> Result<Namespace, TypesError> {
    let namespace = Namespace::new_v0(id)?;
    namespace.validate_for_blob()?;
    Ok(namespace)
}

/// Blob rules and log formatting for [`Namespace`].
pub trait NamespaceExt {
    /// Reject namespaces that cannot carry user blobs.
    fn validate_for_blob(&self) -> Result<(), TypesError>;

    /// Short form for logs: the user id without leading zero bytes, as `0x..`.
    fn short_hex(&self) -> String;
}

impl NamespaceExt for Namespace {
    fn validate_for_blob(&self) -> Result<(), TypesError> {
        if self.version() != NAMESPACE_VERSION_ZERO {
            return Err(TypesError::UnsupportedNamespaceVersion(self.version()));
        }
        if self.is_reserved() {
            return Err(TypesError::ReservedNamespace(self.short_hex()));
        }
        Ok(())
    }

    fn short_hex(&self) -> String {
        let bytes = self.as_bytes();
        let id = &bytes[bytes.len() - NAMESPACE_VERSION_ZERO_ID_SIZE..];
        let first = id.iter().position(|b| *b != 0).unwrap_or(id.len() - 1);
        format!("0x{}", hex::encode_upper(&id[first..]))
    }
}
