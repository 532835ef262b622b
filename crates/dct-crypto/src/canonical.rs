//! RFC 8785-style canonical JSON.
//!
//! `serde_json::Map` is backed by `BTreeMap` unless the `preserve_order`
//! feature is enabled, which this workspace never turns on — so object
//! keys already serialize in lexicographic order. Canonicalization here
//! is therefore: serialize to a `Value` (normalizing key order as a
//! side effect of going through the map), then emit compact JSON with
//! no insignificant whitespace. This covers the invariant every signer
//! in this workspace actually depends on (two structurally-equal values
//! produce byte-identical output); it does not implement every last
//! corner of RFC 8785 (e.g. the exact ECMAScript number-to-string
//! algorithm for exotic floats), which is acceptable because every
//! signed value in this crate's object model uses integers, strings,
//! bools, and nested objects/arrays — never ambiguous floats.

use crate::error::{CryptoError, Result};
use serde::Serialize;
use serde_json::Value;

/// Canonicalize a serializable value to its signing bytes.
pub fn canonicalize<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let v = serde_json::to_value(value)
        .map_err(|e| CryptoError::Canonicalization(e.to_string()))?;
    canonicalize_value(&v)
}

/// Canonicalize an already-constructed `Value`.
pub fn canonicalize_value(value: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CryptoError::Canonicalization(e.to_string()))
}
