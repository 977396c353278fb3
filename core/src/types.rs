//! Wire payloads shared by every resource.
//!
//! # Design
//! Entities and search criteria are opaque to the client: anything that
//! serde can move to and from JSON works. The only payload with a fixed shape
//! is the update envelope, which pairs the search criteria with the new
//! entity state.

use serde::{Deserialize, Serialize};

/// Request payload for an update: the key locating the stored entity and
/// the values to merge onto it.
///
/// Serialized as `{"Key": ..., "Value": ...}`, the key/value pair shape the
/// dispatcher binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyedPayload<K, T> {
    pub key: K,
    pub value: T,
}

impl<K, T> KeyedPayload<K, T> {
    pub fn new(key: K, value: T) -> Self {
        Self { key, value }
    }
}
