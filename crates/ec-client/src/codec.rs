//! Wire codec for whole domain objects.
//!
//! Building models, parameter sets and calculation definitions travel as
//! opaque serialized bodies (`application/octet-stream`), not as structured
//! endpoint JSON. The format is an implementation detail shared with the
//! server; callers only see bytes. Currently compact serde-JSON bytes —
//! changing the format means changing this module and nothing else.

use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn to_wire<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

pub fn from_wire<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(bytes)
}
