//! Serializers for the hex encodings of the parity trace format.

use alloy_primitives::{hex, Address, Bytes, B256};
use serde::Serializer;
use std::fmt::LowerHex;

/// Integers as `0x`-prefixed minimal lowercase hex, `0x0` for zero.
pub fn quantity<T, S>(x: &T, s: S) -> Result<S::Ok, S::Error>
where
    T: LowerHex,
    S: Serializer,
{
    s.serialize_str(&format!("0x{x:x}"))
}

pub fn bytes<S: Serializer>(x: &Bytes, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode_prefixed(x))
}

pub fn address<S: Serializer>(x: &Address, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode_prefixed(x.as_slice()))
}

pub fn hash<S: Serializer>(x: &B256, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode_prefixed(x.as_slice()))
}
