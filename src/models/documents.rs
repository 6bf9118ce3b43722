//! Parity (`trace_*` RPC) trace documents.
//!
//! Field order and hex encodings are part of the output contract, so every
//! struct here serializes its fields in declaration order.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::Serialize;

use crate::utils::hex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Call,
    Create,
    Suicide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAction {
    #[serde(serialize_with = "hex::address")]
    pub from: Address,
    #[serde(serialize_with = "hex::quantity")]
    pub gas: u64,
    #[serde(serialize_with = "hex::bytes")]
    pub init: Bytes,
    #[serde(serialize_with = "hex::quantity")]
    pub value: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallAction {
    pub call_type: &'static str,
    #[serde(serialize_with = "hex::quantity")]
    pub value: U256,
    #[serde(serialize_with = "hex::address")]
    pub to: Address,
    #[serde(serialize_with = "hex::quantity")]
    pub gas: u64,
    #[serde(serialize_with = "hex::address")]
    pub from: Address,
    #[serde(serialize_with = "hex::bytes")]
    pub input: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuicideAction {
    #[serde(serialize_with = "hex::address")]
    pub refund_address: Address,
    #[serde(serialize_with = "hex::quantity")]
    pub balance: U256,
    #[serde(serialize_with = "hex::address")]
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Action {
    Create(CreateAction),
    Call(CallAction),
    Suicide(SuicideAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutput {
    #[serde(serialize_with = "hex::address")]
    pub address: Address,
    #[serde(serialize_with = "hex::bytes")]
    pub code: Bytes,
    #[serde(serialize_with = "hex::quantity")]
    pub gas_used: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOutput {
    #[serde(serialize_with = "hex::bytes")]
    pub output: Bytes,
    #[serde(serialize_with = "hex::quantity")]
    pub gas_used: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TraceOutput {
    Create(CreateOutput),
    Call(CallOutput),
}

/// Either the error pair or the result of a frame, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Failed {
        error: &'static str,
        #[serde(serialize_with = "hex::bytes")]
        revert: Bytes,
    },
    Completed {
        result: Option<TraceOutput>,
    },
}

/// One frame of a transaction trace, self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDocument {
    pub block_number: u64,
    #[serde(serialize_with = "hex::hash")]
    pub block_hash: B256,
    #[serde(serialize_with = "hex::hash")]
    pub transaction_hash: B256,
    pub transaction_position: u64,
    pub subtraces: usize,
    pub trace_address: Vec<usize>,
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    pub action: Action,
    #[serde(flatten)]
    pub outcome: Outcome,
}
