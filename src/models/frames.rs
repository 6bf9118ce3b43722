use alloy_primitives::{Address, Bytes, U256};

use crate::models::errors::FrameError;
use crate::models::opcodes::CallKind;

/// Memory window the caller reserved for a call's return data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputWindow {
    pub offset: U256,
    pub length: U256,
}

/// One call, contract creation or self-destruct, with its sub-calls in
/// execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub kind: CallKind,
    pub from: Address,
    /// Unknown for creations until the created address is read back.
    pub to: Option<Address>,
    pub input: Bytes,
    pub output: Bytes,
    /// Absent for DELEGATECALL and STATICCALL.
    pub value: Option<U256>,
    /// Gas available when the triggering instruction ran.
    pub gas_in: u64,
    /// Gas charged by the triggering instruction.
    pub gas_cost: u64,
    /// Gas the callee started with, recorded on its first instruction.
    pub gas: Option<u64>,
    pub gas_used: u64,
    pub output_window: Option<OutputWindow>,
    pub error: Option<FrameError>,
    /// Return data of a REVERT, if the frame ended with one.
    pub revert: Option<Bytes>,
    pub calls: Vec<CallFrame>,
}

impl CallFrame {
    pub fn new(kind: CallKind, from: Address) -> Self {
        Self {
            kind,
            from,
            to: None,
            input: Bytes::new(),
            output: Bytes::new(),
            value: None,
            gas_in: 0,
            gas_cost: 0,
            gas: None,
            gas_used: 0,
            output_window: None,
            error: None,
            revert: None,
            calls: Vec::new(),
        }
    }

    pub fn push(&mut self, call: CallFrame) {
        self.calls.push(call);
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Number of frames in this subtree, this one included.
    pub fn frame_count(&self) -> usize {
        1 + self.calls.iter().map(CallFrame::frame_count).sum::<usize>()
    }
}
