//! Offline replay of a recorded execution through the tracer.
//!
//! A recording holds, for every instruction, the operand stack and memory as
//! the engine saw them, so traces can be rebuilt without a running VM.

use alloy_primitives::{Address, Bytes, U256};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::models::common::{ChainContext, Precompiles};
use crate::models::errors::TracerError;
use crate::models::opcodes::OpCode;
use crate::tracer::accessors::{Memory, OperandStack, StateReader};
use crate::tracer::{ExecutionStart, ParityTracer, Step};

/// Operand stack ordered bottom to top.
#[derive(Debug, Clone, Copy)]
pub struct StackSnapshot<'a>(&'a [U256]);

impl<'a> StackSnapshot<'a> {
    pub fn new(words: &'a [U256]) -> Self {
        Self(words)
    }
}

impl OperandStack for StackSnapshot<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn back(&self, n: usize) -> U256 {
        self.0[self.0.len() - 1 - n]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MemorySnapshot<'a>(&'a [u8]);

impl<'a> MemorySnapshot<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

impl Memory for MemorySnapshot<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn slice(&self, offset: usize, length: usize) -> &[u8] {
        &self.0[offset..offset + length]
    }
}

/// Balances and code of the accounts touched by the recording.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordedState {
    pub balances: HashMap<Address, U256>,
    pub code: HashMap<Address, Bytes>,
}

impl StateReader for RecordedState {
    fn balance(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    fn code(&self, address: &Address) -> Bytes {
        self.code.get(address).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordedStart {
    pub from: Address,
    pub to: Address,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub input: Bytes,
    pub gas: u64,
    #[serde(default)]
    pub value: U256,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordedStep {
    #[serde(default)]
    pub pc: u64,
    pub op: OpCode,
    pub gas: u64,
    #[serde(default)]
    pub cost: u64,
    pub contract: Address,
    pub depth: usize,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stack: Vec<U256>,
    #[serde(default)]
    pub memory: Bytes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEnd {
    #[serde(default)]
    pub output: Bytes,
    pub gas_used: u64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordedExecution {
    pub context: ChainContext,
    pub start: RecordedStart,
    #[serde(default)]
    pub steps: Vec<RecordedStep>,
    pub end: RecordedEnd,
    #[serde(default)]
    pub state: RecordedState,
}

/// Drives a fresh tracer through the whole recording. Out-of-range reads are
/// logged and skipped; lifecycle errors abort the replay.
pub fn replay(
    execution: &RecordedExecution,
    precompiles: Precompiles,
) -> Result<ParityTracer, TracerError> {
    let mut tracer = ParityTracer::new(precompiles);
    let start = &execution.start;
    tracer.start(
        execution.context,
        ExecutionStart {
            from: start.from,
            to: start.to,
            create: start.create,
            input: start.input.clone(),
            gas: start.gas,
            value: start.value,
        },
    )?;

    for recorded in &execution.steps {
        let stack = StackSnapshot::new(&recorded.stack);
        let memory = MemorySnapshot::new(&recorded.memory);
        let step = Step {
            pc: recorded.pc,
            op: recorded.op,
            gas: recorded.gas,
            cost: recorded.cost,
            stack: &stack,
            memory: &memory,
            state: &execution.state,
            contract: recorded.contract,
            depth: recorded.depth,
            error: recorded.error.as_deref(),
        };
        match tracer.step(&step) {
            Ok(()) => {}
            Err(TracerError::Access(error)) => {
                debug!("Step at pc {} read out of range: {}", recorded.pc, error)
            }
            Err(error) => return Err(error),
        }
    }

    let end = &execution.end;
    tracer.end(end.output.clone(), end.gas_used, end.error.as_deref())?;
    info!(
        "Replayed {} steps of transaction {}",
        execution.steps.len(),
        execution.context.transaction_hash
    );
    Ok(tracer)
}
