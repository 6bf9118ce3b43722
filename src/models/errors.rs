use thiserror::Error;

use crate::models::opcodes::OpCode;

/// Out-of-range reads from the engine's operand stack or memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("tracer bug: stack underflow, peeked slot {depth} of {size}")]
    StackUnderflow { depth: usize, size: usize },
    #[error("tracer bug: memory range {offset}+{length} exceeds memory size {size}")]
    MemoryOutOfRange { offset: usize, length: usize, size: usize },
}

/// Terminal error of a single frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("execution reverted")]
    ExecutionReverted,
    #[error("internal failure")]
    InternalFailure,
    #[error("{0}")]
    Fault(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TracerError {
    #[error("Tracer has not been started")]
    NotStarted,
    #[error("Tracer was already started for this execution")]
    AlreadyStarted,
    #[error("Tracer already received the end of execution")]
    Finished,
    #[error("No open frame left on the call stack")]
    NoOpenFrame,
    #[error(transparent)]
    Access(#[from] AccessError),
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace is not finished: end of execution was never reported")]
    NotFinished,
    #[error("Tracer internal failure: unrecognized operation {0:?}")]
    UnrecognizedOperation(OpCode),
    #[error("Failed to encode trace document: {0}")]
    Json(#[from] serde_json::Error),
}
