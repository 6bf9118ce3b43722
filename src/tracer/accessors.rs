use alloy_primitives::{Address, Bytes, U256};
use tracing::warn;

use crate::models::errors::AccessError;

/// Read view of the engine's operand stack during one step.
pub trait OperandStack {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `n`th slot from the top, `0` being the top. Callers guarantee
    /// `n < len()`.
    fn back(&self, n: usize) -> U256;
}

/// Read view of the engine's linear memory during one step.
pub trait Memory {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Callers guarantee `offset + length <= len()`.
    fn slice(&self, offset: usize, length: usize) -> &[u8];
}

/// World-state lookups the tracer needs for self-destructs and creations.
pub trait StateReader {
    fn balance(&self, address: &Address) -> U256;

    fn code(&self, address: &Address) -> Bytes;
}

/// Bounds-checked reads for a single step.
///
/// Out-of-range reads yield a zero word or an empty payload and the first
/// failure is kept, so the step can finish and report it afterwards.
pub(crate) struct StepReader<'a> {
    stack: &'a dyn OperandStack,
    memory: &'a dyn Memory,
    error: Option<AccessError>,
}

impl<'a> StepReader<'a> {
    pub(crate) fn new(stack: &'a dyn OperandStack, memory: &'a dyn Memory) -> Self {
        Self {
            stack,
            memory,
            error: None,
        }
    }

    pub(crate) fn peek(&mut self, depth: usize) -> U256 {
        let size = self.stack.len();
        if depth >= size {
            self.record(AccessError::StackUnderflow { depth, size });
            return U256::ZERO;
        }
        self.stack.back(depth)
    }

    pub(crate) fn copy(&mut self, offset: U256, length: U256) -> Bytes {
        if length.is_zero() {
            return Bytes::new();
        }
        let size = self.memory.len();
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let length = usize::try_from(length).unwrap_or(usize::MAX);
        match offset.checked_add(length) {
            Some(end) if end <= size => Bytes::copy_from_slice(self.memory.slice(offset, length)),
            _ => {
                self.record(AccessError::MemoryOutOfRange {
                    offset,
                    length,
                    size,
                });
                Bytes::new()
            }
        }
    }

    pub(crate) fn finish(self) -> Result<(), AccessError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record(&mut self, error: AccessError) {
        warn!("{}", error);
        self.error.get_or_insert(error);
    }
}
