pub mod accessors;
pub mod format;
pub mod geth;
pub mod serialize;

use alloy_primitives::{Address, Bytes, U256};
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::models::common::{ChainContext, Precompiles};
use crate::models::documents::TraceDocument;
use crate::models::errors::{FrameError, TraceError, TracerError};
use crate::models::frames::{CallFrame, OutputWindow};
use crate::models::opcodes::{CallKind, OpCode};
use crate::tracer::accessors::{Memory, OperandStack, StateReader, StepReader};

/// Arguments of the outermost call or creation of a transaction.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStart {
    pub from: Address,
    pub to: Address,
    pub create: bool,
    pub input: Bytes,
    pub gas: u64,
    pub value: U256,
}

/// One instruction as reported by the engine, right before it executes.
///
/// The stack, memory and state views are only borrowed for this step.
pub struct Step<'a> {
    pub pc: u64,
    pub op: OpCode,
    /// Gas remaining before the instruction.
    pub gas: u64,
    pub cost: u64,
    pub stack: &'a dyn OperandStack,
    pub memory: &'a dyn Memory,
    pub state: &'a dyn StateReader,
    /// Address of the executing contract.
    pub contract: Address,
    pub depth: usize,
    pub error: Option<&'a str>,
}

/// A completed trace: the root frame and the identifiers of its transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedTrace {
    pub context: ChainContext,
    pub root: CallFrame,
}

impl FinishedTrace {
    pub fn documents(&self) -> Vec<TraceDocument> {
        serialize::trace_documents(&self.context, &self.root)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Descent {
    Settled,
    /// A call or creation was just pushed and its callee has not run yet.
    AwaitingEntryGas,
}

#[derive(Debug)]
struct ActiveTrace {
    context: ChainContext,
    /// Frames not yet returned, the root at index 0.
    open: Vec<CallFrame>,
    descent: Descent,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Active(ActiveTrace),
    Done(FinishedTrace),
}

impl Phase {
    fn active_mut(&mut self) -> Result<&mut ActiveTrace, TracerError> {
        match self {
            Self::Active(trace) => Ok(trace),
            Self::Idle => Err(TracerError::NotStarted),
            Self::Done(_) => Err(TracerError::Finished),
        }
    }
}

/// Rebuilds the call tree of a single transaction from its instruction
/// stream and renders it as parity `trace_*` documents.
///
/// One instance traces exactly one execution.
#[derive(Debug)]
pub struct ParityTracer {
    precompiles: Precompiles,
    phase: Phase,
}

impl Default for ParityTracer {
    fn default() -> Self {
        Self::new(Precompiles::default())
    }
}

impl ParityTracer {
    pub fn new(precompiles: Precompiles) -> Self {
        Self {
            precompiles,
            phase: Phase::Idle,
        }
    }

    pub fn start(
        &mut self,
        context: ChainContext,
        start: ExecutionStart,
    ) -> Result<(), TracerError> {
        match self.phase {
            Phase::Idle => {}
            Phase::Active(_) => return Err(TracerError::AlreadyStarted),
            Phase::Done(_) => return Err(TracerError::Finished),
        }

        let kind = if start.create {
            CallKind::Create
        } else {
            CallKind::Call
        };
        let mut root = CallFrame::new(kind, start.from);
        root.to = Some(start.to);
        root.input = start.input;
        root.gas = Some(start.gas);
        root.value = Some(start.value);

        debug!(
            "Tracing transaction {} at position {}",
            context.transaction_hash, context.transaction_position
        );
        self.phase = Phase::Active(ActiveTrace {
            context,
            open: vec![root],
            descent: Descent::Settled,
        });
        Ok(())
    }

    /// Processes one instruction. A step carrying an error is handled as a
    /// fault. Out-of-range stack or memory reads do not stop the step; the
    /// first one is returned once the step has been applied.
    pub fn step(&mut self, step: &Step<'_>) -> Result<(), TracerError> {
        if let Some(error) = step.error {
            return self.fault(step, error);
        }
        let trace = self.phase.active_mut()?;
        let mut reader = StepReader::new(step.stack, step.memory);
        trace.apply(step, &mut reader, &self.precompiles)?;
        reader.finish().map_err(TracerError::from)
    }

    /// Marks the innermost open frame as failed with `error` and closes it.
    /// Repeated faults for an already failed frame are ignored.
    pub fn fault(&mut self, step: &Step<'_>, error: &str) -> Result<(), TracerError> {
        self.phase.active_mut()?.fault(step.gas, error)
    }

    pub fn end(
        &mut self,
        output: Bytes,
        gas_used: u64,
        error: Option<&str>,
    ) -> Result<(), TracerError> {
        let trace = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Active(trace) => trace,
            Phase::Idle => return Err(TracerError::NotStarted),
            done @ Phase::Done(_) => {
                self.phase = done;
                return Err(TracerError::Finished);
            }
        };

        let ActiveTrace {
            context, mut open, ..
        } = trace;
        if open.len() > 1 {
            warn!(
                "Discarding {} frames still open at end of transaction {}",
                open.len() - 1,
                context.transaction_hash
            );
            open.truncate(1);
        }
        let mut root = open.pop().ok_or(TracerError::NoOpenFrame)?;
        root.output = output;
        root.gas_used = gas_used;
        if let Some(error) = error {
            root.error = Some(FrameError::Fault(error.to_string()));
        }

        self.phase = Phase::Done(FinishedTrace { context, root });
        Ok(())
    }

    /// The completed trace, once the end of execution was reported.
    pub fn finished(&self) -> Result<&FinishedTrace, TraceError> {
        match &self.phase {
            Phase::Done(trace) => Ok(trace),
            _ => Err(TraceError::NotFinished),
        }
    }

    pub fn into_finished(self) -> Result<FinishedTrace, TraceError> {
        match self.phase {
            Phase::Done(trace) => Ok(trace),
            _ => Err(TraceError::NotFinished),
        }
    }

    /// Renders the trace as parity documents in depth-first order.
    pub fn finalize(&self) -> Result<Vec<Box<RawValue>>, TraceError> {
        serialize::encode_documents(&self.finished()?.documents())
    }

    /// Number of frames currently open, the root included.
    pub fn open_frames(&self) -> usize {
        match &self.phase {
            Phase::Active(trace) => trace.open.len(),
            _ => 0,
        }
    }
}

impl ActiveTrace {
    fn apply(
        &mut self,
        step: &Step<'_>,
        reader: &mut StepReader<'_>,
        precompiles: &Precompiles,
    ) -> Result<(), TracerError> {
        let kind = CallKind::try_from(step.op).ok();

        if !kind.is_some_and(CallKind::descends) {
            self.record_entry_gas(step);
        }
        self.detect_return(step, reader)?;

        match kind {
            Some(CallKind::SelfDestruct) => self.self_destruct(step, reader)?,
            Some(kind) if kind.is_create() => self.enter_create(kind, step, reader),
            Some(kind) => self.enter_call(kind, step, reader, precompiles),
            None if step.op == OpCode::Revert => self.revert(reader)?,
            None => {}
        }
        Ok(())
    }

    /// The first instruction after a descent runs inside the callee; its gas
    /// is what the callee started with.
    fn record_entry_gas(&mut self, step: &Step<'_>) {
        if self.descent == Descent::Settled {
            return;
        }
        self.descent = Descent::Settled;
        // A call that failed before descending never reaches the new depth.
        if step.depth >= self.open.len() {
            if let Some(frame) = self.open.last_mut() {
                frame.gas = Some(step.gas);
            }
        }
    }

    /// Depth dropping back to the caller's level means the innermost frame
    /// returned. The operand on top is the call's success flag or the created
    /// address.
    fn detect_return(
        &mut self,
        step: &Step<'_>,
        reader: &mut StepReader<'_>,
    ) -> Result<(), TracerError> {
        if self.open.len() < 2 || step.depth + 1 != self.open.len() {
            return Ok(());
        }
        let mut frame = self.open.pop().ok_or(TracerError::NoOpenFrame)?;
        let status = reader.peek(0);

        if frame.kind.is_create() {
            frame.gas_used = frame
                .gas_in
                .wrapping_sub(frame.gas_cost)
                .wrapping_sub(step.gas);
            if !status.is_zero() {
                let created = word_to_address(status);
                frame.output = step.state.code(&created);
                frame.to = Some(created);
            } else if frame.error.is_none() {
                frame.error = Some(FrameError::InternalFailure);
            }
        } else {
            if let Some(entry_gas) = frame.gas {
                frame.gas_used = frame
                    .gas_in
                    .wrapping_sub(frame.gas_cost)
                    .wrapping_add(entry_gas)
                    .wrapping_sub(step.gas);
            }
            if !status.is_zero() {
                let window = frame.output_window.unwrap_or_default();
                frame.output = reader.copy(window.offset, window.length);
            } else if frame.error.is_none() {
                frame.error = Some(FrameError::InternalFailure);
            }
        }

        debug!(
            "Closed {} frame at depth {}, gas used {}",
            frame.kind.name(),
            step.depth,
            frame.gas_used
        );
        self.current_mut()?.push(frame);
        Ok(())
    }

    fn enter_create(&mut self, kind: CallKind, step: &Step<'_>, reader: &mut StepReader<'_>) {
        let value = reader.peek(0);
        let offset = reader.peek(1);
        let length = reader.peek(2);

        let mut frame = CallFrame::new(kind, step.contract);
        frame.input = reader.copy(offset, length);
        frame.value = Some(value);
        frame.gas_in = step.gas;
        frame.gas_cost = step.cost;
        self.descend(frame);
    }

    fn enter_call(
        &mut self,
        kind: CallKind,
        step: &Step<'_>,
        reader: &mut StepReader<'_>,
        precompiles: &Precompiles,
    ) {
        let to = word_to_address(reader.peek(1));
        if precompiles.contains(&to) {
            return;
        }
        // Operands: gas, to, [value], in offset, in size, out offset, out size.
        let shift = usize::from(kind.carries_value());
        let in_offset = reader.peek(2 + shift);
        let in_length = reader.peek(3 + shift);

        let mut frame = CallFrame::new(kind, step.contract);
        frame.to = Some(to);
        frame.input = reader.copy(in_offset, in_length);
        frame.gas_in = step.gas;
        frame.gas_cost = step.cost;
        frame.output_window = Some(OutputWindow {
            offset: reader.peek(4 + shift),
            length: reader.peek(5 + shift),
        });
        if kind.carries_value() {
            frame.value = Some(reader.peek(2));
        }
        self.descend(frame);
    }

    fn descend(&mut self, frame: CallFrame) {
        debug!(
            "Opened {} frame from {} at stack size {}",
            frame.kind.name(),
            frame.from,
            self.open.len() + 1
        );
        self.open.push(frame);
        self.descent = Descent::AwaitingEntryGas;
    }

    /// Self-destructs never execute further code, so they are attached as
    /// completed leaves.
    fn self_destruct(
        &mut self,
        step: &Step<'_>,
        reader: &mut StepReader<'_>,
    ) -> Result<(), TracerError> {
        let mut frame = CallFrame::new(CallKind::SelfDestruct, step.contract);
        frame.to = Some(word_to_address(reader.peek(0)));
        frame.value = Some(step.state.balance(&step.contract));
        frame.gas_in = step.gas;
        frame.gas_cost = step.cost;
        self.current_mut()?.push(frame);
        Ok(())
    }

    fn revert(&mut self, reader: &mut StepReader<'_>) -> Result<(), TracerError> {
        let offset = reader.peek(0);
        let length = reader.peek(1);
        let revert = reader.copy(offset, length);

        let frame = self.current_mut()?;
        frame.error = Some(FrameError::ExecutionReverted);
        frame.revert = Some(revert);
        Ok(())
    }

    fn fault(&mut self, gas: u64, error: &str) -> Result<(), TracerError> {
        if self.current_mut()?.is_failed() {
            return Ok(());
        }
        let mut frame = self.open.pop().ok_or(TracerError::NoOpenFrame)?;
        frame.error = Some(FrameError::Fault(error.to_string()));
        // Faults burn everything the frame had left.
        if frame.gas.is_some() {
            frame.gas = Some(gas);
            frame.gas_used = gas;
        }
        debug!("Faulted {} frame: {}", frame.kind.name(), error);

        match self.open.last_mut() {
            Some(parent) => parent.push(frame),
            None => self.open.push(frame),
        }
        Ok(())
    }

    fn current_mut(&mut self) -> Result<&mut CallFrame, TracerError> {
        self.open.last_mut().ok_or(TracerError::NoOpenFrame)
    }
}

/// Low 20 bytes of a stack word.
fn word_to_address(word: U256) -> Address {
    Address::from_slice(&word.to_be_bytes::<32>()[12..])
}
