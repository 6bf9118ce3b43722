//! Rebuilds the call tree of an EVM transaction from its per-instruction
//! execution events and renders it as parity-style call traces.

pub mod models;
pub mod replay;
pub mod tracer;
pub mod utils;

pub use models::common::{ChainContext, Precompiles, TracerConfig};
pub use models::errors::{AccessError, FrameError, TraceError, TracerError};
pub use tracer::{ExecutionStart, FinishedTrace, ParityTracer, Step};
