use serde_json::value::{to_raw_value, RawValue};

use crate::models::common::ChainContext;
use crate::models::documents::{Outcome, TraceDocument};
use crate::models::errors::TraceError;
use crate::models::frames::CallFrame;
use crate::tracer::format::format_frame;

/// Every frame always reports this error string; the real cause stays on the
/// frame itself.
const FAILED_FRAME_ERROR: &str = "Reverted";

/// Flattens the tree into one document per frame: parents before their
/// children, siblings in execution order.
pub fn trace_documents(context: &ChainContext, root: &CallFrame) -> Vec<TraceDocument> {
    let mut documents = Vec::with_capacity(root.frame_count());
    push_documents(context, root, Vec::new(), &mut documents);
    documents
}

fn push_documents(
    context: &ChainContext,
    frame: &CallFrame,
    trace_address: Vec<usize>,
    documents: &mut Vec<TraceDocument>,
) {
    let formatted = format_frame(frame);
    let outcome = if frame.is_failed() {
        Outcome::Failed {
            error: FAILED_FRAME_ERROR,
            revert: frame.revert.clone().unwrap_or_default(),
        }
    } else {
        Outcome::Completed {
            result: formatted.result,
        }
    };

    documents.push(TraceDocument {
        block_number: context.block_number,
        block_hash: context.block_hash,
        transaction_hash: context.transaction_hash,
        transaction_position: context.transaction_position,
        subtraces: frame.calls.len(),
        trace_address: trace_address.clone(),
        trace_type: formatted.trace_type,
        action: formatted.action,
        outcome,
    });

    for (index, call) in frame.calls.iter().enumerate() {
        let mut child_address = trace_address.clone();
        child_address.push(index);
        push_documents(context, call, child_address, documents);
    }
}

/// Encodes documents for an RPC response, failing as a whole on the first
/// document that cannot be encoded.
pub fn encode_documents(documents: &[TraceDocument]) -> Result<Vec<Box<RawValue>>, TraceError> {
    documents
        .iter()
        .map(|document| to_raw_value(document).map_err(TraceError::from))
        .collect()
}
