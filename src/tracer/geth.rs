use alloy_primitives::U256;
use alloy_rpc_types_trace::geth::CallFrame as GethCallFrame;

use crate::models::frames::CallFrame;

/// Converts a finished frame tree into geth's `callTracer` shape.
pub fn to_geth_frame(frame: &CallFrame) -> GethCallFrame {
    GethCallFrame {
        typ: frame.kind.name().to_uppercase(),
        from: frame.from,
        to: frame.to,
        value: frame.value,
        gas: U256::from(frame.gas.unwrap_or_default()),
        gas_used: U256::from(frame.gas_used),
        input: frame.input.clone(),
        output: (!frame.output.is_empty()).then(|| frame.output.clone()),
        error: frame.error.as_ref().map(ToString::to_string),
        calls: frame.calls.iter().map(to_geth_frame).collect(),
        ..Default::default()
    }
}
