use crate::models::documents::{
    Action, CallAction, CallOutput, CreateAction, CreateOutput, SuicideAction, TraceOutput,
    TraceType,
};
use crate::models::frames::CallFrame;
use crate::models::opcodes::CallKind;

/// The schema-specific parts of a frame's document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedFrame {
    pub trace_type: TraceType,
    pub action: Action,
    /// Self-destructs have no result payload.
    pub result: Option<TraceOutput>,
}

pub fn format_frame(frame: &CallFrame) -> FormattedFrame {
    let gas = frame.gas.unwrap_or_default();
    let to = frame.to.unwrap_or_default();
    let value = frame.value.unwrap_or_default();

    match frame.kind {
        CallKind::Create | CallKind::Create2 => FormattedFrame {
            trace_type: TraceType::Create,
            action: Action::Create(CreateAction {
                from: frame.from,
                gas,
                init: frame.input.clone(),
                value,
            }),
            result: Some(TraceOutput::Create(CreateOutput {
                address: to,
                code: frame.output.clone(),
                gas_used: frame.gas_used,
            })),
        },
        CallKind::Call | CallKind::CallCode | CallKind::DelegateCall | CallKind::StaticCall => {
            FormattedFrame {
                trace_type: TraceType::Call,
                action: Action::Call(CallAction {
                    call_type: frame.kind.name(),
                    value,
                    to,
                    gas,
                    from: frame.from,
                    input: frame.input.clone(),
                }),
                result: Some(TraceOutput::Call(CallOutput {
                    output: frame.output.clone(),
                    gas_used: frame.gas_used,
                })),
            }
        }
        CallKind::SelfDestruct => FormattedFrame {
            trace_type: TraceType::Suicide,
            action: Action::Suicide(SuicideAction {
                refund_address: to,
                balance: value,
                address: frame.from,
            }),
            result: None,
        },
    }
}
