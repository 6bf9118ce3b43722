use serde::{Deserialize, Serialize};

use crate::models::errors::TraceError;

/// Instructions the tracer reacts to. Everything else is an ordinary
/// instruction and only matters for gas snapshots and return detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OpCode {
    Create,
    Call,
    CallCode,
    DelegateCall,
    Create2,
    StaticCall,
    Revert,
    SelfDestruct,
    Other(u8),
}

impl From<u8> for OpCode {
    fn from(byte: u8) -> Self {
        match byte {
            0xf0 => Self::Create,
            0xf1 => Self::Call,
            0xf2 => Self::CallCode,
            0xf4 => Self::DelegateCall,
            0xf5 => Self::Create2,
            0xfa => Self::StaticCall,
            0xfd => Self::Revert,
            0xff => Self::SelfDestruct,
            other => Self::Other(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Create => 0xf0,
            OpCode::Call => 0xf1,
            OpCode::CallCode => 0xf2,
            OpCode::DelegateCall => 0xf4,
            OpCode::Create2 => 0xf5,
            OpCode::StaticCall => 0xfa,
            OpCode::Revert => 0xfd,
            OpCode::SelfDestruct => 0xff,
            OpCode::Other(byte) => byte,
        }
    }
}

/// The kind of a traced frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
    Create,
    Create2,
    SelfDestruct,
}

impl CallKind {
    /// Lowercase opcode name, used as `callType` in parity actions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::CallCode => "callcode",
            Self::DelegateCall => "delegatecall",
            Self::StaticCall => "staticcall",
            Self::Create => "create",
            Self::Create2 => "create2",
            Self::SelfDestruct => "selfdestruct",
        }
    }

    /// Whether the instruction starts executing other code.
    pub fn descends(self) -> bool {
        self != Self::SelfDestruct
    }

    pub fn is_create(self) -> bool {
        matches!(self, Self::Create | Self::Create2)
    }

    /// DELEGATECALL and STATICCALL take no value operand.
    pub fn carries_value(self) -> bool {
        !matches!(self, Self::DelegateCall | Self::StaticCall)
    }
}

impl TryFrom<OpCode> for CallKind {
    type Error = TraceError;

    fn try_from(op: OpCode) -> Result<Self, Self::Error> {
        match op {
            OpCode::Call => Ok(Self::Call),
            OpCode::CallCode => Ok(Self::CallCode),
            OpCode::DelegateCall => Ok(Self::DelegateCall),
            OpCode::StaticCall => Ok(Self::StaticCall),
            OpCode::Create => Ok(Self::Create),
            OpCode::Create2 => Ok(Self::Create2),
            OpCode::SelfDestruct => Ok(Self::SelfDestruct),
            OpCode::Revert | OpCode::Other(_) => Err(TraceError::UnrecognizedOperation(op)),
        }
    }
}
