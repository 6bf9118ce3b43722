pub mod common;
pub mod documents;
pub mod errors;
pub mod frames;
pub mod opcodes;
