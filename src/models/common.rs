use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Highest address of the standard precompile range (ecrecover .. blake2f).
const LAST_STANDARD_PRECOMPILE: u8 = 0x09;
/// VRF precompile.
const VRF_PRECOMPILE: u8 = 0xff;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Parity,
    Geth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    pub precompiles: Vec<Address>,
    pub input: String,
    pub output_format: OutputFormat,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            precompiles: default_precompiles(),
            input: "execution.json".to_string(),
            output_format: OutputFormat::default(),
        }
    }
}

fn default_precompiles() -> Vec<Address> {
    (1..=LAST_STANDARD_PRECOMPILE)
        .chain(std::iter::once(VRF_PRECOMPILE))
        .map(Address::with_last_byte)
        .collect()
}

/// Addresses whose calls are never traced as sub-calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precompiles(HashSet<Address>);

impl Precompiles {
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self(addresses.into_iter().collect())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }
}

impl Default for Precompiles {
    fn default() -> Self {
        Self::new(default_precompiles())
    }
}

impl From<&TracerConfig> for Precompiles {
    fn from(config: &TracerConfig) -> Self {
        Self::new(config.precompiles.iter().copied())
    }
}

/// Block and transaction identifiers copied into every trace document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContext {
    pub block_number: u64,
    pub block_hash: B256,
    pub transaction_hash: B256,
    pub transaction_position: u64,
}
