use chrono::{DateTime, Utc};
use ethers::abi::Abi;
use ethers::types::{Address, Bytes, TxHash, H256};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Compiled contract as written by Hardhat under `artifacts/<source>/<Name>.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
    #[serde(skip)]
    pub path: PathBuf,
}

impl ContractArtifact {
    /// `contracts/governance/LoanTimeLock.sol:LoanTimeLock`
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    pub fn bytecode_hash(&self) -> H256 {
        H256::from(ethers::utils::keccak256(self.bytecode.as_ref()))
    }
}

/// The `<Name>.dbg.json` sidecar pointing at the compiler run that produced an artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDebugInfo {
    pub build_info: String,
}

/// Subset of a Hardhat build-info file needed for source verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    pub input: serde_json::Value,
}

/// What a deploy step leaves behind for later steps, the exporter and reruns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub abi: Abi,
    pub transaction_hash: Option<TxHash>,
    pub block_number: Option<u64>,
    /// Human-readable constructor arguments.
    pub args: Vec<serde_json::Value>,
    /// ABI-encoded constructor arguments.
    pub args_data: Bytes,
    pub bytecode_hash: H256,
    pub deployed_at: DateTime<Utc>,
}

impl DeploymentRecord {
    /// True when redeploying `artifact` with `args_data` would produce the same contract.
    pub fn matches(&self, artifact: &ContractArtifact, args_data: &Bytes) -> bool {
        self.bytecode_hash == artifact.bytecode_hash() && &self.args_data == args_data
    }
}
