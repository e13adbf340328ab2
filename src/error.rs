use ethers::prelude::*;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeployError>;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] ProviderError),

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("ABI error: {0}")]
    Abi(#[from] ethers::abi::Error),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No deployment recorded for {name} on {network}")]
    MissingDeployment { name: String, network: String },

    #[error("No artifact found for {0}")]
    MissingArtifact(String),

    #[error("Network {network} has no {key} address configured")]
    MissingNetworkAddress { network: String, key: String },

    #[error("Chain id mismatch: expected {expected}, node reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("Unknown deploy tag: {0}")]
    UnknownTag(String),

    #[error("Dependency cycle through step {0}")]
    DependencyCycle(String),

    #[error("{0} is only available on development chains (current network: {1})")]
    NotDevelopmentChain(&'static str, String),

    #[error("Transaction {0:?} was dropped before confirmation")]
    Dropped(TxHash),

    #[error("Explorer error: {0}")]
    Explorer(String),
}

impl DeployError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        DeployError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

impl<M: Middleware> From<ContractError<M>> for DeployError {
    fn from(err: ContractError<M>) -> Self {
        DeployError::Contract(err.to_string())
    }
}

impl From<url::ParseError> for DeployError {
    fn from(err: url::ParseError) -> Self {
        DeployError::Config(format!("invalid URL: {}", err))
    }
}
