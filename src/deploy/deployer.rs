use chrono::Utc;
use ethers::abi::Token;
use ethers::prelude::*;
use serde_json::Value;
use std::sync::Arc;

use crate::chain::explorer::{ExplorerVerifier, VerifyOutcome};
use crate::chain::networks::NetworkConfig;
use crate::chain::providers::DeployClient;
use crate::deploy::artifacts::ArtifactStore;
use crate::deploy::records::DeploymentStore;
use crate::error::Result;
use crate::frontend::{FrontendExporter, EXPORTED_CONTRACTS};
use crate::models::DeploymentRecord;
use crate::setup::{EthersAccess, SetupReport, SetupSequencer, SetupStep};

/// Everything a deploy step needs: signer, network entry, artifacts and the
/// records left behind by earlier steps.
pub struct DeployContext {
    pub client: Arc<DeployClient>,
    pub deployer: Address,
    pub network: &'static NetworkConfig,
    pub confirmations: usize,
    pub artifacts: ArtifactStore,
    pub store: DeploymentStore,
    pub verifier: Option<ExplorerVerifier>,
    pub exporter: Option<FrontendExporter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployed {
    pub address: Address,
    pub newly_deployed: bool,
}

impl DeployContext {
    pub fn chain_id(&self) -> u64 {
        self.store.chain_id()
    }

    pub fn address(&self, name: &str) -> Result<Address> {
        self.store.address(name)
    }

    /// Deploys `name` with `args`, or reuses the recorded deployment when code
    /// and constructor arguments are unchanged and the contract is still on chain.
    pub async fn deploy(&mut self, name: &str, args: Vec<Token>) -> Result<Deployed> {
        let artifact = self.artifacts.load(name)?;
        let args_data = Bytes::from(ethers::abi::encode(&args));

        if let Some(existing) = self.store.get(&artifact.contract_name) {
            if existing.matches(&artifact, &args_data) {
                let code = self.client.provider().get_code(existing.address, None).await?;
                if !code.as_ref().is_empty() {
                    log::info!("reusing \"{}\" at {:?}", artifact.contract_name, existing.address);
                    return Ok(Deployed { address: existing.address, newly_deployed: false });
                }
                log::debug!("{} record found but no code at {:?}", artifact.contract_name, existing.address);
            }
        }

        let factory = ContractFactory::new(artifact.abi.clone(), artifact.bytecode.clone(), self.client.clone());
        let mut deployer = factory
            .deploy_tokens(args.clone())?
            .confirmations(self.confirmations);
        if let Some(gas_price) = self.network.gas_price_wei() {
            deployer = deployer.legacy();
            deployer.tx.set_gas_price(gas_price);
        }
        if let Some(gas_limit) = self.network.gas_limit {
            deployer.tx.set_gas(gas_limit);
        }

        log::info!("deploying \"{}\" on {}", artifact.contract_name, self.network.name);
        let (contract, receipt) = deployer.send_with_receipt().await?;
        let address = contract.address();
        log::info!(
            "deployed \"{}\" at {:?} (tx: {:?}, gas: {})",
            artifact.contract_name,
            address,
            receipt.transaction_hash,
            receipt.gas_used.unwrap_or_default()
        );

        self.store.save(DeploymentRecord {
            contract_name: artifact.contract_name.clone(),
            address,
            abi: artifact.abi.clone(),
            transaction_hash: Some(receipt.transaction_hash),
            block_number: receipt.block_number.map(|n| n.as_u64()),
            args: args.iter().map(token_to_json).collect(),
            args_data,
            bytecode_hash: artifact.bytecode_hash(),
            deployed_at: Utc::now(),
        })?;

        Ok(Deployed { address, newly_deployed: true })
    }

    /// Submits the recorded deployment of `name` to the block explorer.
    /// `None` when verification does not apply to this network.
    pub async fn verify(&self, name: &str) -> Result<Option<VerifyOutcome>> {
        let verifier = match &self.verifier {
            Some(verifier) if !self.network.is_development() => verifier,
            _ => return Ok(None),
        };
        let artifact = self.artifacts.load(name)?;
        let record = self.store.require(&artifact.contract_name)?;
        let build_info = self.artifacts.build_info(&artifact)?;
        Ok(Some(verifier.verify(record.address, &artifact, &build_info, &record.args_data).await))
    }

    pub async fn run_setup(&self, steps: &[SetupStep]) -> Result<SetupReport> {
        let access = EthersAccess::new(self.client.clone(), self.confirmations);
        let report = SetupSequencer::new(access).run(steps).await?;
        log::info!("Setup finished: {}", report);
        Ok(report)
    }

    /// Writes ABIs and addresses for the dApp. Returns how many contracts were exported,
    /// zero when front-end export is disabled.
    pub fn export_frontend(&self) -> Result<usize> {
        let exporter = match &self.exporter {
            Some(exporter) => exporter,
            None => {
                log::debug!("Front-end export disabled");
                return Ok(0);
            }
        };
        let mut contracts = Vec::with_capacity(EXPORTED_CONTRACTS.len());
        for name in EXPORTED_CONTRACTS {
            let record = self.store.require(name)?;
            contracts.push((name, record.address, &record.abi));
        }
        exporter.export_all(self.chain_id(), contracts)
    }
}

/// JSON rendering of a constructor argument for deployment records.
pub fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Address(a) => Value::String(format!("{:?}", a)),
        Token::Uint(n) | Token::Int(n) => Value::String(n.to_string()),
        Token::Bool(b) => Value::Bool(*b),
        Token::String(s) => Value::String(s.clone()),
        Token::Bytes(b) | Token::FixedBytes(b) => Value::String(format!("0x{}", hex::encode(b))),
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
            Value::Array(items.iter().map(token_to_json).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_to_json() {
        let tokens = vec![
            Token::Uint(U256::from(3600u64)),
            Token::Array(vec![]),
            Token::Address(Address::from([0xab; 20])),
            Token::Bool(true),
            Token::Bytes(vec![0xde, 0xad]),
        ];
        let rendered: Vec<Value> = tokens.iter().map(token_to_json).collect();
        assert_eq!(
            Value::Array(rendered),
            json!(["3600", [], "0xabababababababababababababababababababab", true, "0xdead"])
        );
    }
}
