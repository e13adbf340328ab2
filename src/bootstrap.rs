use std::sync::Arc;
use ethers::prelude::*;

use crate::chain::dev_chain::DevChain;
use crate::chain::explorer::ExplorerVerifier;
use crate::chain::networks::{network_by_name, NetworkConfig};
use crate::chain::providers::{self, DeployClient};
use crate::config::Config;
use crate::deploy::artifacts::ArtifactStore;
use crate::deploy::records::DeploymentStore;
use crate::deploy::DeployContext;
use crate::error::{DeployError, Result};
use crate::frontend::FrontendExporter;

/// A verified connection to the selected network plus its named accounts.
pub struct AppState {
    pub network: &'static NetworkConfig,
    pub provider: Arc<Provider<Http>>,
    pub deployer: LocalWallet,
    pub player: Option<LocalWallet>,
}

impl AppState {
    pub async fn connect(config: &Config) -> Result<Self> {
        let network = network_by_name(&config.network)?;
        let rpc_url = network.rpc_url().ok_or_else(|| {
            DeployError::Config(format!("{} must be set for network {}", network.rpc_url_env, network.name))
        })?;
        let provider = providers::create_provider(&rpc_url)?;
        providers::ensure_chain_id(&provider, network.chain_id).await?;

        let (deployer, player) = select_accounts(config, network)?;
        log::info!(
            "Connected to {} (chain {}) as {:?}",
            network.name,
            network.chain_id,
            deployer.address()
        );

        Ok(AppState { network, provider, deployer, player })
    }

    pub fn signer(&self) -> Arc<DeployClient> {
        providers::create_signer_client(self.provider.clone(), self.deployer.clone())
    }

    pub fn dev_chain(&self) -> DevChain {
        DevChain::new(self.provider.clone(), self.network)
    }

    pub fn deploy_context(&self, config: &Config) -> Result<DeployContext> {
        let store = if self.network.persists_deployments() {
            DeploymentStore::open(&config.deployments_dir, self.network.name, self.network.chain_id)?
        } else {
            DeploymentStore::in_memory(self.network.name, self.network.chain_id)
        };

        let verifier = match &self.network.explorer {
            Some(endpoint) => ExplorerVerifier::from_endpoint(endpoint, config.explorer_api_key(endpoint))?,
            None => None,
        };
        if verifier.is_none() && !self.network.is_development() {
            log::warn!("No explorer API key for {}; contracts will not be verified", self.network.name);
        }

        Ok(DeployContext {
            client: self.signer(),
            deployer: self.deployer.address(),
            network: self.network,
            confirmations: self.network.confirmations(),
            artifacts: ArtifactStore::new(&config.artifacts_dir),
            store,
            verifier,
            exporter: config.frontend_folder().map(FrontendExporter::new),
        })
    }
}

/// `PRIVATE_KEY` wins everywhere; development chains fall back to the mnemonic.
/// The player account only exists on development chains.
fn select_accounts(config: &Config, network: &NetworkConfig) -> Result<(LocalWallet, Option<LocalWallet>)> {
    let deployer = match &config.private_key {
        Some(key) => providers::wallet_from_private_key(key, network.chain_id)?,
        None if network.is_development() => {
            providers::wallet_from_mnemonic(&config.mnemonic, 0, network.chain_id)?
        }
        None => {
            return Err(DeployError::Config(format!(
                "PRIVATE_KEY must be set to deploy on {}",
                network.name
            )))
        }
    };

    let player = if network.is_development() {
        Some(providers::wallet_from_mnemonic(&config.mnemonic, 1, network.chain_id)?)
    } else {
        None
    };

    Ok((deployer, player))
}
