// Shared fixture for tests that need a running node.
//
// Set LOCAL_RPC_URL to a Hardhat/Anvil node forking mainnet and ARTIFACTS_DIR
// to the compiled contracts (default ./artifacts). Without them the live
// tests print a notice and pass without doing anything.

#![allow(dead_code)]

use ethers::prelude::*;
use std::path::Path;
use std::sync::Arc;

use lfg_deploy::chain::contracts::Erc20;
use lfg_deploy::chain::dev_chain::DevChain;
use lfg_deploy::chain::networks::network_by_chain_id;
use lfg_deploy::chain::providers::{self, DeployClient, HARDHAT_TEST_MNEMONIC};
use lfg_deploy::deploy::artifacts::ArtifactStore;
use lfg_deploy::deploy::records::DeploymentStore;
use lfg_deploy::deploy::{run_tags, DeployContext};

pub struct Fixture {
    pub ctx: DeployContext,
    pub dev: DevChain,
    pub provider: Arc<Provider<Http>>,
    pub player: Arc<DeployClient>,
    snapshot: U256,
}

impl Fixture {
    pub fn deployer(&self) -> Arc<DeployClient> {
        self.ctx.client.clone()
    }

    pub fn address(&self, name: &str) -> Address {
        self.ctx.address(name).unwrap_or_else(|e| panic!("{} not deployed: {}", name, e))
    }

    pub fn token(&self, key: &str) -> Erc20<DeployClient> {
        let address = self.ctx.network.contract(key).expect("token address");
        Erc20::new(address, self.ctx.client.clone())
    }

    /// Wraps `amount` wei of the deployer's ETH into WETH.
    pub async fn wrap_eth(&self, amount: U256) -> Erc20<DeployClient> {
        let weth = self.token("WETH");
        weth.deposit()
            .value(amount)
            .send()
            .await
            .expect("send WETH deposit")
            .await
            .expect("WETH deposit receipt");
        weth
    }

    /// Rolls the node back to before the fixture deployment.
    pub async fn restore(self) {
        let reverted = self.dev.revert(self.snapshot).await.expect("evm_revert");
        assert!(reverted, "snapshot {} was not known to the node", self.snapshot);
    }
}

fn skip(reason: &str) -> Option<Fixture> {
    println!("⚠️ Skipping live test: {}", reason);
    None
}

/// Deploys every `all`-tagged step against the local node with fresh records.
pub async fn deploy_fixture() -> Option<Fixture> {
    let _ = env_logger::builder().is_test(true).try_init();

    let rpc_url = match std::env::var("LOCAL_RPC_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => return skip("LOCAL_RPC_URL not set"),
    };
    let artifacts_dir = std::env::var("ARTIFACTS_DIR").unwrap_or_else(|_| "artifacts".to_string());
    if !Path::new(&artifacts_dir).is_dir() {
        return skip(&format!("no artifacts at {}", artifacts_dir));
    }

    let provider = providers::create_provider(&rpc_url).expect("Failed to create provider");
    let chain_id = match provider.get_chainid().await {
        Ok(id) => id.as_u64(),
        Err(e) => return skip(&format!("node at {} unreachable: {}", rpc_url, e)),
    };
    let network = match network_by_chain_id(chain_id) {
        Some(network) if network.is_development() => network,
        _ => return skip(&format!("chain {} is not a development chain", chain_id)),
    };

    let deployer = providers::wallet_from_mnemonic(HARDHAT_TEST_MNEMONIC, 0, chain_id)
        .expect("deployer wallet");
    let player = providers::wallet_from_mnemonic(HARDHAT_TEST_MNEMONIC, 1, chain_id)
        .expect("player wallet");

    let dev = DevChain::new(provider.clone(), network);
    let snapshot = dev.snapshot().await.expect("evm_snapshot");

    let mut ctx = DeployContext {
        client: providers::create_signer_client(provider.clone(), deployer.clone()),
        deployer: deployer.address(),
        network,
        confirmations: network.confirmations(),
        artifacts: ArtifactStore::new(&artifacts_dir),
        store: DeploymentStore::in_memory(network.name, chain_id),
        verifier: None,
        exporter: None,
    };
    run_tags(&mut ctx, &["all".to_string()])
        .await
        .expect("Fixture deployment failed");

    Some(Fixture {
        ctx,
        dev,
        player: providers::create_signer_client(provider.clone(), player),
        provider,
        snapshot,
    })
}

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}
