// Chain manipulation for local Hardhat/Anvil nodes. These RPC methods do not
// exist on live networks, so every helper refuses to run there.

use ethers::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::chain::networks::NetworkConfig;
use crate::error::{DeployError, Result};

#[derive(Clone)]
pub struct DevChain {
    provider: Arc<Provider<Http>>,
    network: String,
    development: bool,
}

impl DevChain {
    pub fn new(provider: Arc<Provider<Http>>, network: &NetworkConfig) -> Self {
        Self {
            provider,
            network: network.name.to_string(),
            development: network.is_development(),
        }
    }

    fn guard(&self, op: &'static str) -> Result<()> {
        if self.development {
            Ok(())
        } else {
            Err(DeployError::NotDevelopmentChain(op, self.network.clone()))
        }
    }

    /// Mines `num_blocks` empty blocks, sleeping `sleep` between each one.
    pub async fn move_blocks(&self, num_blocks: u64, sleep: Duration, silent: bool) -> Result<()> {
        self.guard("move_blocks")?;
        if !silent {
            log::info!("Moving {} blocks with sleep time {}ms", num_blocks, sleep.as_millis());
        }
        for _ in 0..num_blocks {
            let _: Value = self.provider.request("evm_mine", ()).await?;
            if !sleep.is_zero() {
                tokio::time::sleep(sleep).await;
            }
        }
        Ok(())
    }

    /// Advances the node clock. Takes effect on the next mined block.
    pub async fn move_time(&self, seconds: u64, silent: bool) -> Result<()> {
        self.guard("move_time")?;
        if !silent {
            log::info!("Moving time...");
        }
        let _: Value = self.provider.request("evm_increaseTime", [seconds]).await?;
        if !silent {
            log::info!("Moved forward in time {} seconds", seconds);
        }
        Ok(())
    }

    pub async fn impersonate_account(&self, account: Address) -> Result<()> {
        self.guard("impersonate_account")?;
        let _: Value = self.provider.request("hardhat_impersonateAccount", [account]).await?;
        Ok(())
    }

    pub async fn stop_impersonating(&self, account: Address) -> Result<()> {
        self.guard("stop_impersonating")?;
        let _: Value = self.provider
            .request("hardhat_stopImpersonatingAccount", [account])
            .await?;
        Ok(())
    }

    pub async fn set_balance(&self, account: Address, wei: U256) -> Result<()> {
        self.guard("set_balance")?;
        let _: Value = self.provider
            .request("hardhat_setBalance", (account, wei))
            .await?;
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<U256> {
        self.guard("snapshot")?;
        Ok(self.provider.request("evm_snapshot", ()).await?)
    }

    /// Returns false when the node no longer knows the snapshot id.
    pub async fn revert(&self, snapshot_id: U256) -> Result<bool> {
        self.guard("revert")?;
        Ok(self.provider.request("evm_revert", [snapshot_id]).await?)
    }

    /// Re-forks the node from `fork_url` at `block_number`.
    pub async fn reset_fork(&self, fork_url: &str, block_number: u64) -> Result<()> {
        self.guard("reset_fork")?;
        let params = [fork_params(fork_url, block_number)];
        let _: Value = self.provider.request("hardhat_reset", params).await?;
        log::info!("Node re-forked from block {}", block_number);
        Ok(())
    }

    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?.as_u64())
    }

    pub async fn latest_timestamp(&self) -> Result<u64> {
        let block = self.provider
            .get_block(BlockNumber::Latest)
            .await?
            .ok_or_else(|| DeployError::Contract("node returned no latest block".to_string()))?;
        Ok(block.timestamp.as_u64())
    }
}

fn fork_params(fork_url: &str, block_number: u64) -> Value {
    json!({
        "forking": {
            "jsonRpcUrl": fork_url,
            "blockNumber": block_number,
        }
    })
}
