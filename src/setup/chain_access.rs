use ethers::prelude::*;
use std::sync::Arc;

use crate::chain::contracts::{Ownable, TimelockRoles};
use crate::chain::providers::{confirm, DeployClient};
use crate::error::Result;
use crate::setup::sequencer::{ChainAccess, Role};

/// `ChainAccess` over a signing ethers client.
#[derive(Clone)]
pub struct EthersAccess {
    client: Arc<DeployClient>,
    confirmations: usize,
}

impl EthersAccess {
    pub fn new(client: Arc<DeployClient>, confirmations: usize) -> Self {
        Self { client, confirmations }
    }

    async fn wait(&self, pending: PendingTransaction<'_, Http>) -> Result<TxHash> {
        Ok(confirm(pending, self.confirmations).await?.transaction_hash)
    }
}

impl ChainAccess for EthersAccess {
    async fn has_role(&self, contract: Address, role: Role, account: Address) -> Result<bool> {
        let timelock = TimelockRoles::new(contract, self.client.clone());
        Ok(timelock.has_role(role, account).call().await?)
    }

    async fn owner(&self, contract: Address) -> Result<Address> {
        let ownable = Ownable::new(contract, self.client.clone());
        Ok(ownable.owner().call().await?)
    }

    async fn grant_role(&self, contract: Address, role: Role, account: Address) -> Result<TxHash> {
        let timelock = TimelockRoles::new(contract, self.client.clone());
        let call = timelock.grant_role(role, account);
        let pending = call.send().await?;
        self.wait(pending).await
    }

    async fn revoke_role(&self, contract: Address, role: Role, account: Address) -> Result<TxHash> {
        let timelock = TimelockRoles::new(contract, self.client.clone());
        let call = timelock.revoke_role(role, account);
        let pending = call.send().await?;
        self.wait(pending).await
    }

    async fn transfer_ownership(&self, contract: Address, new_owner: Address) -> Result<TxHash> {
        let ownable = Ownable::new(contract, self.client.clone());
        let call = ownable.transfer_ownership(new_owner);
        let pending = call.send().await?;
        self.wait(pending).await
    }
}

/// Reads the three timelock role identifiers from the deployed contract.
pub async fn timelock_roles(client: Arc<DeployClient>, timelock: Address) -> Result<TimelockRoleIds> {
    let contract = TimelockRoles::new(timelock, client);
    let proposer_call = contract.proposer_role();
    let executor_call = contract.executor_role();
    let admin_call = contract.timelock_admin_role();
    let (proposer, executor, admin) = tokio::try_join!(
        proposer_call.call(),
        executor_call.call(),
        admin_call.call(),
    )?;
    Ok(TimelockRoleIds { proposer, executor, admin })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelockRoleIds {
    pub proposer: Role,
    pub executor: Role,
    pub admin: Role,
}
