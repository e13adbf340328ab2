// Operator scripts for local nodes and freshly deployed protocols.

use ethers::prelude::*;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::chain::contracts::{Erc20, GovTokenHandler};
use crate::chain::dev_chain::DevChain;
use crate::chain::providers::confirm;
use crate::deploy::DeployContext;
use crate::error::{DeployError, Result};

pub const MINE_BLOCKS: u64 = 10;
pub const TIME_SECONDS: u64 = 180;

/// Mainnet account holding enough USDC to fund test wallets on a fork.
pub const USDC_WHALE: &str = "0x203520F4ec42Ea39b03F62B20e20Cf17DB5fdfA7";

pub fn gov_token_mint_amount() -> U256 {
    U256::from(10_000u64) * U256::exp10(18)
}

pub fn usdc_grant_amount() -> U256 {
    U256::from(100_000u64) * U256::exp10(6)
}

pub async fn mine(dev: &DevChain, blocks: u64, sleep: Duration) -> Result<u64> {
    dev.move_blocks(blocks, sleep, false).await?;
    let height = dev.block_number().await?;
    log::info!("Chain is at block {}", height);
    Ok(height)
}

pub async fn time(dev: &DevChain, seconds: u64) -> Result<()> {
    dev.move_time(seconds, false).await
}

/// Mints governance tokens to the deployer through the handler, paying in DAI.
pub async fn mint_gov_tokens(ctx: &DeployContext, amount: U256) -> Result<TxHash> {
    let handler_address = ctx.address("GovTokenHandler")?;
    let dai = ctx.network.contract("DAI")?;
    log::info!("Minting {} gov tokens to {:?}", amount, ctx.deployer);

    let handler = GovTokenHandler::new(handler_address, ctx.client.clone());
    let call = handler.mint(ctx.deployer, dai, amount);
    let pending = call.send().await?;
    let receipt = confirm(pending, ctx.confirmations).await?;
    Ok(receipt.transaction_hash)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsdcBalances {
    pub whale: U256,
    pub deployer: U256,
}

/// Moves USDC from the impersonated whale to the deployer. Forked dev chains only.
pub async fn get_usdc(ctx: &DeployContext, dev: &DevChain, amount: U256) -> Result<UsdcBalances> {
    let usdc_address = ctx.network.contract("USDC")?;
    let whale = Address::from_str(USDC_WHALE)
        .map_err(|e| DeployError::Config(format!("bad whale address: {}", e)))?;

    dev.impersonate_account(whale).await?;
    // The whale pays gas for the transfer.
    dev.set_balance(whale, U256::exp10(19)).await?;

    // Impersonated sends go through the node, not the local signer.
    let node = Arc::new(ctx.client.provider().clone());
    let usdc = Erc20::new(usdc_address, node);
    let call = usdc.transfer(ctx.deployer, amount).from(whale);
    let pending = call.send().await?;
    confirm(pending, ctx.confirmations).await?;
    dev.stop_impersonating(whale).await?;

    let balances = UsdcBalances {
        whale: usdc.balance_of(whale).call().await?,
        deployer: usdc.balance_of(ctx.deployer).call().await?,
    };
    log::info!("newWhaleBal {}", balances.whale);
    log::info!("deployerBal {}", balances.deployer);
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amounts() {
        assert_eq!(gov_token_mint_amount(), U256::from_dec_str("10000000000000000000000").expect("u256"));
        assert_eq!(usdc_grant_amount(), U256::from(100_000_000_000u64));
    }

    #[test]
    fn test_whale_address_parses() {
        assert!(Address::from_str(USDC_WHALE).is_ok());
    }
}
