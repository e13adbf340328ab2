use ethers::prelude::*;
use ethers::signers::coins_bip39::English;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{DeployError, Result};

/// Signing client used for every deployment and setup transaction.
pub type DeployClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Mnemonic every Hardhat/Anvil node funds by default.
pub const HARDHAT_TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

pub fn create_provider(rpc_url: &str) -> Result<Arc<Provider<Http>>> {
    let provider = Provider::<Http>::try_from(rpc_url)?;
    Ok(Arc::new(provider))
}

pub fn wallet_from_private_key(private_key: &str, chain_id: u64) -> Result<LocalWallet> {
    let key = private_key.trim_start_matches("0x");
    Ok(LocalWallet::from_str(key)?.with_chain_id(chain_id))
}

/// Named accounts follow Hardhat's convention: deployer is index 0, player index 1.
pub fn wallet_from_mnemonic(phrase: &str, index: u32, chain_id: u64) -> Result<LocalWallet> {
    let wallet = MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .index(index)?
        .build()?;
    Ok(wallet.with_chain_id(chain_id))
}

pub fn create_signer_client(provider: Arc<Provider<Http>>, wallet: LocalWallet) -> Arc<DeployClient> {
    Arc::new(SignerMiddleware::new((*provider).clone(), wallet))
}

/// Asks the node for its chain id and rejects a mismatch with the selected network.
pub async fn ensure_chain_id(provider: &Provider<Http>, expected: u64) -> Result<()> {
    let actual = provider.get_chainid().await?.as_u64();
    if actual != expected {
        return Err(DeployError::ChainIdMismatch { expected, actual });
    }
    Ok(())
}

/// Waits for `confirmations` blocks on top of a sent transaction and rejects
/// dropped or reverted ones.
pub async fn confirm<P: JsonRpcClient>(
    pending: PendingTransaction<'_, P>,
    confirmations: usize,
) -> Result<TransactionReceipt> {
    let tx_hash = pending.tx_hash();
    log::debug!("Waiting {} confirmation(s) for {:?}", confirmations, tx_hash);
    let receipt = pending
        .confirmations(confirmations)
        .await?
        .ok_or(DeployError::Dropped(tx_hash))?;
    if receipt.status == Some(U64::zero()) {
        return Err(DeployError::Contract(format!("transaction {:?} reverted", tx_hash)));
    }
    Ok(receipt)
}
