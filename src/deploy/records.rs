// Deployment bookkeeping: `<root>/<network>/<Name>.json` plus a `.chainId`
// marker. The hardhat network runs without a root and keeps records in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ethers::types::Address;

use crate::error::{DeployError, Result};
use crate::models::DeploymentRecord;

const CHAIN_ID_FILE: &str = ".chainId";

#[derive(Debug)]
pub struct DeploymentStore {
    network: String,
    chain_id: u64,
    dir: Option<PathBuf>,
    records: BTreeMap<String, DeploymentRecord>,
}

impl DeploymentStore {
    pub fn in_memory(network: &str, chain_id: u64) -> Self {
        Self {
            network: network.to_string(),
            chain_id,
            dir: None,
            records: BTreeMap::new(),
        }
    }

    /// Opens (or creates) the network folder under `root` and loads every record in it.
    pub fn open(root: impl AsRef<Path>, network: &str, chain_id: u64) -> Result<Self> {
        let dir = root.as_ref().join(network);
        fs::create_dir_all(&dir).map_err(|e| DeployError::io(&dir, e))?;

        let chain_id_path = dir.join(CHAIN_ID_FILE);
        match fs::read_to_string(&chain_id_path) {
            Ok(raw) => {
                let recorded: u64 = raw.trim().parse().map_err(|_| {
                    DeployError::Config(format!("corrupt {}: {:?}", chain_id_path.display(), raw))
                })?;
                if recorded != chain_id {
                    return Err(DeployError::ChainIdMismatch { expected: recorded, actual: chain_id });
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&chain_id_path, chain_id.to_string())
                    .map_err(|e| DeployError::io(&chain_id_path, e))?;
            }
            Err(e) => return Err(DeployError::io(&chain_id_path, e)),
        }

        let mut records = BTreeMap::new();
        for entry in fs::read_dir(&dir).map_err(|e| DeployError::io(&dir, e))? {
            let path = entry.map_err(|e| DeployError::io(&dir, e))?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let raw = fs::read_to_string(&path).map_err(|e| DeployError::io(&path, e))?;
            let record: DeploymentRecord = serde_json::from_str(&raw)?;
            records.insert(record.contract_name.clone(), record);
        }
        log::debug!("Loaded {} deployment records for {}", records.len(), network);

        Ok(Self {
            network: network.to_string(),
            chain_id,
            dir: Some(dir),
            records,
        })
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn is_persistent(&self) -> bool {
        self.dir.is_some()
    }

    pub fn get(&self, name: &str) -> Option<&DeploymentRecord> {
        self.records.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&DeploymentRecord> {
        self.get(name).ok_or_else(|| DeployError::MissingDeployment {
            name: name.to_string(),
            network: self.network.clone(),
        })
    }

    pub fn address(&self, name: &str) -> Result<Address> {
        Ok(self.require(name)?.address)
    }

    /// Replaces any previous record for the same contract.
    pub fn save(&mut self, record: DeploymentRecord) -> Result<()> {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{}.json", record.contract_name));
            let json = serde_json::to_string_pretty(&record)?;
            fs::write(&path, json).map_err(|e| DeployError::io(&path, e))?;
        }
        self.records.insert(record.contract_name.clone(), record);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ethers::abi::Abi;
    use ethers::types::{Bytes, H256};

    fn record(name: &str, byte: u8) -> DeploymentRecord {
        DeploymentRecord {
            contract_name: name.to_string(),
            address: Address::from([byte; 20]),
            abi: Abi::default(),
            transaction_hash: None,
            block_number: Some(1),
            args: vec![],
            args_data: Bytes::default(),
            bytecode_hash: H256::zero(),
            deployed_at: Utc::now(),
        }
    }

    #[test]
    fn test_records_survive_reopen() {
        let tmp = tempfile::tempdir().expect("tempdir");
        {
            let mut store = DeploymentStore::open(tmp.path(), "localhost", 31337).expect("open");
            store.save(record("LendPool", 0x11)).expect("save LendPool");
            store.save(record("GovToken", 0x22)).expect("save GovToken");
        }

        let store = DeploymentStore::open(tmp.path(), "localhost", 31337).expect("reopen");
        assert!(store.is_persistent());
        assert_eq!(store.address("LendPool").expect("LendPool"), Address::from([0x11; 20]));
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["GovToken", "LendPool"]);
        let marker = fs::read_to_string(tmp.path().join("localhost").join(".chainId"))
            .expect("chain id marker");
        assert_eq!(marker, "31337");
    }

    #[test]
    fn test_save_overwrites_whole_record() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut store = DeploymentStore::open(tmp.path(), "goerli", 5).expect("open");
        store.save(record("LoanManager", 0x01)).expect("first save");
        store.save(record("LoanManager", 0x02)).expect("second save");

        let reopened = DeploymentStore::open(tmp.path(), "goerli", 5).expect("reopen");
        assert_eq!(reopened.address("LoanManager").expect("LoanManager"), Address::from([0x02; 20]));
    }

    #[test]
    fn test_chain_id_mismatch_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        DeploymentStore::open(tmp.path(), "localhost", 31337).expect("open");

        let err = DeploymentStore::open(tmp.path(), "localhost", 1337).expect_err("mismatch");
        assert!(matches!(err, DeployError::ChainIdMismatch { expected: 31337, actual: 1337 }));
    }

    #[test]
    fn test_in_memory_store_writes_nothing() {
        let mut store = DeploymentStore::in_memory("hardhat", 31337);
        store.save(record("SwapRouter", 0x33)).expect("save");
        assert!(!store.is_persistent());
        assert!(store.get("SwapRouter").is_some());

        let err = store.address("LendPoolCore").expect_err("not deployed");
        assert_eq!(err.to_string(), "No deployment recorded for LendPoolCore on hardhat");
    }
}
