// Writes contract addresses and ABIs where the dApp front end picks them up.
//
// contract.json is shared between chains: { "<chainId>": { "<Name>": "<address>" } }.
// Only the current chain's keys are touched; other chains are kept verbatim.

use ethers::abi::Abi;
use ethers::types::Address;
use ethers::utils::to_checksum;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, Result};

pub const ADDRESS_BOOK_FILE: &str = "contract.json";

/// Contracts the dApp talks to, in export order.
pub const EXPORTED_CONTRACTS: [&str; 8] = [
    "LendPool",
    "LendPoolCore",
    "SwapRouter",
    "GovToken",
    "GovTokenHandler",
    "LoanTimeLock",
    "LoanGovernor",
    "LoanManager",
];

#[derive(Debug, Clone)]
pub struct FrontendExporter {
    ui_folder: PathBuf,
}

impl FrontendExporter {
    pub fn new(ui_folder: impl Into<PathBuf>) -> Self {
        Self { ui_folder: ui_folder.into() }
    }

    pub fn address_book_path(&self) -> PathBuf {
        self.ui_folder.join(ADDRESS_BOOK_FILE)
    }

    /// Writes `<ui_folder>/<name>.json` with the contract interface.
    pub fn update_abi(&self, name: &str, abi: &Abi) -> Result<()> {
        let path = self.ui_folder.join(format!("{}.json", name));
        let json = serde_json::to_string(abi)?;
        fs::write(&path, json).map_err(|e| DeployError::io(&path, e))
    }

    /// Read-merge-write of the shared address book.
    pub fn update_contract_address(&self, chain_id: u64, name: &str, address: Address) -> Result<()> {
        let path = self.address_book_path();
        let mut book = read_address_book(&path)?;

        let chain_key = chain_id.to_string();
        let entry = book
            .entry(chain_key)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            // Older exports stored arrays per chain; the current chain is rewritten in the new shape.
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(contracts) = entry {
            contracts.insert(name.to_string(), Value::String(to_checksum(&address, None)));
        }

        let json = serde_json::to_string(&Value::Object(book))?;
        fs::write(&path, json).map_err(|e| DeployError::io(&path, e))
    }

    /// Exports ABI and address for every `(name, address, abi)` triple.
    pub fn export_all<'a, I>(&self, chain_id: u64, contracts: I) -> Result<usize>
    where
        I: IntoIterator<Item = (&'a str, Address, &'a Abi)>,
    {
        fs::create_dir_all(&self.ui_folder).map_err(|e| DeployError::io(&self.ui_folder, e))?;
        let mut exported = 0;
        for (name, address, abi) in contracts {
            log::info!("Updating front end for {}", name);
            self.update_abi(name, abi)?;
            self.update_contract_address(chain_id, name, address)?;
            exported += 1;
        }
        Ok(exported)
    }
}

fn read_address_book(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        fs::write(path, "{}").map_err(|e| DeployError::io(path, e))?;
    }
    let raw = fs::read_to_string(path).map_err(|e| DeployError::io(path, e))?;
    match serde_json::from_str::<Value>(&raw)? {
        Value::Object(map) => Ok(map),
        other => Err(DeployError::Config(format!(
            "{} must hold a JSON object, found {}",
            path.display(),
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_creates_address_book_when_absent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let exporter = FrontendExporter::new(tmp.path());

        exporter
            .update_contract_address(31337, "LendPool", Address::from([0x11; 20]))
            .expect("update address");

        let raw = fs::read_to_string(exporter.address_book_path()).expect("read book");
        let book: Value = serde_json::from_str(&raw).expect("parse book");
        assert_eq!(book["31337"]["LendPool"], "0x1111111111111111111111111111111111111111");
    }

    #[test]
    fn test_only_current_chain_keys_change() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let exporter = FrontendExporter::new(tmp.path());
        let existing = json!({
            "5": { "LendPool": "0x00000000000000000000000000000000000000aa", "GovToken": "0x00000000000000000000000000000000000000bb" },
            "31337": { "LendPool": "0x00000000000000000000000000000000000000cc", "SwapRouter": "0x00000000000000000000000000000000000000dd" }
        });
        fs::write(exporter.address_book_path(), existing.to_string()).expect("seed book");

        exporter
            .update_contract_address(31337, "LendPool", Address::from([0xee; 20]))
            .expect("update address");

        let raw = fs::read_to_string(exporter.address_book_path()).expect("read book");
        let book: Value = serde_json::from_str(&raw).expect("parse book");
        assert_eq!(book["5"], existing["5"]);
        assert_eq!(book["31337"]["SwapRouter"], existing["31337"]["SwapRouter"]);
        assert_eq!(book["31337"]["LendPool"], to_checksum(&Address::from([0xee; 20]), None));
    }

    #[test]
    fn test_addresses_are_written_checksummed() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let exporter = FrontendExporter::new(tmp.path());
        let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().expect("address");

        exporter
            .update_contract_address(5, "LoanManager", address)
            .expect("update address");

        let raw = fs::read_to_string(exporter.address_book_path()).expect("read book");
        let book: Value = serde_json::from_str(&raw).expect("parse book");
        assert_eq!(book["5"]["LoanManager"], "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_legacy_array_shape_for_current_chain_is_replaced() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let exporter = FrontendExporter::new(tmp.path());
        let legacy = json!({
            "5": { "LendingPool": ["0x00000000000000000000000000000000000000aa"] },
            "31337": ["0x00000000000000000000000000000000000000cc"]
        });
        fs::write(exporter.address_book_path(), legacy.to_string()).expect("seed book");

        exporter
            .update_contract_address(31337, "GovToken", Address::from([0x01; 20]))
            .expect("update address");

        let book: Value = serde_json::from_str(
            &fs::read_to_string(exporter.address_book_path()).expect("read book"),
        )
        .expect("parse book");
        assert_eq!(book["5"], legacy["5"]);
        assert!(book["31337"].is_object());
        assert_eq!(book["31337"]["GovToken"], "0x0101010101010101010101010101010101010101");
    }

    #[test]
    fn test_non_object_book_is_an_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let exporter = FrontendExporter::new(tmp.path());
        fs::write(exporter.address_book_path(), "[]").expect("seed book");

        let err = exporter
            .update_contract_address(5, "LendPool", Address::zero())
            .expect_err("array book");
        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn test_export_all_writes_abi_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let folder = tmp.path().join("constants");
        let exporter = FrontendExporter::new(&folder);
        let abi = Abi::default();

        let count = exporter
            .export_all(5, vec![("LendPool", Address::from([0x01; 20]), &abi), ("SwapRouter", Address::from([0x02; 20]), &abi)])
            .expect("export");

        assert_eq!(count, 2);
        assert!(folder.join("LendPool.json").is_file());
        assert!(folder.join("SwapRouter.json").is_file());
        let book: Value = serde_json::from_str(
            &fs::read_to_string(folder.join(ADDRESS_BOOK_FILE)).expect("read book"),
        )
        .expect("parse book");
        assert_eq!(book["5"].as_object().map(|m| m.len()), Some(2));
    }
}
