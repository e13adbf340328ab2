use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::chain::networks::ExplorerEndpoint;
use crate::chain::providers::HARDHAT_TEST_MNEMONIC;
use crate::error::{DeployError, Result};

/// Generic explorer key, used when a network's own key is unset.
pub const FALLBACK_EXPLORER_KEY: &str = "ETHER_SCAN_KEY";

const EXPLORER_KEY_VARS: [&str; 3] = [FALLBACK_EXPLORER_KEY, "ETHER_SCAN_MAINNET_KEY", "ETHER_SCAN_POLYGON_KEY"];

#[derive(Debug, Clone)]
pub struct Config {
    pub network: String,

    // Signing
    pub private_key: Option<String>,
    pub mnemonic: String,

    // Hardhat project layout
    pub artifacts_dir: PathBuf,
    pub deployments_dir: PathBuf,

    // Front-end export
    pub update_front_end: bool,
    pub ui_folder: Option<PathBuf>,

    pub mainnet_url: Option<String>,

    // Explorer API keys by variable name
    pub explorer_keys: HashMap<String, String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load configuration files (secrets first, then public config)
        dotenv::from_filename("secrets.env").ok();
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let update_front_end = get("UPDATE_FRONT_END").as_deref() == Some("true");
        let ui_folder = get("LFG_UI_FOLDER").map(PathBuf::from);
        if update_front_end && ui_folder.is_none() {
            return Err(DeployError::Config(
                "UPDATE_FRONT_END is true but LFG_UI_FOLDER is not set".to_string(),
            ));
        }

        Ok(Config {
            network: get("NETWORK").unwrap_or_else(|| "hardhat".to_string()),
            private_key: get("PRIVATE_KEY"),
            mnemonic: get("MNEMONIC").unwrap_or_else(|| HARDHAT_TEST_MNEMONIC.to_string()),
            artifacts_dir: get("ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("artifacts")),
            deployments_dir: get("DEPLOYMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("deployments")),
            update_front_end,
            ui_folder,
            mainnet_url: get("MAINNET_URL"),
            explorer_keys: EXPLORER_KEY_VARS
                .iter()
                .filter_map(|var| get(var).map(|key| (var.to_string(), key)))
                .collect(),
        })
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// The endpoint's own key, else `ETHER_SCAN_KEY`.
    pub fn explorer_api_key(&self, endpoint: &ExplorerEndpoint) -> Option<&str> {
        self.explorer_keys
            .get(endpoint.api_key_env)
            .or_else(|| self.explorer_keys.get(FALLBACK_EXPLORER_KEY))
            .map(String::as_str)
    }

    /// Folder to export to, `None` when export is switched off.
    pub fn frontend_folder(&self) -> Option<&PathBuf> {
        if self.update_front_end {
            self.ui_folder.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).expect("defaults");
        assert_eq!(cfg.network, "hardhat");
        assert_eq!(cfg.mnemonic, HARDHAT_TEST_MNEMONIC);
        assert_eq!(cfg.artifacts_dir, PathBuf::from("artifacts"));
        assert_eq!(cfg.deployments_dir, PathBuf::from("deployments"));
        assert!(cfg.private_key.is_none());
        assert!(cfg.frontend_folder().is_none());
    }

    #[test]
    fn test_front_end_needs_folder() {
        let err = config(&[("UPDATE_FRONT_END", "true")]).expect_err("no folder");
        assert!(matches!(err, DeployError::Config(_)));

        let cfg = config(&[("UPDATE_FRONT_END", "true"), ("LFG_UI_FOLDER", "../lfg-ui/constants")])
            .expect("with folder");
        assert_eq!(cfg.frontend_folder(), Some(&PathBuf::from("../lfg-ui/constants")));
    }

    #[test]
    fn test_only_literal_true_enables_export() {
        let cfg = config(&[("UPDATE_FRONT_END", "TRUE"), ("LFG_UI_FOLDER", "ui")]).expect("config");
        assert!(cfg.frontend_folder().is_none());
    }

    #[test]
    fn test_explorer_key_prefers_network_key() {
        let goerli = ExplorerEndpoint {
            api_url: "https://api-goerli.etherscan.io/api",
            api_key_env: "ETHER_SCAN_MAINNET_KEY",
        };
        let mumbai = ExplorerEndpoint {
            api_url: "https://api-testnet.polygonscan.com/api",
            api_key_env: "ETHER_SCAN_POLYGON_KEY",
        };

        let cfg = config(&[("ETHER_SCAN_MAINNET_KEY", "mainnet"), ("ETHER_SCAN_KEY", "generic")]).expect("config");
        assert_eq!(cfg.explorer_api_key(&goerli), Some("mainnet"));
        assert_eq!(cfg.explorer_api_key(&mumbai), Some("generic"));

        let cfg = config(&[("ETHER_SCAN_MAINNET_KEY", "")]).expect("config");
        assert_eq!(cfg.explorer_api_key(&goerli), None);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let cfg = config(&[("NETWORK", ""), ("PRIVATE_KEY", "  ")]).expect("config");
        assert_eq!(cfg.network, "hardhat");
        assert!(cfg.private_key.is_none());
        assert_eq!(cfg.clone().with_network("goerli").network, "goerli");
    }
}
