// Static per-network data: RPC settings, explorer endpoints, token addresses
// and governance timing. Nothing here changes during a run.

use std::str::FromStr;
use ethers::types::{Address, U256};

use crate::error::{DeployError, Result};

pub const DEVELOPMENT_CHAINS: [&str; 2] = ["hardhat", "localhost"];

pub const DEFAULT_LOCAL_RPC: &str = "http://127.0.0.1:8545";

/// Mainnet block the hardhat network forks from.
pub const FORK_BLOCK_NUMBER: u64 = 16_664_268;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernanceParams {
    /// Timelock delay for the proposals timelock, in seconds.
    pub min_delay: u64,
    /// Timelock delay for the loan timelock, in seconds.
    pub execute_delay: u64,
    pub quorum_perc: u64,
    /// Blocks.
    pub voting_period: u64,
    /// Blocks.
    pub voting_delay: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerEndpoint {
    pub api_url: &'static str,
    pub api_key_env: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_url_env: &'static str,
    pub gas_price: Option<u64>,
    pub gas_limit: Option<u64>,
    pub explorer: Option<ExplorerEndpoint>,
    pub contracts: &'static [(&'static str, &'static str)],
    pub governance: Option<GovernanceParams>,
}

const HARDHAT_GOVERNANCE: GovernanceParams = GovernanceParams {
    min_delay: 1,
    execute_delay: 1,
    quorum_perc: 4,
    voting_period: 5,
    voting_delay: 1,
};

const TESTNET_GOVERNANCE: GovernanceParams = GovernanceParams {
    min_delay: 3600,
    execute_delay: 3600,
    quorum_perc: 4,
    voting_period: 45_818,
    voting_delay: 1,
};

// Hardhat forks mainnet, so these are mainnet addresses.
const MAINNET_FORK_CONTRACTS: &[(&str, &str)] = &[
    ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
    ("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F"),
    ("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    ("LINK", "0x514910771AF9Ca656af840dff83E8264EcF986CA"),
    ("UNISWAP_ROUTER", "0xE592427A0AEce92De3Edee1F18E0157C05861564"),
    ("AAVE_LP_PROVIDER", "0xB53C1a33016B2DC2fF3653530bfF1848a515c8c5"),
];

const GOERLI_CONTRACTS: &[(&str, &str)] = &[
    ("WETH", "0x2e3A2fb8473316A02b8A297B982498E661E1f6f5"),
    ("DAI", "0xDF1742fE5b0bFc12331D8EAec6b478DfDbD31464"),
    ("UNISWAP_ROUTER", "0xE592427A0AEce92De3Edee1F18E0157C05861564"),
];

pub const NETWORKS: &[NetworkConfig] = &[
    NetworkConfig {
        name: "hardhat",
        chain_id: 31337,
        rpc_url_env: "HARDHAT_URL",
        gas_price: None,
        gas_limit: None,
        explorer: None,
        contracts: MAINNET_FORK_CONTRACTS,
        governance: Some(HARDHAT_GOVERNANCE),
    },
    NetworkConfig {
        name: "localhost",
        chain_id: 31337,
        rpc_url_env: "LOCALHOST_URL",
        gas_price: Some(20_000_000_000),
        gas_limit: Some(6_000_000),
        explorer: None,
        contracts: MAINNET_FORK_CONTRACTS,
        governance: Some(HARDHAT_GOVERNANCE),
    },
    NetworkConfig {
        name: "rinkeby",
        chain_id: 4,
        rpc_url_env: "RINKEBY_URL",
        gas_price: None,
        gas_limit: None,
        explorer: Some(ExplorerEndpoint {
            api_url: "https://api-rinkeby.etherscan.io/api",
            api_key_env: "ETHER_SCAN_MAINNET_KEY",
        }),
        contracts: &[],
        governance: Some(TESTNET_GOVERNANCE),
    },
    NetworkConfig {
        name: "goerli",
        chain_id: 5,
        rpc_url_env: "GOERLI_URL",
        gas_price: Some(20_000_000_000),
        gas_limit: Some(6_000_000),
        explorer: Some(ExplorerEndpoint {
            api_url: "https://api-goerli.etherscan.io/api",
            api_key_env: "ETHER_SCAN_MAINNET_KEY",
        }),
        contracts: GOERLI_CONTRACTS,
        governance: Some(TESTNET_GOVERNANCE),
    },
    NetworkConfig {
        name: "mumbai",
        chain_id: 80001,
        rpc_url_env: "MUMBAI_URL",
        gas_price: Some(200_000_000_000),
        gas_limit: Some(6_000_000),
        explorer: Some(ExplorerEndpoint {
            api_url: "https://api-testnet.polygonscan.com/api",
            api_key_env: "ETHER_SCAN_POLYGON_KEY",
        }),
        contracts: &[],
        governance: Some(TESTNET_GOVERNANCE),
    },
];

pub fn network_by_name(name: &str) -> Result<&'static NetworkConfig> {
    NETWORKS
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| DeployError::Config(format!("unknown network: {}", name)))
}

/// First entry for a chain id. Hardhat and localhost share 31337; hardhat wins.
pub fn network_by_chain_id(chain_id: u64) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

pub fn is_development_chain(name: &str) -> bool {
    DEVELOPMENT_CHAINS.contains(&name)
}

pub fn block_confirmations(name: &str) -> usize {
    if is_development_chain(name) { 1 } else { 6 }
}

impl NetworkConfig {
    pub fn is_development(&self) -> bool {
        is_development_chain(self.name)
    }

    pub fn confirmations(&self) -> usize {
        block_confirmations(self.name)
    }

    /// Only the in-process hardhat network discards deployments between runs.
    pub fn persists_deployments(&self) -> bool {
        self.name != "hardhat"
    }

    pub fn rpc_url(&self) -> Option<String> {
        match std::env::var(self.rpc_url_env) {
            Ok(url) if !url.is_empty() => Some(url),
            _ if self.is_development() => Some(DEFAULT_LOCAL_RPC.to_string()),
            _ => None,
        }
    }

    pub fn contract(&self, key: &str) -> Result<Address> {
        let raw = self
            .contracts
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| DeployError::MissingNetworkAddress {
                network: self.name.to_string(),
                key: key.to_string(),
            })?;
        Address::from_str(raw)
            .map_err(|e| DeployError::Config(format!("bad {} address {}: {}", key, raw, e)))
    }

    pub fn governance(&self) -> Result<GovernanceParams> {
        self.governance.ok_or_else(|| {
            DeployError::Config(format!("network {} has no governance parameters", self.name))
        })
    }

    pub fn gas_price_wei(&self) -> Option<U256> {
        self.gas_price.map(U256::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_chain_id() {
        let goerli = network_by_name("goerli").expect("goerli missing");
        assert_eq!(goerli.chain_id, 5);
        assert_eq!(network_by_name("GOERLI").expect("case-insensitive").chain_id, 5);
        assert!(network_by_name("ropsten").is_err());

        assert_eq!(network_by_chain_id(31337).map(|n| n.name), Some("hardhat"));
        assert_eq!(network_by_chain_id(80001).map(|n| n.name), Some("mumbai"));
        assert!(network_by_chain_id(1).is_none());
    }

    #[test]
    fn test_block_confirmations() {
        assert_eq!(block_confirmations("hardhat"), 1);
        assert_eq!(block_confirmations("localhost"), 1);
        assert_eq!(block_confirmations("goerli"), 6);
        assert_eq!(block_confirmations("mumbai"), 6);
    }

    #[test]
    fn test_every_configured_address_parses() {
        for network in NETWORKS {
            for (key, _) in network.contracts {
                let addr = network.contract(key)
                    .unwrap_or_else(|e| panic!("{} {}: {}", network.name, key, e));
                assert_ne!(addr, Address::zero());
            }
        }
    }

    #[test]
    fn test_missing_address_reports_network_and_key() {
        let mumbai = network_by_name("mumbai").expect("mumbai missing");
        let err = mumbai.contract("DAI").expect_err("mumbai has no DAI");
        let msg = err.to_string();
        assert!(msg.contains("mumbai"));
        assert!(msg.contains("DAI"));
    }

    #[test]
    fn test_only_hardhat_is_ephemeral() {
        for network in NETWORKS {
            assert_eq!(network.persists_deployments(), network.name != "hardhat");
        }
    }

    #[test]
    fn test_dev_governance_fits_local_test_flow() {
        let gov = network_by_name("hardhat")
            .and_then(|n| n.governance())
            .expect("hardhat governance");
        // The proposal flow only mines a single block between queue and execute.
        assert!(gov.execute_delay <= 1);
        assert!(gov.voting_delay >= 1);
        assert!(gov.quorum_perc <= 100);
    }
}
