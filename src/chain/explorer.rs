// Etherscan-compatible source verification. Failures never abort a
// deployment: "already verified" is reported as such, everything else is logged.

use ethers::types::{Address, Bytes};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::chain::networks::ExplorerEndpoint;
use crate::error::{DeployError, Result};
use crate::models::{BuildInfo, ContractArtifact};

const STATUS_POLL_ATTEMPTS: usize = 10;
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    #[allow(dead_code)] // Always present, only useful when debugging the API
    message: String,
    result: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    AlreadyVerified,
    Failed(String),
}

pub fn is_already_verified(message: &str) -> bool {
    message.to_lowercase().contains("already verified")
}

pub struct ExplorerVerifier {
    client: Client,
    api_url: String,
    api_key: String,
    poll_interval: Duration,
}

impl ExplorerVerifier {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let api_url = api_url.into();
        url::Url::parse(&api_url)?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.into(),
            poll_interval: STATUS_POLL_INTERVAL,
        })
    }

    /// `None` when no API key is available for the endpoint.
    pub fn from_endpoint(endpoint: &ExplorerEndpoint, api_key: Option<&str>) -> Result<Option<Self>> {
        match api_key {
            Some(key) => Ok(Some(Self::new(endpoint.api_url, key)?)),
            None => Ok(None),
        }
    }

    /// Submits and polls; every error is folded into the returned outcome.
    pub async fn verify(
        &self,
        address: Address,
        artifact: &ContractArtifact,
        build_info: &BuildInfo,
        constructor_args: &Bytes,
    ) -> VerifyOutcome {
        log::info!("Verifying contract {} at {:?}...", artifact.contract_name, address);
        let outcome = match self.submit_and_poll(address, artifact, build_info, constructor_args).await {
            Ok(outcome) => outcome,
            Err(e) if is_already_verified(&e.to_string()) => VerifyOutcome::AlreadyVerified,
            Err(e) => VerifyOutcome::Failed(e.to_string()),
        };
        match &outcome {
            VerifyOutcome::Verified => log::info!("{} verified", artifact.contract_name),
            VerifyOutcome::AlreadyVerified => log::info!("Already Verified"),
            VerifyOutcome::Failed(reason) => {
                log::error!("Verification of {} failed: {}", artifact.contract_name, reason)
            }
        }
        outcome
    }

    async fn submit_and_poll(
        &self,
        address: Address,
        artifact: &ContractArtifact,
        build_info: &BuildInfo,
        constructor_args: &Bytes,
    ) -> Result<VerifyOutcome> {
        let source = serde_json::to_string(&build_info.input)?;
        let address = format!("{:?}", address);
        let contract_name = artifact.fully_qualified_name();
        let compiler = format!("v{}", build_info.solc_long_version);
        let args_hex = hex::encode(constructor_args.as_ref());

        let form = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", source.as_str()),
            ("codeformat", "solidity-standard-json-input"),
            ("contractname", contract_name.as_str()),
            ("compilerversion", compiler.as_str()),
            // Etherscan's own spelling.
            ("constructorArguements", args_hex.as_str()),
        ];

        let submitted: ExplorerResponse = self.client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let guid = match interpret_submission(&submitted) {
            Submission::Guid(guid) => guid,
            Submission::AlreadyVerified => return Ok(VerifyOutcome::AlreadyVerified),
            Submission::Rejected(reason) => return Err(DeployError::Explorer(reason)),
        };
        log::debug!("Verification submitted, guid {}", guid);

        for _ in 0..STATUS_POLL_ATTEMPTS {
            tokio::time::sleep(self.poll_interval).await;
            let status: ExplorerResponse = self.client
                .get(&self.api_url)
                .query(&[
                    ("apikey", self.api_key.as_str()),
                    ("module", "contract"),
                    ("action", "checkverifystatus"),
                    ("guid", guid.as_str()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match interpret_status(&status) {
                Some(outcome) => return Ok(outcome),
                None => log::debug!("Verification pending: {}", status.result),
            }
        }

        Ok(VerifyOutcome::Failed(format!(
            "no verdict after {} status checks",
            STATUS_POLL_ATTEMPTS
        )))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Submission {
    Guid(String),
    AlreadyVerified,
    Rejected(String),
}

fn interpret_submission(response: &ExplorerResponse) -> Submission {
    if response.status == "1" {
        Submission::Guid(response.result.clone())
    } else if is_already_verified(&response.result) {
        Submission::AlreadyVerified
    } else {
        Submission::Rejected(response.result.clone())
    }
}

/// `None` while the explorer is still working on it.
fn interpret_status(response: &ExplorerResponse) -> Option<VerifyOutcome> {
    let result = response.result.as_str();
    if result.to_lowercase().contains("pending") {
        None
    } else if is_already_verified(result) {
        Some(VerifyOutcome::AlreadyVerified)
    } else if response.status == "1" || result.starts_with("Pass") {
        Some(VerifyOutcome::Verified)
    } else {
        Some(VerifyOutcome::Failed(result.to_string()))
    }
}
