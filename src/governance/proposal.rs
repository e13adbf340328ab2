use ethers::prelude::*;
use ethers::utils::keccak256;
use std::fmt;
use std::sync::Arc;

use crate::chain::contracts::LoanGovernor;
use crate::chain::providers::confirm;
use crate::error::{DeployError, Result};

/// Governor proposal lifecycle as reported by `state(proposalId)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalState {
    Pending = 0,
    Active = 1,
    Canceled = 2,
    Defeated = 3,
    Succeeded = 4,
    Queued = 5,
    Expired = 6,
    Executed = 7,
}

impl TryFrom<u8> for ProposalState {
    type Error = DeployError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => ProposalState::Pending,
            1 => ProposalState::Active,
            2 => ProposalState::Canceled,
            3 => ProposalState::Defeated,
            4 => ProposalState::Succeeded,
            5 => ProposalState::Queued,
            6 => ProposalState::Expired,
            7 => ProposalState::Executed,
            other => return Err(DeployError::Contract(format!("unknown proposal state {}", other))),
        })
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Against = 0,
    For = 1,
    Abstain = 2,
}

/// The (targets, values, calldatas, description) tuple a governor identifies a proposal by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub targets: Vec<Address>,
    pub values: Vec<U256>,
    pub calldatas: Vec<Bytes>,
    pub description: String,
}

impl Proposal {
    /// A single call with no ether attached.
    pub fn single_call(target: Address, calldata: Bytes, description: impl Into<String>) -> Self {
        Self {
            targets: vec![target],
            values: vec![U256::zero()],
            calldatas: vec![calldata],
            description: description.into(),
        }
    }

    pub fn description_hash(&self) -> [u8; 32] {
        keccak256(self.description.as_bytes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProposalVotes {
    pub against: U256,
    pub for_votes: U256,
    pub abstain: U256,
}

pub struct ProposalDriver<M> {
    governor: LoanGovernor<M>,
    confirmations: usize,
}

impl<M: Middleware + 'static> ProposalDriver<M> {
    pub fn new(governor: Address, client: Arc<M>, confirmations: usize) -> Self {
        Self { governor: LoanGovernor::new(governor, client), confirmations }
    }

    pub async fn proposal_id(&self, proposal: &Proposal) -> Result<U256> {
        Ok(self
            .governor
            .hash_proposal(
                proposal.targets.clone(),
                proposal.values.clone(),
                proposal.calldatas.clone(),
                proposal.description_hash(),
            )
            .call()
            .await?)
    }

    /// Submits the proposal and returns its id.
    pub async fn propose(&self, proposal: &Proposal) -> Result<U256> {
        let call = self.governor.propose(
            proposal.targets.clone(),
            proposal.values.clone(),
            proposal.calldatas.clone(),
            proposal.description.clone(),
        );
        let pending = call.send().await?;
        confirm(pending, self.confirmations).await?;
        let id = self.proposal_id(proposal).await?;
        log::info!("Proposed {:?}: id {}", proposal.description, id);
        Ok(id)
    }

    pub async fn cast_vote(&self, proposal_id: U256, support: VoteType, reason: &str) -> Result<TxHash> {
        let call = self
            .governor
            .cast_vote_with_reason(proposal_id, support as u8, reason.to_string());
        let pending = call.send().await?;
        let receipt = confirm(pending, self.confirmations).await?;
        log::info!("Voted {:?} on {}", support, proposal_id);
        Ok(receipt.transaction_hash)
    }

    pub async fn queue(&self, proposal: &Proposal) -> Result<TxHash> {
        let call = self.governor.queue(
            proposal.targets.clone(),
            proposal.values.clone(),
            proposal.calldatas.clone(),
            proposal.description_hash(),
        );
        let pending = call.send().await?;
        let receipt = confirm(pending, self.confirmations).await?;
        log::info!("Queued {:?}", proposal.description);
        Ok(receipt.transaction_hash)
    }

    pub async fn execute(&self, proposal: &Proposal) -> Result<TxHash> {
        log::info!("Executing...");
        let call = self.governor.execute(
            proposal.targets.clone(),
            proposal.values.clone(),
            proposal.calldatas.clone(),
            proposal.description_hash(),
        );
        let pending = call.send().await?;
        let receipt = confirm(pending, self.confirmations).await?;
        Ok(receipt.transaction_hash)
    }

    pub async fn state(&self, proposal_id: U256) -> Result<ProposalState> {
        let raw = self.governor.state(proposal_id).call().await?;
        ProposalState::try_from(raw)
    }

    pub async fn votes(&self, proposal_id: U256) -> Result<ProposalVotes> {
        let (against, for_votes, abstain) = self.governor.proposal_votes(proposal_id).call().await?;
        Ok(ProposalVotes { against, for_votes, abstain })
    }

    pub async fn has_voted(&self, proposal_id: U256, account: Address) -> Result<bool> {
        Ok(self.governor.has_voted(proposal_id, account).call().await?)
    }

    /// Quorum required at the block the proposal's voting power was snapshotted.
    pub async fn quorum_at_snapshot(&self, proposal_id: U256) -> Result<U256> {
        let snapshot = self.governor.proposal_snapshot(proposal_id).call().await?;
        Ok(self.governor.quorum(snapshot).call().await?)
    }

    /// Timestamp after which a queued proposal may execute; zero if not queued.
    pub async fn eta(&self, proposal_id: U256) -> Result<U256> {
        Ok(self.governor.proposal_eta(proposal_id).call().await?)
    }
}
