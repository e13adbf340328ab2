// Idempotent setup: every action reads the current on-chain state first and
// only submits a transaction when that state differs from the desired one.
// The first error aborts the rest of the sequence; rerunning is always safe.

use ethers::types::{Address, TxHash};
use std::fmt;

use crate::error::Result;

pub type Role = [u8; 32];

/// Reads and writes of role/ownership state. Writes return once the
/// transaction has the configured number of confirmations.
#[allow(async_fn_in_trait)]
pub trait ChainAccess {
    async fn has_role(&self, contract: Address, role: Role, account: Address) -> Result<bool>;
    async fn owner(&self, contract: Address) -> Result<Address>;
    async fn grant_role(&self, contract: Address, role: Role, account: Address) -> Result<TxHash>;
    async fn revoke_role(&self, contract: Address, role: Role, account: Address) -> Result<TxHash>;
    async fn transfer_ownership(&self, contract: Address, new_owner: Address) -> Result<TxHash>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupAction {
    GrantRole { contract: Address, role: Role, account: Address },
    RevokeRole { contract: Address, role: Role, account: Address },
    TransferOwnership { contract: Address, new_owner: Address },
}

/// A step only applies while `account` holds `role` on `contract`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGuard {
    pub contract: Address,
    pub role: Role,
    pub account: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStep {
    pub label: String,
    pub action: SetupAction,
    pub guard: Option<RoleGuard>,
}

impl SetupStep {
    pub fn grant_role(label: impl Into<String>, contract: Address, role: Role, account: Address) -> Self {
        Self { label: label.into(), action: SetupAction::GrantRole { contract, role, account }, guard: None }
    }

    pub fn revoke_role(label: impl Into<String>, contract: Address, role: Role, account: Address) -> Self {
        Self { label: label.into(), action: SetupAction::RevokeRole { contract, role, account }, guard: None }
    }

    pub fn transfer_ownership(label: impl Into<String>, contract: Address, new_owner: Address) -> Self {
        Self {
            label: label.into(),
            action: SetupAction::TransferOwnership { contract, new_owner },
            guard: None,
        }
    }

    pub fn guarded_by(mut self, guard: RoleGuard) -> Self {
        self.guard = Some(guard);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Applied(TxHash),
    AlreadySatisfied,
    GuardNotMet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub label: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    pub outcomes: Vec<StepOutcome>,
}

impl SetupReport {
    pub fn submitted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, StepStatus::Applied(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.submitted()
    }
}

impl fmt::Display for SetupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} submitted, {} skipped", self.submitted(), self.skipped())
    }
}

pub struct SetupSequencer<A> {
    access: A,
}

impl<A: ChainAccess> SetupSequencer<A> {
    pub fn new(access: A) -> Self {
        Self { access }
    }

    pub fn access(&self) -> &A {
        &self.access
    }

    pub async fn run(&self, steps: &[SetupStep]) -> Result<SetupReport> {
        let mut report = SetupReport::default();
        for step in steps {
            let status = self.apply(step).await?;
            report.outcomes.push(StepOutcome { label: step.label.clone(), status });
        }
        Ok(report)
    }

    async fn apply(&self, step: &SetupStep) -> Result<StepStatus> {
        if let Some(guard) = &step.guard {
            if !self.access.has_role(guard.contract, guard.role, guard.account).await? {
                log::info!("{}: skipped, {:?} no longer holds the required role", step.label, guard.account);
                return Ok(StepStatus::GuardNotMet);
            }
        }

        match &step.action {
            SetupAction::GrantRole { contract, role, account } => {
                if self.access.has_role(*contract, *role, *account).await? {
                    log::info!("{}: role already granted", step.label);
                    return Ok(StepStatus::AlreadySatisfied);
                }
                log::info!("{}: granting role to {:?}", step.label, account);
                let tx = self.access.grant_role(*contract, *role, *account).await?;
                log::info!("done");
                Ok(StepStatus::Applied(tx))
            }
            SetupAction::RevokeRole { contract, role, account } => {
                if !self.access.has_role(*contract, *role, *account).await? {
                    log::info!("{}: role already revoked", step.label);
                    return Ok(StepStatus::AlreadySatisfied);
                }
                log::info!("{}: revoking role from {:?}", step.label, account);
                let tx = self.access.revoke_role(*contract, *role, *account).await?;
                Ok(StepStatus::Applied(tx))
            }
            SetupAction::TransferOwnership { contract, new_owner } => {
                let owner = self.access.owner(*contract).await?;
                if owner == *new_owner {
                    log::info!("{}: ownership already set", step.label);
                    return Ok(StepStatus::AlreadySatisfied);
                }
                log::info!("{}: transferring ownership from {:?} to {:?}", step.label, owner, new_owner);
                let tx = self.access.transfer_ownership(*contract, *new_owner).await?;
                Ok(StepStatus::Applied(tx))
            }
        }
    }
}
