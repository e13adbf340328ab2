use ethers::types::Address;

use crate::setup::chain_access::TimelockRoleIds;
use crate::setup::sequencer::{RoleGuard, SetupStep};

/// Hands the timelock to the governor and then gives up the deployer's admin
/// role. The role changes only apply while the deployer is still admin; once
/// admin is revoked they are skipped, so reruns cost only reads.
pub fn governance_bootstrap(
    roles: &TimelockRoleIds,
    timelock: Address,
    governor: Address,
    deployer: Address,
    lend_pool: Address,
) -> Vec<SetupStep> {
    let deployer_is_admin = RoleGuard { contract: timelock, role: roles.admin, account: deployer };

    vec![
        SetupStep::grant_role("proposer role -> LoanGovernor", timelock, roles.proposer, governor)
            .guarded_by(deployer_is_admin),
        // Zero address as executor lets anyone execute a queued proposal.
        SetupStep::grant_role("executor role -> anyone", timelock, roles.executor, Address::zero())
            .guarded_by(deployer_is_admin),
        SetupStep::revoke_role("revoke deployer admin role", timelock, roles.admin, deployer)
            .guarded_by(deployer_is_admin),
        SetupStep::transfer_ownership("LendPool ownership -> LoanTimeLock", lend_pool, timelock),
    ]
}
