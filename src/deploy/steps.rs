use ethers::abi::Token;
use ethers::types::U256;

use crate::deploy::deployer::{DeployContext, Deployed};
use crate::deploy::pipeline::{self, Tagged};
use crate::error::Result;
use crate::setup::chain_access::timelock_roles;
use crate::setup::plans::governance_bootstrap;
use crate::setup::SetupStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    MockTokens,
    LendPoolCore,
    SwapRouter,
    GovToken,
    SupplyStrategy,
    GovTokenHandler,
    LendPool,
    LoanTimeLock,
    LoanGovernor,
    GovernanceSetup,
    LoanManager,
    Frontend,
}

#[derive(Debug, Clone)]
pub struct DeployStep {
    pub id: &'static str,
    pub tags: Vec<&'static str>,
    pub dependencies: Vec<&'static str>,
    pub kind: StepKind,
}

impl Tagged for DeployStep {
    fn id(&self) -> &str {
        self.id
    }

    fn tags(&self) -> &[&'static str] {
        &self.tags
    }

    fn dependencies(&self) -> &[&'static str] {
        &self.dependencies
    }
}

fn step(id: &'static str, tags: &[&'static str], dependencies: &[&'static str], kind: StepKind) -> DeployStep {
    DeployStep { id, tags: tags.to_vec(), dependencies: dependencies.to_vec(), kind }
}

/// The protocol's deploy steps in declaration order.
pub fn protocol_steps() -> Vec<DeployStep> {
    vec![
        step("mock_tokens", &["all", "mocktokens"], &[], StepKind::MockTokens),
        step("lend_pool_core", &["all", "lendpoolcore"], &[], StepKind::LendPoolCore),
        step("swap_router", &["all", "swaprouter"], &[], StepKind::SwapRouter),
        step("gov_token", &["all", "govtoken"], &[], StepKind::GovToken),
        step("supply_strategy", &["all", "ethpricesupplystrategy"], &[], StepKind::SupplyStrategy),
        step(
            "gov_token_handler",
            &["all", "govtokenhandler"],
            &["govtoken", "ethpricesupplystrategy"],
            StepKind::GovTokenHandler,
        ),
        step("lend_pool", &["all", "lendingpool"], &["lendpoolcore", "govtokenhandler"], StepKind::LendPool),
        step("loan_timelock", &["all", "governance", "timelock"], &[], StepKind::LoanTimeLock),
        step("loan_governor", &["all", "governance", "governor"], &["govtoken", "timelock"], StepKind::LoanGovernor),
        step("governance_setup", &["all", "governance"], &["governor", "lendingpool"], StepKind::GovernanceSetup),
        step("loan_manager", &["all", "governance", "loanmanager"], &["timelock"], StepKind::LoanManager),
        step("frontend", &["all", "frontend"], &[], StepKind::Frontend),
    ]
}

/// Resolves `tags` against the protocol steps and runs them one after another.
/// Returns the ids of the steps that ran.
pub async fn run_tags(ctx: &mut DeployContext, tags: &[String]) -> Result<Vec<&'static str>> {
    let steps = protocol_steps();
    let plan = pipeline::resolve(&steps, tags)?;
    log::info!(
        "Running {} deploy step(s) on {}: {}",
        plan.len(),
        ctx.network.name,
        plan.iter().map(|s| s.id).collect::<Vec<_>>().join(", ")
    );

    let mut ran = Vec::with_capacity(plan.len());
    for step in plan {
        log::info!("----------------------------------------------------");
        step.kind.run(ctx).await?;
        ran.push(step.id);
    }
    Ok(ran)
}

impl StepKind {
    pub async fn run(self, ctx: &mut DeployContext) -> Result<()> {
        match self {
            StepKind::MockTokens => {
                if !ctx.network.is_development() {
                    log::info!("Skipping mock tokens on {}", ctx.network.name);
                    return Ok(());
                }
                ctx.deploy("WethToken", vec![]).await?;
                log::info!("Fake Weth Token contract deployed successfully");
                ctx.deploy("DaiToken", vec![]).await?;
                log::info!("Fake Dai Token contract deployed successfully");
            }
            StepKind::LendPoolCore => {
                let provider = ctx.network.contract("AAVE_LP_PROVIDER")?;
                deploy_and_verify(ctx, "LendPoolCore", vec![Token::Address(provider)]).await?;
            }
            StepKind::SwapRouter => {
                let args = vec![
                    Token::Address(ctx.network.contract("DAI")?),
                    Token::Address(ctx.network.contract("WETH")?),
                    Token::Address(ctx.network.contract("UNISWAP_ROUTER")?),
                ];
                deploy_and_verify(ctx, "SwapRouter", args).await?;
            }
            StepKind::GovToken => {
                deploy_and_verify(ctx, "GovToken", vec![]).await?;
            }
            StepKind::SupplyStrategy => {
                let provider = ctx.network.contract("AAVE_LP_PROVIDER")?;
                deploy_and_verify(ctx, "EthPriceSupplyStrategy", vec![Token::Address(provider)]).await?;
            }
            StepKind::GovTokenHandler => {
                let token = ctx.address("GovToken")?;
                let strategy = ctx.address("EthPriceSupplyStrategy")?;
                let handler = deploy_and_verify(
                    ctx,
                    "GovTokenHandler",
                    vec![Token::Address(token), Token::Address(strategy)],
                )
                .await?;
                ctx.run_setup(&[SetupStep::transfer_ownership(
                    "GovToken ownership -> GovTokenHandler",
                    token,
                    handler.address,
                )])
                .await?;
            }
            StepKind::LendPool => {
                let core = ctx.address("LendPoolCore")?;
                let handler = ctx.address("GovTokenHandler")?;
                let borrow_token = ctx.network.contract("DAI")?;
                let pool = deploy_and_verify(
                    ctx,
                    "LendPool",
                    vec![Token::Address(core), Token::Address(handler), Token::Address(borrow_token)],
                )
                .await?;
                ctx.run_setup(&[SetupStep::transfer_ownership(
                    "LendPoolCore ownership -> LendPool",
                    core,
                    pool.address,
                )])
                .await?;
            }
            StepKind::LoanTimeLock => {
                let governance = ctx.network.governance()?;
                let args = vec![
                    Token::Uint(U256::from(governance.execute_delay)),
                    Token::Array(vec![]),
                    Token::Array(vec![]),
                    Token::Address(ctx.deployer),
                ];
                deploy_and_verify(ctx, "contracts/governance/LoanTimeLock.sol:LoanTimeLock", args).await?;
            }
            StepKind::LoanGovernor => {
                let governance = ctx.network.governance()?;
                let args = vec![
                    Token::Address(ctx.address("GovToken")?),
                    Token::Address(ctx.address("LoanTimeLock")?),
                    Token::Uint(U256::from(governance.quorum_perc)),
                    Token::Uint(U256::from(governance.voting_period)),
                    Token::Uint(U256::from(governance.voting_delay)),
                ];
                deploy_and_verify(ctx, "LoanGovernor", args).await?;
            }
            StepKind::GovernanceSetup => {
                log::info!("Setting up roles for timelock");
                let timelock = ctx.address("LoanTimeLock")?;
                let governor = ctx.address("LoanGovernor")?;
                let lend_pool = ctx.address("LendPool")?;
                let roles = timelock_roles(ctx.client.clone(), timelock).await?;
                let steps = governance_bootstrap(&roles, timelock, governor, ctx.deployer, lend_pool);
                ctx.run_setup(&steps).await?;
                log::info!("Governance setup");
            }
            StepKind::LoanManager => {
                let timelock = ctx.address("LoanTimeLock")?;
                let manager = deploy_and_verify(ctx, "LoanManager", vec![]).await?;
                ctx.run_setup(&[SetupStep::transfer_ownership(
                    "LoanManager ownership -> LoanTimeLock",
                    manager.address,
                    timelock,
                )])
                .await?;
            }
            StepKind::Frontend => {
                let exported = ctx.export_frontend()?;
                if exported > 0 {
                    log::info!("Front end updated with {} contracts", exported);
                }
            }
        }
        Ok(())
    }
}

async fn deploy_and_verify(ctx: &mut DeployContext, name: &str, args: Vec<Token>) -> Result<Deployed> {
    let deployed = ctx.deploy(name, args).await?;
    if deployed.newly_deployed {
        ctx.verify(name).await?;
    }
    log::info!("{} ready at {:?}", name.rsplit(':').next().unwrap_or(name), deployed.address);
    Ok(deployed)
}
