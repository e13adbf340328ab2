use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::time::Duration;

use lfg_deploy::bootstrap::AppState;
use lfg_deploy::chain::networks::FORK_BLOCK_NUMBER;
use lfg_deploy::config::Config;
use lfg_deploy::deploy::run_tags;
use lfg_deploy::frontend::FrontendExporter;
use lfg_deploy::scripts;

#[derive(Parser, Debug)]
#[command(author, version, about = "LFG protocol deployment and operator tooling")]
struct Cli {
    /// Network to run against (overrides NETWORK)
    #[arg(long, global = true)]
    network: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run deploy steps; no tags runs everything
    Deploy {
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Write ABIs and addresses into LFG_UI_FOLDER
    Export,
    /// Mine empty blocks on a development chain
    Mine {
        #[arg(long, default_value_t = scripts::MINE_BLOCKS)]
        blocks: u64,
        #[arg(long, default_value_t = 0)]
        sleep_ms: u64,
    },
    /// Advance the development chain clock
    Time {
        #[arg(long, default_value_t = scripts::TIME_SECONDS)]
        seconds: u64,
    },
    /// Mint governance tokens to the deployer through GovTokenHandler
    MintGovTokens,
    /// Move USDC from a mainnet whale to the deployer on a fork
    GetUsdc,
    /// Re-fork the local node from MAINNET_URL
    ResetFork {
        #[arg(long, default_value_t = FORK_BLOCK_NUMBER)]
        block: u64,
    },
    /// Submit a deployed contract to the block explorer
    Verify {
        /// Contract name or fully qualified name
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(network) = cli.network {
        config = config.with_network(network);
    }

    // Connect and pick accounts
    let state = AppState::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.network))?;

    match cli.command {
        Command::Deploy { tags } => {
            let mut ctx = state.deploy_context(&config)?;
            let ran = run_tags(&mut ctx, &tags).await.context("Deployment failed")?;
            log::info!("Deployment finished: {} step(s) on {}", ran.len(), state.network.name);
        }
        Command::Export => {
            let mut ctx = state.deploy_context(&config)?;
            if ctx.exporter.is_none() {
                let folder = config
                    .ui_folder
                    .clone()
                    .context("LFG_UI_FOLDER must be set to export")?;
                ctx.exporter = Some(FrontendExporter::new(folder));
            }
            let exported = ctx.export_frontend().context("Front-end export failed")?;
            log::info!("Exported {} contracts", exported);
        }
        Command::Mine { blocks, sleep_ms } => {
            scripts::mine(&state.dev_chain(), blocks, Duration::from_millis(sleep_ms)).await?;
        }
        Command::Time { seconds } => {
            scripts::time(&state.dev_chain(), seconds).await?;
        }
        Command::MintGovTokens => {
            let ctx = state.deploy_context(&config)?;
            let tx = scripts::mint_gov_tokens(&ctx, scripts::gov_token_mint_amount()).await?;
            log::info!("Minted in {:?}", tx);
        }
        Command::GetUsdc => {
            let ctx = state.deploy_context(&config)?;
            scripts::get_usdc(&ctx, &state.dev_chain(), scripts::usdc_grant_amount()).await?;
        }
        Command::ResetFork { block } => {
            let fork_url = config.mainnet_url.as_deref().context("MAINNET_URL must be set to fork")?;
            state.dev_chain().reset_fork(fork_url, block).await?;
        }
        Command::Verify { name } => {
            let ctx = state.deploy_context(&config)?;
            match ctx.verify(&name).await? {
                Some(outcome) => log::info!("{}: {:?}", name, outcome),
                None => bail!("verification is not available on {}", state.network.name),
            }
        }
    }

    Ok(())
}
