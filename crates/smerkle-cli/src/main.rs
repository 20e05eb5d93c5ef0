//! smerkle CLI application

mod cli;
mod commands;

use clap::Parser as _;
use cli::{Cli, Commands, ProofCommands, TreeCommands};

fn init_tracing() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;

    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    // Load .env file (fails silently if not found)
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Tree { command } => match command {
            TreeCommands::Root { args } => {
                let (leaves, overrides) = args.into_parts();
                commands::tree_root(leaves, overrides).await
            }
            TreeCommands::Levels { args, digests } => {
                let (leaves, overrides) = args.into_parts();
                commands::tree_levels(leaves, overrides, digests).await
            }
        },
        Commands::Proof { command } => match command {
            ProofCommands::Inclusion { args, index } => {
                let (leaves, overrides) = args.into_parts();
                commands::prove_inclusion(leaves, overrides, index).await
            }
            ProofCommands::Absence {
                args,
                target_index,
                target,
            } => {
                let (leaves, overrides) = args.into_parts();
                commands::prove_absence(leaves, overrides, target_index, target).await
            }
        },
        Commands::ConfigSchema => commands::tree_configuration_schema(),
    };

    if let Err(e) = res {
        tracing::error!("Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
