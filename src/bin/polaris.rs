use anyhow::Context;
use clap::Parser;
use std::io::Write;

use polaris::cli::commands::{self, PolarisCommand};
use polaris::cli::{config, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    polaris::logging::init_tracing();
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Init(args) => return commands::execute_init(&args, &cli.connection),
        other => PolarisCommand::from_cli(other).context("Unrecognized command")?,
    };

    // Fail on bad arguments before touching credentials or the network
    command.validate()?;

    let file = config::load_optional()?;
    let connection = config::resolve_connection(&cli.connection, file.as_ref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    command.run(&connection, &mut out).await?;
    out.flush()?;
    Ok(())
}
