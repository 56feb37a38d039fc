use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use j2g::Pipeline;
use j2g_core::config::Config;
use j2g_feeds::{stdin_reader, JournalCommand};
use j2g_transport::UdpTransport;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "j2g",
    about = "Forward systemd journal entries to a GELF collector over UDP"
)]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(long)]
    debug: bool,

    /// Config file to layer over the defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read journal JSON records from stdin instead of spawning journalctl.
    #[arg(long, conflicts_with = "journal_args")]
    stdin: bool,

    /// Collector address, `host:port`.
    destination: String,

    /// Extra arguments passed through to journalctl.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    journal_args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let transport = UdpTransport::connect(&cli.destination)
        .await
        .with_context(|| format!("cannot reach collector {}", cli.destination))?;
    tracing::info!(destination = %transport.peer_addr(), "forwarding journal entries");

    let pipeline = Pipeline::new(config, transport)?;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    if cli.stdin {
        pipeline.run_until(stdin_reader(), shutdown).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let (journal, records) = JournalCommand::journalctl(cli.journal_args).spawn()?;
    pipeline.run_until(records, shutdown.clone()).await?;

    // Interrupted: dropping the handle kills journalctl.
    if shutdown.is_cancelled() {
        return Ok(ExitCode::SUCCESS);
    }
    let status = journal.wait().await?;
    if !status.success() {
        tracing::warn!(%status, "journalctl exited with failure");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
