//! Betslip CLI
//!
//! Requests betslips for a target odd, shows the account's generation
//! allowance, and manages the locally saved history.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use betslip_core::config::{Config, load_config};
use betslip_core::history::save_betslip;
use betslip_core::tracing_init::{default_filter, init_tracing};
use betslip_core::{AccessGate, TargetOddInput};

use betslip_cli::api::ApiClient;
use betslip_cli::auth_cmd::{self, AuthAction};
use betslip_cli::fmt::{write_account, write_betslip_detail};
use betslip_cli::generate::{GenerateError, Generator};
use betslip_cli::history_cmd::{self, HistoryAction};
use betslip_cli::session::{Session, SessionFile, SessionSource};
use betslip_cli::storage::HistoryDatabase;

#[derive(Parser, Debug)]
#[command(name = "betslip")]
#[command(version, about = "Betslip generator client", long_about = None)]
struct Cli {
    /// Backend API base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Config file path (defaults to ~/.config/betslip/settings.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Saved-history database path (overrides config)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Generate betslips for a target odd.
    Generate {
        /// Target combined odd, between 1.10 and 10.00.
        odd: String,
        /// Add the generated betslips to the saved history.
        #[arg(long)]
        save: bool,
    },
    /// Check a target odd without contacting the server.
    CheckOdd {
        /// Raw input; anything but digits and one decimal point is dropped.
        odd: String,
    },
    /// Show the account and its generation allowance.
    Status {
        /// Reload the profile from the server first.
        #[arg(long)]
        refresh: bool,
    },
    /// Manage authentication.
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Manage saved betslips.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = cli.db_path {
        config.storage.database_path = Some(path);
    }

    init_tracing(
        &default_filter(&config.logging.level),
        cli.log_json || config.logging.json,
    );
    info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        "Starting betslip CLI"
    );

    let session_path = SessionFile::session_path().context("Cannot determine home directory")?;
    let mut session_file = SessionFile::load_from(&session_path);
    let mut out = io::stdout();

    match cli.command {
        Command::Generate { odd, save } => {
            generate(&config, session_file, session_path, &odd, save, &mut out).await
        }
        Command::CheckOdd { odd } => check_odd(&odd, &mut out),
        Command::Status { refresh } => {
            status(&config, session_file, session_path, refresh, &mut out).await
        }
        Command::Auth { action } => {
            auth_cmd::run(action, &mut session_file, &session_path, &config.api).await
        }
        Command::History { action } => {
            let db = open_history(&config).await?;
            history_cmd::run(action, &db, &mut out).await
        }
    }
}

async fn open_history(config: &Config) -> anyhow::Result<HistoryDatabase> {
    let path = config
        .storage
        .resolved_database_path()
        .context("Cannot determine data directory; set BETSLIP_DB_PATH")?;
    Ok(HistoryDatabase::open(&path).await?)
}

async fn generate(
    config: &Config,
    session_file: SessionFile,
    session_path: PathBuf,
    odd: &str,
    save: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api, session_file.access_token())?;
    let mut session = Session::new(session_file, Some(session_path), client.clone());
    let generator = Generator::new(client);

    let report = match generator.generate(&mut session, odd).await {
        Ok(report) => report,
        Err(GenerateError::Network { kind, message }) => {
            warn!(%message, "Generation request failed");
            anyhow::bail!("{kind}");
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(notice) = &report.notice {
        writeln!(out, "{notice}")?;
    }
    for slip in &report.betslips {
        write_betslip_detail(out, slip)?;
        writeln!(out)?;
    }
    if !report.betslips.is_empty() {
        writeln!(
            out,
            "Generated {} betslip(s) for target odd {:.2}",
            report.betslips.len(),
            report.target_odd
        )?;
    }
    if let Some(fresh) = &report.refreshed {
        writeln!(out, "Credits left: {}", fresh.credits)?;
    }
    if report.low_credits {
        writeln!(
            out,
            "Warning: fewer than {} credits left; the next generation will be refused.",
            generator.gate().credits_required()
        )?;
    }

    if save && !report.betslips.is_empty() {
        let db = open_history(config).await?;
        let mut saved = 0;
        for slip in &report.betslips {
            if save_betslip(&db, slip).await? {
                saved += 1;
            }
        }
        writeln!(out, "Saved {saved} betslip(s) to history")?;
    }
    Ok(())
}

fn check_odd(raw: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let mut input = TargetOddInput::new();
    input.edit(raw);
    if input.as_str() != raw {
        writeln!(out, "Input read as: {}", input.as_str())?;
    }
    let odd = input.submit()?;
    writeln!(out, "Valid target odd: {odd:.2}")?;
    Ok(())
}

async fn status(
    config: &Config,
    session_file: SessionFile,
    session_path: PathBuf,
    refresh: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api, session_file.access_token())?;
    let mut session = Session::new(session_file, Some(session_path), client);

    if refresh
        && session.state().is_authenticated
        && let Err(e) = session.refresh().await
    {
        warn!(error = %e, "Profile refresh failed");
        writeln!(out, "Could not refresh profile: {e}")?;
    }

    let state = session.state();
    let status = AccessGate::new().credit_status(&state);
    write_account(out, &state, status)?;
    Ok(())
}
