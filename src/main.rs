//! followlens - Offline analyzer for personal social-graph data exports.
//!
//! Usage:
//!   flens analyze <FILES>...      Analyze export archives or JSON files
//!   flens diff <BASE> <TARGET>    Compare two lite snapshots
//!   flens vault list              List encrypted analyses
//!   flens vault load [KEY]        Decrypt and show a stored analysis
//!   flens vault clear [KEY]       Delete stored analyses
//!   flens --help                  Show help

mod settings;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use followlens_analyze::{diff, project};
use followlens_core::{Delta, FollowMetrics, IngestConfig, LiteSnapshot, RelationshipEntry};
use followlens_ingest::{IngestFile, IngestRequest, IngestResponse, IngestSession};
use followlens_vault::{PersistedAnalysis, Vault, VaultConfig, VaultError};

use settings::Settings;

/// Number of names listed per section in text output.
const LIST_PREVIEW: usize = 20;

#[derive(Parser)]
#[command(
    name = "followlens",
    version,
    about = "Offline analyzer for personal social-graph data exports",
    long_about = "followlens reads the data export of your account and shows who follows \
                  you back, who doesn't, and what changed since last time.\n\n\
                  Nothing leaves your machine. Saved analyses are encrypted with a passphrase."
)]
struct Cli {
    /// Log more (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Vault directory (overrides settings)
    #[arg(long, global = true)]
    vault_dir: Option<PathBuf>,

    /// Environment variable holding the vault passphrase
    #[arg(long, global = true, default_value = "FOLLOWLENS_PASSPHRASE")]
    passphrase_env: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze export archives (.zip) or JSON files
    Analyze {
        /// Input files, processed in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Lite snapshot to compare against
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Write the lite snapshot of this analysis to a file
        #[arg(long)]
        snapshot_out: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Encrypt and store the analysis under this key
        #[arg(long)]
        save: Option<String>,

        /// Account username, when the export does not name it
        #[arg(long)]
        username: Option<String>,
    },

    /// Compare two lite snapshots
    Diff {
        /// Earlier snapshot
        baseline: PathBuf,

        /// Later snapshot
        target: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage encrypted analyses
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
}

#[derive(Subcommand)]
enum VaultAction {
    /// List stored keys
    List,

    /// Decrypt and show a stored analysis
    Load {
        /// Logical key (defaults to the configured default key)
        key: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete one stored analysis, or all of them
    Clear {
        /// Logical key (omit to delete everything)
        key: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let settings = Settings::load();
    init_logging(cli.verbose, &settings.log_level)?;

    match cli.command {
        Command::Analyze {
            ref files,
            ref baseline,
            ref snapshot_out,
            format,
            ref save,
            ref username,
        } => {
            let response = run_analyze(files, baseline.as_deref(), username.clone()).await?;

            if let Some(path) = snapshot_out {
                write_json(path, &project(&response.state))?;
                eprintln!("Wrote snapshot to {}", path.display());
            }

            match format {
                OutputFormat::Text => print_analysis(&response),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
            }

            if let Some(key) = save {
                let vault = open_vault(&cli, &settings).await?;
                let passphrase = passphrase(&cli.passphrase_env)?;
                let analysis =
                    PersistedAnalysis::new(response.state, response.metrics, response.warnings);
                vault
                    .save_encrypted(&analysis, &passphrase, key)
                    .await
                    .context("Failed to save analysis")?;
                eprintln!("Saved encrypted analysis as '{key}'");
            }
        }
        Command::Diff {
            ref baseline,
            ref target,
            format,
        } => {
            let baseline: LiteSnapshot = read_json(baseline)?;
            let target: LiteSnapshot = read_json(target)?;
            let delta = diff(&baseline, &target);

            match format {
                OutputFormat::Text => print_delta(&delta),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&delta)?),
            }
        }
        Command::Vault { ref action } => {
            let vault = open_vault(&cli, &settings).await?;
            run_vault(action, &vault, &cli, &settings).await?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8, default_level: &str) -> Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?,
        1 => EnvFilter::try_new("info")?,
        _ => EnvFilter::try_new("debug")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Read the inputs and run them through an ingestion session.
async fn run_analyze(
    files: &[PathBuf],
    baseline: Option<&Path>,
    username: Option<String>,
) -> Result<IngestResponse> {
    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        let file = IngestFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        inputs.push(file);
    }

    let mut request = IngestRequest::new(inputs);
    if let Some(path) = baseline {
        request = request.with_baseline(read_json(path)?);
    }

    let config = IngestConfig::builder()
        .account_username(username)
        .build()
        .map_err(|e| eyre!("Invalid configuration: {e}"))?;

    eprintln!("Analyzing {} file(s)...", files.len());
    tracing::debug!(?config, "starting ingestion session");

    let mut session = IngestSession::new(config);
    let result = session.ingest(request).await;
    session.terminate().await;

    match result {
        Ok(response) => Ok(response),
        Err(err) => {
            for warning in err.warnings() {
                eprintln!("warning: {}: {}", warning.file, warning.message);
            }
            Err(err).context("Analysis failed")
        }
    }
}

async fn run_vault(
    action: &VaultAction,
    vault: &Vault,
    cli: &Cli,
    settings: &Settings,
) -> Result<()> {
    match action {
        VaultAction::List => {
            let keys = vault.list_stored_keys().await?;
            if keys.is_empty() {
                println!("No stored analyses.");
            }
            for key in keys {
                println!("{key}");
            }
        }
        VaultAction::Load { key, format } => {
            let key = key.as_deref().unwrap_or(&settings.default_key);
            let passphrase = passphrase(&cli.passphrase_env)?;
            let analysis: PersistedAnalysis = vault
                .load_encrypted(&passphrase, key)
                .await
                .map_err(vault_error)?;

            match format {
                OutputFormat::Text => {
                    print_analysis(&IngestResponse {
                        state: analysis.state,
                        metrics: analysis.metrics,
                        warnings: analysis.warnings,
                    });
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
            }
        }
        VaultAction::Clear { key } => {
            let removed = vault.clear_encrypted(key.as_deref()).await?;
            println!("Removed {removed} stored analysis(es)");
        }
    }

    Ok(())
}

async fn open_vault(cli: &Cli, settings: &Settings) -> Result<Vault> {
    let root = cli.vault_dir.clone().or_else(|| settings.vault_dir.clone());
    let config = VaultConfig::builder()
        .root(root)
        .build()
        .map_err(|e| eyre!("Invalid vault configuration: {e}"))?;
    Vault::open(config).await.context("Failed to open vault")
}

/// Read the passphrase from the environment.
fn passphrase(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("Set the passphrase in the {var} environment variable"),
    }
}

/// Render decryption failures with an actionable message.
fn vault_error(err: VaultError) -> color_eyre::Report {
    if err.is_auth_failure() {
        eyre!("Wrong passphrase or corrupted payload; re-enter the passphrase and try again")
    } else {
        eyre!(err)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Print an analysis summary.
fn print_analysis(response: &IngestResponse) {
    let state = &response.state;

    println!();
    println!("{}", "─".repeat(60));
    match &state.account.username {
        Some(username) => println!(" @{username}"),
        None => println!(" Unknown account"),
    }
    if let Some(date) = state.account.snapshot_date {
        println!(" Snapshot taken {}", date.format("%Y-%m-%d %H:%M UTC"));
    }
    println!("{}", "─".repeat(60));
    println!();

    print_metrics(&response.metrics);
    println!();

    print_section("Not following back", &state.not_following_back);
    print_section("Fans you don't follow", &state.fans_you_dont_follow);
    print_section("Pending requests sent", &state.requests.sent);
    print_section("Recently unfollowed", &state.recently_unfollowed);

    if let Some(comparison) = &state.compare {
        println!(" Since baseline:");
        print_delta(&comparison.delta);
    }

    if !response.warnings.is_empty() {
        println!("{} warning(s) during analysis", response.warnings.len());
        for warning in &response.warnings {
            println!("   {}: {}", warning.file, warning.message);
        }
    }
}

fn print_metrics(metrics: &FollowMetrics) {
    println!(" {:<24} {:>8}", "Followers", metrics.followers_count);
    println!(" {:<24} {:>8}", "Following", metrics.following_count);
    println!(" {:<24} {:>8}", "Mutuals", metrics.mutual_count);
    println!(" {:<24} {:>8}", "Not following back", metrics.not_following_back_count);
    println!(" {:<24} {:>8}", "Fans you don't follow", metrics.fans_you_dont_follow_count);
    println!(" {:<24} {:>7.1}%", "Reciprocity", metrics.reciprocity_rate * 100.0);
    println!(" {:<24} {:>7.1}%", "Follow-back", metrics.follow_back_rate * 100.0);
}

fn print_section(title: &str, entries: &[RelationshipEntry]) {
    if entries.is_empty() {
        return;
    }

    println!(" {title} ({}):", entries.len());
    println!("   {}", names(entries));
    println!();
}

fn print_delta(delta: &Delta) {
    if delta.is_unchanged() {
        println!("   No changes.");
        println!();
        return;
    }

    for (label, entries) in [
        ("New followers", &delta.new_followers),
        ("Lost followers", &delta.lost_followers),
        ("Newly followed", &delta.new_following),
        ("Unfollowed", &delta.unfollowed),
    ] {
        if !entries.is_empty() {
            println!("   {label} ({}): {}", entries.len(), names(entries));
        }
    }
    println!("   Mutuals {:+}", delta.mutuals_delta);
    println!(
        "   Reciprocity {:.1}% -> {:.1}%",
        delta.reciprocity_before * 100.0,
        delta.reciprocity_after * 100.0
    );
    println!();
}

/// Comma-separated usernames, truncated to the preview length.
fn names(entries: &[RelationshipEntry]) -> String {
    let shown = entries
        .iter()
        .take(LIST_PREVIEW)
        .map(|entry| entry.username.as_str())
        .join(", ");
    match entries.len().saturating_sub(LIST_PREVIEW) {
        0 => shown,
        more => format!("{shown} ... and {more} more"),
    }
}
