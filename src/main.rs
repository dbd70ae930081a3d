#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! `bpass` CLI: allowlist roots and proofs, release planning, network listing.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use bpass::config::{HarnessConfig, LogFormat};
use bpass::core::allowlist::{verify_entry, AllowlistTree};
use bpass::core::release::{ReleaseError, ReleasePlan};
use bpass::core::time::{now_unix, parse_timestamp};
use bpass::core::types::{hex32, parse_hash32, Address, Allowance, Hash32};
use bpass::monitoring::init_logging;

#[derive(Parser, Debug)]
#[command(name = "bpass")]
#[command(about = "Boarding-pass allowlist and release tooling", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogFormatArg {
    Compact,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the Merkle root of a snapshot file
    Root {
        /// Snapshot data file ({address: {amount}})
        #[arg(short, long)]
        snapshot_file: PathBuf,
    },
    /// Print the proof for an (address, allowance) pair as a JSON array
    Proof {
        /// Snapshot data file ({address: {amount}})
        #[arg(short, long)]
        snapshot_file: PathBuf,
        /// Account address
        #[arg(short, long)]
        address: Address,
        /// Allowance committed for the account
        #[arg(long)]
        allowance: Allowance,
    },
    /// Check a proof against a root
    Verify {
        /// Merkle root (hex)
        #[arg(short, long)]
        root: String,
        /// Account address
        #[arg(short, long)]
        address: Address,
        /// Allowance committed for the account
        #[arg(long)]
        allowance: Allowance,
        /// Proof element (hex); repeat in leaf-to-root order
        #[arg(short, long)]
        proof: Vec<String>,
    },
    /// Compute a release window and its expected availability
    ReleasePlan {
        /// Release start (unix seconds or ISO-8601)
        #[arg(short, long)]
        start: String,
        /// Release length in seconds
        #[arg(short, long)]
        duration_secs: Option<u64>,
        /// Units released over the window
        #[arg(short, long)]
        amount: Option<u64>,
        /// Evaluate availability at this time instead of now
        #[arg(long)]
        now: Option<String>,
        /// Units already minted from this release
        #[arg(long, default_value_t = 0)]
        minted: u64,
    },
    /// List configured networks
    Networks,
}

fn load_config(path: Option<&PathBuf>) -> Result<HarnessConfig> {
    match path {
        Some(p) => HarnessConfig::load(p).with_context(|| format!("Failed to load config {p:?}")),
        None => Ok(HarnessConfig::default()),
    }
}

fn run(cli: Cli, cfg: &HarnessConfig) -> Result<bool> {
    match cli.command {
        Commands::Root { snapshot_file } => {
            let tree = AllowlistTree::from_file(&snapshot_file)
                .with_context(|| format!("Failed to build tree from {snapshot_file:?}"))?;
            info!(leaves = tree.len(), depth = tree.depth(), "tree built");
            println!("{}", tree.hex_root());
        }
        Commands::Proof {
            snapshot_file,
            address,
            allowance,
        } => {
            let tree = AllowlistTree::from_file(&snapshot_file)
                .with_context(|| format!("Failed to build tree from {snapshot_file:?}"))?;
            let proof = tree
                .hex_proof(&address, allowance)
                .context("Failed to generate proof")?;
            info!(%address, allowance, root = %tree.hex_root(), "proof generated");
            println!("{}", serde_json::to_string_pretty(&proof)?);
        }
        Commands::Verify {
            root,
            address,
            allowance,
            proof,
        } => {
            let root = parse_hash32(&root).context("Invalid Merkle root")?;
            let proof = proof
                .iter()
                .map(|p| parse_hash32(p))
                .collect::<Result<Vec<Hash32>, _>>()
                .context("Invalid proof element")?;
            let ok = verify_entry(&root, &address, allowance, &proof);
            if ok {
                info!(%address, allowance, root = %hex32(&root), "proof valid");
                println!("valid");
            } else {
                warn!(%address, allowance, root = %hex32(&root), "proof invalid");
                println!("invalid");
            }
            return Ok(ok);
        }
        Commands::ReleasePlan {
            start,
            duration_secs,
            amount,
            now,
            minted,
        } => {
            let start = parse_timestamp(&start).context("Invalid start")?;
            let now = match now {
                Some(n) => parse_timestamp(&n).context("Invalid now")?,
                None => now_unix(),
            };
            let plan = ReleasePlan::from_duration(
                start,
                duration_secs.unwrap_or(cfg.release.default_duration_secs),
                amount.unwrap_or(cfg.release.default_amount),
            )
            .context("Invalid release")?;
            info!(
                start = plan.start(),
                end = plan.end(),
                amount = plan.max_supply(),
                "release plan"
            );
            let status = plan.status(now, minted);
            if let Err(ReleaseError::StillAvailable(n)) = plan.ensure_can_replace(now, minted) {
                warn!(available = n, "release still has passes to claim; a new release would revert");
            }
            let mut out = serde_json::to_value(status)?;
            out["maxPerAddress"] = serde_json::json!(cfg.release.max_per_address);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Networks => {
            for (name, net) in &cfg.networks {
                let chain = net
                    .chain_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{name}\tchain={chain}\tlive={}\ttags={}", net.live, net.tags.join(","));
            }
        }
    }
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut cfg = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(f) = cli.log_format {
        cfg.logging.format = match f {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
    }
    if let Err(e) = init_logging(&cfg.logging) {
        eprintln!("logging init failed: {e}");
    }
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        "bpass starting"
    );

    match run(cli, &cfg) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
