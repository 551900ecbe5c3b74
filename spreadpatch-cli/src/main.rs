mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ApplyOverrides, ConfigMerger};
use fs_err as fs;
use spreadpatch_edit::{apply_patch, catalog, failure_receipt, ApplyOptions, EditError};
use spreadpatch_render::render_receipt_md;
use spreadpatch_types::patch::MatchMode;
use spreadpatch_types::receipt::{PatchReceipt, ToolInfo};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "spreadpatch",
    version,
    about = "Patch a generated recast bundle to parse object spread elements."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a patch to the target file in place.
    Apply(ApplyArgs),
    /// Show what a patch looks for and what it writes.
    Explain(ExplainArgs),
    /// List the built-in patches.
    ListPatches(ListPatchesArgs),
}

#[derive(Debug, Parser)]
struct ApplyArgs {
    /// Root directory; the target and config file are resolved against it.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// File to patch (default: tmp/src/recast.js, or [target].path from spreadpatch.toml).
    #[arg(long)]
    target: Option<Utf8PathBuf>,

    /// Built-in patch id (default: recast-object-spread).
    #[arg(long)]
    patch: Option<String>,

    /// How many fragment occurrences may be rewritten.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Compute the result without writing the target.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print a unified diff of the change to stdout.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// Copy the original aside before overwriting it.
    #[arg(long, default_value_t = false, conflicts_with = "no_backup")]
    backup: bool,

    /// Never write a backup, even if spreadpatch.toml enables it.
    #[arg(long, default_value_t = false)]
    no_backup: bool,

    /// Write receipt.json, receipt.md and patch.diff into this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Patch id to explain (e.g., "recast-object-spread" or "object-spread").
    patch: String,
}

#[derive(Debug, Parser)]
struct ListPatchesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    ExactlyOne,
    First,
    All,
}

impl From<ModeArg> for MatchMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::ExactlyOne => MatchMode::ExactlyOne,
            ModeArg::First => MatchMode::First,
            ModeArg::All => MatchMode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Explain(args) => cmd_explain(args),
        Command::ListPatches(args) => cmd_list_patches(args),
    }
}

/// 2 for policy blocks, 1 for everything else.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<EditError>()
        .map(EditError::exit_code)
        .unwrap_or(1)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let root = args.root;

    let file_config = config::load_or_default(&root).context("load spreadpatch.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_apply_args(ApplyOverrides {
        target: args.target,
        patch: args.patch,
        mode: args.mode.map(MatchMode::from),
        backup: args.backup,
        no_backup: args.no_backup,
    });
    debug!("merged config: {:?}", merged);

    let Some(spec) = explain::lookup_patch(&merged.patch_id) else {
        anyhow::bail!(
            "unknown patch '{}'; available patches: {}",
            merged.patch_id,
            catalog::ids().join(", ")
        );
    };

    let target = merged.target_in(&root);
    let opts = ApplyOptions {
        mode: merged.mode,
        dry_run: args.dry_run,
        backup: merged.backup.clone(),
    };

    // Fail before the target is touched if receipts cannot be written.
    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
    }

    let outcome = match apply_patch(&target, &spec, &opts) {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(out_dir) = &args.out_dir {
                let receipt = failure_receipt(tool_info(), &spec, &target, &opts, &err);
                if let Err(e) = write_artifacts(out_dir, &receipt, "") {
                    warn!("failed to write receipt to {}: {:#}", out_dir, e);
                }
            }
            return Err(err.into());
        }
    };

    let diff = outcome.diff();
    if args.diff {
        print!("{}", diff);
    }

    if let Some(out_dir) = &args.out_dir {
        // The target is already written; a receipt failure must not turn that into exit 1.
        match write_artifacts(out_dir, &outcome.receipt(tool_info()), &diff) {
            Ok(()) => info!("wrote receipt to {}", out_dir),
            Err(e) => warn!("failed to write receipt to {}: {:#}", out_dir, e),
        }
    }

    if outcome.written {
        println!(
            "patched {} ({} of {} occurrence(s), line {})",
            outcome.path, outcome.replaced, outcome.matches, outcome.first_line
        );
    } else {
        println!(
            "dry-run: would patch {} ({} of {} occurrence(s), line {})",
            outcome.path, outcome.replaced, outcome.matches, outcome.first_line
        );
    }
    Ok(())
}

fn write_artifacts(out_dir: &Utf8Path, receipt: &PatchReceipt, diff: &str) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
    write_json(&out_dir.join("receipt.json"), receipt)?;
    fs::write(out_dir.join("receipt.md"), render_receipt_md(receipt))?;
    fs::write(out_dir.join("patch.diff"), diff)?;
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "spreadpatch".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let Some(spec) = explain::lookup_patch(&args.patch) else {
        anyhow::bail!(
            "Unknown patch: '{}'\n\nAvailable patches: {}",
            args.patch,
            catalog::ids().join(", ")
        );
    };
    print!("{}", explain::render_explanation(&spec)?);
    Ok(())
}

fn cmd_list_patches(args: ListPatchesArgs) -> anyhow::Result<()> {
    let patches = catalog::all();
    match args.format {
        OutputFormat::Text => {
            println!("Available patches:\n");
            println!("  {:<24} TITLE", "ID");
            println!("  {:<24} -----", "--");
            for p in &patches {
                println!("  {:<24} {}", p.id, p.title);
            }
            println!();
            println!("Default target: {}", catalog::DEFAULT_TARGET);
            println!("Use 'spreadpatch explain <id>' for details.");
        }
        OutputFormat::Json => {
            let list: Vec<_> = patches
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "title": p.title,
                        "default_target": catalog::DEFAULT_TARGET,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }
    Ok(())
}
