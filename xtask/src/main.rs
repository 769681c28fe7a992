//! Workspace build tasks: `cargo run -p vista-xtask -- <task>`.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Build tasks for the vista workspace")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Debug, Subcommand)]
enum Task {
    /// Build the vista-ui WASM bundle with trunk into crates/vista-ui/dist.
    BuildUi {
        /// Build without optimizations.
        #[arg(long)]
        debug: bool,
    },
    /// Remove the vista-ui dist directory.
    CleanUi,
}

fn workspace_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.parent().unwrap_or(manifest).to_path_buf()
}

fn build_ui(debug: bool) -> anyhow::Result<()> {
    let ui = workspace_root().join("crates/vista-ui");
    let mut trunk = Command::new("trunk");
    let _ = trunk.arg("build").current_dir(&ui);
    if !debug {
        let _ = trunk.arg("--release");
    }
    let status = trunk
        .status()
        .context("failed to run trunk (install with `cargo install trunk`)")?;
    if !status.success() {
        bail!("trunk build failed with {status}");
    }
    Ok(())
}

fn clean_ui() -> anyhow::Result<()> {
    let dist = workspace_root().join("crates/vista-ui/dist");
    if dist.exists() {
        std::fs::remove_dir_all(&dist)
            .with_context(|| format!("removing {}", dist.display()))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().task {
        Task::BuildUi { debug } => build_ui(debug),
        Task::CleanUi => clean_ui(),
    }
}
