//! `vista` binary: opens the sample gallery in a native window.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use vista::{Catalog, Options, Route, SampleRegistry, Viewer};

/// Browse interactive real-time rendering samples.
#[derive(Debug, Parser)]
#[command(name = "vista", version, about)]
struct Cli {
    /// Address to open, e.g. `/category/basics/basic-cube`.
    address: Option<String>,

    /// TOML options file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List every category and sample, then exit.
    #[arg(long)]
    list: bool,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if cli.list {
        return list_samples();
    }

    let options = match &cli.config {
        Some(path) => Options::load(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => Options::default(),
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(address) = cli.address {
        builder = builder.with_address(address);
    }
    builder.build().run().context("viewer exited with an error")
}

#[allow(clippy::print_stdout)]
fn list_samples() -> anyhow::Result<()> {
    let registry = SampleRegistry::builtin()?;
    for line in catalog_lines(&registry) {
        println!("{line}");
    }
    Ok(())
}

/// One line per category, then one indented line per sample with the
/// address that opens it.
fn catalog_lines(registry: &SampleRegistry) -> Vec<String> {
    let mut lines = Vec::new();
    for category in Catalog::builtin().all() {
        lines.push(format!("{} ({})", category.title, category.id));
        for entry in registry.lookup_category(category.id) {
            let address = Route::sample(category.id, entry.id()).path();
            lines.push(format!("  {address}  {}", entry.title()));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_addresses_are_canonical() {
        let registry = SampleRegistry::builtin().unwrap();
        let addresses: Vec<String> = catalog_lines(&registry)
            .iter()
            .filter_map(|line| line.strip_prefix("  "))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_owned)
            .collect();
        assert_eq!(addresses.len(), registry.sample_count());
        for address in addresses {
            let resolved = Route::resolve(&address);
            assert!(!resolved.is_redirect(), "{address}");
            assert_eq!(resolved.route().path(), address);
        }
    }
}
