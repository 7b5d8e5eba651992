//! CLI for the simchef page packager.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use simchef_core::chef::{Chef, ChefPaths};
use simchef_core::config::{self, ChefConfig};
use simchef_core::http::CurlClient;
use std::path::PathBuf;

use commands::{run_build, run_fetch, run_pipeline, run_status};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "simchef")]
#[command(
    about = "simchef: package localized simulation pages as deterministic HTML5 zips",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/simchef/config.toml, created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for downloads, zips and channel.json (overrides the config).
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every language, package it and write channel.json (default).
    Run,

    /// Only fetch languages missing from the archive store.
    Fetch,

    /// Package what is already in the archive store and write channel.json.
    Build,

    /// List archive store records and whether their pages are still on disk.
    Status,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = cli.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let paths = ChefPaths::resolve(&cfg, cli.data_dir.as_deref());
        let client = CurlClient::new(&cfg.http);
        let chef = Chef::new(cfg, paths, client);

        match cli.command.unwrap_or(CliCommand::Run) {
            CliCommand::Run => run_pipeline(&chef)?,
            CliCommand::Fetch => run_fetch(&chef)?,
            CliCommand::Build => run_build(&chef)?,
            CliCommand::Status => run_status(&chef)?,
        }

        Ok(())
    }

    fn load_config(&self) -> Result<ChefConfig> {
        match &self.config {
            Some(path) => config::load_or_init_at(path),
            None => config::load_or_init(),
        }
    }
}

#[cfg(test)]
mod tests;
