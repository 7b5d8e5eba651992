//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_defaults_to_no_subcommand() {
    let cli = parse(&["simchef"]);
    assert!(cli.command.is_none());
    assert!(cli.config.is_none());
    assert!(cli.data_dir.is_none());
}

#[test]
fn cli_parse_subcommands() {
    assert!(matches!(parse(&["simchef", "run"]).command, Some(CliCommand::Run)));
    assert!(matches!(parse(&["simchef", "fetch"]).command, Some(CliCommand::Fetch)));
    assert!(matches!(parse(&["simchef", "build"]).command, Some(CliCommand::Build)));
    assert!(matches!(parse(&["simchef", "status"]).command, Some(CliCommand::Status)));
}

#[test]
fn cli_parse_global_options_before_and_after_subcommand() {
    let cli = parse(&["simchef", "--config", "/tmp/c.toml", "build", "--data-dir", "out"]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/c.toml")));
    assert_eq!(cli.data_dir.as_deref(), Some(Path::new("out")));
    assert!(matches!(cli.command, Some(CliCommand::Build)));
}

#[test]
fn cli_parse_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["simchef", "upload"]).is_err());
}
