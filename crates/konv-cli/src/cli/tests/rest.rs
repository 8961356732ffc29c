//! Tests for stats and config.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_stats() {
    match parse(&["konv", "stats"]) {
        CliCommand::Stats { watch, service_url } => {
            assert!(!watch);
            assert!(service_url.is_none());
        }
        _ => panic!("expected Stats"),
    }
}

#[test]
fn cli_parse_stats_watch() {
    match parse(&["konv", "stats", "--watch", "--service-url", "http://localhost:9000"]) {
        CliCommand::Stats { watch, service_url } => {
            assert!(watch);
            assert_eq!(service_url.as_deref(), Some("http://localhost:9000"));
        }
        _ => panic!("expected Stats --watch"),
    }
}

#[test]
fn cli_parse_config() {
    match parse(&["konv", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["konv", "download", "x"]).is_err());
}
