//! Tests for fetch, rows, annotate and the global --data-dir.

use super::parse;
use crate::cli::{Cli, CliCommand, DEFAULT_CSV_PATH};
use clap::Parser;
use std::path::{Path, PathBuf};

#[test]
fn cli_parse_fetch_default_csv() {
    match parse(&["capfetch", "fetch"]) {
        CliCommand::Fetch { csv } => assert_eq!(csv, PathBuf::from(DEFAULT_CSV_PATH)),
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_csv() {
    match parse(&["capfetch", "fetch", "photos.csv"]) {
        CliCommand::Fetch { csv } => assert_eq!(csv, Path::new("photos.csv")),
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_rows() {
    match parse(&["capfetch", "rows", "in.csv"]) {
        CliCommand::Rows { csv } => assert_eq!(csv, Path::new("in.csv")),
        _ => panic!("expected Rows"),
    }
}

#[test]
fn cli_parse_annotate_defaults() {
    match parse(&["capfetch", "annotate"]) {
        CliCommand::Annotate { csv, force, output } => {
            assert_eq!(csv, PathBuf::from(DEFAULT_CSV_PATH));
            assert!(!force);
            assert!(output.is_none());
        }
        _ => panic!("expected Annotate"),
    }
}

#[test]
fn cli_parse_annotate_force_output() {
    match parse(&["capfetch", "annotate", "a.csv", "--force", "--output", "b.csv"]) {
        CliCommand::Annotate { csv, force, output } => {
            assert_eq!(csv, Path::new("a.csv"));
            assert!(force);
            assert_eq!(output.as_deref(), Some(Path::new("b.csv")));
        }
        _ => panic!("expected Annotate"),
    }
}

#[test]
fn cli_parse_data_dir_after_subcommand() {
    let cli = Cli::try_parse_from(["capfetch", "fetch", "--data-dir", "/tmp/imgs"]).unwrap();
    assert_eq!(cli.data_dir.as_deref(), Some(Path::new("/tmp/imgs")));
    assert!(matches!(cli.command, CliCommand::Fetch { .. }));
}

#[test]
fn cli_parse_data_dir_before_subcommand() {
    let cli = Cli::try_parse_from(["capfetch", "--data-dir", "d", "rows"]).unwrap();
    assert_eq!(cli.data_dir.as_deref(), Some(Path::new("d")));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["capfetch"]).is_err());
}
