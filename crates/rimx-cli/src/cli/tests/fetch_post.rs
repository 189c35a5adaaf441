//! Tests for fetch and post subcommands.

use super::{parse, parse_full};
use crate::cli::commands::{fetch_inputs, post_inputs, run_post};
use crate::cli::{Cli, CliCommand, Host};
use clap::Parser;
use rimx_core::config::RimxConfig;
use rimx_core::invocation::{LoadRemoteImage, PostImageToRemote};
use rimx_core::{ExchangeError, ImageRef};

#[test]
fn cli_parse_fetch_defaults() {
    match parse(&["rimx", "fetch", "https://example.com/cat.png"]) {
        CliCommand::Fetch {
            url,
            node_id,
            intermediate,
        } => {
            assert_eq!(url, "https://example.com/cat.png");
            assert_eq!(node_id, "cli");
            assert!(!intermediate);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_flags() {
    let cli = parse_full(&[
        "rimx",
        "fetch",
        "https://example.com/x.jpg",
        "--node-id",
        "n7",
        "--intermediate",
        "--session-id",
        "graph-42",
    ]);
    assert_eq!(cli.session_id, "graph-42");
    match cli.command {
        CliCommand::Fetch {
            node_id,
            intermediate,
            ..
        } => {
            assert_eq!(node_id, "n7");
            assert!(intermediate);
        }
        _ => panic!("expected Fetch with flags"),
    }
}

#[test]
fn cli_parse_fetch_requires_url() {
    assert!(Cli::try_parse_from(["rimx", "fetch"]).is_err());
}

#[test]
fn cli_parse_post_with_endpoint() {
    match parse(&["rimx", "post", "0011aabbccddeeff", "http://127.0.0.1:9000/up"]) {
        CliCommand::Post { image, endpoint } => {
            assert_eq!(image, "0011aabbccddeeff");
            assert_eq!(endpoint.as_deref(), Some("http://127.0.0.1:9000/up"));
        }
        _ => panic!("expected Post"),
    }
}

#[test]
fn cli_parse_post_without_endpoint() {
    match parse(&["rimx", "post", "abc"]) {
        CliCommand::Post { image, endpoint } => {
            assert_eq!(image, "abc");
            assert!(endpoint.is_none());
        }
        _ => panic!("expected Post"),
    }
}

#[test]
fn fetch_inputs_match_load_remote_image() {
    let inv: LoadRemoteImage =
        serde_json::from_value(fetch_inputs("https://example.com/a.png", "node-7", true)).unwrap();
    assert_eq!(inv.id, "node-7");
    assert!(inv.is_intermediate);
    assert_eq!(inv.image_url, "https://example.com/a.png");
}

#[test]
fn post_inputs_match_post_image_to_remote() {
    let inv: PostImageToRemote =
        serde_json::from_value(post_inputs("0011aabbccddeeff", "http://127.0.0.1:9000/up")).unwrap();
    assert_eq!(inv.image, ImageRef::new("0011aabbccddeeff"));
    assert_eq!(inv.endpoint, "http://127.0.0.1:9000/up");
}

#[test]
fn post_dispatches_through_registry_to_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RimxConfig {
        store_dir: Some(dir.path().to_path_buf()),
        ..RimxConfig::default()
    };
    let host = Host::from_config(cfg).unwrap();
    let ctx = host.context("sess");

    // Unknown image: the operation fails at the store lookup, before any request.
    let err = run_post(&host.registry, &ctx, "0000000000000000", "http://127.0.0.1:9/up")
        .unwrap_err();
    match err.downcast_ref::<ExchangeError>() {
        Some(ExchangeError::Store(_)) => {}
        other => panic!("expected a store error, got {other:?}"),
    }
}
