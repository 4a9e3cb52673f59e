// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the identity bridge server
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;

use rust_identity_bridge::config::{utils, Config};
use rust_identity_bridge::server;

/// OAuth2 login bridge issuing short-lived signed session tokens
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Web server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Web server bind address
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// HMAC secret for JWT signing
    #[arg(long)]
    hmac_secret: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn init_logging(args: &Args) {
    let default_level = if args.quiet {
        "off"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

#[rocket::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let mut config = Config::from_file(&args.config)?;
    config.apply_env();
    config.apply_args(args.port, args.address.clone(), args.hmac_secret.clone());
    utils::validate(&config)?;

    info!(
        "Starting {} on {}:{}",
        config.server.name, config.server.address, config.server.port
    );

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()))
        .merge(("ident", config.server.name.clone()));

    let rocket = server::build_rocket(figment, Arc::new(config))?;
    let _ = rocket.launch().await?;

    Ok(())
}
