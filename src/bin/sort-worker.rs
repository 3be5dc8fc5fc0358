//! Sort Worker Daemon
//!
//! A distributed worker process: binds a TCP listener and serves sort
//! requests from a coordinator until killed. One worker sorts one partition
//! per dispatch; it holds no state between requests.
//!
//! Usage:
//!   sort-worker --listen 127.0.0.1:7401

use std::net::TcpListener;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use radix_sorting::cluster;

/// Distributed sort worker
#[derive(Parser, Debug)]
#[command(name = "sort-worker")]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Address to listen on (host:port)
    #[arg(long = "listen", default_value = "127.0.0.1:7401")]
    listen: String,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let listener = TcpListener::bind(&args.listen)
        .with_context(|| format!("binding to {}", args.listen))?;
    cluster::serve(listener)?;
    Ok(())
}
