//! multikv Server Binary
//!
//! Starts the TCP server for multikv.

use std::sync::Arc;

use clap::Parser;
use multikv::network::Server;
use multikv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// multikv Server
#[derive(Parser, Debug)]
#[command(name = "multikv-server")]
#[command(about = "In-memory multi-type key-value server")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Close idle connections after this many milliseconds (0 = never)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Longest accepted request line in bytes
    #[arg(long, default_value = "65536")]
    max_line_length: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,multikv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("multikv Server v{}", multikv::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .max_line_length(args.max_line_length)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let engine = Arc::new(Engine::new());

    // Start server
    let mut server = Server::new(config, engine);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
