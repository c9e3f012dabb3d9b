//! PersonDB CLI Client
//!
//! Command-line interface for interacting with a PersonDB server.

use std::path::PathBuf;

use clap::Parser;
use persondb::client::{ConsoleSource, Session};
use persondb::network::Client;
use persondb::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// PersonDB CLI
#[derive(Parser, Debug)]
#[command(name = "persondb-cli")]
#[command(about = "CLI for a PersonDB server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5555")]
    server: String,

    /// Response timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Run this script and exit instead of reading the console
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .listen_addr(&args.server)
        .response_timeout_ms(args.timeout_ms)
        .build();

    let client = match Client::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to open client socket: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = Session::new(client, std::io::stdout());

    let mut console = ConsoleSource::stdin();
    let result = session.initialize(&mut console).and_then(|_| match &args.script {
        Some(path) => session.execute_script(path),
        None => session.run(&mut console),
    });

    if let Err(e) = result {
        eprintln!("Client error: {}", e);
        std::process::exit(1);
    }
}
