//! PersonDB Server Binary
//!
//! Loads the collection, then serves UDP requests and operator commands.

use std::path::PathBuf;

use clap::Parser;
use persondb::network::{ConsoleBridge, Server};
use persondb::{CollectionFile, Config, PersonStore};
use tracing_subscriber::{fmt, EnvFilter};

/// PersonDB Server
#[derive(Parser, Debug)]
#[command(name = "persondb-server")]
#[command(about = "Datagram server for a shared collection of persons")]
#[command(version)]
struct Args {
    /// Collection file
    #[arg(short, long, env = "PERSON_COLLECTION_FILE")]
    file: PathBuf,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5555")]
    listen: String,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,persondb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("PersonDB Server v{}", persondb::VERSION);
    tracing::info!("Collection file: {}", args.file.display());
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_file(&args.file)
        .listen_addr(&args.listen)
        .build();

    // Load the collection; a broken file must not keep the server down
    let file = CollectionFile::new(&config.data_file);
    let persons = match file.load() {
        Ok(persons) => persons,
        Err(e) => {
            tracing::error!("Failed to load collection, starting empty: {}", e);
            Vec::new()
        }
    };
    let store = PersonStore::from_persons(persons);
    tracing::info!("Collection ready with {} persons", store.len());

    let server = match Server::bind(config, store, file) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    let console = match ConsoleBridge::stdin() {
        Ok(console) => Some(console),
        Err(e) => {
            tracing::error!("Console unavailable, serving network only: {}", e);
            None
        }
    };

    println!("Server started. Type 'save' to save the collection or 'exit' to stop.");

    if let Err(e) = server.run(console) {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
