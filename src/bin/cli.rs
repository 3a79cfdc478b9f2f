//! TideKV CLI
//!
//! Command-line interface that operates directly on a TideKV log file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tidekv::log::{LogReader, LogRecovery};
use tidekv::{Config, Store, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// TideKV CLI
#[derive(Parser, Debug)]
#[command(name = "tidekv-cli")]
#[command(about = "CLI for the TideKV log-structured key-value store")]
#[command(version)]
struct Args {
    /// Log file
    #[arg(short, long, default_value = "./tidekv.log")]
    log: PathBuf,

    /// fsync after every write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Check whether a key is indexed (it may be deleted)
    Exists {
        /// The key to check
        key: String,
    },

    /// List all indexed keys
    Keys,

    /// Print every record in the log
    Dump,

    /// Scan the log and print record statistics
    Stats,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tidekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> tidekv::Result<()> {
    // Read-only commands scan the log without opening a store, so they
    // never create the file or cut a torn tail.
    match args.command {
        Commands::Dump => return dump(&args.log),
        Commands::Stats => return stats(&args.log),
        _ => {}
    }

    let sync_strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::OsBuffered
    };
    let config = Config::builder()
        .log_path(&args.log)
        .sync_strategy(sync_strategy)
        .build();
    let store = Store::open_with_config(config)?;

    match args.command {
        Commands::Get { key } => match store.get(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
        Commands::Set { key, value } => {
            store.set(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            store.delete(key.as_bytes())?;
            println!("OK");
        }
        Commands::Exists { key } => println!("{}", store.exists(key.as_bytes())),
        Commands::Keys => {
            for key in store.keys() {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Commands::Dump | Commands::Stats => {}
    }

    store.close()
}

fn stats(path: &Path) -> tidekv::Result<()> {
    let stats = LogRecovery::verify(path)?;
    println!("records:    {}", stats.records_replayed);
    println!("tombstones: {}", stats.tombstones);
    println!("keys:       {}", stats.keys_indexed);
    println!("bytes:      {}", stats.bytes_replayed);
    println!("discarded:  {}", stats.bytes_discarded);
    Ok(())
}

fn dump(path: &Path) -> tidekv::Result<()> {
    let mut records = LogReader::open(path)?.records();

    for item in records.by_ref() {
        let (offset, record) = item?;
        println!(
            "{:>10}  ts={}  {}  {} = {}",
            offset,
            record.header.timestamp,
            if record.header.tombstone { "DEL" } else { "SET" },
            String::from_utf8_lossy(&record.key),
            String::from_utf8_lossy(&record.value),
        );
    }

    if records.discarded_bytes() > 0 {
        println!("({} trailing bytes discarded)", records.discarded_bytes());
    }
    Ok(())
}
