//! schema-scan binary.
//!
//! Infers an aggregate schema from a JSON file of sampled documents and
//! prints one of the derived artifacts (schema, fields, descriptions,
//! completions, or a TypeScript declaration).
//!
//! # Usage
//!
//! ```bash
//! schema-scan sample.json --name users --format typescript
//! ```

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use schema_scan::cli::{CliArgs, run};

fn main() {
    let args = CliArgs::parse();
    initialize_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Initialize logging, letting `RUST_LOG` override the verbosity flag.
fn initialize_logging(args: &CliArgs) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
