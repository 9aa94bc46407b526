//! Command-line interface for schema-scan.
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Loading a pre-collected document sample from a JSON file
//! - Selecting and printing one of the generated artifacts
//!
//! Sampling from a live server is deliberately out of scope; the binary
//! consumes a finite, already-fetched sample.

use std::path::{Path, PathBuf};

use bson::{Bson, Document};
use clap::{Parser, ValueEnum};
use tracing::debug;

use crate::completion::to_completions;
use crate::describe::{describe, descriptions};
use crate::error::{InputError, Result};
use crate::fields::flatten;
use crate::schema::{accumulate, json::to_json_schema};
use crate::typedecl::emit;

/// Statistical BSON schema inference over a document sample
#[derive(Parser, Debug)]
#[command(
    name = "schema-scan",
    version,
    about = "Infer an aggregate schema from a sample of BSON documents",
    long_about = "Reads a JSON file containing an array of (extended JSON) documents,\n\
                  accumulates an aggregate schema tree, and prints one of the derived\n\
                  artifacts: the schema itself, flattened fields, per-field\n\
                  descriptions, completion records, or a TypeScript declaration."
)]
pub struct CliArgs {
    /// JSON file containing an array of documents
    #[arg(value_name = "SAMPLE")]
    pub sample: PathBuf,

    /// Collection name used for the generated type declaration
    #[arg(short = 'n', long, default_value = "collection", value_name = "NAME")]
    pub name: String,

    /// Artifact to print
    #[arg(short = 'f', long, value_enum, default_value_t = Artifact::Schema)]
    pub format: Artifact,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Output artifact selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// JSON-Schema-flavored aggregate tree
    Schema,
    /// Flattened known-field list
    Fields,
    /// Per-field description strings
    Descriptions,
    /// Editor completion records
    Completions,
    /// TypeScript interface declaration
    Typescript,
}

/// Load a document sample from a JSON file.
///
/// # Arguments
/// * `path` - File containing a JSON array of documents
///
/// # Returns
/// * `Vec<Document>` - Decoded BSON documents
pub fn load_sample(path: &Path) -> Result<Vec<Document>> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;

    let serde_json::Value::Array(elements) = value else {
        return Err(InputError::NotAnArray.into());
    };

    let mut docs = Vec::with_capacity(elements.len());
    for (i, element) in elements.into_iter().enumerate() {
        if !element.is_object() {
            return Err(InputError::NotADocument(i).into());
        }
        let bson =
            Bson::try_from(element).map_err(|e| InputError::InvalidBson(e.to_string()))?;
        match bson {
            Bson::Document(doc) => docs.push(doc),
            _ => return Err(InputError::NotADocument(i).into()),
        }
    }

    debug!(documents = docs.len(), "sample loaded");
    Ok(docs)
}

/// Run the CLI: load the sample, accumulate, print the chosen artifact.
pub fn run(args: &CliArgs) -> Result<()> {
    let sample = load_sample(&args.sample)?;
    let mut tree = accumulate(&sample);
    tree.validate()?;

    match args.format {
        Artifact::Schema => {
            describe(&mut tree);
            println!("{}", serde_json::to_string_pretty(&to_json_schema(&tree))?);
        }
        Artifact::Fields => {
            let entries = flatten(&tree);
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Artifact::Descriptions => {
            for (path, text) in descriptions(&tree) {
                println!("{path}: {text}");
            }
        }
        Artifact::Completions => {
            let completions = to_completions(&flatten(&tree));
            println!("{}", serde_json::to_string_pretty(&completions)?);
        }
        Artifact::Typescript => {
            println!("{}", emit(&tree, &args.name));
        }
    }
    Ok(())
}
