//! Command-line front end for the nested-set encoder
//!
//! Reads a JSON array of nested nodes (the shape drag-and-drop menu editors
//! produce), encodes it and prints the flat table as JSON keyed by identifier.

mod cli;

use anyhow::{Context, Result};
use log::info;
use std::ffi::OsString;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use nested_set::json::from_json_str;
use nested_set::Encoder;

pub use cli::{parse_args, write_usage, CliOptions};

/// Run the command with the given arguments and streams
///
/// Returns the process exit code: 0 on success, 1 when the input cannot be
/// read, decoded or encoded, and 2 for usage errors.
pub fn run<I, R, W, E>(args: I, input: &mut R, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            let _ = write_usage(err);
            return 2;
        }
    };

    if options.show_help {
        return if write_usage(out).is_ok() { 0 } else { 1 };
    }

    match execute(&options, input, out) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            1
        }
    }
}

/// Decode, encode and print one document
pub fn execute<R: Read, W: Write>(options: &CliOptions, input: &mut R, out: &mut W) -> Result<()> {
    let document = read_document(options.input.as_deref(), input)?;

    let forest = from_json_str(&document).context("Failed to decode input document")?;
    info!("Decoded {} top-level nodes", forest.len());

    let map = Encoder::new(options.encode_options())
        .encode(&forest)
        .context("Failed to encode forest")?;

    if options.validate {
        map.validate()
            .context("Encoded table failed validation")?;
        info!("Validated {} records", map.len());
    }

    let json = if options.compact {
        serde_json::to_string(&map)?
    } else {
        serde_json::to_string_pretty(&map)?
    };
    writeln!(out, "{json}").context("Failed to write output")?;

    Ok(())
}

fn read_document<R: Read>(path: Option<&Path>, input: &mut R) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display())),
        None => {
            let mut document = String::new();
            input
                .read_to_string(&mut document)
                .context("Failed to read standard input")?;
            Ok(document)
        }
    }
}
