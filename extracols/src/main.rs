//! # extracols
//!
//! Print server-side tables with extra, user-defined columns.
//!
//! ## Overview
//!
//! extracols reads one or more `Table` documents (the JSON a server returns
//! when asked for `application/json;as=Table`) and prints them as
//! tab-separated text. Each `-E` spec appends a column computed from every
//! row's object with a JSONPath expression.
//!
//! ## Usage
//!
//! ```bash
//! # Add the node each pod runs on
//! extracols pods.json -E NODE:.spec.nodeName
//!
//! # Several columns, comma-separated or repeated
//! extracols pods.json -E 'IMAGES:.spec.containers[*].image,QOS:.status.qosClass'
//!
//! # Read a stream of tables from stdin, without headers
//! cat batches.json | extracols --no-headers -E NODE:.spec.nodeName
//! ```

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use extracolslib::{ExtraColumnFlags, ExtraColumnsPrinter, Object};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("extracols")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Print server-side tables with extra JSONPath columns")
        .arg(
            Arg::new("file")
                .help("Table JSON to print, '-' for stdin")
                .default_value("-"),
        )
        .arg(
            Arg::new("extra-columns")
                .short('E')
                .long("extra-columns")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help(
                    "Extra columns as <header>:<json-path-expr> specs \
                     (e.g. 'NAME:.metadata.name'), comma-separated or repeated",
                ),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output format; only 'wide' is supported"),
        )
        .arg(
            Arg::new("no-headers")
                .long("no-headers")
                .action(ArgAction::SetTrue)
                .help("Don't print headers"),
        )
        .arg(
            Arg::new("show-priority-columns")
                .long("show-priority-columns")
                .action(ArgAction::SetTrue)
                .help("Also print columns the server marks as wide-only"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug information to stderr"),
        )
}

/// Install the stderr subscriber. RUST_LOG wins over --verbose.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Only fails if a subscriber is already set, which is fine to ignore
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Build printer flags from matches
fn build_flags(matches: &ArgMatches) -> ExtraColumnFlags {
    let specs: Vec<String> = matches
        .get_many::<String>("extra-columns")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    ExtraColumnFlags::new()
        .extra_columns(specs)
        .no_headers(matches.get_flag("no-headers"))
        .show_priority_columns(matches.get_flag("show-priority-columns"))
}

/// Read the whole input, from stdin or a file
fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        Ok(input)
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read '{}'", file))
    }
}

/// Print every JSON document in `input` through the same printer
fn print_documents<W: Write>(
    printer: &mut ExtraColumnsPrinter,
    input: &str,
    output: &mut W,
) -> anyhow::Result<usize> {
    let mut count = 0;

    for (ix, document) in serde_json::Deserializer::from_str(input)
        .into_iter::<Value>()
        .enumerate()
    {
        let document = document.with_context(|| format!("invalid JSON in document {}", ix + 1))?;
        let object = Object::from_value(document)
            .with_context(|| format!("invalid Table in document {}", ix + 1))?;
        debug!(document = ix + 1, kind = object.kind(), "printing document");

        printer
            .print_obj(&object, output)
            .with_context(|| format!("failed to print document {}", ix + 1))?;
        count += 1;
    }

    Ok(count)
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let file = matches
        .get_one::<String>("file")
        .map(|s| s.as_str())
        .unwrap_or("-");
    let output_format = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("");

    let mut printer = build_flags(matches).to_printer(output_format)?;
    let input = read_input(file)?;

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    let count = print_documents(&mut printer, &input, &mut output)?;
    output.flush()?;

    debug!(documents = count, "done");
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", style("Error:").for_stderr().red().bold());
            ExitCode::FAILURE
        }
    }
}
