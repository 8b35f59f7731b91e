//! Command-line interface for corpus
//! This binary parses a corpus document and exposes the round-trip tooling:
//! statistics, entry listing/export, numbering-gap detection, rebuild,
//! split into self-contained fragments, and standalone concatenation.
//!
//! Usage:
//!   corpus stats `<file>` [--format `<format>`]    - Show document statistics
//!   corpus list `<file>` [--kind `<letter>`]       - List entry ids
//!   corpus export `<file>` `<id>`                  - Print one entry's exact content
//!   corpus missing `<file>`                      - Report numbering gaps
//!   corpus validate `<file>`                     - Check the exact round-trip
//!   corpus rebuild `<file>` `<output>`             - Rebuild the document to a file
//!   corpus split `<file>` `<dir>`                  - Split into fragments + manifest
//!   corpus concatenate `<dir>`                   - Reassemble from fragments only
//!   corpus validate-split `<file>` `<dir>`         - Check the split round-trip

use clap::{Arg, Command};
use std::path::PathBuf;

use corpus::corpus::{
    concatenate, split, validate_round_trip, validate_split_round_trip, Comparison,
    CorpusDocument, DirStore,
};

fn main() {
    let matches = Command::new("corpus")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing, splitting, and rebuilding corpus documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("stats")
                .about("Show document statistics")
                .arg(file_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("list")
                .about("List entry ids")
                .arg(file_arg())
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .short('k')
                        .help("Filter by classifying letter (e.g. 'P')"),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Print one entry's exact original content")
                .arg(file_arg())
                .arg(
                    Arg::new("id")
                        .help("Entry id, e.g. 'P35'")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("missing")
                .about("Report gaps in entry numbering")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate the exact parse/rebuild round-trip")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("rebuild")
                .about("Rebuild the document to an output file")
                .arg(file_arg())
                .arg(
                    Arg::new("output")
                        .help("Path to write the rebuilt document to")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("split")
                .about("Split the document into self-contained fragments plus a manifest")
                .arg(file_arg())
                .arg(dir_arg(2)),
        )
        .subcommand(
            Command::new("concatenate")
                .about("Reassemble a document from fragments and manifest only")
                .arg(dir_arg(1)),
        )
        .subcommand(
            Command::new("validate-split")
                .about("Validate the split/concatenate round-trip")
                .arg(file_arg())
                .arg(dir_arg(2)),
        )
        .get_matches();

    let exit_code = match matches.subcommand() {
        Some(("stats", m)) => handle_stats(arg(m, "file"), arg(m, "format")),
        Some(("list", m)) => handle_list(arg(m, "file"), m.get_one::<String>("kind"), arg(m, "format")),
        Some(("export", m)) => handle_export(arg(m, "file"), arg(m, "id")),
        Some(("missing", m)) => handle_missing(arg(m, "file")),
        Some(("validate", m)) => handle_validate(arg(m, "file")),
        Some(("rebuild", m)) => handle_rebuild(arg(m, "file"), arg(m, "output")),
        Some(("split", m)) => handle_split(arg(m, "file"), arg(m, "dir")),
        Some(("concatenate", m)) => handle_concatenate(arg(m, "dir")),
        Some(("validate-split", m)) => handle_validate_split(arg(m, "file"), arg(m, "dir")),
        _ => unreachable!(),
    };
    std::process::exit(exit_code);
}

fn file_arg() -> Arg {
    Arg::new("file")
        .help("Path to the corpus document")
        .required(true)
        .index(1)
}

fn dir_arg(index: usize) -> Arg {
    Arg::new("dir")
        .help("Fragment store directory")
        .required(true)
        .index(index)
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format ('text' or 'json')")
        .default_value("text")
}

fn arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Read and parse the document, or exit with a diagnostic.
fn load_document(path: &str) -> (String, CorpusDocument) {
    let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });
    let doc = CorpusDocument::parse(&content).unwrap_or_else(|e| {
        eprintln!("Parse error: {}", e);
        std::process::exit(1);
    });
    (content, doc)
}

fn handle_stats(path: &str, format: &str) -> i32 {
    let (_, doc) = load_document(path);
    let stats = doc.stats();
    if format == "json" {
        match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                return 1;
            }
        }
    } else {
        println!("Document statistics:");
        println!("  Total lines: {}", stats.total_lines);
        println!("  Total sections: {}", stats.total_sections);
        println!("  Top-level sections: {}", stats.top_level_sections);
        println!("  Total entries: {}", stats.total_entries);
        for (tag, count) in &stats.entries_by_type {
            println!("  {} entries: {}", tag, count);
        }
    }
    0
}

fn handle_list(path: &str, kind: Option<&String>, format: &str) -> i32 {
    let (_, doc) = load_document(path);
    let type_tag = kind.and_then(|k| k.chars().next());
    let ids = doc.list_entries(type_tag);
    if format == "json" {
        match serde_json::to_string_pretty(&ids) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                return 1;
            }
        }
    } else {
        println!("Entries ({}):", ids.len());
        for id in &ids {
            match doc.entry(id) {
                Some(entry) => println!("  {}: {}", id, entry.name),
                None => println!("  {}", id),
            }
        }
    }
    0
}

fn handle_export(path: &str, id: &str) -> i32 {
    let (_, doc) = load_document(path);
    match doc.export_entry(id) {
        Some(content) => {
            print!("{}", content);
            0
        }
        None => {
            eprintln!("Error: entry {} not found", id);
            1
        }
    }
}

fn handle_missing(path: &str) -> i32 {
    let (_, doc) = load_document(path);
    let missing = doc.missing_entries();
    if missing.is_empty() {
        println!("No missing entries detected");
    } else {
        println!("Missing entries:");
        for (tag, ids) in &missing {
            println!("  {}: {}", tag, ids.join(", "));
        }
    }
    0
}

fn handle_validate(path: &str) -> i32 {
    let (content, doc) = load_document(path);
    let result = validate_round_trip(&content, &doc);
    report_comparison("Round-trip validation", &result);
    if result.is_equivalent() {
        0
    } else {
        1
    }
}

fn handle_rebuild(path: &str, output: &str) -> i32 {
    let (content, doc) = load_document(path);
    if let Err(e) = std::fs::write(output, doc.rebuild()) {
        eprintln!("Error writing {}: {}", output, e);
        return 1;
    }
    println!("Rebuilt document written to: {}", output);
    let result = validate_round_trip(&content, &doc);
    report_comparison("Validation", &result);
    0
}

fn handle_split(path: &str, dir: &str) -> i32 {
    let (_, doc) = load_document(path);
    let mut store = match DirStore::new(PathBuf::from(dir)) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            return 1;
        }
    };
    match split(&doc, &mut store) {
        Ok(manifest) => {
            println!(
                "Split into {} parts in {}/ (self-contained; reconstruct with 'concatenate')",
                manifest.parts.len(),
                dir
            );
            0
        }
        Err(e) => {
            eprintln!("Split error: {}", e);
            1
        }
    }
}

fn handle_concatenate(dir: &str) -> i32 {
    let store = match DirStore::new(PathBuf::from(dir)) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            return 1;
        }
    };
    match concatenate(&store) {
        Ok(content) => {
            print!("{}", content);
            0
        }
        Err(e) => {
            eprintln!("Concatenate error: {}", e);
            1
        }
    }
}

fn handle_validate_split(path: &str, dir: &str) -> i32 {
    let (_, doc) = load_document(path);
    let mut store = match DirStore::new(PathBuf::from(dir)) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            return 1;
        }
    };
    match validate_split_round_trip(&doc, &mut store) {
        Ok(result) => {
            report_comparison("Split-concatenate validation", &result);
            if result.is_equivalent() {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("Split validation error: {}", e);
            1
        }
    }
}

fn report_comparison(label: &str, result: &Comparison) {
    match result {
        Comparison::Equal => println!("{}: content identical", label),
        Comparison::EqualModuloLineEndings => {
            println!("{}: only line ending differences", label)
        }
        Comparison::FirstDivergence {
            byte_offset,
            line_number,
            expected,
            actual,
        } => println!(
            "{}: first difference at byte {} (line {}): {:?} vs {:?}",
            label, byte_offset, line_number, expected, actual
        ),
        Comparison::LengthMismatch {
            expected_len,
            actual_len,
        } => println!(
            "{}: length mismatch: original={}, rebuilt={}",
            label, expected_len, actual_len
        ),
    }
}
