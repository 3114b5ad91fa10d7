//! Command-line interface for cocol
//! This binary extracts normalized language definitions from Cocol grammar files.
//!
//! Usage:
//!   cocol extract `<path>` [--format `<format>`] [--output `<file>`]  - Extract a language definition
//!   cocol verify `<path>`                                           - Check a grammar for structural problems

use clap::{Arg, Command};
use cocol::cocol::building::builder::DefinitionBuilder;
use cocol::cocol::diagnostics::DiagnosticSeverity;
use cocol::cocol::reading::reader::GrammarReader;
use cocol::cocol::serialization;
use cocol::cocol::verification;

fn main() {
    let matches = Command::new("cocol")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for extracting language definitions from Cocol grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("extract")
                .about("Extract a normalized language definition")
                .arg(
                    Arg::new("path")
                        .help("Path to the grammar file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('json', 'yaml' or 'text')")
                        .default_value("json"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the definition to a file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Check a grammar for structural problems")
                .arg(
                    Arg::new("path")
                        .help("Path to the grammar file")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    // Handle subcommands
    match matches.subcommand() {
        Some(("extract", extract_matches)) => {
            let path = extract_matches.get_one::<String>("path").unwrap();
            let format = extract_matches.get_one::<String>("format").unwrap();
            let output = extract_matches.get_one::<String>("output");
            handle_extract_command(path, format, output.map(|value| value.as_str()));
        }
        Some(("verify", verify_matches)) => {
            let path = verify_matches.get_one::<String>("path").unwrap();
            handle_verify_command(path);
        }
        _ => unreachable!(),
    }
}

/// Read and parse a grammar file, exiting on failure
fn read_grammar(path: &str) -> DefinitionBuilder {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    GrammarReader::read(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the extract command
fn handle_extract_command(path: &str, format: &str, output: Option<&str>) {
    let builder = read_grammar(path);
    for diagnostic in builder.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    let definition = builder.build();
    let rendered = match format {
        "json" => serialization::to_json(&definition),
        "yaml" => serialization::to_yaml(&definition),
        "text" => Ok(serialization::render_overview(&definition)),
        other => {
            eprintln!("Unknown format: {}", other);
            std::process::exit(1);
        }
    }
    .unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        std::process::exit(1);
    });

    match output {
        Some(target) => {
            if let Err(e) = std::fs::write(target, rendered) {
                eprintln!("Error writing file: {}", e);
                std::process::exit(1);
            }
        }
        None => print!("{}", rendered),
    }
}

/// Handle the verify command
fn handle_verify_command(path: &str) {
    let builder = read_grammar(path);
    for diagnostic in builder.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    let definition = builder.build();
    let findings = verification::verify(&definition);
    if findings.is_empty() {
        println!(
            "No structural problems found in {} rules.",
            definition.rules.len()
        );
        return;
    }

    for finding in &findings {
        eprintln!("{}", finding);
    }
    if findings
        .iter()
        .any(|finding| finding.severity == DiagnosticSeverity::Error)
    {
        std::process::exit(1);
    }
}
