//! Command-line interface for ktfront
//! Tokenizes and parses source files with a grammar loaded at startup, and prints the result in
//! one of the processing formats.
//!
//! Usage:
//!   ktfront execute `<path>` [--format `<format>`]  - Run a processing spec over a file
//!   ktfront tokens `<path>` [--all]                - Print the token stream
//!   ktfront parse `<path>`                         - Print the leftmost derivation
//!   ktfront list-formats                         - List all available formats
//!
//! Global options: `--grammar <file>` replaces the bundled grammar, `--config <file>` layers a
//! TOML file over the defaults, `--verbose` turns on debug logging (otherwise `RUST_LOG` applies).

use clap::{Arg, ArgAction, ArgMatches, Command};
use ktfront::ktfront::config::{FrontendConfig, Loader};
use ktfront::ktfront::processor::{available_formats, Frontend, ProcessingError, ProcessingSpec};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let matches = Command::new("ktfront")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lexer and LL(1) parser front end for a small Kotlin-like language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("grammar")
                .long("grammar")
                .short('g')
                .global(true)
                .help("Grammar file to use instead of the bundled one"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML configuration layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log pipeline progress to stderr"),
        )
        .subcommand(
            Command::new("execute")
                .about("Run a processing spec over a source file")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'token-simple', 'tree-treeviz')"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a source file")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .short('a')
                        .action(ArgAction::SetTrue)
                        .help("Include whitespace, newline and comment tokens"),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a source file and print its leftmost derivation")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("execute", execute_matches)) => {
            let path = execute_matches.get_one::<String>("path").unwrap();
            let config = load_config(&matches);
            let format = execute_matches
                .get_one::<String>("format")
                .cloned()
                .unwrap_or_else(|| config.output.format.clone());
            handle_process_command(&config, path, &format);
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            let format = if tokens_matches.get_flag("all") {
                "token-raw-simple"
            } else {
                "token-simple"
            };
            handle_process_command(&load_config(&matches), path, format);
        }
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            handle_process_command(&load_config(&matches), path, "derivation-simple");
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ktfront=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_config(matches: &ArgMatches) -> FrontendConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let loader = match matches.get_one::<String>("grammar") {
        Some(grammar) => loader.set_override("grammar.path", grammar.as_str()),
        None => Ok(loader),
    };
    loader.and_then(Loader::build).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

/// Handle execute, tokens and parse
fn handle_process_command(config: &FrontendConfig, path: &str, format: &str) {
    let output = ProcessingSpec::from_string(format)
        .and_then(|spec| {
            Frontend::from_config(config)?.process_file(path, &spec)
        })
        .unwrap_or_else(|e| {
            report(&e);
            std::process::exit(1);
        });

    print!("{}", output);
}

fn report(error: &ProcessingError) {
    match error {
        ProcessingError::InvalidFormat(_)
        | ProcessingError::InvalidStage(_)
        | ProcessingError::InvalidFormatType(_) => {
            eprintln!("Error: {}", error);
            eprintln!("Run 'ktfront list-formats' to see the available formats");
        }
        _ => eprintln!("Error: {}", error),
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
