//! Command-line driver for the `ebnf` crate.
//!
//! Usage:
//!   ebnfc `<path>` [--format ebnf|bnf|dbg|tokens] [--join] [--sort]
//!
//! Renderings go to stdout, diagnostics to stderr. Exits with 1 when the
//! grammar fails to scan and 2 when it fails to parse.

use std::fs;
use std::process;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use ebnf::{algebra, parse, scan, ScanOptions, WordSeparator};
use log::{debug, LevelFilter};

const SCAN_FAILURE: i32 = 1;
const PARSE_FAILURE: i32 = 2;

fn cli() -> Command {
    Command::new("ebnfc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse ISO EBNF grammars and print them as EBNF, BNF or a tree dump")
        .arg_required_else_help(true)
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
                .help("Output format")
                .value_parser(["ebnf", "bnf", "dbg", "tokens"])
                .default_value("ebnf"),
        )
        .arg(
            Arg::new("join")
                .long("join")
                .help("Merge rules defined more than once")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .help("Print the canonical form: sorted, deduplicated alternatives")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-iso")
                .long("no-iso")
                .help("Accept empty terminal strings")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("word-separator")
                .long("word-separator")
                .help("Separator used when joining the words of a meta identifier")
                .value_parser(["space", "hyphen"])
                .default_value("space"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log at debug level")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|l| LevelFilter::from_str(&l).ok())
            .unwrap_or(LevelFilter::Warn)
    };

    let res = simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );
    if let Err(e) = res {
        eprintln!("failed to initialize logging: {}", e);
    }
}

fn scan_options(matches: &ArgMatches) -> Result<ScanOptions> {
    let separator = match matches.get_one::<String>("word-separator") {
        Some(s) => WordSeparator::from_str(s).map_err(anyhow::Error::msg)?,
        None => WordSeparator::default(),
    };
    Ok(ScanOptions {
        iso: !matches.get_flag("no-iso"),
        word_separator: separator,
    })
}

/// Returns the process exit code.
fn run(matches: &ArgMatches) -> Result<i32> {
    let path = matches
        .get_one::<String>("path")
        .context("missing grammar path")?;
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("ebnf");
    let options = scan_options(matches)?;

    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    debug!("read {} bytes from {}", source.len(), path);

    let mut stream = match scan(&source, &options) {
        Ok(stream) => stream,
        Err(stream) => {
            eprint!("{}", stream.diagnostics());
            eprintln!("scan error");
            return Ok(SCAN_FAILURE);
        }
    };

    if format == "tokens" {
        println!("{}", stream);
        return Ok(0);
    }

    let ast = parse(&mut stream);
    eprint!("{}", stream.diagnostics());
    let mut ast = match ast {
        Some(ast) => ast,
        None => {
            eprintln!("parse error");
            return Ok(PARSE_FAILURE);
        }
    };

    if matches.get_flag("join") && algebra::ast_join_joinable_rules(&mut ast) {
        debug!("joined rules defined more than once");
    }
    if matches.get_flag("sort") {
        ast = algebra::canonical(&ast);
    }

    match format {
        "bnf" => print!("{}", ast.bnf()),
        "dbg" => println!("{}", ast.dbg()),
        _ => print!("{}", ast),
    }
    Ok(0)
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let code = run(&matches)?;
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
