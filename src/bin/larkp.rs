use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use lark_parser::ast::NodeRef;
use lark_parser::error::render_diagnostics;
use lark_parser::printer::dump;

/// Parse a Lark source file and print its syntax tree.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input file
    input: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let text = fs::read(&cli.input).with_context(|| format!("failed to read {}", cli.input))?;

    let parsed = lark_parser::parse(&text);
    if !parsed.errors.is_empty() {
        eprint!(
            "{}",
            render_diagnostics(&cli.input, &parsed.errors, &parsed.lines)
        );
        return Ok(ExitCode::FAILURE);
    }

    print!("{}", dump(NodeRef::File(&parsed.file)));
    Ok(ExitCode::SUCCESS)
}
