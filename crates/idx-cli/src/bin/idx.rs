#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use idx_cli::args::{CliArgs, DiagnosticsFormat};
use idx_cli::driver;
use idx_cli::reporter::Reporter;

const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    // Zero cost unless IDX_LOG or RUST_LOG is set.
    idx_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let options = driver::resolve_options(&args, &cwd)?;
    let result = driver::compile(&options, &cwd)?;

    if options.out_dir.is_none() {
        for emitted in &result.emitted {
            print!("{}", emitted.code);
        }
    }

    if result.diagnostics.is_empty() {
        return Ok(());
    }

    let color = args.pretty.unwrap_or_else(|| std::io::stderr().is_terminal());
    colored::control::set_override(color);
    let mut reporter = Reporter::new(color);
    for (file, text) in &result.sources {
        reporter.add_source(file.as_str(), text.as_str());
    }
    let rendered = match args.diagnostics {
        DiagnosticsFormat::Text => reporter.render(&result.diagnostics),
        DiagnosticsFormat::Json => reporter
            .render_json(&result.diagnostics)
            .context("failed to serialize diagnostics")?,
    };
    eprintln!("{rendered}");

    if result.has_errors() {
        std::process::exit(EXIT_DIAGNOSTICS);
    }
    Ok(())
}
