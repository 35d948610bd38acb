use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use idx_emitter::PassOrder;

/// CLI arguments for the idx binary.
#[derive(Parser, Debug)]
#[command(
    name = "idx",
    version,
    about = "Compile idx(base, path) safe-navigation markers into guarded expressions"
)]
pub struct CliArgs {
    /// Input files. Falls back to the `files` list of the config file.
    pub files: Vec<PathBuf>,

    /// Write output files into this directory instead of stdout.
    #[arg(short = 'o', long)]
    pub out_dir: Option<PathBuf>,

    /// Identifier whose calls are rewritten.
    #[arg(long)]
    pub marker: Option<String>,

    /// Module the marker is imported or required from.
    #[arg(long)]
    pub marker_module: Option<String>,

    /// Also lower async functions onto `__awaiter` and generators.
    #[arg(long)]
    pub lower_async: bool,

    /// Whether the marker pass runs before or after async lowering.
    #[arg(long, value_enum, ignore_case = true)]
    pub pass_order: Option<PassOrderArg>,

    /// Keep `import idx from "idx"` bindings after rewriting.
    #[arg(long)]
    pub keep_marker_imports: bool,

    /// Path to an idx.json config file. Defaults to ./idx.json when present.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// How diagnostics are printed.
    #[arg(long, value_enum, default_value_t = DiagnosticsFormat::Text)]
    pub diagnostics: DiagnosticsFormat,

    /// Colorize diagnostics. Defaults to true when stderr is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PassOrderArg {
    IdxFirst,
    AsyncFirst,
}

impl From<PassOrderArg> for PassOrder {
    fn from(value: PassOrderArg) -> Self {
        match value {
            PassOrderArg::IdxFirst => PassOrder::IdxFirst,
            PassOrderArg::AsyncFirst => PassOrder::AsyncFirst,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DiagnosticsFormat {
    Text,
    Json,
}
