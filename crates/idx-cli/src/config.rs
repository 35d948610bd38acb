//! `idx.json` loading and option resolution.
//!
//! ```json
//! {
//!   "marker": "idx",
//!   "markerModule": "idx",
//!   "lowerAsync": true,
//!   "passOrder": "async-first",
//!   "stripMarkerImports": true,
//!   "outDir": "dist",
//!   "files": ["src/a.js"]
//! }
//! ```
//!
//! Command-line flags override file values; relative paths in the file are
//! resolved against the file's directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use idx_emitter::{EmitOptions, PassOrder};

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "idx.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{0}' is not a valid marker identifier")]
    InvalidMarker(String),

    #[error("no input files (pass files or set \"files\" in idx.json)")]
    NoInputFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdxConfig {
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub marker_module: Option<String>,
    #[serde(default)]
    pub lower_async: Option<bool>,
    #[serde(default)]
    pub pass_order: Option<PassOrder>,
    #[serde(default)]
    pub strip_marker_imports: Option<bool>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// Everything the driver needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub emit: EmitOptions,
    pub files: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

pub fn parse_config(source: &str) -> Result<IdxConfig, serde_json::Error> {
    serde_json::from_str(source)
}

pub fn load_config(path: &Path) -> Result<IdxConfig, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&source).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `idx.json` in `dir`, if there is one.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Merge CLI flags over config values. `base_dir` anchors relative paths
/// from the config file.
pub fn resolve_options(
    args: &CliArgs,
    config: &IdxConfig,
    base_dir: &Path,
) -> Result<ResolvedOptions, ConfigError> {
    let defaults = EmitOptions::default();

    let marker = args
        .marker
        .clone()
        .or_else(|| config.marker.clone())
        .unwrap_or(defaults.marker);
    if !is_identifier(&marker) {
        return Err(ConfigError::InvalidMarker(marker));
    }
    let marker_module = args
        .marker_module
        .clone()
        .or_else(|| config.marker_module.clone())
        .unwrap_or(defaults.marker_module);

    let emit = EmitOptions {
        marker,
        marker_module,
        lower_async: args.lower_async || config.lower_async.unwrap_or(defaults.lower_async),
        pass_order: args
            .pass_order
            .map(PassOrder::from)
            .or(config.pass_order)
            .unwrap_or(defaults.pass_order),
        strip_marker_imports: !args.keep_marker_imports
            && config
                .strip_marker_imports
                .unwrap_or(defaults.strip_marker_imports),
    };

    let files: Vec<PathBuf> = if args.files.is_empty() {
        config
            .files
            .iter()
            .flatten()
            .map(|file| base_dir.join(file))
            .collect()
    } else {
        args.files.clone()
    };
    if files.is_empty() {
        return Err(ConfigError::NoInputFiles);
    }

    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| config.out_dir.as_ref().map(|dir| base_dir.join(dir)));

    Ok(ResolvedOptions {
        emit,
        files,
        out_dir,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
