use anyhow::{Context, Result, anyhow};
use rustc_hash::FxHashMap;
use std::path::{Component, Path, PathBuf};

use idx_common::Diagnostic;
use idx_emitter::transpile;

use crate::args::CliArgs;
use crate::config::{self, IdxConfig, ResolvedOptions};

/// One successfully transpiled input.
#[derive(Debug, Clone)]
pub struct EmittedFile {
    pub input: PathBuf,
    /// Where the code was written, when an output directory is configured.
    pub output: Option<PathBuf>,
    pub code: String,
}

#[derive(Debug, Default)]
pub struct CompilationResult {
    pub emitted: Vec<EmittedFile>,
    pub diagnostics: Vec<Diagnostic>,
    /// Source text by diagnostic file name.
    pub sources: FxHashMap<String, String>,
}

impl CompilationResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Load the config file (explicit or `./idx.json`) and merge the CLI flags over it.
pub fn resolve_options(args: &CliArgs, cwd: &Path) -> Result<ResolvedOptions> {
    let config_path = match &args.config {
        Some(path) => Some(cwd.join(path)),
        None => config::find_config(cwd),
    };

    let (config, base_dir) = match config_path {
        Some(path) => {
            let config = config::load_config(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            let base_dir = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            tracing::debug!(config = %path.display(), "loaded config");
            (config, base_dir)
        }
        None => (IdxConfig::default(), cwd.to_path_buf()),
    };

    let resolved = config::resolve_options(args, &config, &base_dir)?;
    Ok(resolved)
}

/// Transpile every input. Files with diagnostics produce no output; the
/// others are written to the output directory or kept in the result.
///
/// Outputs keep their layout relative to the deepest directory that contains
/// every input, so `a/x.js` and `b/x.js` land in `<out>/a/x.js` and
/// `<out>/b/x.js`.
#[tracing::instrument(level = "debug", skip_all, fields(files = options.files.len()))]
pub fn compile(options: &ResolvedOptions, cwd: &Path) -> Result<CompilationResult> {
    let mut result = CompilationResult::default();
    let out_dir = options.out_dir.as_ref().map(|dir| cwd.join(dir));
    let inputs: Vec<PathBuf> = options.files.iter().map(|file| cwd.join(file)).collect();
    let root_dir = common_source_dir(&inputs);

    for (file, path) in options.files.iter().zip(&inputs) {
        let name = file.display().to_string();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        match transpile(&name, &source, &options.emit) {
            Ok(output) => {
                let written = match &out_dir {
                    Some(dir) => {
                        let relative = output_relative_path(root_dir.as_deref(), path)?;
                        Some(write_output(dir, &relative, &output.code)?)
                    }
                    None => None,
                };
                result.emitted.push(EmittedFile {
                    input: file.clone(),
                    output: written,
                    code: output.code,
                });
            }
            Err(diagnostics) => {
                tracing::debug!(file = %name, count = diagnostics.len(), "file rejected");
                result.diagnostics.extend(diagnostics);
            }
        }
        result.sources.insert(name, source);
    }

    Ok(result)
}

/// Deepest directory containing every input.
fn common_source_dir(inputs: &[PathBuf]) -> Option<PathBuf> {
    let mut parents = inputs.iter().filter_map(|input| input.parent());
    let mut common: Vec<Component<'_>> = parents.next()?.components().collect();
    for parent in parents {
        let shared = common
            .iter()
            .zip(parent.components())
            .take_while(|(left, right)| **left == *right)
            .count();
        common.truncate(shared);
    }
    Some(common.iter().collect())
}

fn output_relative_path(root_dir: Option<&Path>, input: &Path) -> Result<PathBuf> {
    if let Some(root_dir) = root_dir
        && let Ok(relative) = input.strip_prefix(root_dir)
    {
        return Ok(relative.to_path_buf());
    }
    input
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("input path has no file name: {}", input.display()))
}

fn write_output(out_dir: &Path, relative: &Path, code: &str) -> Result<PathBuf> {
    let target = out_dir.join(relative);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    std::fs::write(&target, code)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target)
}
