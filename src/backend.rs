// WHY: the two external collaborators are modeled as injectable capability
// traits so tests can substitute in-process doubles without touching the
// orchestration logic.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Program name of the external CRF labeler
pub const LABELER_PROGRAM: &str = "wapiti";
/// Program name of the external recurrent feature extractor
pub const EXTRACTOR_PROGRAM: &str = "rnnlm";

/// Explicit executable search configuration.
///
/// Captured once at startup and passed into the process backends instead of
/// mutating the process-wide environment.
#[derive(Debug, Clone)]
pub struct ToolSearch {
    dirs: Vec<PathBuf>,
}

impl ToolSearch {
    /// Snapshot the current `PATH`
    pub fn from_env() -> Self {
        let dirs = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();
        Self { dirs }
    }

    /// Search an explicit list of directories
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Resolve `program` to an executable path.
    ///
    /// A name containing a path separator is taken as-is; a bare name is
    /// searched through the configured directories. Absence is an
    /// environment error, reported before any subprocess is spawned.
    pub fn resolve(&self, program: &str) -> Result<PathBuf> {
        let candidate = Path::new(program);
        let is_bare_name = candidate.components().count() == 1
            && matches!(candidate.components().next(), Some(Component::Normal(_)));

        if !is_bare_name {
            if candidate.is_file() {
                return Ok(candidate.to_path_buf());
            }
            bail!("External program not found: {}", program);
        }

        for dir in &self.dirs {
            let path = dir.join(program);
            if path.is_file() {
                debug!("Resolved `{}` to {}", program, path.display());
                return Ok(path);
            }
        }

        bail!("External program `{}` not found on the search path", program)
    }
}

/// Capability seam for the external CRF labeler.
pub trait LabelerBackend {
    /// Run the labeler in label mode against `model` and the staged `input`
    /// file, returning its raw standard output.
    fn label(&self, model: &Path, input: &Path) -> Result<String>;
}

/// Capability seam for the external recurrent feature extractor.
pub trait FeatureExtractorBackend {
    /// Run the extractor against `model` and the staged `input` file,
    /// returning its raw standard output.
    fn extract(&self, model: &Path, input: &Path) -> Result<String>;
}

/// `wapiti label -m <model> <input>`
#[derive(Debug, Clone)]
pub struct WapitiProcess {
    program: PathBuf,
}

impl WapitiProcess {
    pub fn locate(search: &ToolSearch) -> Result<Self> {
        Ok(Self {
            program: search.resolve(LABELER_PROGRAM)?,
        })
    }
}

impl LabelerBackend for WapitiProcess {
    fn label(&self, model: &Path, input: &Path) -> Result<String> {
        run_captured(
            Command::new(&self.program)
                .arg("label")
                .arg("-m")
                .arg(model)
                .arg(input),
        )
    }
}

/// Elman-style RNN language model in test mode: fixed hidden layer of 10
/// units, hidden-activation printing enabled.
#[derive(Debug, Clone)]
pub struct RnnlmProcess {
    program: PathBuf,
}

impl RnnlmProcess {
    pub fn locate(search: &ToolSearch) -> Result<Self> {
        Ok(Self {
            program: search.resolve(EXTRACTOR_PROGRAM)?,
        })
    }
}

impl FeatureExtractorBackend for RnnlmProcess {
    fn extract(&self, model: &Path, input: &Path) -> Result<String> {
        run_captured(
            Command::new(&self.program)
                .arg("-rnnlm")
                .arg(model)
                .arg("-test")
                .arg(input)
                .args(["-hidden", "10", "-print-hidden", "1"]),
        )
    }
}

/// Block on the subprocess and capture its standard output.
/// No timeout and no retry: a hung collaborator hangs the whole pipeline.
fn run_captured(command: &mut Command) -> Result<String> {
    debug!(?command, "Invoking external program");

    let output = command
        .output()
        .with_context(|| format!("Failed to spawn {:?}", command.get_program()))?;

    if !output.status.success() {
        bail!(
            "{:?} exited with {}: {}",
            command.get_program(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    String::from_utf8(output.stdout)
        .with_context(|| format!("{:?} emitted non-UTF-8 output", command.get_program()))
}

/// Drop the fixed two-byte terminator both external tools append to their
/// standard output. Falls back to the untouched string when the cut would
/// split a UTF-8 sequence.
pub fn strip_trailer(raw: &str) -> &str {
    let cut = raw.len().saturating_sub(2);
    raw.get(..cut).unwrap_or(raw)
}
