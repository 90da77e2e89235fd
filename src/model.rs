use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fixed artifact names inside a model directory
const LABELER_MODEL: &str = "wapiti";
const RECURRENT_MODEL: &str = "elman";
const VOCAB_FILE: &str = "vocab";

/// Resolved model artifacts for one segmentation run
///
/// The CRF labeler model is always present; the recurrent-feature model and
/// the vocabulary file are optional and their absence disables the
/// corresponding augmentation path.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    /// CRF labeler model (required)
    pub labeler_model: PathBuf,
    /// Recurrent-feature model, when the bundle ships one
    pub recurrent_model: Option<PathBuf>,
    /// Vocabulary filter file, when the bundle ships one
    pub vocab_file: Option<PathBuf>,
}

impl ModelBundle {
    /// Resolve the bundle inside `model_dir`.
    ///
    /// An optional artifact that exists but cannot be opened is a
    /// configuration error; silence is reserved for artifacts that are
    /// absent. "Not configured" and "misconfigured" stay distinguishable.
    pub fn resolve(model_dir: &Path) -> Result<Self> {
        if !model_dir.is_dir() {
            bail!("Model directory does not exist: {}", model_dir.display());
        }

        let labeler_model = model_dir.join(LABELER_MODEL);
        File::open(&labeler_model).with_context(|| {
            format!(
                "Required CRF labeler model is missing or unreadable: {}",
                labeler_model.display()
            )
        })?;

        let recurrent_model = optional_artifact(model_dir.join(RECURRENT_MODEL))?;
        let vocab_file = optional_artifact(model_dir.join(VOCAB_FILE))?;

        if recurrent_model.is_none() {
            warn!(
                "No recurrent-feature model in {}; labeling without auxiliary features",
                model_dir.display()
            );
        }

        Ok(Self {
            labeler_model,
            recurrent_model,
            vocab_file,
        })
    }

    /// Whether the recurrent feature-extraction pass is configured
    pub fn has_recurrent_features(&self) -> bool {
        self.recurrent_model.is_some()
    }
}

/// Probe an optional artifact: absent is fine, unreadable is fatal
fn optional_artifact(path: PathBuf) -> Result<Option<PathBuf>> {
    match File::open(&path) {
        Ok(_) => {
            debug!("Found optional model artifact: {}", path.display());
            Ok(Some(path))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Optional model artifact not present: {}", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| {
            format!(
                "Optional model artifact exists but is unreadable: {}",
                path.display()
            )
        }),
    }
}
