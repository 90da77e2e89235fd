use anyhow::{Context, Result};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::backend::{
    FeatureExtractorBackend, LabelerBackend, RnnlmProcess, ToolSearch, WapitiProcess,
};
use crate::features::extract_features;
use crate::labeler::{parse_labeled_output, stage_lines, LabeledChar};
use crate::model::ModelBundle;
use crate::vocab::VocabFilter;

/// Orchestrates one segmentation run: optional feature extraction, then
/// labeling. Strictly sequential and blocking; the feature pass must finish
/// before the labeler input can be staged.
pub struct Segmenter {
    bundle: ModelBundle,
    labeler: Box<dyn LabelerBackend>,
    extractor: Option<Box<dyn FeatureExtractorBackend>>,
}

impl Segmenter {
    /// Wire up process backends for the bundle, resolving the external
    /// executables through the explicit search configuration. The extractor
    /// is only resolved when the bundle ships a recurrent model.
    pub fn from_bundle(bundle: ModelBundle, search: &ToolSearch) -> Result<Self> {
        let labeler: Box<dyn LabelerBackend> = Box::new(WapitiProcess::locate(search)?);
        let extractor: Option<Box<dyn FeatureExtractorBackend>> =
            if bundle.has_recurrent_features() {
                Some(Box::new(RnnlmProcess::locate(search)?))
            } else {
                None
            };

        Ok(Self {
            bundle,
            labeler,
            extractor,
        })
    }

    /// Build a segmenter over arbitrary backend implementations
    pub fn with_backends(
        bundle: ModelBundle,
        labeler: Box<dyn LabelerBackend>,
        extractor: Option<Box<dyn FeatureExtractorBackend>>,
    ) -> Self {
        Self {
            bundle,
            labeler,
            extractor,
        }
    }

    /// Label every character of `text`, returning the ordered labeled stream.
    pub fn segment(&self, text: &str) -> Result<Vec<LabeledChar>> {
        // A configured vocabulary file is validated on every run, whether or
        // not the recurrent pass consumes it; a malformed file is a
        // configuration error, not a quietly disabled feature.
        let vocab = VocabFilter::from_optional(self.bundle.vocab_file.as_deref())?;

        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Ok(Vec::new());
        }

        let features = match (&self.extractor, &self.bundle.recurrent_model) {
            (Some(backend), Some(model)) => {
                info!(characters = chars.len(), "Running recurrent feature extraction");
                Some(extract_features(backend.as_ref(), model, &vocab, &chars)?)
            }
            _ => None,
        };

        let staged = stage_lines(&chars, features.as_deref());
        let mut input =
            NamedTempFile::new().context("Failed to create transient labeler input file")?;
        input
            .write_all(staged.as_bytes())
            .context("Failed to stage labeler input")?;
        input.flush().context("Failed to flush staged labeler input")?;

        debug!(
            characters = chars.len(),
            input = %input.path().display(),
            "Staged labeler input"
        );

        let raw = self.labeler.label(&self.bundle.labeler_model, input.path())?;
        let labeled = parse_labeled_output(&raw)?;

        if labeled.len() != chars.len() {
            warn!(
                expected = chars.len(),
                actual = labeled.len(),
                "Labeler output length differs from input character count"
            );
        }

        info!(characters = labeled.len(), "Labeling complete");
        Ok(labeled)
    }

    /// Whether this run carries the recurrent feature pass
    pub fn has_recurrent_features(&self) -> bool {
        self.extractor.is_some()
    }
}
