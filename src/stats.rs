use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::labeler::LabeledChar;

/// Summary of one segmentation run, written as pretty-printed JSON when
/// requested on the command line
#[derive(Debug, Serialize)]
pub struct RunStats {
    /// Input characters fed to the labeler
    pub chars_in: usize,
    /// Sentence starts in the labeled stream
    pub sentences_out: usize,
    /// Token starts in the labeled stream (sentence starts open a token too)
    pub tokens_out: usize,
    /// Whether the recurrent feature pass ran
    pub recurrent_features: bool,
    /// Wall-clock time for the whole pipeline
    pub processing_time_ms: u64,
}

impl RunStats {
    /// Count boundaries straight off the labeled stream
    pub fn from_stream(
        stream: &[LabeledChar],
        chars_in: usize,
        recurrent_features: bool,
        elapsed: Duration,
    ) -> Self {
        let sentences_out = stream.iter().filter(|c| c.tag == "S").count();
        let tokens_out = stream
            .iter()
            .filter(|c| matches!(c.tag.as_str(), "S" | "T"))
            .count();

        Self {
            chars_in,
            sentences_out,
            tokens_out,
            recurrent_features,
            processing_time_ms: elapsed.as_millis() as u64,
        }
    }

    /// Persist the summary as JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write run stats to {}", path.display()))?;
        Ok(())
    }
}
