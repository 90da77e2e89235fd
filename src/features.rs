use crate::backend::{strip_trailer, FeatureExtractorBackend};
use crate::vocab::VocabFilter;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Run the recurrent extractor over the full character stream and return one
/// feature string per input character, in input order.
///
/// Each code point is passed through the vocabulary filter before the
/// external process sees it. The staged input is a single space-separated
/// line in a scoped transient file that is removed on every exit path.
pub fn extract_features<B: FeatureExtractorBackend + ?Sized>(
    backend: &B,
    model: &Path,
    vocab: &VocabFilter,
    chars: &[char],
) -> Result<Vec<String>> {
    let codes: Vec<String> = chars
        .iter()
        .map(|&c| vocab.replace(c as u32).to_string())
        .collect();

    let mut staged =
        NamedTempFile::new().context("Failed to create transient feature input file")?;
    writeln!(staged, "{}", codes.join(" "))
        .context("Failed to stage character codes for feature extraction")?;
    staged
        .flush()
        .context("Failed to flush staged feature input")?;

    debug!(
        characters = chars.len(),
        input = %staged.path().display(),
        "Staged feature-extraction input"
    );

    let raw = backend.extract(model, staged.path())?;
    let lines: Vec<String> = strip_trailer(&raw).lines().map(str::to_owned).collect();

    // One feature line per input character; anything else would silently
    // shift every downstream tag, so misalignment is fatal here.
    if lines.len() != chars.len() {
        bail!(
            "Recurrent extractor returned {} feature lines for {} input characters",
            lines.len(),
            chars.len()
        );
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Double that records the staged input and replays canned output
    struct CannedExtractor {
        stdout: String,
        staged: RefCell<Option<String>>,
    }

    impl CannedExtractor {
        fn new(stdout: &str) -> Self {
            Self {
                stdout: stdout.to_string(),
                staged: RefCell::new(None),
            }
        }
    }

    impl FeatureExtractorBackend for CannedExtractor {
        fn extract(&self, _model: &Path, input: &Path) -> Result<String> {
            let content = std::fs::read_to_string(input)?;
            *self.staged.borrow_mut() = Some(content);
            Ok(self.stdout.clone())
        }
    }

    #[test]
    fn test_features_aligned_with_characters() {
        let backend = CannedExtractor::new("h1\nh2\nh3\n\n");
        let chars = ['a', 'b', 'c'];
        let model = PathBuf::from("elman");

        let features =
            extract_features(&backend, &model, &VocabFilter::identity(), &chars).unwrap();
        assert_eq!(features, vec!["h1", "h2", "h3"]);

        let staged = staged_line(&backend);
        assert_eq!(staged, "97 98 99");
    }

    #[test]
    fn test_vocabulary_filter_applied_before_staging() {
        let backend = CannedExtractor::new("h1\nh2\n\n");
        let chars = ['a', 'z'];
        let model = PathBuf::from("elman");

        let dir = tempfile::TempDir::new().unwrap();
        let vocab_path = dir.path().join("vocab");
        std::fs::write(&vocab_path, "97").unwrap();
        let vocab = VocabFilter::load(&vocab_path).unwrap();

        extract_features(&backend, &model, &vocab, &chars).unwrap();
        assert_eq!(staged_line(&backend), "97 65533");
    }

    #[test]
    fn test_misaligned_output_is_fatal() {
        let backend = CannedExtractor::new("h1\nh2\n\n");
        let chars = ['a', 'b', 'c'];
        let model = PathBuf::from("elman");

        let err = extract_features(&backend, &model, &VocabFilter::identity(), &chars)
            .unwrap_err();
        assert!(err.to_string().contains("feature lines"));
    }

    fn staged_line(backend: &CannedExtractor) -> String {
        backend
            .staged
            .borrow()
            .as_ref()
            .unwrap()
            .trim_end()
            .to_string()
    }
}
