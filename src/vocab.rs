use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Code point substituted for out-of-vocabulary characters (U+FFFD)
pub const REPLACEMENT: u32 = 0xFFFD;

/// Closed-set membership filter over character code points.
///
/// Known characters pass through unchanged, unknown ones are replaced with
/// U+FFFD so rare characters do not destabilize the recurrent extractor's
/// internal representation. Without a vocabulary the filter is the identity.
#[derive(Debug, Clone, Default)]
pub struct VocabFilter {
    known: Option<HashSet<u32>>,
}

impl VocabFilter {
    /// Filter that maps every code point to itself
    pub fn identity() -> Self {
        Self { known: None }
    }

    /// Load a vocabulary file: whitespace-separated decimal code points
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file: {}", path.display()))?;

        let mut known = HashSet::new();
        for token in content.split_whitespace() {
            let code: u32 = token.parse().with_context(|| {
                format!(
                    "Invalid vocabulary entry {:?} in {}",
                    token,
                    path.display()
                )
            })?;
            known.insert(code);
        }

        Ok(Self { known: Some(known) })
    }

    /// Load from an optional path; no path yields the identity filter
    pub fn from_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::identity()),
        }
    }

    /// Map a code point: members of the vocabulary pass through, everything
    /// else becomes U+FFFD
    pub fn replace(&self, code: u32) -> u32 {
        match &self.known {
            None => code,
            Some(set) if set.contains(&code) => code,
            Some(_) => REPLACEMENT,
        }
    }
}
