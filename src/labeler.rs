use anyhow::{bail, Context, Result};
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

use crate::backend::strip_trailer;

/// One character of the labeled stream: the original code point plus the tag
/// the external labeler assigned to it.
///
/// `S` marks a sentence start, `T` a token boundary, `I` the inside of a
/// token; other tags pass through untouched for IOB output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledChar {
    pub code: u32,
    pub tag: String,
}

impl LabeledChar {
    pub fn new(code: u32, tag: &str) -> Self {
        Self {
            code,
            tag: tag.to_string(),
        }
    }
}

/// Two-letter Unicode general category abbreviation, as the labeler models
/// were trained against (`Lu`, `Nd`, `Zs`, ...)
pub fn general_category(c: char) -> &'static str {
    match c.general_category() {
        GeneralCategory::UppercaseLetter => "Lu",
        GeneralCategory::LowercaseLetter => "Ll",
        GeneralCategory::TitlecaseLetter => "Lt",
        GeneralCategory::ModifierLetter => "Lm",
        GeneralCategory::OtherLetter => "Lo",
        GeneralCategory::NonspacingMark => "Mn",
        GeneralCategory::SpacingMark => "Mc",
        GeneralCategory::EnclosingMark => "Me",
        GeneralCategory::DecimalNumber => "Nd",
        GeneralCategory::LetterNumber => "Nl",
        GeneralCategory::OtherNumber => "No",
        GeneralCategory::ConnectorPunctuation => "Pc",
        GeneralCategory::DashPunctuation => "Pd",
        GeneralCategory::OpenPunctuation => "Ps",
        GeneralCategory::ClosePunctuation => "Pe",
        GeneralCategory::InitialPunctuation => "Pi",
        GeneralCategory::FinalPunctuation => "Pf",
        GeneralCategory::OtherPunctuation => "Po",
        GeneralCategory::MathSymbol => "Sm",
        GeneralCategory::CurrencySymbol => "Sc",
        GeneralCategory::ModifierSymbol => "Sk",
        GeneralCategory::OtherSymbol => "So",
        GeneralCategory::SpaceSeparator => "Zs",
        GeneralCategory::LineSeparator => "Zl",
        GeneralCategory::ParagraphSeparator => "Zp",
        GeneralCategory::Control => "Cc",
        GeneralCategory::Format => "Cf",
        GeneralCategory::Surrogate => "Cs",
        GeneralCategory::PrivateUse => "Co",
        GeneralCategory::Unassigned => "Cn",
    }
}

/// Build the staged labeler input: one line per character carrying the code
/// point, the general category, and the positional feature column when a
/// recurrent model is configured.
pub fn stage_lines(chars: &[char], features: Option<&[String]>) -> String {
    let mut out = String::new();
    for (i, &c) in chars.iter().enumerate() {
        out.push_str(&(c as u32).to_string());
        out.push(' ');
        out.push_str(general_category(c));
        if let Some(feature) = features.and_then(|f| f.get(i)) {
            out.push(' ');
            out.push_str(feature);
        }
        out.push('\n');
    }
    out
}

/// Parse the labeler's raw standard output into the labeled stream.
///
/// Per line the first whitespace-separated field is the character code and
/// the last field is the assigned tag; echoed middle columns are ignored.
pub fn parse_labeled_output(raw: &str) -> Result<Vec<LabeledChar>> {
    strip_trailer(raw).lines().map(parse_labeled_line).collect()
}

fn parse_labeled_line(line: &str) -> Result<LabeledChar> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        bail!("Malformed labeler output line: {:?}", line);
    }

    let code: u32 = fields[0]
        .parse()
        .with_context(|| format!("Non-numeric character code in labeler output: {:?}", line))?;

    Ok(LabeledChar {
        code,
        tag: fields[fields.len() - 1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_category_abbreviations() {
        assert_eq!(general_category('A'), "Lu");
        assert_eq!(general_category('a'), "Ll");
        assert_eq!(general_category('5'), "Nd");
        assert_eq!(general_category(' '), "Zs");
        assert_eq!(general_category('!'), "Po");
        assert_eq!(general_category('\n'), "Cc");
        assert_eq!(general_category('中'), "Lo");
    }

    #[test]
    fn test_stage_lines_without_features() {
        let staged = stage_lines(&['H', 'i'], None);
        assert_eq!(staged, "72 Lu\n105 Ll\n");
    }

    #[test]
    fn test_stage_lines_zips_features_by_position() {
        let features = vec!["f0".to_string(), "f1".to_string()];
        let staged = stage_lines(&['H', '!'], Some(&features));
        assert_eq!(staged, "72 Lu f0\n33 Po f1\n");
    }

    #[test]
    fn test_parse_takes_first_and_last_fields() {
        let stream = parse_labeled_output("72 Lu f0 S\n105 Ll f1 I\n\n").unwrap();
        assert_eq!(
            stream,
            vec![LabeledChar::new(72, "S"), LabeledChar::new(105, "I")]
        );
    }

    #[test]
    fn test_parse_rejects_short_line() {
        assert!(parse_labeled_output("72\n\n").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_code() {
        assert!(parse_labeled_output("abc S\n\n").is_err());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_labeled_output("\n\n").unwrap().is_empty());
        assert!(parse_labeled_output("").unwrap().is_empty());
    }
}
