use clap::ValueEnum;

use crate::labeler::LabeledChar;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text: sentences on separate lines, tokens space-separated
    Normal,
    /// Tag-per-character listing: `code_point<TAB>tag` rows
    Iob,
}

/// Render the labeled stream in the requested format
pub fn render(stream: &[LabeledChar], format: OutputFormat) -> String {
    match format {
        OutputFormat::Normal => render_normal(stream),
        OutputFormat::Iob => render_iob(stream),
    }
}

/// Renderer state while walking the labeled stream in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderState {
    /// Expecting a possible sentence boundary; an `S` here opens no new line
    LineStart,
    /// Inside a sentence; an `S` here closes the previous sentence first
    MidLine,
}

/// Normal-format state machine.
///
/// `S` closes the previous sentence with a newline unless the machine sits at
/// a line start, so the first sentence produces no leading blank line. `T`
/// emits the token separator (suppressing the character when it is itself
/// whitespace, since the separator already stands for it) and re-arms the
/// boundary expectation. Characters tagged outside {S, T, I} are omitted.
/// No trailing newline is forced.
fn render_normal(stream: &[LabeledChar]) -> String {
    let mut out = String::new();
    let mut state = RenderState::LineStart;

    for labeled in stream {
        let Some(c) = char::from_u32(labeled.code) else {
            // Unrepresentable code from the labeler; nothing to print
            continue;
        };

        match labeled.tag.as_str() {
            "S" => {
                if state == RenderState::MidLine {
                    out.push('\n');
                }
                out.push(c);
                state = RenderState::MidLine;
            }
            "T" => {
                out.push(' ');
                // The separator already stands in for the boundary character
                // when that character is itself whitespace
                if !c.is_whitespace() {
                    out.push(c);
                }
                state = RenderState::LineStart;
            }
            "I" => {
                out.push(c);
                state = RenderState::MidLine;
            }
            _ => {}
        }
    }

    out
}

/// IOB listing: one row per input character, tag verbatim
fn render_iob(stream: &[LabeledChar]) -> String {
    let mut out = String::new();
    for labeled in stream {
        out.push_str(&labeled.code.to_string());
        out.push('\t');
        out.push_str(&labeled.tag);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(pairs: &[(u32, &str)]) -> Vec<LabeledChar> {
        pairs
            .iter()
            .map(|&(code, tag)| LabeledChar::new(code, tag))
            .collect()
    }

    #[test]
    fn test_first_sentence_start_suppressed() {
        let labeled = stream(&[(65, "S"), (66, "I"), (32, "T"), (67, "S")]);
        assert_eq!(render(&labeled, OutputFormat::Normal), "AB C");
    }

    #[test]
    fn test_newline_before_second_sentence() {
        let labeled = stream(&[(72, "S"), (105, "I"), (33, "S"), (121, "I"), (111, "I")]);
        assert_eq!(render(&labeled, OutputFormat::Normal), "Hi\n!yo");
    }

    #[test]
    fn test_token_boundary_on_letter_emits_separator_and_character() {
        // "Hi yo" with the space outside any token
        let labeled = stream(&[
            (72, "S"),
            (105, "I"),
            (32, "O"),
            (121, "T"),
            (111, "I"),
        ]);
        assert_eq!(render(&labeled, OutputFormat::Normal), "Hi yo");
    }

    #[test]
    fn test_token_boundary_on_whitespace_collapses_into_separator() {
        // Tab and no-break space tagged T render as a single plain separator
        let labeled = stream(&[(65, "S"), (9, "T"), (66, "I"), (0xA0, "T"), (67, "I")]);
        assert_eq!(render(&labeled, OutputFormat::Normal), "A B C");
    }

    #[test]
    fn test_unrecognized_tag_omitted_in_normal_format() {
        let labeled = stream(&[(65, "S"), (66, "O"), (67, "I")]);
        assert_eq!(render(&labeled, OutputFormat::Normal), "AC");
    }

    #[test]
    fn test_iob_rows() {
        let labeled = stream(&[(65, "S"), (66, "I")]);
        assert_eq!(render(&labeled, OutputFormat::Iob), "65\tS\n66\tI\n");
    }

    #[test]
    fn test_iob_keeps_unrecognized_tags() {
        let labeled = stream(&[(65, "S"), (32, "O")]);
        assert_eq!(render(&labeled, OutputFormat::Iob), "65\tS\n32\tO\n");
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(render(&[], OutputFormat::Normal), "");
        assert_eq!(render(&[], OutputFormat::Iob), "");
    }
}
