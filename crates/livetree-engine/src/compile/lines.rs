use super::ranges::MarkdownRange;

/// A single line of the source text (a paragraph) with absolute offsets.
///
/// `start` is the byte offset of the line's first character in the original
/// text; `length` excludes the `'\n'` separator. After multi-line merging a
/// `Paragraph` may cover several source lines, in which case `text` contains
/// interior separators and `length` counts them.
///
/// Ranges attached to a line always keep their absolute offsets, never
/// re-based to the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub start: usize,
    pub length: usize,
    pub ranges: Vec<MarkdownRange>,
}

impl Paragraph {
    /// Exclusive end offset of the line content (separator excluded).
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Splits the full text into line records covering it with no gaps and no
/// overlap. Joining the line texts with `'\n'` reproduces the input exactly,
/// including the empty string and consecutive separators.
pub fn split_text_into_lines(text: &str) -> Vec<Paragraph> {
    let mut line_start = 0usize;
    text.split('\n')
        .map(|line| {
            let paragraph = Paragraph {
                text: line.to_string(),
                start: line_start,
                length: line.len(),
                ranges: Vec::new(),
            };
            // +1 for the newline separator
            line_start += line.len() + 1;
            paragraph
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(lines: &[Paragraph]) -> String {
        lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn single_line() {
        let lines = split_text_into_lines("hello");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start, 0);
        assert_eq!(lines[0].length, 5);
        assert!(lines[0].ranges.is_empty());
    }

    #[test]
    fn offsets_are_absolute() {
        let lines = split_text_into_lines("ab\ncdef\n\ng");
        let starts: Vec<_> = lines.iter().map(|l| l.start).collect();
        let lengths: Vec<_> = lines.iter().map(|l| l.length).collect();
        assert_eq!(starts, vec![0, 3, 8, 9]);
        assert_eq!(lengths, vec![2, 4, 0, 1]);
    }

    #[test]
    fn round_trip_reconstructs_text() {
        for text in ["", "a", "a\nb", "\n", "\n\n", "a\n\n\nb\n", "trailing\n"] {
            assert_eq!(rejoin(&split_text_into_lines(text)), text, "text {text:?}");
        }
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let lines = split_text_into_lines("");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "");
        assert_eq!(lines[0].length, 0);
    }
}
