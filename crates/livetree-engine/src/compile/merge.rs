use super::lines::Paragraph;
use super::ranges::MarkdownRange;

/// Rejoins lines that a single range spans and attaches each range to the
/// first line of its span.
///
/// For every range (in input order) the line span is located on the
/// *already-merged* sequence: the last line whose start precedes or equals
/// the range's start through the first line whose end is at or after the
/// range's end. All lines in that span collapse into the first one; the
/// joined line's text regains the separators, its length grows accordingly
/// and it inherits the merged-away lines' already-accumulated ranges.
/// Absolute offsets stay valid because only the line grouping coarsens,
/// never the underlying text.
///
/// Processing in input order makes overlapping multi-line ranges compound
/// their merges transitively.
///
/// A range with no resolvable line span (its interval lies outside the
/// text) is dropped silently; well-formed detector output never produces
/// one.
pub fn merge_lines_with_multiline_ranges(
    lines: Vec<Paragraph>,
    ranges: Vec<MarkdownRange>,
) -> Vec<Paragraph> {
    let mut merged = lines;

    for range in ranges {
        let begin = merged.iter().rposition(|line| line.start <= range.start);
        let end = merged.iter().position(|line| line.end() >= range.end());
        let (Some(begin), Some(end)) = (begin, end) else {
            continue;
        };
        if end < begin {
            continue;
        }

        merged[begin].ranges.push(range);

        if end > begin {
            let tail: Vec<Paragraph> = merged.drain(begin + 1..=end).collect();
            let main = &mut merged[begin];
            for other in tail {
                main.text.push('\n');
                main.text.push_str(&other.text);
                main.length += other.length + 1;
                main.ranges.extend(other.ranges);
            }
        }
    }

    merged
}
