//! Paragraph rendering for feed item descriptions.
//!
//! Every description is rendered twice up front: the full text as a run of
//! `<p>` elements, and a truncated teaser holding the first half of those
//! paragraphs. Segment text is HTML-escaped before it is wrapped, so markup in
//! the feed source is displayed as text rather than interpreted.

use html_escape::encode_text;

/// Marker appended to the last paragraph kept in a truncated rendering.
const ELLIPSIS: &str = "...";

/// Both HTML renderings of one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionHtml {
    pub full: String,
    pub truncated: String,
}

impl DescriptionHtml {
    /// Render `text` both ways.
    pub fn from_text(text: &str) -> Self {
        let segments = split_paragraphs(text);
        Self {
            full: wrap_paragraphs(&segments),
            truncated: truncated_paragraphs(&segments),
        }
    }
}

/// Split text on runs of line breaks, dropping whitespace-only segments.
///
/// Each returned segment is trimmed.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Full rendering: every segment in its own paragraph.
pub fn to_paragraphs(text: &str) -> String {
    wrap_paragraphs(&split_paragraphs(text))
}

/// Truncated rendering: the first `floor(n / 2)` paragraphs with an ellipsis.
///
/// Descriptions with zero or one paragraph are returned in full.
pub fn to_truncated_paragraphs(text: &str) -> String {
    truncated_paragraphs(&split_paragraphs(text))
}

fn truncated_paragraphs(segments: &[&str]) -> String {
    if segments.len() <= 1 {
        return wrap_paragraphs(segments);
    }

    // len >= 2, so at least one paragraph survives
    let half = segments.len() / 2;
    let mut out = String::new();
    for (i, segment) in segments[..half].iter().enumerate() {
        out.push_str("<p>");
        out.push_str(&encode_text(segment));
        if i + 1 == half {
            out.push_str(ELLIPSIS);
        }
        out.push_str("</p>");
    }
    out
}

fn wrap_paragraphs(segments: &[&str]) -> String {
    segments.iter().fold(String::new(), |mut out, segment| {
        out.push_str("<p>");
        out.push_str(&encode_text(segment));
        out.push_str("</p>");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(n: usize) -> String {
        (1..=n)
            .map(|i| format!("P{i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_two_segments_full_and_truncated() {
        let rendered = DescriptionHtml::from_text("A\nB");
        assert_eq!(rendered.full, "<p>A</p><p>B</p>");
        assert_eq!(rendered.truncated, "<p>A...</p>");
    }

    #[test]
    fn test_zero_segments_render_empty() {
        let rendered = DescriptionHtml::from_text(&lines(0));
        assert_eq!(rendered.full, "");
        assert_eq!(rendered.truncated, rendered.full);

        let blank = DescriptionHtml::from_text("  \n\t\n   ");
        assert_eq!(blank.full, "");
        assert_eq!(blank.truncated, "");
    }

    #[test]
    fn test_single_segment_is_not_truncated() {
        let rendered = DescriptionHtml::from_text(&lines(1));
        assert_eq!(rendered.full, "<p>P1</p>");
        assert_eq!(rendered.truncated, rendered.full);
    }

    #[test]
    fn test_truncation_keeps_half_rounded_down() {
        assert_eq!(to_truncated_paragraphs(&lines(3)), "<p>P1...</p>");
        assert_eq!(to_truncated_paragraphs(&lines(4)), "<p>P1</p><p>P2...</p>");
        assert_eq!(to_truncated_paragraphs(&lines(5)), "<p>P1</p><p>P2...</p>");
    }

    #[test]
    fn test_blank_lines_and_crlf_collapse() {
        let text = "  First  \r\n\r\n\r\n   \nSecond\n\n";
        assert_eq!(split_paragraphs(text), vec!["First", "Second"]);
        assert_eq!(to_paragraphs(text), "<p>First</p><p>Second</p>");
    }

    #[test]
    fn test_segment_text_is_escaped() {
        let text = "<script>alert(1)</script>\nTom & Jerry";
        assert_eq!(
            to_paragraphs(text),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p><p>Tom &amp; Jerry</p>"
        );
        assert_eq!(
            to_truncated_paragraphs(text),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt;...</p>"
        );
    }
}
