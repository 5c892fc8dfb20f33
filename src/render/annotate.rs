//! Purpose: Merge style and link spans of one paragraph into inline markdown.
//! Exports: `render_paragraph`.
//! Role: Core of the article renderer; block framing lives in `render::mod`.
//! Invariants: Markers are applied by position in one left-to-right pass, never by
//! in-place insertion, so earlier insertions cannot shift later offsets.
//! Invariants: At a shared boundary bold is the outer annotation and the link the
//! inner one: `link-close, style-close, style-open, link-open`.
//! Notes: Offsets count Unicode scalar values. Crossing (non-nested) spans are not
//! validated and may produce unbalanced markdown.
use crate::core::diag::{Diagnostic, Diagnostics};
use crate::core::enums::Coerced;
use crate::core::field::Field;
use crate::model::body::{LinkSpan, StyleSpan};
use crate::model::enums::ParagraphStyle;
use serde_json::Value;
use std::collections::BTreeMap;

const STYLE_OPEN: &str = " **";
const STYLE_CLOSE: &str = "** ";
const LINK_OPEN: &str = "[";

#[derive(Debug, Default)]
struct Boundary<'a> {
    style_open: usize,
    style_close: usize,
    link_open: usize,
    link_close: Vec<&'a str>,
}

impl Boundary<'_> {
    fn write(&self, out: &mut String) {
        for url in &self.link_close {
            out.push_str("](");
            out.push_str(url);
            out.push(')');
        }
        for _ in 0..self.style_close {
            out.push_str(STYLE_CLOSE);
        }
        for _ in 0..self.style_open {
            out.push_str(STYLE_OPEN);
        }
        for _ in 0..self.link_open {
            out.push_str(LINK_OPEN);
        }
    }
}

pub fn render_paragraph(
    text: &str,
    styles: &[StyleSpan],
    links: &[LinkSpan],
    diags: &mut Diagnostics,
) -> String {
    // Byte offset of every char position, plus one past the end.
    let mut byte_at: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
    byte_at.push(text.len());
    let char_len = byte_at.len() - 1;

    let mut bounds: BTreeMap<usize, Boundary<'_>> = BTreeMap::new();
    for style in styles.iter().rev() {
        if !is_bold(&style.style) {
            diags.report(Diagnostic::unsupported_style(&style_wire(&style.style)));
            continue;
        }
        let Some((start, end)) = clamp_span(style.offset, style.length, char_len, diags) else {
            continue;
        };
        bounds.entry(start).or_default().style_open += 1;
        bounds.entry(end).or_default().style_close += 1;
    }
    for link in links.iter().rev() {
        let Some((start, end)) = clamp_span(link.offset, link.length, char_len, diags) else {
            continue;
        };
        bounds.entry(start).or_default().link_open += 1;
        bounds.entry(end).or_default().link_close.push(link.url.as_str());
    }

    let mut out = String::with_capacity(text.len() + bounds.len() * 4);
    let mut cursor = 0;
    for (&pos, boundary) in &bounds {
        out.push_str(&text[byte_at[cursor]..byte_at[pos]]);
        boundary.write(&mut out);
        cursor = pos;
    }
    out.push_str(&text[byte_at[cursor]..]);
    out
}

fn is_bold(style: &Field<Coerced<ParagraphStyle>>) -> bool {
    matches!(style, Field::Present(Coerced::Known(ParagraphStyle::Bold)))
}

fn style_wire(style: &Field<Coerced<ParagraphStyle>>) -> Value {
    match style {
        Field::Present(coerced) => coerced.to_wire(),
        Field::Absent | Field::Null => Value::Null,
    }
}

/// Returns the span as `[start, end)` char positions, or `None` when it covers nothing.
fn clamp_span(
    offset: u64,
    length: u64,
    char_len: usize,
    diags: &mut Diagnostics,
) -> Option<(usize, usize)> {
    if length == 0 {
        return None;
    }
    let limit = char_len as u64;
    let end = offset.saturating_add(length);
    if end > limit {
        diags.report(Diagnostic::span_out_of_range(offset, length, char_len));
    }
    let start = offset.min(limit) as usize;
    let end = end.min(limit) as usize;
    if start >= end {
        return None;
    }
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::render_paragraph;
    use crate::core::diag::{DiagnosticKind, Diagnostics};
    use crate::core::enums::Coerced;
    use crate::core::field::Field;
    use crate::model::body::{LinkSpan, StyleSpan};
    use serde_json::json;

    fn render(text: &str, styles: &[StyleSpan], links: &[LinkSpan]) -> String {
        let mut diags = Diagnostics::new();
        render_paragraph(text, styles, links, &mut diags)
    }

    #[test]
    fn link_closing_where_bold_opens() {
        let out = render(
            "abcdef",
            &[StyleSpan::bold(3, 3)],
            &[LinkSpan::new(0, 3, "https://x")],
        );
        assert_eq!(out, "[abc](https://x) **def** ");
    }

    #[test]
    fn link_opening_where_bold_closes() {
        let out = render(
            "abcdef",
            &[StyleSpan::bold(0, 3)],
            &[LinkSpan::new(3, 3, "https://x")],
        );
        assert_eq!(out, " **abc** [def](https://x)");
    }

    #[test]
    fn adjacent_bold_spans_close_before_reopening() {
        let out = render(
            "abcdef",
            &[StyleSpan::bold(0, 3), StyleSpan::bold(3, 3)],
            &[],
        );
        assert_eq!(out, " **abc**  **def** ");
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let out = render("こんにちは世界", &[StyleSpan::bold(5, 2)], &[]);
        assert_eq!(out, "こんにちは **世界** ");
    }

    #[test]
    fn overlong_span_is_clamped_and_reported() {
        let mut diags = Diagnostics::new();
        let out = render_paragraph("abc", &[StyleSpan::bold(1, 10)], &[], &mut diags);
        assert_eq!(out, "a **bc** ");
        assert_eq!(diags.as_slice()[0].kind, DiagnosticKind::SpanOutOfRange);
    }

    #[test]
    fn unknown_style_is_skipped() {
        let mut diags = Diagnostics::new();
        let mut italic = StyleSpan::bold(0, 1);
        italic.style = Field::Present(Coerced::Raw(json!("italic")));
        let out = render_paragraph("abc", &[italic], &[], &mut diags);
        assert_eq!(out, "abc");
        assert_eq!(diags.as_slice()[0].kind, DiagnosticKind::UnsupportedStyle);
    }

    #[test]
    fn span_at_u64_max_is_clamped_without_overflow() {
        let mut diags = Diagnostics::new();
        let out = render_paragraph(
            "abc",
            &[StyleSpan::bold(u64::MAX, 1)],
            &[LinkSpan::new(u64::MAX, u64::MAX, "https://x")],
            &mut diags,
        );
        assert_eq!(out, "abc");
        assert_eq!(diags.len(), 2);
        assert!(
            diags
                .as_slice()
                .iter()
                .all(|diag| diag.kind == DiagnosticKind::SpanOutOfRange
                    && diag.value == Some(json!(u64::MAX)))
        );
    }

    #[test]
    fn zero_length_span_is_ignored() {
        assert_eq!(render("abc", &[StyleSpan::bold(1, 0)], &[]), "abc");
    }
}
