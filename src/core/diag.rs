//! Purpose: Non-fatal decode/render diagnostics and the per-call sink collecting them.
//! Exports: `Diagnostic`, `DiagnosticKind`, `Diagnostics`.
//! Role: Makes schema drift visible without failing the decode.
//! Invariants: Every reported diagnostic is also logged through `tracing` at warn level.
//! Invariants: A sink belongs to exactly one decode/render call; nothing is global.
use serde_json::Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiagnosticKind {
    UnknownField,
    UnrecognizedVariant,
    UnrecognizedEnumValue,
    SpanOutOfRange,
    UnsupportedStyle,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownField => "unknown_field",
            DiagnosticKind::UnrecognizedVariant => "unrecognized_variant",
            DiagnosticKind::UnrecognizedEnumValue => "unrecognized_enum_value",
            DiagnosticKind::SpanOutOfRange => "span_out_of_range",
            DiagnosticKind::UnsupportedStyle => "unsupported_style",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Node, union, or enum the diagnostic was raised for.
    pub subject: &'static str,
    pub key: Option<String>,
    pub value: Option<Value>,
    pub message: String,
}

impl Diagnostic {
    pub fn unknown_field(node: &'static str, key: &str, value: &Value) -> Self {
        Self {
            kind: DiagnosticKind::UnknownField,
            subject: node,
            key: Some(key.to_string()),
            value: Some(value.clone()),
            message: format!("unknown field `{key}` in {node}; the API may have changed"),
        }
    }

    pub fn unrecognized_variant(union: &'static str, discriminant: &Value) -> Self {
        Self {
            kind: DiagnosticKind::UnrecognizedVariant,
            subject: union,
            key: None,
            value: Some(discriminant.clone()),
            message: format!("unrecognized {union} type {discriminant}; kept as unknown"),
        }
    }

    pub fn unrecognized_enum_value(name: &'static str, value: &Value) -> Self {
        Self {
            kind: DiagnosticKind::UnrecognizedEnumValue,
            subject: name,
            key: None,
            value: Some(value.clone()),
            message: format!("{value} is not a known {name}; kept raw value"),
        }
    }

    pub fn span_out_of_range(offset: u64, length: u64, text_len: usize) -> Self {
        Self {
            kind: DiagnosticKind::SpanOutOfRange,
            subject: "ParagraphBlock",
            key: None,
            value: Some(Value::from(offset.saturating_add(length))),
            message: format!(
                "span {offset}+{length} exceeds paragraph length {text_len}; clamped"
            ),
        }
    }

    pub fn unsupported_style(style: &Value) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedStyle,
            subject: "StyleSpan",
            key: None,
            value: Some(style.clone()),
            message: format!("style {style} has no markdown form; skipped"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = diagnostic.kind.as_str(),
            subject = diagnostic.subject,
            key = diagnostic.key.as_deref(),
            "{}",
            diagnostic.message
        );
        self.items.push(diagnostic);
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticKind, Diagnostics};
    use serde_json::json;

    #[test]
    fn report_collects_in_order() {
        let mut diags = Diagnostics::new();
        diags.report(Diagnostic::unknown_field("User", "nickname", &json!("x")));
        diags.report(Diagnostic::unrecognized_enum_value("CoverType", &json!("gif")));
        let kinds: Vec<_> = diags.as_slice().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            [
                DiagnosticKind::UnknownField,
                DiagnosticKind::UnrecognizedEnumValue
            ]
        );
        assert!(diags.as_slice()[0].message.contains("`nickname`"));
    }
}
