//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`.
//! Role: CLI surface for decode/render diagnostics (schema drift, clamped spans).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use crate::core::diag::Diagnostic;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    /// Node, union, or enum the notice concerns.
    pub subject: String,
    pub message: String,
    pub details: Map<String, Value>,
}

impl Notice {
    pub fn from_diagnostic(diagnostic: &Diagnostic, cmd: &str, time: &str) -> Self {
        let mut details = Map::new();
        if let Some(key) = &diagnostic.key {
            details.insert("key".to_string(), json!(key));
        }
        if let Some(value) = &diagnostic.value {
            details.insert("value".to_string(), value.clone());
        }
        Self {
            kind: diagnostic.kind.as_str().to_string(),
            time: time.to_string(),
            cmd: cmd.to_string(),
            subject: diagnostic.subject.to_string(),
            message: diagnostic.message.clone(),
            details,
        }
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("subject".to_string(), json!(notice.subject));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

#[cfg(test)]
mod tests {
    use super::{Notice, notice_json};
    use crate::core::diag::Diagnostic;
    use serde_json::json;

    #[test]
    fn notice_json_has_required_fields() {
        let diagnostic = Diagnostic::unknown_field("Creator", "newBadge", &json!({"label": "new"}));
        let notice = Notice::from_diagnostic(&diagnostic, "decode", "2026-02-01T00:00:00Z");

        let value = notice_json(&notice);
        let obj = value
            .get("notice")
            .and_then(|v| v.as_object())
            .expect("notice object");

        assert_eq!(
            obj.get("kind").and_then(|v| v.as_str()),
            Some("unknown_field")
        );
        assert_eq!(
            obj.get("time").and_then(|v| v.as_str()),
            Some("2026-02-01T00:00:00Z")
        );
        assert_eq!(obj.get("cmd").and_then(|v| v.as_str()), Some("decode"));
        assert_eq!(obj.get("subject").and_then(|v| v.as_str()), Some("Creator"));
        let details = obj
            .get("details")
            .and_then(|v| v.as_object())
            .expect("details");
        assert_eq!(details.get("key"), Some(&json!("newBadge")));
        assert_eq!(details.get("value"), Some(&json!({"label": "new"})));
    }

    #[test]
    fn details_omit_missing_key() {
        let diagnostic = Diagnostic::unsupported_style(&json!("italic"));
        let notice = Notice::from_diagnostic(&diagnostic, "render", "2026-02-01T00:00:00Z");
        assert!(!notice.details.contains_key("key"));
        assert_eq!(notice.details.get("value"), Some(&json!("italic")));
    }
}
