//! Purpose: Single error type shared by decoding, rendering, and transport.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Carries enough context (node kind, field path, discriminant) to diagnose
//! a failure against a live payload sample.
//! Invariants: Field paths are built innermost-first; outer decoders only prepend.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    NotFound,
    Permission,
    Schema,
    Render,
    Io,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    node: Option<&'static str>,
    field: Vec<String>,
    discriminant: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            node: None,
            field: Vec::new(),
            discriminant: None,
            source: None,
        }
    }

    /// Shorthand for a schema violation inside `node`.
    pub fn schema(node: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema)
            .with_node(node)
            .with_message(message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn node(&self) -> Option<&'static str> {
        self.node
    }

    /// Dotted path from the decoded root to the failing field, if any.
    pub fn field(&self) -> Option<String> {
        if self.field.is_empty() {
            None
        } else {
            Some(self.field.join("."))
        }
    }

    pub fn discriminant(&self) -> Option<&str> {
        self.discriminant.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Records the node kind; the innermost node wins.
    pub fn with_node(mut self, node: &'static str) -> Self {
        if self.node.is_none() {
            self.node = Some(node);
        }
        self
    }

    /// Prepends a path segment (a key or an index) to the field path.
    pub fn with_field(mut self, segment: impl Into<String>) -> Self {
        self.field.insert(0, segment.into());
        self
    }

    pub fn with_discriminant(mut self, discriminant: impl Into<String>) -> Self {
        self.discriminant = Some(discriminant.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(node) = self.node {
            write!(f, " (node: {node})")?;
        }
        if let Some(field) = self.field() {
            write!(f, " (field: {field})")?;
        }
        if let Some(discriminant) = &self.discriminant {
            write!(f, " (type: {discriminant})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Permission => 4,
        ErrorKind::Schema => 5,
        ErrorKind::Render => 6,
        ErrorKind::Io => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_exit_code};

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::NotFound, 3),
            (ErrorKind::Permission, 4),
            (ErrorKind::Schema, 5),
            (ErrorKind::Render, 6),
            (ErrorKind::Io, 7),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn field_path_is_prepended_and_node_keeps_innermost() {
        let err = Error::schema("StyleSpan", "missing required field")
            .with_field("offset")
            .with_node("ParagraphBlock")
            .with_field("0")
            .with_field("styles");
        assert_eq!(err.node(), Some("StyleSpan"));
        assert_eq!(err.field().as_deref(), Some("styles.0.offset"));
        let text = err.to_string();
        assert!(text.starts_with("Schema: missing required field"));
        assert!(text.contains("(field: styles.0.offset)"));
    }
}
