//! Purpose: Schema-tolerant decoding of JSON values into typed nodes.
//! Exports: `Decode`, `ObjectReader`, `Decoded`, `Extra`, `decode`, `decode_str`.
//! Role: Every model node reads its declared keys through `ObjectReader` and hands
//! the leftovers back as a passthrough bag.
//! Invariants: Extra keys never fail a decode; each one yields a diagnostic.
//! Invariants: Missing required keys and mistyped declared keys are `Schema` errors
//! whose field path points at the offending key.
use crate::core::diag::{Diagnostic, Diagnostics};
use crate::core::enums::{Coerced, KnownEnum, coerce};
use crate::core::error::{Error, ErrorKind};
use crate::core::field::{Field, Timestamp, WebUrl};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Undeclared keys of a node, preserved for round-tripping.
pub type Extra = Map<String, Value>;

pub trait Decode: Sized {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error>;
}

/// A decoded node together with the diagnostics raised while building it.
#[derive(Debug)]
pub struct Decoded<T> {
    pub node: T,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn decode<T: Decode>(value: Value) -> Result<Decoded<T>, Error> {
    let mut diags = Diagnostics::new();
    let node = T::decode(value, &mut diags)?;
    Ok(Decoded {
        node,
        diagnostics: diags.into_vec(),
    })
}

pub fn decode_str<T: Decode>(input: &str) -> Result<Decoded<T>, Error> {
    let value: Value = serde_json::from_str(input).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid json")
            .with_source(err)
    })?;
    decode(value)
}

pub struct ObjectReader<'a> {
    node: &'static str,
    map: Map<String, Value>,
    diags: &'a mut Diagnostics,
}

impl<'a> ObjectReader<'a> {
    pub fn new(node: &'static str, value: Value, diags: &'a mut Diagnostics) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self { node, map, diags }),
            other => Err(Error::schema(
                node,
                format!("expected object, found {}", json_type(&other)),
            )),
        }
    }

    pub fn node(&self) -> &'static str {
        self.node
    }

    pub fn required<T: Decode>(&mut self, key: &str) -> Result<T, Error> {
        let value = self.map.remove(key).ok_or_else(|| {
            Error::schema(self.node, format!("missing required field `{key}`")).with_field(key)
        })?;
        T::decode(value, self.diags).map_err(|err| err.with_node(self.node).with_field(key))
    }

    pub fn optional<T: Decode>(&mut self, key: &str) -> Result<Field<T>, Error> {
        match self.map.remove(key) {
            None => Ok(Field::Absent),
            Some(Value::Null) => Ok(Field::Null),
            Some(value) => T::decode(value, self.diags)
                .map(Field::Present)
                .map_err(|err| err.with_node(self.node).with_field(key)),
        }
    }

    /// Reads an enum-valued key; unknown values are kept raw, never rejected.
    pub fn enumeration<E: KnownEnum>(&mut self, key: &str) -> Field<Coerced<E>> {
        let raw = match self.map.remove(key) {
            None => Field::Absent,
            Some(Value::Null) => Field::Null,
            Some(value) => Field::Present(value),
        };
        coerce(raw, self.diags)
    }

    /// Hands back every key that was not read, reporting each one.
    pub fn finish(self) -> Extra {
        for (key, value) in &self.map {
            self.diags
                .report(Diagnostic::unknown_field(self.node, key, value));
        }
        self.map
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::new(ErrorKind::Schema).with_message(format!(
        "expected {expected}, found {}",
        json_type(found)
    ))
}

impl Decode for Value {
    fn decode(value: Value, _diags: &mut Diagnostics) -> Result<Self, Error> {
        Ok(value)
    }
}

impl Decode for String {
    fn decode(value: Value, _diags: &mut Diagnostics) -> Result<Self, Error> {
        match value {
            Value::String(text) => Ok(text),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl Decode for bool {
    fn decode(value: Value, _diags: &mut Diagnostics) -> Result<Self, Error> {
        value.as_bool().ok_or_else(|| mismatch("boolean", &value))
    }
}

impl Decode for i64 {
    fn decode(value: Value, _diags: &mut Diagnostics) -> Result<Self, Error> {
        value.as_i64().ok_or_else(|| mismatch("integer", &value))
    }
}

impl Decode for u64 {
    fn decode(value: Value, _diags: &mut Diagnostics) -> Result<Self, Error> {
        value
            .as_u64()
            .ok_or_else(|| mismatch("non-negative integer", &value))
    }
}

impl Decode for WebUrl {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        String::decode(value, diags).map(WebUrl::new)
    }
}

impl Decode for Timestamp {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        String::decode(value, diags).map(Timestamp::new)
    }
}

/// Required-but-nullable keys (`iconUrl: null`) decode through `Option`.
impl<T: Decode> Decode for Option<T> {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            value => T::decode(value, diags).map(Some),
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(mismatch("array", &other)),
        };
        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| T::decode(item, diags).map_err(|err| err.with_field(idx.to_string())))
            .collect()
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let entries = match value {
            Value::Object(entries) => entries,
            other => return Err(mismatch("object", &other)),
        };
        let mut out = BTreeMap::new();
        for (key, item) in entries {
            let decoded = T::decode(item, diags).map_err(|err| err.with_field(key.clone()))?;
            out.insert(key, decoded);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{Decode, ObjectReader, decode};
    use crate::core::diag::{DiagnosticKind, Diagnostics};
    use crate::core::error::{Error, ErrorKind};
    use crate::core::field::Field;
    use serde_json::{Value, json};

    #[derive(Debug)]
    struct Sample {
        id: String,
        count: Field<i64>,
        tags: Vec<String>,
        extra: super::Extra,
    }

    impl Decode for Sample {
        fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
            let mut obj = ObjectReader::new("Sample", value, diags)?;
            Ok(Self {
                id: obj.required("id")?,
                count: obj.optional("count")?,
                tags: obj.required("tags")?,
                extra: obj.finish(),
            })
        }
    }

    #[test]
    fn optional_keys_distinguish_absent_and_null() {
        let absent = decode::<Sample>(json!({"id": "a", "tags": []})).expect("decode");
        assert!(absent.node.count.is_absent());
        let null = decode::<Sample>(json!({"id": "a", "count": null, "tags": []})).expect("decode");
        assert!(null.node.count.is_null());
    }

    #[test]
    fn extra_keys_are_kept_and_reported() {
        let decoded =
            decode::<Sample>(json!({"id": "a", "tags": ["x"], "shiny": true})).expect("decode");
        assert_eq!(decoded.node.id, "a");
        assert_eq!(decoded.node.tags, vec!["x".to_string()]);
        assert_eq!(decoded.node.extra.get("shiny"), Some(&json!(true)));
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].kind, DiagnosticKind::UnknownField);
    }

    #[test]
    fn mistyped_list_item_reports_index_path() {
        let err = decode::<Sample>(json!({"id": "a", "tags": ["x", 3]})).expect_err("mistyped");
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.node(), Some("Sample"));
        assert_eq!(err.field().as_deref(), Some("tags.1"));
        assert_eq!(err.message(), Some("expected string, found number"));
    }

    #[test]
    fn non_object_input_is_a_schema_error() {
        let err = decode::<Sample>(json!([1, 2])).expect_err("array");
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.message().unwrap_or_default().contains("expected object"));
    }
}
