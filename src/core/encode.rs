//! Purpose: Serialize decoded nodes back into flat JSON objects.
//! Exports: `Encode`, `ObjectWriter`, `encode`.
//! Role: Inverse of `core::decode`; declared fields first, passthrough keys after.
//! Invariants: `Field::Absent` is skipped, so the presence sentinel never reaches output.
//! Invariants: For payloads whose declared keys have declared types,
//! `encode(decode(x)) == x`.
use crate::core::decode::Extra;
use crate::core::field::{Field, Timestamp, WebUrl};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub trait Encode {
    fn encode(&self) -> Value;
}

pub fn encode<T: Encode + ?Sized>(node: &T) -> Value {
    node.encode()
}

#[derive(Debug, Default)]
pub struct ObjectWriter {
    map: Map<String, Value>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value<T: Encode + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.map.insert(key.to_string(), value.encode());
        self
    }

    pub fn field<T: Encode>(mut self, key: &str, value: &Field<T>) -> Self {
        match value {
            Field::Absent => {}
            Field::Null => {
                self.map.insert(key.to_string(), Value::Null);
            }
            Field::Present(inner) => {
                self.map.insert(key.to_string(), inner.encode());
            }
        }
        self
    }

    pub fn finish(mut self, extra: &Extra) -> Value {
        for (key, value) in extra {
            self.map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(self.map)
    }
}

impl Encode for Value {
    fn encode(&self) -> Value {
        self.clone()
    }
}

impl Encode for String {
    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Encode for str {
    fn encode(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Encode for bool {
    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Encode for i64 {
    fn encode(&self) -> Value {
        Value::from(*self)
    }
}

impl Encode for u64 {
    fn encode(&self) -> Value {
        Value::from(*self)
    }
}

impl Encode for WebUrl {
    fn encode(&self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

impl Encode for Timestamp {
    fn encode(&self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self) -> Value {
        match self {
            Some(inner) => inner.encode(),
            None => Value::Null,
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self) -> Value {
        Value::Array(self.iter().map(Encode::encode).collect())
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.encode()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectWriter;
    use crate::core::decode::Extra;
    use crate::core::field::Field;
    use serde_json::{Value, json};

    #[test]
    fn writer_skips_absent_and_keeps_null() {
        let mut extra = Extra::new();
        extra.insert("later".to_string(), json!(1));
        let value = ObjectWriter::new()
            .value("id", "a")
            .field::<i64>("gone", &Field::Absent)
            .field::<i64>("empty", &Field::Null)
            .field("count", &Field::Present(3i64))
            .finish(&extra);
        assert_eq!(
            value,
            json!({"id": "a", "empty": null, "count": 3, "later": 1})
        );
        assert!(value.get("gone").is_none());
        assert!(!matches!(value, Value::Null));
    }
}
