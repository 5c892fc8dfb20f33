//! Purpose: Total coercion of wire scalars into known enumerations.
//! Exports: `KnownEnum`, `Coerced`, `coerce`.
//! Invariants: `coerce` never fails; absent and null pass through untouched.
//! Invariants: Unrecognized values are kept verbatim so they re-encode unchanged.
use crate::core::diag::{Diagnostic, Diagnostics};
use crate::core::encode::Encode;
use crate::core::field::Field;
use serde_json::Value;

pub trait KnownEnum: Copy + Sized {
    const NAME: &'static str;

    fn from_wire(value: &Value) -> Option<Self>;

    fn to_wire(self) -> Value;
}

/// Either a recognized enum member or the raw value the API sent.
#[derive(Clone, Debug, PartialEq)]
pub enum Coerced<E> {
    Known(E),
    Raw(Value),
}

impl<E: KnownEnum> Coerced<E> {
    pub fn known(&self) -> Option<E> {
        match self {
            Coerced::Known(member) => Some(*member),
            Coerced::Raw(_) => None,
        }
    }

    pub fn to_wire(&self) -> Value {
        match self {
            Coerced::Known(member) => member.to_wire(),
            Coerced::Raw(value) => value.clone(),
        }
    }
}

impl<E: KnownEnum> Encode for Coerced<E> {
    fn encode(&self) -> Value {
        self.to_wire()
    }
}

pub fn coerce<E: KnownEnum>(value: Field<Value>, diags: &mut Diagnostics) -> Field<Coerced<E>> {
    match value {
        Field::Absent => Field::Absent,
        Field::Null => Field::Null,
        Field::Present(raw) => match E::from_wire(&raw) {
            Some(member) => Field::Present(Coerced::Known(member)),
            None => {
                diags.report(Diagnostic::unrecognized_enum_value(E::NAME, &raw));
                Field::Present(Coerced::Raw(raw))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{Coerced, KnownEnum, coerce};
    use crate::core::diag::{DiagnosticKind, Diagnostics};
    use crate::core::field::Field;
    use serde_json::{Value, json};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Fruit {
        Apple,
    }

    impl KnownEnum for Fruit {
        const NAME: &'static str = "Fruit";

        fn from_wire(value: &Value) -> Option<Self> {
            match value.as_str()? {
                "apple" => Some(Fruit::Apple),
                _ => None,
            }
        }

        fn to_wire(self) -> Value {
            Value::from("apple")
        }
    }

    #[test]
    fn coerce_is_total_over_value_shapes() {
        let inputs = [
            json!("apple"),
            json!("pear"),
            json!(7),
            json!(true),
            json!([1]),
            json!({"a": 1}),
        ];
        for input in inputs {
            let mut diags = Diagnostics::new();
            match coerce::<Fruit>(Field::Present(input.clone()), &mut diags) {
                Field::Present(Coerced::Known(Fruit::Apple)) => assert_eq!(input, json!("apple")),
                Field::Present(Coerced::Raw(raw)) => {
                    assert_eq!(raw, input);
                    assert_eq!(diags.as_slice()[0].kind, DiagnosticKind::UnrecognizedEnumValue);
                }
                other => panic!("unexpected coercion: {other:?}"),
            }
        }
    }

    #[test]
    fn coerce_passes_absent_and_null_through() {
        let mut diags = Diagnostics::new();
        assert_eq!(coerce::<Fruit>(Field::Absent, &mut diags), Field::Absent);
        assert_eq!(coerce::<Fruit>(Field::Null, &mut diags), Field::Null);
        assert!(diags.is_empty());
    }
}
