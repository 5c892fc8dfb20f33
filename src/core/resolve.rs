//! Purpose: Table-driven dispatch for polymorphic JSON objects.
//! Exports: `TaggedUnion`, `VariantTable`, `UnknownVariant`, `resolve`, `tag`.
//! Role: Picks the variant decoder from the discriminant key; unknown discriminants
//! fall back to `UnknownVariant` instead of failing.
//! Invariants: A missing discriminant is a `Schema` error; any present value resolves.
//! Invariants: `UnknownVariant.raw` is the complete original object, discriminant included.
use crate::core::decode::{Extra, json_type};
use crate::core::diag::{Diagnostic, Diagnostics};
use crate::core::error::Error;
use serde_json::Value;

pub type VariantDecoder<T> = fn(Value, &mut Diagnostics) -> Result<T, Error>;

pub struct VariantTable<T: 'static> {
    /// Union name used in errors and diagnostics.
    pub union: &'static str,
    pub discriminant: &'static str,
    pub variants: &'static [(&'static str, VariantDecoder<T>)],
}

impl<T> VariantTable<T> {
    pub fn lookup(&self, discriminant: &str) -> Option<VariantDecoder<T>> {
        self.variants
            .iter()
            .find(|(name, _)| *name == discriminant)
            .map(|(_, decoder)| *decoder)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnknownVariant {
    pub discriminant: Value,
    pub raw: Extra,
}

impl UnknownVariant {
    /// Discriminant as display text (`"unknown_type"` -> `unknown_type`).
    pub fn type_name(&self) -> String {
        match &self.discriminant {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

pub trait TaggedUnion: Sized + 'static {
    fn table() -> &'static VariantTable<Self>;

    fn unknown(variant: UnknownVariant) -> Self;
}

pub fn resolve<T: TaggedUnion>(value: Value, diags: &mut Diagnostics) -> Result<T, Error> {
    let table = T::table();
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(Error::schema(
                table.union,
                format!("expected object, found {}", json_type(&other)),
            ));
        }
    };
    let discriminant = match map.get(table.discriminant) {
        Some(Value::String(name)) => Some(name.clone()),
        Some(_) => None,
        None => {
            return Err(Error::schema(
                table.union,
                format!("missing discriminant `{}`", table.discriminant),
            )
            .with_field(table.discriminant));
        }
    };
    let Some(discriminant) = discriminant else {
        return Ok(unknown(table, map, diags));
    };
    match table.lookup(&discriminant) {
        Some(decoder) => {
            map.remove(table.discriminant);
            decoder(Value::Object(map), diags).map_err(|err| err.with_discriminant(discriminant))
        }
        None => Ok(unknown(table, map, diags)),
    }
}

fn unknown<T: TaggedUnion>(table: &VariantTable<T>, raw: Extra, diags: &mut Diagnostics) -> T {
    let discriminant = raw.get(table.discriminant).cloned().unwrap_or(Value::Null);
    diags.report(Diagnostic::unrecognized_variant(table.union, &discriminant));
    T::unknown(UnknownVariant { discriminant, raw })
}

/// Re-attaches the discriminant consumed by `resolve` to an encoded variant body.
pub fn tag(key: &str, discriminant: &str, body: Value) -> Value {
    match body {
        Value::Object(mut map) => {
            map.insert(key.to_string(), Value::from(discriminant));
            Value::Object(map)
        }
        other => other,
    }
}
