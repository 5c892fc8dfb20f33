//! Purpose: Presence-aware field values and wire-faithful scalar newtypes.
//! Exports: `Field`, `WebUrl`, `Timestamp`.
//! Role: Lets optional fields tell "absent from the payload" apart from `null`.
//! Invariants: `Field::Absent` is never serialized; `Field::Null` encodes as `null`.
//! Invariants: `WebUrl`/`Timestamp` keep the exact wire text and parse lazily.
use crate::core::error::{Error, ErrorKind};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

/// A declared field that may be missing or explicitly null in a payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent | Field::Null => None,
        }
    }

    pub fn into_present(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent | Field::Null => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Present(value) => Field::Present(f(value)),
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Null,
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct WebUrl(String);

impl WebUrl {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> Result<Url, Error> {
        Url::parse(&self.0).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid url `{}`", self.0))
                .with_source(err)
        })
    }
}

/// ISO-8601 timestamp as sent by the API (for example `2023-04-01T12:00:00+09:00`).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> Result<OffsetDateTime, Error> {
        OffsetDateTime::parse(&self.0, &Rfc3339).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid timestamp `{}`", self.0))
                .with_source(err)
        })
    }
}
