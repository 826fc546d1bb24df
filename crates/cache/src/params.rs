//! Raw, unvalidated artifact parameters
//!
//! Job payloads arrive as JSON objects. [`Params`] wraps such an object and
//! offers typed accessors that report *why* a field cannot be used, so every
//! schema produces the same field-specific validation errors.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely typed parameter set describing one artifact request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Create an empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Raw access to a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Number of fields present
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no fields are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&self, field: &'static str) -> Result<&Value> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(Error::missing(field)),
            Some(value) => Ok(value),
        }
    }

    pub(crate) fn require_str(&self, field: &'static str) -> Result<&str> {
        self.require(field)?
            .as_str()
            .ok_or_else(|| Error::wrong_type(field, "string"))
    }

    /// Any JSON number, integral or not.
    pub(crate) fn require_f64(&self, field: &'static str) -> Result<f64> {
        let value = self.require(field)?;
        let number = value
            .as_f64()
            .ok_or_else(|| Error::wrong_type(field, "number"))?;
        if number.is_finite() {
            Ok(number)
        } else {
            Err(Error::out_of_range(field, "must be a finite number"))
        }
    }

    /// Integral JSON numbers only; `1.0` is rejected.
    pub(crate) fn require_i64(&self, field: &'static str) -> Result<i64> {
        let value = self.require(field)?;
        match value {
            Value::Number(n) if n.is_i64() => n
                .as_i64()
                .ok_or_else(|| Error::wrong_type(field, "integer")),
            Value::Number(n) if n.is_u64() => {
                Err(Error::out_of_range(field, "exceeds the supported maximum"))
            }
            _ => Err(Error::wrong_type(field, "integer")),
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::serialization(format!(
                "artifact parameters must be a JSON object, got {other}"
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
