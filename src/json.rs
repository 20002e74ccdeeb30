//! Interop with [`serde_json::Value`].
//!
//! Every JSON document converts to a [`Jksn`]. The reverse conversion fails for values JSON
//! has no notation for: blobs, non-finite floats, non-text object keys, integers outside the
//! `i64`/`u64` range, and the unspecified marker.

use crate::{
    errors::{JksnError, Result},
    Inum, Jksn, VecMap,
};
use serde_json::{Map, Number, Value};
use std::convert::TryFrom;

impl From<Value> for Jksn {
    fn from(v: Value) -> Jksn {
        match v {
            Value::Null => Jksn::Null,
            Value::Bool(b) => Jksn::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Jksn::from(i)
                } else if let Some(u) = n.as_u64() {
                    Jksn::from(u)
                } else {
                    Jksn::from(n.as_f64().unwrap_or(std::f64::NAN))
                }
            }
            Value::String(s) => Jksn::Str(s),
            Value::Array(items) => Jksn::Array(items.into_iter().map(Jksn::from).collect()),
            Value::Object(map) => Jksn::Object(
                map.into_iter()
                    .map(|(k, v)| (Jksn::Str(k), Jksn::from(v)))
                    .collect::<VecMap<_, _>>(),
            ),
        }
    }
}

impl TryFrom<Jksn> for Value {
    type Error = JksnError;

    fn try_from(v: Jksn) -> Result<Value> {
        let fail = |what: &str| -> Result<Value> {
            Err(JksnError::Conversion(format!("JSON cannot represent {}", what)))
        };

        match v {
            Jksn::Null => Ok(Value::Null),
            Jksn::Bool(b) => Ok(Value::Bool(b)),
            Jksn::Jint(Inum::I64(i)) => Ok(Value::from(i)),
            Jksn::Jint(n) => match u64::try_from(n) {
                Ok(u) => Ok(Value::from(u)),
                Err(n) => fail(&format!("the integer {}", n)),
            },
            Jksn::Jfloat(f) => match Number::from_f64(f.to_f64()) {
                Some(n) => Ok(Value::Number(n)),
                None => fail(&format!("the float {}", f)),
            },
            Jksn::Str(s) => Ok(Value::String(s)),
            Jksn::Blob(_) => fail("blobs"),
            Jksn::Array(items) => items
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Jksn::Object(map) => {
                let mut out = Map::new();
                for (k, v) in map {
                    match k {
                        Jksn::Str(k) => {
                            out.insert(k, Value::try_from(v)?);
                        }
                        other => return fail(&format!("{} object keys", other.type_name())),
                    }
                }
                Ok(Value::Object(out))
            }
            Jksn::Unspecified => fail("the unspecified marker"),
        }
    }
}

impl Jksn {
    /// Parses JSON text.
    ///
    /// ```
    /// use jksn::prelude::*;
    ///
    /// let v = Jksn::from_json_str("[1, 2.5, null]").unwrap();
    /// assert_eq!(v.as_array().map(Vec::len), Some(3));
    /// ```
    pub fn from_json_str(text: &str) -> Result<Jksn> {
        parse_embedded(text).map_err(|e| JksnError::Conversion(e.to_string()))
    }

    /// Renders the value as JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        let value = Value::try_from(self.clone())?;
        Ok(value.to_string())
    }
}

/// Parses the JSON carried by a `0x0f` control byte.
pub(crate) fn parse_embedded(text: &str) -> std::result::Result<Jksn, serde_json::Error> {
    serde_json::from_str::<Value>(text).map(Jksn::from)
}
