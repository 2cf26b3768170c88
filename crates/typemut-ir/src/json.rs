//! Conversions between [`Value`] and JSON.
//!
//! Two forms are supported:
//! - tagged: `{"kind": "tuple", "value": [...]}`, lossless, used for the
//!   serde impls;
//! - plain: ordinary JSON, where arrays become sequences and objects become
//!   string-keyed mappings. Tuples, sets and non-string keys do not survive
//!   a plain round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number};

use crate::types::{Kind, Mapping, Value};

#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("unsupported value type: {found}")]
    UnsupportedType { found: String },

    #[error("malformed {kind} value: {details}")]
    Malformed { kind: Kind, details: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Value {
    /// Convert plain JSON into a value.
    ///
    /// Integers that fit in `i64` become [`Value::Integer`], every other
    /// number becomes [`Value::Float`]. Object keys become string keys in
    /// sorted order. `null` has no kind and is rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Value, ValueError> {
        match json {
            serde_json::Value::Null => Err(ValueError::UnsupportedType {
                found: "null".to_string(),
            }),
            serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
            serde_json::Value::Number(n) => number_to_value(n),
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            serde_json::Value::Object(obj) => {
                let mut map = Mapping::new();
                for (k, v) in obj {
                    map.insert(Value::String(k.clone()), Value::from_json(v)?);
                }
                Ok(Value::Mapping(map))
            }
        }
    }

    /// Render as plain JSON.
    ///
    /// Tuples and sets become arrays. Mappings whose keys are all strings
    /// become objects, any other mapping becomes an array of `[key, value]`
    /// pairs. Non-finite floats have no JSON number form and are rendered
    /// as the strings `"nan"`, `"inf"` and `"-inf"`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(v) => serde_json::Value::from(*v),
            Value::Float(v) => float_to_json(*v),
            Value::Boolean(v) => serde_json::Value::Bool(*v),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) | Value::Tuple(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Set(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Mapping(map) => {
                if map.keys().all(|k| matches!(k, Value::String(_))) {
                    let mut obj = Map::new();
                    for (k, v) in map.iter() {
                        if let Value::String(key) = k {
                            obj.insert(key.clone(), v.to_json());
                        }
                    }
                    serde_json::Value::Object(obj)
                } else {
                    serde_json::Value::Array(
                        map.iter()
                            .map(|(k, v)| serde_json::Value::Array(vec![k.to_json(), v.to_json()]))
                            .collect(),
                    )
                }
            }
        }
    }

    /// Convert the tagged form into a value.
    pub fn from_tagged_json(json: &serde_json::Value) -> Result<Value, ValueError> {
        let obj = json.as_object().ok_or_else(|| ValueError::UnsupportedType {
            found: format!("untagged JSON {}", json_type_name(json)),
        })?;
        let tag = obj
            .get("kind")
            .and_then(|k| k.as_str())
            .ok_or_else(|| ValueError::UnsupportedType {
                found: "object without a string `kind` tag".to_string(),
            })?;
        let kind = Kind::from_name(tag).ok_or_else(|| ValueError::UnsupportedType {
            found: tag.to_string(),
        })?;
        let content = obj.get("value").ok_or_else(|| malformed(kind, "missing `value`"))?;

        match kind {
            Kind::Integer => content
                .as_i64()
                .map(Value::Integer)
                .ok_or_else(|| malformed(kind, "expected a 64-bit integer")),
            Kind::Float => float_from_json(content)
                .map(Value::Float)
                .ok_or_else(|| malformed(kind, "expected a number")),
            Kind::Boolean => content
                .as_bool()
                .map(Value::Boolean)
                .ok_or_else(|| malformed(kind, "expected a boolean")),
            Kind::String => content
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| malformed(kind, "expected a string")),
            Kind::Sequence => tagged_items(kind, content).map(Value::Sequence),
            Kind::Tuple => tagged_items(kind, content).map(Value::Tuple),
            Kind::Set => tagged_items(kind, content).map(Value::set_from),
            Kind::Mapping => {
                let pairs = content
                    .as_array()
                    .ok_or_else(|| malformed(kind, "expected an array of pairs"))?;
                let mut map = Mapping::new();
                for pair in pairs {
                    match pair.as_array().map(Vec::as_slice) {
                        Some([k, v]) => {
                            map.insert(Value::from_tagged_json(k)?, Value::from_tagged_json(v)?);
                        }
                        _ => return Err(malformed(kind, "each entry must be a [key, value] pair")),
                    }
                }
                Ok(Value::Mapping(map))
            }
        }
    }

    /// Render the tagged form.
    pub fn to_tagged_json(&self) -> serde_json::Value {
        let content = match self {
            Value::Integer(v) => serde_json::Value::from(*v),
            Value::Float(v) => float_to_json(*v),
            Value::Boolean(v) => serde_json::Value::Bool(*v),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) | Value::Tuple(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_tagged_json).collect())
            }
            Value::Set(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_tagged_json).collect())
            }
            Value::Mapping(map) => serde_json::Value::Array(
                map.iter()
                    .map(|(k, v)| serde_json::Value::Array(vec![k.to_tagged_json(), v.to_tagged_json()]))
                    .collect(),
            ),
        };
        serde_json::json!({ "kind": self.kind().name(), "value": content })
    }
}

/// Parse a plain JSON document into a value.
pub fn parse_plain(json: &str) -> Result<Value, ValueError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    Value::from_json(&raw)
}

/// Parse a tagged JSON document into a value.
pub fn parse_tagged(json: &str) -> Result<Value, ValueError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    Value::from_tagged_json(&raw)
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_tagged_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Value::from_tagged_json(&raw).map_err(serde::de::Error::custom)
    }
}

fn number_to_value(n: &Number) -> Result<Value, ValueError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| ValueError::UnsupportedType {
            found: format!("number {n}"),
        })
}

fn float_to_json(v: f64) -> serde_json::Value {
    match Number::from_f64(v) {
        Some(n) => serde_json::Value::Number(n),
        None if v.is_nan() => serde_json::Value::from("nan"),
        None if v > 0.0 => serde_json::Value::from("inf"),
        None => serde_json::Value::from("-inf"),
    }
}

fn float_from_json(json: &serde_json::Value) -> Option<f64> {
    match json {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => match s.as_str() {
            "nan" => Some(f64::NAN),
            "inf" => Some(f64::INFINITY),
            "-inf" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

fn tagged_items(kind: Kind, content: &serde_json::Value) -> Result<Vec<Value>, ValueError> {
    content
        .as_array()
        .ok_or_else(|| malformed(kind, "expected an array"))?
        .iter()
        .map(Value::from_tagged_json)
        .collect()
}

fn malformed(kind: Kind, details: &str) -> ValueError {
    ValueError::Malformed {
        kind,
        details: details.to_string(),
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
