use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// A function-call argument value.
///
/// The set of kinds is closed: every rule that inspects a value (mutation,
/// harvesting, hashing) matches on all variants. Equality, ordering and
/// hashing are structural and total; floats compare by `f64::total_cmp`
/// so NaN is equal to itself and every value can live in a set.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Sequence(Vec<Value>),
    Tuple(Vec<Value>),
    Set(BTreeSet<Value>),
    Mapping(Mapping),
}

/// Fieldless mirror of the [`Value`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Integer,
    Float,
    Boolean,
    String,
    Sequence,
    Tuple,
    Set,
    Mapping,
}

impl Kind {
    /// Kinds whose values are harvested as ingredients.
    pub const SCALARS: [Kind; 3] = [Kind::Integer, Kind::Float, Kind::String];

    /// True for the kinds stored in an ingredient pool.
    pub fn is_scalar(self) -> bool {
        matches!(self, Kind::Integer | Kind::Float | Kind::String)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Sequence => "sequence",
            Kind::Tuple => "tuple",
            Kind::Set => "set",
            Kind::Mapping => "mapping",
        }
    }

    /// Inverse of [`Kind::name`].
    pub fn from_name(name: &str) -> Option<Kind> {
        let kind = match name {
            "integer" => Kind::Integer,
            "float" => Kind::Float,
            "boolean" => Kind::Boolean,
            "string" => Kind::String,
            "sequence" => Kind::Sequence,
            "tuple" => Kind::Tuple,
            "set" => Kind::Set,
            "mapping" => Kind::Mapping,
            _ => return None,
        };
        Some(kind)
    }

    fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Boolean(_) => Kind::Boolean,
            Value::String(_) => Kind::String,
            Value::Sequence(_) => Kind::Sequence,
            Value::Tuple(_) => Kind::Tuple,
            Value::Set(_) => Kind::Set,
            Value::Mapping(_) => Kind::Mapping,
        }
    }

    /// Build a set, dropping duplicate elements.
    pub fn set_from<I: IntoIterator<Item = Value>>(items: I) -> Value {
        Value::Set(items.into_iter().collect())
    }

    /// Build a mapping; later pairs overwrite earlier ones with an equal key.
    pub fn mapping_from<I: IntoIterator<Item = (Value, Value)>>(pairs: I) -> Value {
        Value::Mapping(pairs.into_iter().collect())
    }

    /// Number of direct elements for composites, `None` for scalars.
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::String(_) => None,
            Value::Sequence(items) | Value::Tuple(items) => Some(items.len()),
            Value::Set(items) => Some(items.len()),
            Value::Mapping(map) => Some(map.len()),
        }
    }

    /// Visit every scalar leaf reachable from this value, depth first.
    /// Mapping keys are visited before mapping values.
    pub fn for_each_leaf<F: FnMut(&Value)>(&self, f: &mut F) {
        match self {
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::String(_) => f(self),
            Value::Sequence(items) | Value::Tuple(items) => {
                items.iter().for_each(|item| item.for_each_leaf(f))
            }
            Value::Set(items) => items.iter().for_each(|item| item.for_each_leaf(f)),
            Value::Mapping(map) => {
                map.keys().for_each(|k| k.for_each_leaf(f));
                map.values().for_each(|v| v.for_each_leaf(f));
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

// ── Structural equality, ordering, hashing ─────────────────────────────

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Sequence(a), Value::Sequence(b)) => a.cmp(b),
            (Value::Tuple(a), Value::Tuple(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Mapping(a), Value::Mapping(b)) => a.entries.cmp(&b.entries),
            _ => self.kind().rank().cmp(&other.kind().rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().rank().hash(state);
        match self {
            Value::Integer(v) => v.hash(state),
            // total_cmp equality coincides with bit equality.
            Value::Float(v) => v.to_bits().hash(state),
            Value::Boolean(v) => v.hash(state),
            Value::String(v) => v.hash(state),
            Value::Sequence(items) | Value::Tuple(items) => items.hash(state),
            Value::Set(items) => items.hash(state),
            Value::Mapping(map) => map.entries.hash(state),
        }
    }
}

// ── Mapping ────────────────────────────────────────────────────────────

/// Insertion-ordered key/value pairs with keys unique by equality.
///
/// Overwriting an existing key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    /// Insert or overwrite. Returns the previous value for `key`, if any.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Entry at insertion position `index`.
    pub fn entry_at(&self, index: usize) -> Option<(&Value, &Value)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    /// Mutable access to the value at insertion position `index`.
    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.entries.get_mut(index).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(Value, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ── Display ────────────────────────────────────────────────────────────

/// Python-style literal rendering, used in logs and reports.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
            Value::String(s) => write_quoted(f, s),
            Value::Sequence(items) => {
                f.write_str("[")?;
                write_joined(f, items.iter())?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items.iter())?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_str("{")?;
                write_joined(f, items.iter())?;
                f.write_str("}")
            }
            Value::Mapping(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}
