use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::str::FromStr;
use thiserror::Error;

pub mod column;
pub mod join;
pub mod table;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Expected a column, got a table with {columns} columns")]
    NotAColumn { columns: usize },

    #[error("Column merges join on the index, {0} cannot name a column")]
    IndexOnlyKey(&'static str),

    #[error("Invalid tag: {0:?}")]
    InvalidTag(String),

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Value {value} cannot be compared with column '{column}'")]
    IncomparableValue { column: String, value: String },

    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("Percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("Column '{0}' has no values to rank")]
    EmptyColumn(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// A single cell, mask operand or row label (owned for simplicity)
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer cell
    Int(i64),
    /// Float cell
    Float(f64),
    /// String cell
    Str(String),
    /// Missing cell
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used for cross-type comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Str(v) => v.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Comparison applied between a column element and a mask operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    pub const ALL: [Comparator; 6] = [
        Comparator::Eq,
        Comparator::Ne,
        Comparator::Lt,
        Comparator::Le,
        Comparator::Gt,
        Comparator::Ge,
    ];

    /// Decide a comparison from the ordering of `element` relative to the operand.
    ///
    /// `None` means the pair is unordered (a null or NaN element): only `Ne` holds.
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparator::Ne, None) => true,
            (_, None) => false,
            (Comparator::Eq, Some(o)) => o == Ordering::Equal,
            (Comparator::Ne, Some(o)) => o != Ordering::Equal,
            (Comparator::Lt, Some(o)) => o == Ordering::Less,
            (Comparator::Le, Some(o)) => o != Ordering::Greater,
            (Comparator::Gt, Some(o)) => o == Ordering::Greater,
            (Comparator::Ge, Some(o)) => o != Ordering::Less,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Ne => "ne",
            Comparator::Lt => "lt",
            Comparator::Le => "le",
            Comparator::Gt => "gt",
            Comparator::Ge => "ge",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Comparator {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eq" => Ok(Comparator::Eq),
            "ne" => Ok(Comparator::Ne),
            "lt" => Ok(Comparator::Lt),
            "le" => Ok(Comparator::Le),
            "gt" => Ok(Comparator::Gt),
            "ge" => Ok(Comparator::Ge),
            other => Err(FrameError::InvalidTag(other.to_string())),
        }
    }
}

/// Filter predicate accepted by the dispatching `mask` operations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterPredicate {
    Compare(Comparator, Value),
    In(Vec<Value>),
}

impl FilterPredicate {
    /// Build a predicate from a mode tag (`eq, ne, lt, le, gt, ge, in`).
    ///
    /// Comparator tags take exactly one value; `in` takes any number.
    pub fn parse(tag: &str, mut values: Vec<Value>) -> Result<Self> {
        if tag == "in" {
            return Ok(FilterPredicate::In(values));
        }
        let comparator = tag.parse::<Comparator>()?;
        if values.len() != 1 {
            return Err(FrameError::LengthMismatch {
                expected: 1,
                actual: values.len(),
            });
        }
        Ok(FilterPredicate::Compare(comparator, values.remove(0)))
    }
}

/// Check that parallel sequences handed to a multi-key operation line up.
pub(crate) fn ensure_same_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(FrameError::LengthMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparator_parses_known_tags() {
        for cmp in Comparator::ALL {
            assert_eq!(cmp.tag().parse::<Comparator>().unwrap(), cmp);
        }
    }

    #[test]
    fn comparator_rejects_unknown_tag() {
        let err = "xx".parse::<Comparator>().unwrap_err();
        assert!(matches!(err, FrameError::InvalidTag(tag) if tag == "xx"));
    }

    #[test]
    fn unordered_elements_only_satisfy_ne() {
        assert!(Comparator::Ne.holds(None));
        for cmp in [Comparator::Eq, Comparator::Lt, Comparator::Le, Comparator::Gt, Comparator::Ge] {
            assert!(!cmp.holds(None));
        }
    }

    #[test]
    fn predicate_parse_checks_arity() {
        let pred = FilterPredicate::parse("ge", vec![Value::Int(3)]).unwrap();
        assert_eq!(pred, FilterPredicate::Compare(Comparator::Ge, Value::Int(3)));

        let err = FilterPredicate::parse("lt", vec![Value::Int(1), Value::Int(2)]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthMismatch {
                expected: 1,
                actual: 2
            }
        ));

        assert!(matches!(
            FilterPredicate::parse("between", vec![]),
            Err(FrameError::InvalidTag(_))
        ));
    }

    #[test]
    fn float_values_hash_by_bits() {
        use std::collections::HashSet;
        let set: HashSet<Value> = [Value::Float(f64::NAN), Value::Float(f64::NAN), Value::Null]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }
}
