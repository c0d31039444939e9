use std::cmp::Ordering;
use std::fmt;

/// A single non-null cell value read out of a typed column.
///
/// Nullability is carried outside the value (`Option<ScalarValue>`), so every
/// variant here holds a real payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Utf8(String),
}

impl ScalarValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int32(v) => Some(*v as i64),
            ScalarValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Float32(v) => Some(*v as f64),
            ScalarValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ScalarValue::Boolean(_) => 0,
            ScalarValue::Int32(_) => 1,
            ScalarValue::Int64(_) => 2,
            ScalarValue::Float32(_) => 3,
            ScalarValue::Float64(_) => 4,
            ScalarValue::Utf8(_) => 5,
        }
    }

    /// Total order over values of the same variant. Floats use IEEE total
    /// ordering so that min/max stay commutative even with NaN inputs.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ScalarValue::Boolean(a), ScalarValue::Boolean(b)) => a.cmp(b),
            (ScalarValue::Int32(a), ScalarValue::Int32(b)) => a.cmp(b),
            (ScalarValue::Int64(a), ScalarValue::Int64(b)) => a.cmp(b),
            (ScalarValue::Float32(a), ScalarValue::Float32(b)) => a.total_cmp(b),
            (ScalarValue::Float64(a), ScalarValue::Float64(b)) => a.total_cmp(b),
            (ScalarValue::Utf8(a), ScalarValue::Utf8(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::Int32(v) => write!(f, "{}", v),
            ScalarValue::Int64(v) => write!(f, "{}", v),
            ScalarValue::Float32(v) => write!(f, "{}", v),
            ScalarValue::Float64(v) => write!(f, "{}", v),
            ScalarValue::Utf8(s) => f.write_str(s),
        }
    }
}
