//! Field value snapshots
//!
//! Handlers never see host types directly. Every checked field is captured as
//! a [`Value`] together with its declared [`ValueType`], produced through the
//! [`IntoValue`] trait.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError};
use rust_decimal::Decimal;

// ============================================================================
// VALUE TYPE
// ============================================================================

/// Shape of a value, used both for declared field types and runtime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Runtime shape of a missing value. Never a declared type.
    Null,
    /// `bool`.
    Bool,
    /// Any integer, float or decimal.
    Number,
    /// Text.
    String,
    /// Sequences and sets.
    Collection,
    /// A host-defined shape, identified by name.
    Other(&'static str),
}

impl ValueType {
    /// Whether a field declared as `self` can be handled as `target`.
    #[must_use]
    pub fn is_assignable_to(self, target: ValueType) -> bool {
        self == target
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool => f.write_str("bool"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Collection => f.write_str("collection"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// NUMBER
// ============================================================================

/// A numeric field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Signed integers up to 128 bits.
    Int(i128),
    /// `u128`, which does not fit [`Number::Int`].
    UInt(u128),
    /// `f32` / `f64`.
    Float(f64),
    /// Arbitrary-precision decimal.
    Decimal(BigDecimal),
}

impl Number {
    /// Converts to an arbitrary-precision decimal through the textual form.
    ///
    /// Fails only for floats with no decimal representation (`NaN`,
    /// infinities).
    pub fn to_decimal(&self) -> Result<BigDecimal, ParseBigDecimalError> {
        match self {
            Self::Decimal(d) => Ok(d.clone()),
            other => BigDecimal::from_str(&other.to_string()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Decimal(d) => write!(f, "{d}"),
        }
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// Snapshot of a field value at inspection time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(Number),
    /// Text.
    String(String),
    /// Ordered elements of a collection.
    List(Vec<Value>),
    /// A host-defined value, kept in its string form.
    Other {
        /// Declared type name, reported by [`Value::value_type`].
        type_name: &'static str,
        /// String form of the value.
        text: String,
    },
}

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Runtime shape of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::List(_) => ValueType::Collection,
            Self::Other { type_name, .. } => ValueType::Other(*type_name),
        }
    }

    /// Borrows the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number of a numeric value.
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Other { text, .. } => f.write_str(text),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

// ============================================================================
// INTO VALUE
// ============================================================================

/// Captures a host field as a [`Value`].
///
/// `VALUE_TYPE` is the declared type used for handler matching, so it stays
/// the same whether or not the current value is present: `Option<String>`
/// is declared as [`ValueType::String`] and captures `None` as
/// [`Value::Null`].
pub trait IntoValue {
    /// Declared type of the field.
    const VALUE_TYPE: ValueType;

    /// Snapshot of the current value.
    fn to_value(&self) -> Value;
}

impl IntoValue for str {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_value(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl IntoValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl IntoValue for Cow<'_, str> {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_value(&self) -> Value {
        Value::String(self.as_ref().to_owned())
    }
}

impl IntoValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! int_into_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::Number;

                fn to_value(&self) -> Value {
                    Value::Number(Number::Int(i128::from(*self)))
                }
            }
        )*
    };
}

int_into_value!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl IntoValue for u128 {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn to_value(&self) -> Value {
        Value::Number(Number::UInt(*self))
    }
}

impl IntoValue for isize {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn to_value(&self) -> Value {
        Value::Number(Number::Int(*self as i128))
    }
}

impl IntoValue for usize {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn to_value(&self) -> Value {
        Value::Number(Number::Int(*self as i128))
    }
}

impl IntoValue for f32 {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn to_value(&self) -> Value {
        Value::Number(Number::Float(f64::from(*self)))
    }
}

impl IntoValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn to_value(&self) -> Value {
        Value::Number(Number::Float(*self))
    }
}

impl IntoValue for BigDecimal {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn to_value(&self) -> Value {
        Value::Number(Number::Decimal(self.clone()))
    }
}

impl IntoValue for Decimal {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn to_value(&self) -> Value {
        let exact = BigDecimal::new(self.mantissa().into(), i64::from(self.scale()));
        Value::Number(Number::Decimal(exact))
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, IntoValue::to_value)
    }
}

impl<T: IntoValue + ?Sized> IntoValue for &T {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: IntoValue + ?Sized> IntoValue for Box<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: IntoValue> IntoValue for [T] {
    const VALUE_TYPE: ValueType = ValueType::Collection;

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(IntoValue::to_value).collect())
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    const VALUE_TYPE: ValueType = ValueType::Collection;

    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    const VALUE_TYPE: ValueType = ValueType::Collection;

    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    const VALUE_TYPE: ValueType = ValueType::Collection;

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(IntoValue::to_value).collect())
    }
}

impl<T: IntoValue, S: BuildHasher> IntoValue for HashSet<T, S> {
    const VALUE_TYPE: ValueType = ValueType::Collection;

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(IntoValue::to_value).collect())
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    const VALUE_TYPE: ValueType = ValueType::Collection;

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(IntoValue::to_value).collect())
    }
}

/// Strips module paths from a type name:
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push(c);
            segment_start = out.len();
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
