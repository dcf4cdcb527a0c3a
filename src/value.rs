//! Named configuration values and their coercion into field types
//!
//! The [ValueStore] only records what was supplied. Coercion happens when a value is
//! assigned, through the [FromValue] implementation of the destination type:
//! text is parsed at the exact width of the target, other values go through a
//! checked conversion.

use std::any::Any;
use std::collections::hash_map::{Entry, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::WiringError;

/// A named external value.
#[derive(Clone)]
pub enum Value {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Arbitrary data, retrieved by exact type
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap any shareable data as a value
    pub fn opaque<T: Any + Send + Sync>(data: T) -> Self {
        Value::Opaque(Arc::new(data))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

macro_rules! value_from_int {
    ($variant: ident, $wide: ty $(, $int: ty)+) => {
        $(
        impl From<$int> for Value {
            fn from(i: $int) -> Self {
                // lossless on every supported platform
                Value::$variant(i as $wide)
            }
        }
        )+
    };
}

value_from_int!(Int, i64, i8, i16, i32, i64, isize);
value_from_int!(Uint, u64, u8, u16, u32, u64, usize);

/// The stored value cannot be converted into the requested type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionFailure;

/// Types that a named value can be injected into.
///
/// Each implementation is one entry of the coercion table: it knows how to parse
/// text at its own width and which non-text values convert to it without loss.
pub trait FromValue: Sized + 'static {
    fn from_value(value: &Value) -> Result<Self, ConversionFailure>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ConversionFailure> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConversionFailure> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => downcast(other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ConversionFailure> {
        match value {
            Value::Text(s) => parse_bool(s),
            Value::Bool(b) => Ok(*b),
            other => downcast(other),
        }
    }
}

macro_rules! from_value_int {
    ($parse: ident; $($int: ty),+) => {
        $(
        impl FromValue for $int {
            fn from_value(value: &Value) -> Result<Self, ConversionFailure> {
                match value {
                    Value::Text(s) => $parse::<$int>(s),
                    Value::Int(i) => <$int>::try_from(*i).map_err(|_| ConversionFailure),
                    Value::Uint(u) => <$int>::try_from(*u).map_err(|_| ConversionFailure),
                    other => downcast(other),
                }
            }
        }
        )+
    };
}

from_value_int!(parse_signed; i8, i16, i32, i64, isize);
from_value_int!(parse_unsigned; u8, u16, u32, u64, usize);

macro_rules! from_value_float {
    ($($float: ty),+) => {
        $(
        impl FromValue for $float {
            fn from_value(value: &Value) -> Result<Self, ConversionFailure> {
                match value {
                    Value::Text(s) => parse_float(s, <$float>::is_infinite),
                    Value::Float(x) => {
                        let narrowed = *x as $float;
                        if x.is_finite() && !narrowed.is_finite() {
                            return Err(ConversionFailure);
                        }
                        Ok(narrowed)
                    }
                    // integers must survive the round trip
                    Value::Int(i) => {
                        let x = *i as $float;
                        if x as i128 != i128::from(*i) {
                            return Err(ConversionFailure);
                        }
                        Ok(x)
                    }
                    Value::Uint(u) => {
                        let x = *u as $float;
                        if x as i128 != i128::from(*u) {
                            return Err(ConversionFailure);
                        }
                        Ok(x)
                    }
                    other => downcast(other),
                }
            }
        }
        )+
    };
}

from_value_float!(f64, f32);

fn parse_signed<T: FromStr>(s: &str) -> Result<T, ConversionFailure> {
    s.parse().map_err(|_| ConversionFailure)
}

/// Unsigned text carries no sign at all
fn parse_unsigned<T: FromStr>(s: &str) -> Result<T, ConversionFailure> {
    if s.starts_with('+') {
        return Err(ConversionFailure);
    }
    s.parse().map_err(|_| ConversionFailure)
}

/// Parse a float, rejecting finite text out of range for the target width
fn parse_float<T: FromStr + Copy>(
    s: &str,
    is_infinite: fn(T) -> bool,
) -> Result<T, ConversionFailure> {
    let x: T = s.parse().map_err(|_| ConversionFailure)?;
    if is_infinite(x) && !is_infinity(s) {
        return Err(ConversionFailure);
    }
    Ok(x)
}

fn is_infinity(s: &str) -> bool {
    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Retrieve an opaque value of exactly the requested type
pub(crate) fn downcast<T: Any + Clone>(value: &Value) -> Result<T, ConversionFailure> {
    match value {
        Value::Opaque(data) => data.downcast_ref::<T>().cloned().ok_or(ConversionFailure),
        _ => Err(ConversionFailure),
    }
}

fn parse_bool(s: &str) -> Result<bool, ConversionFailure> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConversionFailure),
    }
}

/// Named values supplied before bring-up
#[derive(Debug, Default)]
pub(crate) struct ValueStore(HashMap<String, Value>);

impl ValueStore {
    pub(crate) fn put(&mut self, name: String, value: Value) -> Result<(), WiringError> {
        match self.0.entry(name) {
            Entry::Occupied(o) => Err(WiringError::DuplicateValue {
                name: o.key().clone(),
                value: value.to_string(),
            }),
            Entry::Vacant(v) => {
                v.insert(value);
                Ok(())
            }
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}
