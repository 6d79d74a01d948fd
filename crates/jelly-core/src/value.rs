//! Typed command arguments.
//!
//! Every handler declares its parameters up front as a list of [`Param`]s.
//! At dispatch time each raw token is coerced into a [`Value`] of the declared
//! [`ParamKind`] through an [`ArgumentCoercion`] implementation, and the
//! resulting [`Args`] are handed to the handler.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ArgumentError, CoercionError};

/// Length of an object identifier in hex digits.
pub const IDENTIFIER_LEN: usize = 24;

/// The closed set of argument types a handler can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Signed 64-bit integer.
    Integer,
    /// Finite 64-bit float.
    Float,
    /// The token as-is.
    Text,
    /// A 24 hex digit object identifier.
    Identifier,
}

impl ParamKind {
    /// Human readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Identifier => "identifier",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Name shown in usage strings, e.g. `(keyword)`.
    pub name: String,
    /// Declared type.
    pub kind: ParamKind,
}

impl Param {
    /// Declares a parameter.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Declares a text parameter.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Text)
    }

    /// Declares an integer parameter.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    /// Declares a float parameter.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Float)
    }

    /// Declares an identifier parameter.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Identifier)
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// See [`ParamKind::Integer`].
    Integer(i64),
    /// See [`ParamKind::Float`].
    Float(f64),
    /// See [`ParamKind::Text`].
    Text(String),
    /// See [`ParamKind::Identifier`]. Always lower case.
    Identifier(String),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Integer(_) => ParamKind::Integer,
            Self::Float(_) => ParamKind::Float,
            Self::Text(_) => ParamKind::Text,
            Self::Identifier(_) => ParamKind::Identifier,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) | Self::Identifier(v) => f.write_str(v),
        }
    }
}

/// Turns raw tokens into typed values.
pub trait ArgumentCoercion: Send + Sync {
    /// Coerces `raw` into a value of `kind`.
    fn coerce(&self, kind: ParamKind, raw: &str) -> Result<Value, CoercionError>;
}

/// The default [`ArgumentCoercion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCoercion;

impl ArgumentCoercion for StandardCoercion {
    fn coerce(&self, kind: ParamKind, raw: &str) -> Result<Value, CoercionError> {
        match kind {
            ParamKind::Text => Ok(Value::Text(raw.to_string())),
            ParamKind::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| CoercionError::new(kind, raw, e.to_string())),
            ParamKind::Float => {
                let v = raw
                    .parse::<f64>()
                    .map_err(|e| CoercionError::new(kind, raw, e.to_string()))?;
                if v.is_finite() {
                    Ok(Value::Float(v))
                } else {
                    Err(CoercionError::new(kind, raw, "not a finite number"))
                }
            }
            ParamKind::Identifier => {
                if raw.len() != IDENTIFIER_LEN {
                    return Err(CoercionError::new(
                        kind,
                        raw,
                        format!("expected {IDENTIFIER_LEN} hex digits, got {}", raw.len()),
                    ));
                }
                if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(CoercionError::new(kind, raw, "contains non-hex digits"));
                }
                Ok(Value::Identifier(raw.to_ascii_lowercase()))
            }
        }
    }
}

/// The coerced arguments of one handler invocation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Value>,
}

impl Args {
    /// Wraps already coerced values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` for a bare invocation.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the argument at `index`, whatever its type.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterates over the arguments.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Consumes the list.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn at(&self, index: usize) -> Result<&Value, ArgumentError> {
        self.values.get(index).ok_or(ArgumentError::Missing {
            index,
            len: self.values.len(),
        })
    }

    fn mismatch(index: usize, expected: ParamKind, actual: &Value) -> ArgumentError {
        ArgumentError::TypeMismatch {
            index,
            expected,
            actual: actual.kind(),
        }
    }

    /// Reads a text argument.
    pub fn text(&self, index: usize) -> Result<&str, ArgumentError> {
        match self.at(index)? {
            Value::Text(v) => Ok(v),
            other => Err(Self::mismatch(index, ParamKind::Text, other)),
        }
    }

    /// Reads an integer argument.
    pub fn integer(&self, index: usize) -> Result<i64, ArgumentError> {
        match self.at(index)? {
            Value::Integer(v) => Ok(*v),
            other => Err(Self::mismatch(index, ParamKind::Integer, other)),
        }
    }

    /// Reads a float argument.
    pub fn float(&self, index: usize) -> Result<f64, ArgumentError> {
        match self.at(index)? {
            Value::Float(v) => Ok(*v),
            other => Err(Self::mismatch(index, ParamKind::Float, other)),
        }
    }

    /// Reads an identifier argument.
    pub fn identifier(&self, index: usize) -> Result<&str, ArgumentError> {
        match self.at(index)? {
            Value::Identifier(v) => Ok(v),
            other => Err(Self::mismatch(index, ParamKind::Identifier, other)),
        }
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
