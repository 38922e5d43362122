// SPDX-License-Identifier: GPL-3.0-or-later

//! Dynamically typed values passed to and returned from doubled methods.
//!
//! A double intercepts calls by name, so arguments and results travel as
//! `Value`s rather than as the native types of a method signature. The
//! `ValueKind` of a method describes what it declares to return, and gives
//! the default empty value a full double answers with.

use crate::engine::Double;
use std::fmt;

/// A value flowing through a doubled call.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    /// Another double, passed as a collaborator.
    ///
    /// This is a strong handle. A binding which answers with the double it
    /// is bound on keeps that double alive until `reset` drops the binding.
    Double(Double),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Loose truthiness: null, `false`, zero, the empty string and the
    /// empty list are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Str(value) => !value.is_empty(),
            Value::List(values) => !values.is_empty(),
            Value::Double(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<&Double> {
        match self {
            Value::Double(double) => Some(double),
            _ => None,
        }
    }
}

/// Doubles compare by identity, everything else by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::Int(lhs), Value::Int(rhs)) => lhs == rhs,
            (Value::Str(lhs), Value::Str(rhs)) => lhs == rhs,
            (Value::List(lhs), Value::List(rhs)) => lhs == rhs,
            (Value::Double(lhs), Value::Double(rhs)) => lhs.same_as(rhs),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Str(value) => write!(f, "{value:?}"),
            Value::List(values) => {
                write!(f, "[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Value::Double(double) => write!(f, "{double}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl From<Double> for Value {
    fn from(double: Double) -> Self {
        Value::Double(double)
    }
}

impl From<&Double> for Value {
    fn from(double: &Double) -> Self {
        Value::Double(double.clone())
    }
}

/// The declared return kind of a method.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ValueKind {
    /// No declared type, the default is null.
    #[default]
    Mixed,
    Bool,
    Int,
    Str,
    List,
}

impl ValueKind {
    /// The default empty value a full double answers with.
    pub fn default_value(self) -> Value {
        match self {
            ValueKind::Mixed => Value::Null,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Str => Value::Str(String::new()),
            ValueKind::List => Value::List(vec![]),
        }
    }
}
