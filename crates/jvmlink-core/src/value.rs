//! Values marshalled across the host/JVM boundary.
//!
//! The bridge performs the actual marshalling; this type is the host-side
//! shape of an argument or result. Instance values carry an opaque
//! [`InstanceRef`] whose internals belong to the bridge.

use std::fmt;

/// A value crossing the host/foreign boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The foreign null reference.
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(String),
    /// An opaque reference to a foreign instance.
    Instance(InstanceRef),
}

impl Value {
    /// Short name of the value's shape, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Instance(_) => "instance",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(l) => Some(*l),
            Value::Int(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceRef> {
        match self {
            Value::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// True for the foreign null reference.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Instance(i) => write!(f, "{}@{}", i.class_name(), i.id()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<InstanceRef> for Value {
    fn from(v: InstanceRef) -> Self {
        Value::Instance(v)
    }
}

/// Opaque reference to a foreign instance.
///
/// Returned by construction and instance calls. Its shape is assumed, not
/// designed, by this layer: the bridge assigns the id and resolves it back
/// to the live foreign object on every instance-level call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceRef {
    class_name: String,
    id: u64,
}

impl InstanceRef {
    /// Create an instance reference. Called by bridge implementations.
    pub fn new(class_name: impl Into<String>, id: u64) -> Self {
        Self {
            class_name: class_name.into(),
            id,
        }
    }

    /// Fully qualified name of the instance's class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Bridge-assigned identity of the foreign object.
    pub fn id(&self) -> u64 {
        self.id
    }
}
