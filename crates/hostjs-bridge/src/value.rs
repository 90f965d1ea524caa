//! Host-side dynamic values and declared member types

use std::fmt;

use crate::error::HostFault;
use crate::host::HostHandle;

/// A value in the host's own type system
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    /// A host object, compared by identity
    Object(HostHandle),
}

/// Declared type of a host member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// Accepts any value
    Any,
    Bool,
    Int,
    Long,
    Double,
    String,
    /// A host object of the named runtime type
    Object(String),
}

impl NativeValue {
    /// Runtime type of the value; `None` for null
    pub fn native_type(&self) -> Option<NativeType> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => NativeType::Bool,
            Self::Int(_) => NativeType::Int,
            Self::Long(_) => NativeType::Long,
            Self::Double(_) => NativeType::Double,
            Self::String(_) => NativeType::String,
            Self::Object(handle) => NativeType::Object(handle.type_name().to_string()),
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the runtime type, used in fault messages
    pub fn type_label(&self) -> String {
        match self.native_type() {
            Some(ty) => ty.to_string(),
            None => "null".to_string(),
        }
    }

    pub fn as_object(&self) -> Option<&HostHandle> {
        match self {
            Self::Object(handle) => Some(handle),
            _ => None,
        }
    }

}

impl NativeType {
    /// Whether a value of type `source` can be stored as-is in a slot of this type
    pub fn is_assignable_from(&self, source: &NativeType) -> bool {
        matches!(self, Self::Any) || self == source
    }

    /// Assignability plus the lossless primitive widenings arrays accept
    pub fn widens_from(&self, source: &NativeType) -> bool {
        self.is_assignable_from(source)
            || matches!(
                (self, source),
                (Self::Long, Self::Int) | (Self::Double, Self::Int) | (Self::Double, Self::Long)
            )
    }

    /// Value stored when null is written to a slot of this type
    pub fn default_value(&self) -> NativeValue {
        match self {
            Self::Bool => NativeValue::Bool(false),
            Self::Int => NativeValue::Int(0),
            Self::Long => NativeValue::Long(0),
            Self::Double => NativeValue::Double(0.0),
            Self::Any | Self::String | Self::Object(_) => NativeValue::Null,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Object"),
            Self::Bool => f.write_str("Boolean"),
            Self::Int => f.write_str("Int32"),
            Self::Long => f.write_str("Int64"),
            Self::Double => f.write_str("Double"),
            Self::String => f.write_str("String"),
            Self::Object(name) => f.write_str(name),
        }
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for NativeValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<HostHandle> for NativeValue {
    fn from(value: HostHandle) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

fn cast_error(value: &NativeValue, target: NativeType) -> HostFault {
    HostFault::invalid_cast(value.type_label(), target.to_string())
}

impl TryFrom<NativeValue> for bool {
    type Error = HostFault;

    fn try_from(value: NativeValue) -> Result<Self, Self::Error> {
        match value {
            NativeValue::Bool(b) => Ok(b),
            other => Err(cast_error(&other, NativeType::Bool)),
        }
    }
}

impl TryFrom<NativeValue> for i32 {
    type Error = HostFault;

    fn try_from(value: NativeValue) -> Result<Self, Self::Error> {
        match value {
            NativeValue::Int(n) => Ok(n),
            other => Err(cast_error(&other, NativeType::Int)),
        }
    }
}

impl TryFrom<NativeValue> for i64 {
    type Error = HostFault;

    fn try_from(value: NativeValue) -> Result<Self, Self::Error> {
        match value {
            NativeValue::Int(n) => Ok(i64::from(n)),
            NativeValue::Long(n) => Ok(n),
            other => Err(cast_error(&other, NativeType::Long)),
        }
    }
}

impl TryFrom<NativeValue> for f64 {
    type Error = HostFault;

    fn try_from(value: NativeValue) -> Result<Self, Self::Error> {
        match value {
            NativeValue::Int(n) => Ok(f64::from(n)),
            NativeValue::Long(n) => Ok(n as f64),
            NativeValue::Double(n) => Ok(n),
            other => Err(cast_error(&other, NativeType::Double)),
        }
    }
}

impl TryFrom<NativeValue> for String {
    type Error = HostFault;

    fn try_from(value: NativeValue) -> Result<Self, Self::Error> {
        match value {
            NativeValue::String(s) => Ok(s),
            other => Err(cast_error(&other, NativeType::String)),
        }
    }
}
