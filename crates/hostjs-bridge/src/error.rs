//! Error types for hostjs-bridge
//!
//! Two levels are modelled explicitly:
//!
//! - [`HostFault`] is a fault raised on the host side (a getter, a setter, a
//!   coercion). It may wrap an inner cause, the way reflective invocation wraps
//!   whatever the target threw.
//! - [`BridgeError`] is what script code gets to see. It is turned into an
//!   engine value by the codec and handed back inside a [`Thrown`].

use std::fmt;

use thiserror::Error;

/// Faults raised by host objects and value conversion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostFault {
    /// The invoked member itself failed; the cause is the meaningful error
    #[error("Exception has been thrown by the target of an invocation.")]
    TargetInvocation(#[source] Box<HostFault>),

    /// Array access outside `0..length`
    #[error("Index {index} was outside the bounds of the array (length {length}).")]
    IndexOutOfRange { index: usize, length: usize },

    /// A value could not be converted to the requested type
    #[error("Invalid cast from '{from}' to '{to}'.")]
    InvalidCast { from: String, to: String },

    /// A string could not be parsed as the requested type
    #[error("Input string '{input}' was not in a correct format for {target}.")]
    Format { input: String, target: String },

    /// A numeric value does not fit the requested type
    #[error("Value was either too large or too small for {0}.")]
    Overflow(String),

    /// The host type has no member with this name
    #[error("Member '{member}' not found on type '{type_name}'.")]
    MissingMember { type_name: String, member: String },

    /// Any other host-defined failure
    #[error("{0}")]
    Native(String),
}

impl HostFault {
    /// Create a host-defined fault
    pub fn native(message: impl Into<String>) -> Self {
        Self::Native(message.into())
    }

    /// Wrap a fault raised by an invoked member
    pub fn target_invocation(inner: HostFault) -> Self {
        Self::TargetInvocation(Box::new(inner))
    }

    /// Create a missing member fault
    pub fn missing_member(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self::MissingMember {
            type_name: type_name.into(),
            member: member.into(),
        }
    }

    /// Create an invalid cast fault
    pub fn invalid_cast(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidCast {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a format fault
    pub fn format(input: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Format {
            input: input.into(),
            target: target.into(),
        }
    }

    /// The wrapped cause, if any
    pub fn inner(&self) -> Option<&HostFault> {
        match self {
            Self::TargetInvocation(inner) => Some(inner),
            _ => None,
        }
    }

    /// Strip one invocation wrapper, keeping the cause
    pub fn into_cause(self) -> HostFault {
        match self {
            Self::TargetInvocation(inner) => *inner,
            other => other,
        }
    }

    /// Full textual description including every wrapped cause
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut current = self.inner();
        while let Some(cause) = current {
            text.push_str(" ---> ");
            text.push_str(&cause.to_string());
            current = cause.inner();
        }
        text
    }
}

/// Errors surfaced to script code as thrown exceptions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// Property exists but has no getter
    #[error("Property {0} may not be read.")]
    NotReadable(String),

    /// Property exists but has no setter
    #[error("Property {0} may not be set.")]
    NotWritable(String),

    /// Write to an unknown name while unknown properties are rejected
    #[error("Unknown member: {0}")]
    UnknownMember(String),

    /// The host raised a fault
    #[error(transparent)]
    Fault(HostFault),

    /// A fault reported only by its description
    #[error("{0}")]
    Described(String),
}

impl BridgeError {
    /// Convert a host fault, preferring the inner cause of an invocation fault
    pub fn from_fault(fault: HostFault) -> Self {
        Self::Fault(fault.into_cause())
    }

    /// Report a fault by its full description
    pub fn described(fault: &HostFault) -> Self {
        Self::Described(fault.describe())
    }
}

/// An exception raised at the engine boundary
///
/// Carries the bridge-level error together with the engine value the codec
/// produced for it, which is what the engine actually throws.
#[derive(Clone, PartialEq)]
pub struct Thrown<V> {
    error: BridgeError,
    exception: V,
}

impl<V> Thrown<V> {
    pub fn new(error: BridgeError, exception: V) -> Self {
        Self { error, exception }
    }

    /// The bridge-level error
    pub fn error(&self) -> &BridgeError {
        &self.error
    }

    /// The engine value to throw
    pub fn exception(&self) -> &V {
        &self.exception
    }

    pub fn into_exception(self) -> V {
        self.exception
    }
}

impl<V> fmt::Debug for Thrown<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thrown").field("error", &self.error).finish_non_exhaustive()
    }
}

impl<V> fmt::Display for Thrown<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<V> std::error::Error for Thrown<V> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
