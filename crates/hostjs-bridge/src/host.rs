//! Capability interface over host objects
//!
//! The adapter never inspects a host type directly. Everything it needs to
//! know (does a member exist, what kind is it, can it be read or written)
//! goes through [`HostObject`]. Implement it by hand, or describe a Rust type
//! once with [`HostClass`](crate::class::HostClass).

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::error::HostFault;
use crate::value::{NativeType, NativeValue};

/// Broad classification of a host object's runtime type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Elements are addressed directly by index
    Array,
    /// Reference type; may expose an "Item" indexer
    Class,
    /// Plain value type
    Value,
}

/// Kind of a reflected member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
    Constructor,
    NestedType,
}

/// Shape of a non-indexed property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub name: String,
    pub declared_type: NativeType,
    pub readable: bool,
    pub writable: bool,
}

/// Shape of the default "Item" indexer
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerInfo {
    /// Number of index parameters, not counting the value of a setter
    pub parameter_count: usize,
    pub element_type: NativeType,
    pub readable: bool,
    pub writable: bool,
}

/// Operations the adapter needs from a wrapped host object
///
/// Receivers are shared so a getter that calls back into script, and from
/// there into the same object, never aliases a mutable borrow. Implementors
/// keep mutable state behind interior mutability.
pub trait HostObject {
    /// Runtime type name
    fn type_name(&self) -> &str;

    fn kind(&self) -> HostKind {
        HostKind::Class
    }

    /// Kinds of every member named `name`, in declaration order
    fn members(&self, name: &str) -> Vec<MemberKind>;

    /// Non-indexed property named `name`
    fn property(&self, name: &str) -> Option<PropertyInfo>;

    fn get_property(&self, name: &str) -> Result<NativeValue, HostFault> {
        Err(HostFault::missing_member(self.type_name(), name))
    }

    fn set_property(&self, name: &str, _value: NativeValue) -> Result<(), HostFault> {
        Err(HostFault::missing_member(self.type_name(), name))
    }

    /// Invoke the method `name`; overload selection is up to the implementor
    fn invoke(&self, name: &str, _args: &[NativeValue]) -> Result<NativeValue, HostFault> {
        Err(HostFault::missing_member(self.type_name(), name))
    }

    fn indexer(&self) -> Option<IndexerInfo> {
        None
    }

    fn get_item(&self, _args: &[NativeValue]) -> Result<NativeValue, HostFault> {
        Err(HostFault::missing_member(self.type_name(), "Item"))
    }

    /// `args` holds the index arguments followed by the value
    fn set_item(&self, _args: &[NativeValue]) -> Result<NativeValue, HostFault> {
        Err(HostFault::missing_member(self.type_name(), "Item"))
    }

    fn length(&self) -> usize {
        0
    }

    fn get_element(&self, index: usize) -> Result<NativeValue, HostFault> {
        Err(HostFault::IndexOutOfRange {
            index,
            length: self.length(),
        })
    }

    fn set_element(&self, index: usize, _value: NativeValue) -> Result<(), HostFault> {
        Err(HostFault::IndexOutOfRange {
            index,
            length: self.length(),
        })
    }
}

/// Reference-counted handle to a host object
///
/// Cloning acquires a reference, dropping releases it. The object lives as
/// long as any handle does, independent of the scope that created it.
#[derive(Clone)]
pub struct HostHandle(Rc<dyn HostObject>);

impl HostHandle {
    pub fn new<T: HostObject + 'static>(object: T) -> Self {
        Self(Rc::new(object))
    }

    pub fn from_rc(object: Rc<dyn HostObject>) -> Self {
        Self(object)
    }

    /// Whether both handles refer to the same object
    pub fn ptr_eq(&self, other: &HostHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to the object
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl Deref for HostHandle {
    type Target = dyn HostObject;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostHandle({})", self.type_name())
    }
}
