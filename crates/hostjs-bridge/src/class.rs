//! Describing plain Rust types as host objects
//!
//! A [`HostClass`] is built once per Rust type and lists the members script
//! code may touch: properties (optionally read-only or write-only), methods
//! (overloads by arity), and a single integer indexer. [`Reflected`] pairs a
//! class with one instance's state and implements [`HostObject`] over it.
//!
//! ```
//! use hostjs_bridge::class::HostClass;
//! use hostjs_bridge::host::HostObject;
//! use hostjs_bridge::value::{NativeType, NativeValue};
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! let class = HostClass::<Counter>::builder("Counter")
//!     .readonly("Count", NativeType::Int, |c| Ok(c.count.into()))
//!     .method("Add", 1, |c, args| {
//!         c.count += i32::try_from(args[0].clone())?;
//!         Ok(NativeValue::Null)
//!     })
//!     .build();
//!
//! let counter = class.instantiate(Counter { count: 0 });
//! counter.invoke("Add", &[NativeValue::Int(2)]).unwrap();
//! assert_eq!(counter.get_property("Count").unwrap(), NativeValue::Int(2));
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::error::HostFault;
use crate::host::{HostHandle, HostKind, HostObject, IndexerInfo, MemberKind, PropertyInfo};
use crate::value::{NativeType, NativeValue};

type Getter<T> = Box<dyn Fn(&T) -> Result<NativeValue, HostFault>>;
type Setter<T> = Box<dyn Fn(&mut T, NativeValue) -> Result<(), HostFault>>;
type MethodFn<T> = Box<dyn Fn(&mut T, &[NativeValue]) -> Result<NativeValue, HostFault>>;
type ItemGetter<T> = Box<dyn Fn(&T, i64) -> Result<NativeValue, HostFault>>;
type ItemSetter<T> = Box<dyn Fn(&mut T, i64, NativeValue) -> Result<(), HostFault>>;

enum Member<T> {
    Property {
        declared_type: NativeType,
        getter: Option<Getter<T>>,
        setter: Option<Setter<T>>,
    },
    Method {
        /// `None` accepts any argument count
        arity: Option<usize>,
        call: MethodFn<T>,
    },
}

impl<T> Member<T> {
    fn kind(&self) -> MemberKind {
        match self {
            Self::Property { .. } => MemberKind::Property,
            Self::Method { .. } => MemberKind::Method,
        }
    }
}

struct Indexer<T> {
    element_type: NativeType,
    getter: Option<ItemGetter<T>>,
    setter: Option<ItemSetter<T>>,
}

/// Member table for a Rust type exposed to script
pub struct HostClass<T> {
    name: String,
    kind: HostKind,
    members: Vec<(String, Member<T>)>,
    indexer: Option<Indexer<T>>,
}

impl<T: 'static> HostClass<T> {
    pub fn builder(name: impl Into<String>) -> HostClassBuilder<T> {
        HostClassBuilder {
            class: HostClass {
                name: name.into(),
                kind: HostKind::Class,
                members: Vec::new(),
                indexer: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wrap `state` as a host object of this class
    pub fn instantiate(self: &Rc<Self>, state: T) -> HostHandle {
        HostHandle::new(Reflected::new(Rc::clone(self), state))
    }

    fn named(&self, name: &str) -> impl Iterator<Item = &Member<T>> {
        self.members
            .iter()
            .filter(move |(member, _)| member == name)
            .map(|(_, member)| member)
    }
}

/// Builder for [`HostClass`]
pub struct HostClassBuilder<T> {
    class: HostClass<T>,
}

impl<T: 'static> HostClassBuilder<T> {
    /// Describe a value type instead of a class; value types have no indexer access
    pub fn value_type(mut self) -> Self {
        self.class.kind = HostKind::Value;
        self
    }

    /// Read-write property
    pub fn property<G, S>(
        self,
        name: &str,
        declared_type: NativeType,
        getter: G,
        setter: S,
    ) -> Self
    where
        G: Fn(&T) -> Result<NativeValue, HostFault> + 'static,
        S: Fn(&mut T, NativeValue) -> Result<(), HostFault> + 'static,
    {
        self.push_property(name, declared_type, Some(Box::new(getter)), Some(Box::new(setter)))
    }

    pub fn readonly<G>(self, name: &str, declared_type: NativeType, getter: G) -> Self
    where
        G: Fn(&T) -> Result<NativeValue, HostFault> + 'static,
    {
        self.push_property(name, declared_type, Some(Box::new(getter)), None)
    }

    pub fn writeonly<S>(self, name: &str, declared_type: NativeType, setter: S) -> Self
    where
        S: Fn(&mut T, NativeValue) -> Result<(), HostFault> + 'static,
    {
        self.push_property(name, declared_type, None, Some(Box::new(setter)))
    }

    /// Method taking exactly `arity` arguments; repeat the name to add overloads
    pub fn method<M>(mut self, name: &str, arity: usize, call: M) -> Self
    where
        M: Fn(&mut T, &[NativeValue]) -> Result<NativeValue, HostFault> + 'static,
    {
        self.class.members.push((
            name.to_string(),
            Member::Method {
                arity: Some(arity),
                call: Box::new(call),
            },
        ));
        self
    }

    /// Method accepting any number of arguments
    pub fn variadic<M>(mut self, name: &str, call: M) -> Self
    where
        M: Fn(&mut T, &[NativeValue]) -> Result<NativeValue, HostFault> + 'static,
    {
        self.class.members.push((
            name.to_string(),
            Member::Method {
                arity: None,
                call: Box::new(call),
            },
        ));
        self
    }

    /// Read-write indexer taking one integer index
    pub fn indexer<G, S>(mut self, element_type: NativeType, getter: G, setter: S) -> Self
    where
        G: Fn(&T, i64) -> Result<NativeValue, HostFault> + 'static,
        S: Fn(&mut T, i64, NativeValue) -> Result<(), HostFault> + 'static,
    {
        self.class.indexer = Some(Indexer {
            element_type,
            getter: Some(Box::new(getter)),
            setter: Some(Box::new(setter)),
        });
        self
    }

    pub fn readonly_indexer<G>(mut self, element_type: NativeType, getter: G) -> Self
    where
        G: Fn(&T, i64) -> Result<NativeValue, HostFault> + 'static,
    {
        self.class.indexer = Some(Indexer {
            element_type,
            getter: Some(Box::new(getter)),
            setter: None,
        });
        self
    }

    pub fn build(self) -> Rc<HostClass<T>> {
        Rc::new(self.class)
    }

    fn push_property(
        mut self,
        name: &str,
        declared_type: NativeType,
        getter: Option<Getter<T>>,
        setter: Option<Setter<T>>,
    ) -> Self {
        self.class.members.push((
            name.to_string(),
            Member::Property {
                declared_type,
                getter,
                setter,
            },
        ));
        self
    }
}

/// One instance of a [`HostClass`]
pub struct Reflected<T> {
    class: Rc<HostClass<T>>,
    state: RefCell<T>,
}

impl<T: 'static> Reflected<T> {
    pub fn new(class: Rc<HostClass<T>>, state: T) -> Self {
        Self {
            class,
            state: RefCell::new(state),
        }
    }

    /// Borrow the instance state
    ///
    /// # Panics
    ///
    /// Panics if a setter or method of this object is currently running.
    pub fn state(&self) -> Ref<'_, T> {
        self.state.borrow()
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> Result<R, HostFault>) -> Result<R, HostFault> {
        let state = self.state.try_borrow().map_err(|_| self.busy())?;
        f(&state).map_err(HostFault::target_invocation)
    }

    fn write<R>(&self, f: impl FnOnce(&mut T) -> Result<R, HostFault>) -> Result<R, HostFault> {
        let mut state = self.state.try_borrow_mut().map_err(|_| self.busy())?;
        f(&mut state).map_err(HostFault::target_invocation)
    }

    fn busy(&self) -> HostFault {
        HostFault::native(format!(
            "Object of type '{}' is in use by a running member.",
            self.class.name
        ))
    }

    fn missing(&self, member: &str) -> HostFault {
        HostFault::missing_member(&self.class.name, member)
    }

    fn index_argument(&self, args: &[NativeValue]) -> Result<i64, HostFault> {
        match args.first() {
            Some(index) => i64::try_from(index.clone()),
            None => Err(self.missing("Item")),
        }
    }
}

impl<T: 'static> HostObject for Reflected<T> {
    fn type_name(&self) -> &str {
        &self.class.name
    }

    fn kind(&self) -> HostKind {
        self.class.kind
    }

    fn members(&self, name: &str) -> Vec<MemberKind> {
        self.class.named(name).map(Member::kind).collect()
    }

    fn property(&self, name: &str) -> Option<PropertyInfo> {
        self.class.named(name).find_map(|member| match member {
            Member::Property {
                declared_type,
                getter,
                setter,
            } => Some(PropertyInfo {
                name: name.to_string(),
                declared_type: declared_type.clone(),
                readable: getter.is_some(),
                writable: setter.is_some(),
            }),
            Member::Method { .. } => None,
        })
    }

    fn get_property(&self, name: &str) -> Result<NativeValue, HostFault> {
        let getter = self.class.named(name).find_map(|member| match member {
            Member::Property { getter, .. } => getter.as_ref(),
            Member::Method { .. } => None,
        });
        match getter {
            Some(getter) => self.read(|state| getter(state)),
            None => Err(self.missing(name)),
        }
    }

    fn set_property(&self, name: &str, value: NativeValue) -> Result<(), HostFault> {
        let setter = self.class.named(name).find_map(|member| match member {
            Member::Property { setter, .. } => setter.as_ref(),
            Member::Method { .. } => None,
        });
        match setter {
            Some(setter) => self.write(|state| setter(state, value)),
            None => Err(self.missing(name)),
        }
    }

    fn invoke(&self, name: &str, args: &[NativeValue]) -> Result<NativeValue, HostFault> {
        let call = self.class.named(name).find_map(|member| match member {
            Member::Method { arity, call } if arity.is_none_or(|n| n == args.len()) => Some(call),
            _ => None,
        });
        match call {
            Some(call) => self.write(|state| call(state, args)),
            None => Err(self.missing(name)),
        }
    }

    fn indexer(&self) -> Option<IndexerInfo> {
        self.class.indexer.as_ref().map(|indexer| IndexerInfo {
            parameter_count: 1,
            element_type: indexer.element_type.clone(),
            readable: indexer.getter.is_some(),
            writable: indexer.setter.is_some(),
        })
    }

    fn get_item(&self, args: &[NativeValue]) -> Result<NativeValue, HostFault> {
        let getter = self
            .class
            .indexer
            .as_ref()
            .and_then(|indexer| indexer.getter.as_ref())
            .ok_or_else(|| self.missing("Item"))?;
        let index = self.index_argument(args)?;
        self.read(|state| getter(state, index))
    }

    fn set_item(&self, args: &[NativeValue]) -> Result<NativeValue, HostFault> {
        let setter = self
            .class
            .indexer
            .as_ref()
            .and_then(|indexer| indexer.setter.as_ref())
            .ok_or_else(|| self.missing("Item"))?;
        let [index, value] = args else {
            return Err(self.missing("Item"));
        };
        let index = i64::try_from(index.clone())?;
        let value = value.clone();
        self.write(|state| setter(state, index, value))?;
        Ok(NativeValue::Null)
    }
}
