//! The external object adapter
//!
//! One [`ExternalObject`] is created per exposure of a host object to the
//! engine. It answers the engine's named property, indexed element and
//! method lookups by going through the [`HostObject`] capabilities of the
//! wrapped object, converting values with a [`ValueCodec`].
//!
//! Every failure is turned into an engine value at this boundary and
//! returned as a [`Thrown`]; quiet "not found" outcomes are `Ok(None)`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::codec::ValueCodec;
use crate::config::SetParameterOptions;
use crate::engine::{BoundCall, EngineContext, Trampoline, invoke_bound};
use crate::error::{BridgeError, HostFault, Thrown};
use crate::host::{HostHandle, HostKind, HostObject, IndexerInfo, MemberKind};
use crate::value::{NativeType, NativeValue};

/// Name of the default indexer member
const INDEXER_NAME: &str = "Item";

/// Result of an adapter operation: `Ok(None)` is "absent"
pub type AccessResult<V> = Result<Option<V>, Thrown<V>>;

/// Bridge between one wrapped host object and the engine's object model
///
/// `F` is the engine's function type; callables minted for methods are
/// cached per name and released when the adapter is dropped.
///
/// Not `Send`/`Sync`: the engine must serialize calls into an adapter.
/// Calls may re-enter (a getter can run script that touches the same
/// adapter); no internal borrow is held across a call into the host or the
/// engine.
pub struct ExternalObject<C: ValueCodec, F> {
    object: HostHandle,
    codec: C,
    methods: RefCell<HashMap<String, F>>,
    options: Cell<SetParameterOptions>,
    trampoline: Trampoline,
}

impl<C: ValueCodec, F: Clone> ExternalObject<C, F> {
    /// Wrap `object`, taking one handle on it for the adapter's lifetime
    pub fn new(object: HostHandle, codec: C) -> Self {
        Self {
            object,
            codec,
            methods: RefCell::new(HashMap::new()),
            options: Cell::new(SetParameterOptions::NONE),
            trampoline: invoke_bound,
        }
    }

    pub fn with_options(self, options: SetParameterOptions) -> Self {
        self.options.set(options);
        self
    }

    /// Dispatch minted callables through `trampoline` instead of [`invoke_bound`]
    pub fn with_trampoline(mut self, trampoline: Trampoline) -> Self {
        self.trampoline = trampoline;
        self
    }

    pub fn options(&self) -> SetParameterOptions {
        self.options.get()
    }

    pub fn set_options(&self, options: SetParameterOptions) {
        self.options.set(options);
    }

    /// The wrapped host object
    pub fn object(&self) -> &HostHandle {
        &self.object
    }

    /// Number of callables currently cached
    pub fn cached_methods(&self) -> usize {
        self.methods.borrow().len()
    }

    /// Find the callable for method `name`, minting it on first use
    ///
    /// Only the first member found for `name` is considered; if it is not a
    /// method the lookup fails. Overloads are left to the trampoline.
    pub fn resolve_method<X>(&self, cx: &mut X, name: &str) -> Option<F>
    where
        X: EngineContext<Function = F>,
    {
        if let Some(function) = self.methods.borrow().get(name) {
            trace!(type_name = self.object.type_name(), name, "method cache hit");
            return Some(function.clone());
        }

        let first = self.object.members(name).into_iter().next();
        if first != Some(MemberKind::Method) {
            trace!(type_name = self.object.type_name(), name, member = ?first, "not a method");
            return None;
        }

        let payload = cx.wrap_native_handle(BoundCall::new(self.object.clone(), name));
        let function = cx.make_function(self.trampoline, payload);
        debug!(type_name = self.object.type_name(), name, "minted method callable");

        // A re-entrant resolution of the same name may have won the race; keep its callable.
        let mut methods = self.methods.borrow_mut();
        Some(methods.entry(name.to_string()).or_insert(function).clone())
    }

    /// Read the named property
    ///
    /// `Ok(None)` means there is no such property and the caller should try
    /// other access forms.
    pub fn get_property(&self, name: &str) -> AccessResult<C::Value> {
        let Some(info) = self.object.property(name) else {
            trace!(type_name = self.object.type_name(), name, "no such property");
            return Ok(None);
        };

        if !info.readable {
            return Err(self.throw(BridgeError::NotReadable(name.to_string())));
        }

        self.object
            .get_property(name)
            .and_then(|value| self.codec.to_engine(&value))
            .map(Some)
            .map_err(|fault| self.throw(BridgeError::from_fault(fault)))
    }

    /// Read the element at `index`
    ///
    /// Arrays are indexed directly; classes go through a single-parameter
    /// indexer. Anything else, or a class without such an indexer, is absent.
    pub fn get_indexed(&self, index: u32) -> AccessResult<C::Value> {
        match self.object.kind() {
            HostKind::Array => self
                .object
                .get_element(index as usize)
                .and_then(|value| self.codec.to_engine(&value))
                .map(Some)
                .map_err(|fault| self.throw(BridgeError::from_fault(fault))),
            HostKind::Class => {
                let Some(indexer) = self.single_indexer() else {
                    trace!(type_name = self.object.type_name(), index, "no indexer");
                    return Ok(None);
                };
                if !indexer.readable {
                    return Err(self.throw(BridgeError::NotReadable(INDEXER_NAME.to_string())));
                }

                self.object
                    .get_item(&[index_argument(index)])
                    .and_then(|value| self.codec.to_engine(&value))
                    .map(Some)
                    .map_err(|fault| self.throw(BridgeError::described(&fault)))
            }
            HostKind::Value => Ok(None),
        }
    }

    /// Write the named property, echoing `value` back on success
    ///
    /// The property is not re-read after writing: it may be write-only, and
    /// the read is wasted work.
    pub fn set_property(&self, name: &str, value: &C::Value) -> AccessResult<C::Value> {
        let Some(info) = self.object.property(name) else {
            if self
                .options()
                .contains(SetParameterOptions::REJECT_UNKNOWN_PROPERTIES)
            {
                return Err(self.throw(BridgeError::UnknownMember(name.to_string())));
            }
            trace!(
                type_name = self.object.type_name(),
                name,
                "ignoring write to unknown property"
            );
            return Ok(None);
        };

        let native = self
            .convert_for(value, &info.declared_type)
            .map_err(|fault| self.throw(BridgeError::from_fault(fault)))?;

        if !info.writable {
            return Err(self.throw(BridgeError::NotWritable(name.to_string())));
        }

        self.object
            .set_property(name, native)
            .map_err(|fault| self.throw(BridgeError::from_fault(fault)))?;
        Ok(Some(value.clone()))
    }

    /// Write the element at `index`
    ///
    /// For arrays the stored element is read back and returned, so the engine
    /// sees the value as the array holds it. Classes go through the indexer
    /// setter and return its result; the value is handed over as the codec
    /// produced it, with no coercion to the element type.
    pub fn set_indexed(&self, index: u32, value: &C::Value) -> AccessResult<C::Value> {
        if self.object.kind() == HostKind::Array {
            let slot = index as usize;
            return self
                .codec
                .from_engine(value)
                .and_then(|native| self.object.set_element(slot, native))
                .and_then(|()| self.object.get_element(slot))
                .and_then(|stored| self.codec.to_engine(&stored))
                .map(Some)
                .map_err(|fault| self.throw(BridgeError::from_fault(fault)));
        }

        let Some(indexer) = self.single_indexer() else {
            trace!(type_name = self.object.type_name(), index, "no indexer");
            return Ok(None);
        };
        if !indexer.writable {
            return Err(self.throw(BridgeError::NotWritable(INDEXER_NAME.to_string())));
        }

        self.codec
            .from_engine(value)
            .and_then(|native| self.object.set_item(&[index_argument(index), native]))
            .and_then(|result| self.codec.to_engine(&result))
            .map(Some)
            .map_err(|fault| self.throw(BridgeError::from_fault(fault)))
    }

    fn single_indexer(&self) -> Option<IndexerInfo> {
        self.object
            .indexer()
            .filter(|indexer| indexer.parameter_count == 1)
    }

    /// Convert an engine value and coerce it to `target` when its runtime
    /// type neither matches nor is assignable
    fn convert_for(
        &self,
        value: &C::Value,
        target: &NativeType,
    ) -> Result<NativeValue, HostFault> {
        let native = self.codec.from_engine(value)?;
        match native.native_type() {
            Some(actual) if !target.is_assignable_from(&actual) => {
                self.codec.coerce(native, target)
            }
            _ => Ok(native),
        }
    }

    fn throw(&self, error: BridgeError) -> Thrown<C::Value> {
        debug!(type_name = self.object.type_name(), %error, "raising script exception");
        let exception = self.codec.to_throwable(&error);
        Thrown::new(error, exception)
    }
}

impl<C: ValueCodec, F> ExternalObject<C, F> {
    /// Release every cached callable, returning how many there were
    ///
    /// Only called on teardown: entries are never invalidated while the
    /// adapter is live.
    fn clear(&self) -> usize {
        // Collect first so no cache borrow is held while callables drop.
        let released: Vec<F> = self.methods.borrow_mut().drain().map(|(_, f)| f).collect();
        released.len()
    }
}

impl<C: ValueCodec, F> Drop for ExternalObject<C, F> {
    fn drop(&mut self) {
        let released = self.clear();
        debug!(
            type_name = self.object.type_name(),
            released, "releasing wrapped host object"
        );
    }
}

/// Index argument handed to an indexer
fn index_argument(index: u32) -> NativeValue {
    match i32::try_from(index) {
        Ok(small) => NativeValue::Int(small),
        Err(_) => NativeValue::Long(i64::from(index)),
    }
}
