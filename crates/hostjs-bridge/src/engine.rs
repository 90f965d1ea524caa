//! Engine-side collaborators: function minting and the dispatch trampoline

use std::fmt;
use std::rc::Rc;

use crate::error::HostFault;
use crate::host::HostHandle;
use crate::value::NativeValue;

/// The (object, member name) pair a callable is bound to
#[derive(Clone)]
pub struct BoundCall {
    target: HostHandle,
    name: Rc<str>,
}

impl BoundCall {
    pub fn new(target: HostHandle, name: &str) -> Self {
        Self {
            target,
            name: Rc::from(name),
        }
    }

    pub fn target(&self) -> &HostHandle {
        &self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `trampoline` against this binding
    pub fn call(
        &self,
        trampoline: Trampoline,
        args: &[NativeValue],
    ) -> Result<NativeValue, HostFault> {
        trampoline(self, args)
    }
}

impl fmt::Debug for BoundCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundCall({}.{})", self.target.type_name(), self.name)
    }
}

/// Generic invocation routine a minted callable dispatches through
///
/// Receives already-converted arguments; marshalling engine arguments and
/// results is the engine's side of the contract.
pub type Trampoline = fn(&BoundCall, &[NativeValue]) -> Result<NativeValue, HostFault>;

/// Default trampoline: invoke the bound method on its target
pub fn invoke_bound(call: &BoundCall, args: &[NativeValue]) -> Result<NativeValue, HostFault> {
    call.target().invoke(call.name(), args)
}

/// The execution context callables are minted into
///
/// Passed explicitly to every operation that creates a callable.
pub trait EngineContext {
    /// Opaque engine value carrying a native payload
    type External;

    /// Engine function object
    type Function: Clone;

    /// Wrap a binding so the engine can carry it
    fn wrap_native_handle(&mut self, payload: BoundCall) -> Self::External;

    /// Create a function that runs `trampoline` with the wrapped binding
    fn make_function(&mut self, trampoline: Trampoline, data: Self::External) -> Self::Function;
}
