//! Value conversion between the engine and the host

use crate::convert::change_type;
use crate::error::{BridgeError, HostFault};
use crate::value::{NativeType, NativeValue};

/// Bidirectional converter between engine values and [`NativeValue`]s
///
/// The adapter treats the codec as a black box: it never looks inside an
/// engine value, it only hands values across.
pub trait ValueCodec {
    /// Engine-side value representation
    type Value: Clone;

    /// Convert a host value for the engine; `Null` must be supported
    fn to_engine(&self, value: &NativeValue) -> Result<Self::Value, HostFault>;

    /// Convert an engine value for the host
    fn from_engine(&self, value: &Self::Value) -> Result<NativeValue, HostFault>;

    /// Explicitly convert `value` to `target`
    fn coerce(&self, value: NativeValue, target: &NativeType) -> Result<NativeValue, HostFault> {
        change_type(value, target)
    }

    /// Build the engine value thrown for `error`
    fn to_throwable(&self, error: &BridgeError) -> Self::Value;
}
