//! hostjs-bridge - expose host objects to an embedded JavaScript engine
//!
//! This crate lets script code address an arbitrary host object as if it were
//! a native JavaScript object. Property reads and writes, indexed element
//! access and method lookups on the script side are answered by an
//! [`ExternalObject`] adapter that inspects the wrapped object through the
//! [`HostObject`] capability trait.
//!
//! # Features
//!
//! - **Capability-based dispatch**: no language reflection; a host type
//!   describes its members once ([`HostClass`]) or implements [`HostObject`]
//! - **Method caching**: one callable per (adapter, method name), minted on
//!   first lookup and released with the adapter
//! - **Value coercion**: mismatched values are explicitly converted to a
//!   property's declared type before assignment
//! - **Boundary errors**: every host fault becomes a thrown engine value,
//!   unwrapped to its inner cause where the fault is an invocation wrapper
//!
//! # Example
//!
//! ```
//! use hostjs_bridge::prelude::*;
//!
//! struct Point {
//!     x: i32,
//! }
//!
//! // Engine values are plain host values in this example.
//! struct Passthrough;
//!
//! impl ValueCodec for Passthrough {
//!     type Value = NativeValue;
//!
//!     fn to_engine(&self, value: &NativeValue) -> Result<NativeValue, HostFault> {
//!         Ok(value.clone())
//!     }
//!
//!     fn from_engine(&self, value: &NativeValue) -> Result<NativeValue, HostFault> {
//!         Ok(value.clone())
//!     }
//!
//!     fn to_throwable(&self, error: &BridgeError) -> NativeValue {
//!         NativeValue::String(error.to_string())
//!     }
//! }
//!
//! let class = HostClass::<Point>::builder("Point")
//!     .property(
//!         "X",
//!         NativeType::Int,
//!         |p| Ok(p.x.into()),
//!         |p, v| {
//!             p.x = i32::try_from(v)?;
//!             Ok(())
//!         },
//!     )
//!     .build();
//!
//! let point: ExternalObject<Passthrough, ()> =
//!     ExternalObject::new(class.instantiate(Point { x: 1 }), Passthrough);
//!
//! // "41" is coerced to the declared Int32 type.
//! point.set_property("X", &NativeValue::from("41")).unwrap();
//! assert_eq!(point.get_property("X").unwrap(), Some(NativeValue::Int(41)));
//! assert_eq!(point.get_property("Y").unwrap(), None);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Engine access machinery                      │
//! │   obj.name   obj.name = v   obj[i]   obj[i] = v   obj.m()    │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ExternalObject                            │
//! │  - method cache (name → callable)                            │
//! │  - SetParameterOptions                                       │
//! │  - fault → Thrown conversion                                 │
//! └───────┬──────────────────┬──────────────────┬───────────────┘
//!         ↓                  ↓                  ↓
//! ┌───────────────┐  ┌───────────────┐  ┌───────────────┐
//! │  HostObject   │  │  ValueCodec   │  │ EngineContext │
//! │ (HostHandle)  │  │ engine ⇄ host │  │ mint callable │
//! └───────────────┘  └───────────────┘  └───────────────┘
//! ```

pub mod array;
pub mod class;
pub mod codec;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod external;
pub mod host;
pub mod value;

// Re-exports for convenience
pub use array::HostArray;
pub use class::{HostClass, HostClassBuilder, Reflected};
pub use codec::ValueCodec;
pub use config::{ConfigError, SetParameterOptions};
pub use convert::change_type;
pub use engine::{BoundCall, EngineContext, Trampoline, invoke_bound};
pub use error::{BridgeError, HostFault, Thrown};
pub use external::{AccessResult, ExternalObject};
pub use host::{HostHandle, HostKind, HostObject, IndexerInfo, MemberKind, PropertyInfo};
pub use value::{NativeType, NativeValue};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::array::HostArray;
    pub use crate::class::HostClass;
    pub use crate::codec::ValueCodec;
    pub use crate::config::SetParameterOptions;
    pub use crate::engine::{BoundCall, EngineContext, Trampoline};
    pub use crate::error::{BridgeError, HostFault, Thrown};
    pub use crate::external::ExternalObject;
    pub use crate::host::{HostHandle, HostKind, HostObject};
    pub use crate::value::{NativeType, NativeValue};
}
