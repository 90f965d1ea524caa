//! Shared fixtures for integration tests: a toy engine value model, a codec
//! for it, an engine context that counts live function objects, and a few
//! host classes.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use hostjs_bridge::Reflected;
use hostjs_bridge::prelude::*;

/// Engine-side value of the toy engine
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// An `Error` object carrying its message
    Error(String),
    Host(HostHandle),
}

pub struct TestCodec;

impl ValueCodec for TestCodec {
    type Value = JsValue;

    fn to_engine(&self, value: &NativeValue) -> Result<JsValue, HostFault> {
        Ok(match value {
            NativeValue::Null => JsValue::Null,
            NativeValue::Bool(b) => JsValue::Bool(*b),
            NativeValue::Int(n) => JsValue::Number(f64::from(*n)),
            NativeValue::Long(n) => JsValue::Number(*n as f64),
            NativeValue::Double(n) => JsValue::Number(*n),
            NativeValue::String(s) => JsValue::String(s.clone()),
            NativeValue::Object(handle) => JsValue::Host(handle.clone()),
        })
    }

    fn from_engine(&self, value: &JsValue) -> Result<NativeValue, HostFault> {
        Ok(match value {
            JsValue::Undefined | JsValue::Null => NativeValue::Null,
            JsValue::Bool(b) => NativeValue::Bool(*b),
            JsValue::Number(n)
                if n.fract() == 0.0 && *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX) =>
            {
                NativeValue::Int(*n as i32)
            }
            JsValue::Number(n) => NativeValue::Double(*n),
            JsValue::String(s) => NativeValue::String(s.clone()),
            JsValue::Host(handle) => NativeValue::Object(handle.clone()),
            JsValue::Error(message) => {
                return Err(HostFault::native(format!(
                    "Error objects cannot be passed to the host: {message}"
                )));
            }
        })
    }

    fn to_throwable(&self, error: &BridgeError) -> JsValue {
        match error {
            BridgeError::Fault(fault) => JsValue::Error(fault.to_string()),
            other => JsValue::String(other.to_string()),
        }
    }
}

/// Function object minted by [`TestEngine`]
pub struct FunctionObject {
    id: usize,
    trampoline: Trampoline,
    bound: BoundCall,
    live: Rc<Cell<usize>>,
}

impl Drop for FunctionObject {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[derive(Clone)]
pub struct JsFunction(Rc<FunctionObject>);

impl JsFunction {
    pub fn id(&self) -> usize {
        self.0.id
    }

    pub fn bound(&self) -> &BoundCall {
        &self.0.bound
    }

    pub fn ptr_eq(&self, other: &JsFunction) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Call the function the way the engine would: marshal, dispatch, marshal back
    pub fn call(&self, codec: &TestCodec, args: &[JsValue]) -> Result<JsValue, JsValue> {
        let throw = |fault: HostFault| codec.to_throwable(&BridgeError::from_fault(fault));
        let native = args
            .iter()
            .map(|arg| codec.from_engine(arg))
            .collect::<Result<Vec<_>, _>>()
            .map_err(throw)?;
        self.0
            .bound
            .call(self.0.trampoline, &native)
            .and_then(|result| codec.to_engine(&result))
            .map_err(throw)
    }
}

/// Engine context that counts function objects still alive
#[derive(Default)]
pub struct TestEngine {
    live: Rc<Cell<usize>>,
    minted: usize,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Function objects minted and not yet released
    pub fn live_functions(&self) -> usize {
        self.live.get()
    }

    /// Function objects minted so far
    pub fn minted(&self) -> usize {
        self.minted
    }
}

impl EngineContext for TestEngine {
    type External = BoundCall;
    type Function = JsFunction;

    fn wrap_native_handle(&mut self, payload: BoundCall) -> BoundCall {
        payload
    }

    fn make_function(&mut self, trampoline: Trampoline, data: BoundCall) -> JsFunction {
        self.minted += 1;
        self.live.set(self.live.get() + 1);
        JsFunction(Rc::new(FunctionObject {
            id: self.minted,
            trampoline,
            bound: data,
            live: Rc::clone(&self.live),
        }))
    }
}

pub type Adapter = ExternalObject<TestCodec, JsFunction>;

pub fn adapt(object: HostHandle) -> Adapter {
    ExternalObject::new(object, TestCodec)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// -----------------------------------------------------------------------------
// Host classes
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub id: i64,
    pub password: String,
    pub ratio: f64,
}

pub fn person_class() -> Rc<HostClass<Person>> {
    HostClass::<Person>::builder("Person")
        .property(
            "Name",
            NativeType::String,
            |p| Ok(p.name.clone().into()),
            |p, v| {
                p.name = String::try_from(v)?;
                Ok(())
            },
        )
        .property(
            "Age",
            NativeType::Int,
            |p| Ok(p.age.into()),
            |p, v| {
                p.age = i32::try_from(v)?;
                Ok(())
            },
        )
        .property(
            "Ratio",
            NativeType::Double,
            |p| Ok(p.ratio.into()),
            |p, v| {
                p.ratio = f64::try_from(v)?;
                Ok(())
            },
        )
        .readonly("Id", NativeType::Long, |p| Ok(p.id.into()))
        .writeonly("Password", NativeType::String, |p, v| {
            p.password = String::try_from(v)?;
            Ok(())
        })
        .readonly("Faulty", NativeType::Any, |_| {
            Err(HostFault::native("disk on fire"))
        })
        .method("Greet", 0, |p, _| Ok(format!("Hello from {}", p.name).into()))
        .method("Greet", 1, |p, args| {
            let other = String::try_from(args[0].clone())?;
            Ok(format!("Hello, {other}, I am {}", p.name).into())
        })
        .method("ThrowException", 0, |_, _| {
            Err(HostFault::native("thrown from the host"))
        })
        // A property declared ahead of a method with the same name
        .readonly("Shadow", NativeType::Int, |_| Ok(NativeValue::Int(1)))
        .method("Shadow", 0, |_, _| Ok(NativeValue::Int(2)))
        .build()
}

pub fn person(name: &str, age: i32) -> (Rc<Reflected<Person>>, HostHandle) {
    let object = Rc::new(Reflected::new(
        person_class(),
        Person {
            name: name.to_string(),
            age,
            id: 7,
            ..Person::default()
        },
    ));
    let handle = HostHandle::from_rc(object.clone());
    (object, handle)
}

/// A class with a read-write integer indexer over a growable list
#[derive(Debug, Default)]
pub struct Bag {
    pub items: Vec<NativeValue>,
}

pub fn bag(items: Vec<NativeValue>) -> (Rc<Reflected<Bag>>, HostHandle) {
    let class = HostClass::<Bag>::builder("Bag")
        .readonly("Count", NativeType::Int, |b| Ok(NativeValue::Int(b.items.len() as i32)))
        .indexer(
            NativeType::Any,
            |b, i| {
                usize::try_from(i)
                    .ok()
                    .and_then(|slot| b.items.get(slot).cloned())
                    .ok_or_else(|| HostFault::native(format!("no such item: {i}")))
            },
            |b, i, v| {
                let slot = usize::try_from(i).map_err(|_| HostFault::native("negative index"))?;
                if slot < b.items.len() {
                    b.items[slot] = v;
                } else if slot == b.items.len() {
                    b.items.push(v);
                } else {
                    return Err(HostFault::native(format!("index {i} is past the end")));
                }
                Ok(())
            },
        )
        .build();
    let object = Rc::new(Reflected::new(class, Bag { items }));
    let handle = HostHandle::from_rc(object.clone());
    (object, handle)
}

/// A class with an integer-typed indexer that only reads
pub fn catalog() -> HostHandle {
    HostClass::<Vec<i32>>::builder("Catalog")
        .readonly_indexer(NativeType::Int, |c, i| {
            usize::try_from(i)
                .ok()
                .and_then(|slot| c.get(slot).copied())
                .map(NativeValue::Int)
                .ok_or_else(|| HostFault::native("out of catalog"))
        })
        .build()
        .instantiate(vec![10, 20, 30])
}

/// A class with no indexer at all
pub fn no_indexer() -> HostHandle {
    HostClass::<()>::builder("NoIndexer")
        .readonly("Value", NativeType::Int, |_| Ok(NativeValue::Int(3)))
        .build()
        .instantiate(())
}

/// A value type with an indexer, which the adapter does not index into
pub fn point() -> HostHandle {
    HostClass::<(i32, i32)>::builder("Point")
        .value_type()
        .readonly("X", NativeType::Int, |p| Ok(p.0.into()))
        .readonly_indexer(NativeType::Int, |p, i| {
            Ok(NativeValue::Int(if i == 0 { p.0 } else { p.1 }))
        })
        .build()
        .instantiate((1, 2))
}
