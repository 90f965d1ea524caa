//! Explicit conversion of a native value to a declared type
//!
//! Used when a value supplied from script has a runtime type that is neither
//! the declared type of the target member nor assignable to it.

use crate::error::HostFault;
use crate::value::{NativeType, NativeValue};

/// Convert `value` to `target`, failing with a cast, format or overflow fault
pub fn change_type(value: NativeValue, target: &NativeType) -> Result<NativeValue, HostFault> {
    if value.is_null() || matches!(target, NativeType::Any) {
        return Ok(value);
    }

    match target {
        NativeType::Bool => to_bool(value).map(NativeValue::Bool),
        NativeType::Int => {
            let wide = to_i64(value, target)?;
            i32::try_from(wide)
                .map(NativeValue::Int)
                .map_err(|_| HostFault::Overflow(target.to_string()))
        }
        NativeType::Long => to_i64(value, target).map(NativeValue::Long),
        NativeType::Double => to_f64(value).map(NativeValue::Double),
        NativeType::String => to_string(value).map(NativeValue::String),
        NativeType::Object(name) => {
            if value.as_object().is_some_and(|handle| handle.type_name() == name) {
                Ok(value)
            } else {
                Err(HostFault::invalid_cast(value.type_label(), name.clone()))
            }
        }
        NativeType::Any => Ok(value),
    }
}

fn to_bool(value: NativeValue) -> Result<bool, HostFault> {
    match value {
        NativeValue::Bool(b) => Ok(b),
        NativeValue::Int(n) => Ok(n != 0),
        NativeValue::Long(n) => Ok(n != 0),
        NativeValue::Double(n) => Ok(n != 0.0),
        NativeValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(HostFault::format(s, NativeType::Bool.to_string()))
            }
        }
        other => Err(HostFault::invalid_cast(
            other.type_label(),
            NativeType::Bool.to_string(),
        )),
    }
}

fn to_i64(value: NativeValue, target: &NativeType) -> Result<i64, HostFault> {
    match value {
        NativeValue::Bool(b) => Ok(i64::from(b)),
        NativeValue::Int(n) => Ok(i64::from(n)),
        NativeValue::Long(n) => Ok(n),
        NativeValue::Double(n) => {
            let rounded = n.round_ties_even();
            // i64::MAX is not representable as f64; the bound below is 2^63
            if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
                Ok(rounded as i64)
            } else {
                Err(HostFault::Overflow(target.to_string()))
            }
        }
        NativeValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| HostFault::format(s.clone(), target.to_string())),
        other => Err(HostFault::invalid_cast(other.type_label(), target.to_string())),
    }
}

fn to_f64(value: NativeValue) -> Result<f64, HostFault> {
    match value {
        NativeValue::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        NativeValue::Int(n) => Ok(f64::from(n)),
        NativeValue::Long(n) => Ok(n as f64),
        NativeValue::Double(n) => Ok(n),
        NativeValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| HostFault::format(s.clone(), NativeType::Double.to_string())),
        other => Err(HostFault::invalid_cast(
            other.type_label(),
            NativeType::Double.to_string(),
        )),
    }
}

fn to_string(value: NativeValue) -> Result<String, HostFault> {
    match value {
        NativeValue::Bool(b) => Ok(b.to_string()),
        NativeValue::Int(n) => Ok(n.to_string()),
        NativeValue::Long(n) => Ok(n.to_string()),
        NativeValue::Double(n) => Ok(n.to_string()),
        NativeValue::String(s) => Ok(s),
        other => Err(HostFault::invalid_cast(
            other.type_label(),
            NativeType::String.to_string(),
        )),
    }
}
