//! Typed array host object

use std::cell::RefCell;

use crate::convert::change_type;
use crate::error::HostFault;
use crate::host::{HostKind, HostObject, MemberKind, PropertyInfo};
use crate::value::{NativeType, NativeValue};

/// A fixed-length array of host values with a declared element type
///
/// Stores accept values of the element type or a type that widens to it;
/// storing null writes the element type's default.
pub struct HostArray {
    type_name: String,
    element_type: NativeType,
    elements: RefCell<Vec<NativeValue>>,
}

impl HostArray {
    /// Create an array of `length` default elements
    pub fn new(element_type: NativeType, length: usize) -> Self {
        let elements = vec![element_type.default_value(); length];
        Self {
            type_name: format!("{element_type}[]"),
            element_type,
            elements: RefCell::new(elements),
        }
    }

    /// Create an array from existing values, checking each against the element type
    pub fn from_values(
        element_type: NativeType,
        values: impl IntoIterator<Item = NativeValue>,
    ) -> Result<Self, HostFault> {
        let array = Self::new(element_type, 0);
        let stored = values
            .into_iter()
            .map(|value| array.widen(value))
            .collect::<Result<Vec<_>, _>>()?;
        *array.elements.borrow_mut() = stored;
        Ok(array)
    }

    pub fn element_type(&self) -> &NativeType {
        &self.element_type
    }

    /// Snapshot of the current elements
    pub fn to_vec(&self) -> Vec<NativeValue> {
        self.elements.borrow().clone()
    }

    fn widen(&self, value: NativeValue) -> Result<NativeValue, HostFault> {
        let Some(source) = value.native_type() else {
            return Ok(self.element_type.default_value());
        };
        if self.element_type.is_assignable_from(&source) {
            Ok(value)
        } else if self.element_type.widens_from(&source) {
            change_type(value, &self.element_type)
        } else {
            Err(HostFault::invalid_cast(
                value.type_label(),
                self.element_type.to_string(),
            ))
        }
    }
}

impl HostObject for HostArray {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn kind(&self) -> HostKind {
        HostKind::Array
    }

    fn members(&self, name: &str) -> Vec<MemberKind> {
        match name {
            "Length" => vec![MemberKind::Property],
            _ => Vec::new(),
        }
    }

    fn property(&self, name: &str) -> Option<PropertyInfo> {
        (name == "Length").then(|| PropertyInfo {
            name: "Length".to_string(),
            declared_type: NativeType::Int,
            readable: true,
            writable: false,
        })
    }

    fn get_property(&self, name: &str) -> Result<NativeValue, HostFault> {
        match name {
            "Length" => i32::try_from(self.length())
                .map(NativeValue::Int)
                .map_err(|_| HostFault::Overflow(NativeType::Int.to_string())),
            _ => Err(HostFault::missing_member(&self.type_name, name)),
        }
    }

    fn length(&self) -> usize {
        self.elements.borrow().len()
    }

    fn get_element(&self, index: usize) -> Result<NativeValue, HostFault> {
        let elements = self.elements.borrow();
        elements
            .get(index)
            .cloned()
            .ok_or(HostFault::IndexOutOfRange {
                index,
                length: elements.len(),
            })
    }

    fn set_element(&self, index: usize, value: NativeValue) -> Result<(), HostFault> {
        let value = self.widen(value)?;
        let mut elements = self.elements.borrow_mut();
        let length = elements.len();
        let slot = elements
            .get_mut(index)
            .ok_or(HostFault::IndexOutOfRange { index, length })?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_array_holds_defaults() {
        let array = HostArray::new(NativeType::Int, 3);
        assert_eq!(array.type_name(), "Int32[]");
        assert_eq!(array.kind(), HostKind::Array);
        assert_eq!(array.to_vec(), vec![NativeValue::Int(0); 3]);
    }

    #[test]
    fn test_set_then_get() {
        let array = HostArray::new(NativeType::String, 2);
        array.set_element(1, NativeValue::from("b")).unwrap();
        assert_eq!(array.get_element(1).unwrap(), NativeValue::from("b"));
        assert_eq!(array.get_element(0).unwrap(), NativeValue::Null);
    }

    #[test]
    fn test_out_of_range() {
        let array = HostArray::new(NativeType::Int, 2);
        assert_eq!(
            array.get_element(2),
            Err(HostFault::IndexOutOfRange { index: 2, length: 2 })
        );
        assert_eq!(
            array.set_element(5, NativeValue::Int(1)),
            Err(HostFault::IndexOutOfRange { index: 5, length: 2 })
        );
    }

    #[test]
    fn test_stores_widen_but_never_narrow() {
        let array = HostArray::new(NativeType::Double, 1);
        array.set_element(0, NativeValue::Int(3)).unwrap();
        assert_eq!(array.get_element(0).unwrap(), NativeValue::Double(3.0));

        let ints = HostArray::new(NativeType::Int, 1);
        assert_eq!(
            ints.set_element(0, NativeValue::Double(1.5)),
            Err(HostFault::invalid_cast("Double", "Int32"))
        );
    }

    #[test]
    fn test_integer_stores_widen_to_long_and_double() {
        let longs = HostArray::from_values(NativeType::Long, [NativeValue::Int(7)]).unwrap();
        assert_eq!(longs.to_vec(), vec![NativeValue::Long(7)]);

        let doubles = HostArray::new(NativeType::Double, 1);
        doubles.set_element(0, NativeValue::Long(-4)).unwrap();
        assert_eq!(doubles.get_element(0).unwrap(), NativeValue::Double(-4.0));

        assert_eq!(
            longs.set_element(0, NativeValue::Double(2.0)),
            Err(HostFault::invalid_cast("Double", "Int64"))
        );
    }

    #[test]
    fn test_null_store_writes_default() {
        let array = HostArray::from_values(NativeType::Int, [NativeValue::Int(9)]).unwrap();
        array.set_element(0, NativeValue::Null).unwrap();
        assert_eq!(array.get_element(0).unwrap(), NativeValue::Int(0));
    }

    #[test]
    fn test_length_property() {
        let array = HostArray::new(NativeType::Any, 4);
        assert_eq!(array.members("Length"), vec![MemberKind::Property]);
        assert!(!array.property("Length").unwrap().writable);
        assert_eq!(array.get_property("Length").unwrap(), NativeValue::Int(4));
    }
}
