// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! The `Variable` node class: a node carrying a `Value`, the most commonly read/written class.

use opcua_types::{
    attribute_id::AttributeId, status_code::StatusCode, DataValue, Error, LocalizedText,
    NodeClass, NodeId, QualifiedName, Variant,
};

use crate::base::Base;
use crate::node::{Node, NodeBase};

pub const ACCESS_LEVEL_CURRENT_READ: u8 = 0x01;
pub const ACCESS_LEVEL_CURRENT_WRITE: u8 = 0x02;

#[derive(Debug, Clone)]
pub struct Variable {
    base: Base,
    value: DataValue,
    data_type: NodeId,
    value_rank: i32,
    array_dimensions: Vec<u32>,
    access_level: u8,
    user_access_level: u8,
    minimum_sampling_interval: f64,
    historizing: bool,
}

impl Variable {
    pub fn new(
        node_id: NodeId,
        browse_name: impl Into<QualifiedName>,
        display_name: impl Into<LocalizedText>,
        data_type: NodeId,
        value: Variant,
    ) -> Self {
        Variable {
            base: Base::new(NodeClass::Variable, node_id, browse_name.into(), display_name.into()),
            value: DataValue::new_now(value),
            data_type,
            value_rank: -1,
            array_dimensions: Vec::new(),
            access_level: ACCESS_LEVEL_CURRENT_READ | ACCESS_LEVEL_CURRENT_WRITE,
            user_access_level: ACCESS_LEVEL_CURRENT_READ | ACCESS_LEVEL_CURRENT_WRITE,
            minimum_sampling_interval: 0.0,
            historizing: false,
        }
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }

    pub fn set_value(&mut self, value: Variant) {
        self.value = DataValue::new_now(value);
    }

    pub fn data_type(&self) -> &NodeId {
        &self.data_type
    }

    pub fn is_readable(&self) -> bool {
        self.access_level & ACCESS_LEVEL_CURRENT_READ != 0
    }

    pub fn is_writable(&self) -> bool {
        self.access_level & ACCESS_LEVEL_CURRENT_WRITE != 0
    }
}

impl NodeBase for Variable {
    fn node_class(&self) -> NodeClass { self.base.node_class() }
    fn node_id(&self) -> &NodeId { self.base.node_id() }
    fn browse_name(&self) -> &QualifiedName { self.base.browse_name() }
    fn display_name(&self) -> &LocalizedText { self.base.display_name() }
    fn set_display_name(&mut self, v: LocalizedText) { self.base.set_display_name(v) }
    fn description(&self) -> &LocalizedText { self.base.description() }
    fn set_description(&mut self, v: LocalizedText) { self.base.set_description(v) }
    fn write_mask(&self) -> u32 { self.base.write_mask() }
    fn set_write_mask(&mut self, v: u32) { self.base.set_write_mask(v) }
    fn user_write_mask(&self) -> u32 { self.base.user_write_mask() }
    fn set_user_write_mask(&mut self, v: u32) { self.base.set_user_write_mask(v) }
}

impl Node for Variable {
    fn get_attribute_max_age(&self, attribute_id: AttributeId, max_age: f64) -> Option<DataValue> {
        match attribute_id {
            AttributeId::Value => {
                let _ = max_age;
                Some(self.value.clone())
            }
            AttributeId::DataType => Some(DataValue::new_now(Variant::NodeId(Box::new(self.data_type.clone())))),
            AttributeId::ValueRank => Some(DataValue::new_now(Variant::Int32(self.value_rank))),
            AttributeId::ArrayDimensions => {
                if self.array_dimensions.is_empty() {
                    None
                } else {
                    Some(DataValue::new_now(Variant::Array(crate::array_dimensions_variant(&self.array_dimensions))))
                }
            }
            AttributeId::AccessLevel => Some(DataValue::new_now(Variant::Byte(self.access_level))),
            AttributeId::UserAccessLevel => Some(DataValue::new_now(Variant::Byte(self.user_access_level))),
            AttributeId::MinimumSamplingInterval => {
                Some(DataValue::new_now(Variant::Double(self.minimum_sampling_interval)))
            }
            AttributeId::Historizing => Some(DataValue::new_now(Variant::Boolean(self.historizing))),
            _ => self.base.get_attribute_max_age(attribute_id, max_age),
        }
    }

    fn set_attribute(&mut self, attribute_id: AttributeId, value: Variant) -> Result<(), Error> {
        match (attribute_id, value) {
            (AttributeId::Value, v) => {
                if !self.is_writable() {
                    return Err(Error::new(StatusCode::BadNotWritable, "variable is not writable"));
                }
                self.value = DataValue::new_now(v);
                Ok(())
            }
            (AttributeId::AccessLevel, Variant::Byte(v)) => {
                self.access_level = v;
                Ok(())
            }
            (AttributeId::UserAccessLevel, Variant::Byte(v)) => {
                self.user_access_level = v;
                Ok(())
            }
            (AttributeId::Historizing, Variant::Boolean(v)) => {
                self.historizing = v;
                Ok(())
            }
            (AttributeId::ValueRank, Variant::Int32(v)) => {
                self.value_rank = v;
                Ok(())
            }
            (AttributeId::ArrayDimensions, Variant::Array(arr)) => {
                self.array_dimensions = arr
                    .values
                    .into_iter()
                    .filter_map(|v| match v {
                        Variant::UInt32(d) => Some(d),
                        _ => None,
                    })
                    .collect();
                Ok(())
            }
            (AttributeId::MinimumSamplingInterval, Variant::Double(v)) => {
                self.minimum_sampling_interval = v;
                Ok(())
            }
            (attribute_id, value) => self.base.set_attribute(attribute_id, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_round_trips_through_attribute_access() {
        let mut v = Variable::new(
            NodeId::new(2, 9u32),
            "Temperature",
            LocalizedText::new("en", "Temperature"),
            NodeId::new(0, 11u32),
            Variant::Double(21.5),
        );
        assert_eq!(v.get_attribute(AttributeId::Value).unwrap().value, Some(Variant::Double(21.5)));
        v.set_attribute(AttributeId::Value, Variant::Double(22.0)).unwrap();
        assert_eq!(v.value().value, Some(Variant::Double(22.0)));
    }

    #[test]
    fn read_only_variable_rejects_write() {
        let mut v = Variable::new(
            NodeId::new(2, 9u32),
            "Temperature",
            LocalizedText::new("en", "Temperature"),
            NodeId::new(0, 11u32),
            Variant::Double(21.5),
        );
        v.access_level = ACCESS_LEVEL_CURRENT_READ;
        assert!(v.set_attribute(AttributeId::Value, Variant::Double(1.0)).is_err());
    }
}
