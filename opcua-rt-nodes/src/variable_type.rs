// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! The `VariableType` node class: the type definition a concrete `Variable` instantiates.

use opcua_types::{attribute_id::AttributeId, DataValue, Error, LocalizedText, NodeClass, NodeId, QualifiedName, Variant};

use crate::base::Base;
use crate::node::{Node, NodeBase};

#[derive(Debug, Clone)]
pub struct VariableType {
    base: Base,
    value: Option<Variant>,
    data_type: NodeId,
    value_rank: i32,
    is_abstract: bool,
}

impl VariableType {
    pub fn new(node_id: NodeId, browse_name: impl Into<QualifiedName>, display_name: impl Into<LocalizedText>, data_type: NodeId) -> Self {
        VariableType {
            base: Base::new(NodeClass::VariableType, node_id, browse_name.into(), display_name.into()),
            value: None,
            data_type,
            value_rank: -1,
            is_abstract: false,
        }
    }
}

impl NodeBase for VariableType {
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

impl Node for VariableType {
    fn get_attribute_max_age(&self, attribute_id: AttributeId, max_age: f64) -> Option<DataValue> {
        match attribute_id {
            AttributeId::Value => self.value.clone().map(DataValue::new_now),
            AttributeId::DataType => Some(DataValue::new_now(Variant::NodeId(Box::new(self.data_type.clone())))),
            AttributeId::ValueRank => Some(DataValue::new_now(Variant::Int32(self.value_rank))),
            AttributeId::IsAbstract => Some(DataValue::new_now(Variant::Boolean(self.is_abstract))),
            _ => self.base.get_attribute_max_age(attribute_id, max_age),
        }
    }

    fn set_attribute(&mut self, attribute_id: AttributeId, value: Variant) -> Result<(), Error> {
        match (attribute_id, value) {
            (AttributeId::Value, v) => {
                self.value = Some(v);
                Ok(())
            }
            (AttributeId::IsAbstract, Variant::Boolean(v)) => {
                self.is_abstract = v;
                Ok(())
            }
            (attribute_id, value) => self.base.set_attribute(attribute_id, value),
        }
    }
}
