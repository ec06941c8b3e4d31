// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! The `ReferenceType` node class: the type of a relationship between two nodes.

use opcua_types::{attribute_id::AttributeId, DataValue, Error, LocalizedText, NodeClass, NodeId, QualifiedName, Variant};

use crate::base::Base;
use crate::node::{Node, NodeBase};

#[derive(Debug, Clone)]
pub struct ReferenceType {
    base: Base,
    is_abstract: bool,
    symmetric: bool,
    inverse_name: LocalizedText,
}

impl ReferenceType {
    pub fn new(
        node_id: NodeId,
        browse_name: impl Into<QualifiedName>,
        display_name: impl Into<LocalizedText>,
        symmetric: bool,
        inverse_name: LocalizedText,
    ) -> Self {
        ReferenceType {
            base: Base::new(NodeClass::ReferenceType, node_id, browse_name.into(), display_name.into()),
            is_abstract: false,
            symmetric,
            inverse_name,
        }
    }
}

impl NodeBase for ReferenceType {
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

impl Node for ReferenceType {
    fn get_attribute_max_age(&self, attribute_id: AttributeId, max_age: f64) -> Option<DataValue> {
        match attribute_id {
            AttributeId::IsAbstract => Some(DataValue::new_now(Variant::Boolean(self.is_abstract))),
            AttributeId::Symmetric => Some(DataValue::new_now(Variant::Boolean(self.symmetric))),
            AttributeId::InverseName => Some(DataValue::new_now(Variant::LocalizedText(Box::new(self.inverse_name.clone())))),
            _ => self.base.get_attribute_max_age(attribute_id, max_age),
        }
    }

    fn set_attribute(&mut self, attribute_id: AttributeId, value: Variant) -> Result<(), Error> {
        match (attribute_id, value) {
            (AttributeId::IsAbstract, Variant::Boolean(v)) => {
                self.is_abstract = v;
                Ok(())
            }
            (AttributeId::InverseName, Variant::LocalizedText(v)) => {
                self.inverse_name = *v;
                Ok(())
            }
            (attribute_id, value) => self.base.set_attribute(attribute_id, value),
        }
    }
}
