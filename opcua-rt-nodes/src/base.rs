// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `Base`: the fields and attribute plumbing shared by every node class.

use opcua_types::{
    attribute_id::AttributeId, status_code::StatusCode, DataValue, Error, LocalizedText,
    NodeClass, NodeId, QualifiedName, Variant,
};

use crate::node::{Node, NodeBase};

/// The attributes common to every node class, regardless of `NodeClass`.
#[derive(Debug, Clone)]
pub struct Base {
    node_class: NodeClass,
    node_id: NodeId,
    browse_name: QualifiedName,
    display_name: LocalizedText,
    description: LocalizedText,
    write_mask: u32,
    user_write_mask: u32,
}

impl Base {
    /// Construct the common fields for a node of the given class.
    pub fn new(
        node_class: NodeClass,
        node_id: NodeId,
        browse_name: QualifiedName,
        display_name: LocalizedText,
    ) -> Self {
        Base {
            node_class,
            node_id,
            browse_name,
            display_name,
            description: LocalizedText::null(),
            write_mask: 0,
            user_write_mask: 0,
        }
    }

    /// Set the Description attribute at construction time.
    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = description;
        self
    }
}

impl NodeBase for Base {
    fn node_class(&self) -> NodeClass {
        self.node_class
    }

    fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    fn browse_name(&self) -> &QualifiedName {
        &self.browse_name
    }

    fn display_name(&self) -> &LocalizedText {
        &self.display_name
    }

    fn set_display_name(&mut self, display_name: LocalizedText) {
        self.display_name = display_name;
    }

    fn description(&self) -> &LocalizedText {
        &self.description
    }

    fn set_description(&mut self, description: LocalizedText) {
        self.description = description;
    }

    fn write_mask(&self) -> u32 {
        self.write_mask
    }

    fn set_write_mask(&mut self, write_mask: u32) {
        self.write_mask = write_mask;
    }

    fn user_write_mask(&self) -> u32 {
        self.user_write_mask
    }

    fn set_user_write_mask(&mut self, user_write_mask: u32) {
        self.user_write_mask = user_write_mask;
    }
}

impl Node for Base {
    fn get_attribute_max_age(
        &self,
        attribute_id: AttributeId,
        _max_age: f64,
    ) -> Option<DataValue> {
        let value = match attribute_id {
            AttributeId::NodeId => Variant::NodeId(Box::new(self.node_id.clone())),
            AttributeId::NodeClass => Variant::Int32(self.node_class as i32),
            AttributeId::BrowseName => Variant::QualifiedName(Box::new(self.browse_name.clone())),
            AttributeId::DisplayName => {
                Variant::LocalizedText(Box::new(self.display_name.clone()))
            }
            AttributeId::Description => {
                Variant::LocalizedText(Box::new(self.description.clone()))
            }
            AttributeId::WriteMask => Variant::UInt32(self.write_mask),
            AttributeId::UserWriteMask => Variant::UInt32(self.user_write_mask),
            _ => return None,
        };
        Some(DataValue::new_now(value))
    }

    fn set_attribute(&mut self, attribute_id: AttributeId, value: Variant) -> Result<(), Error> {
        match (attribute_id, value) {
            (AttributeId::DisplayName, Variant::LocalizedText(v)) => {
                self.display_name = *v;
                Ok(())
            }
            (AttributeId::Description, Variant::LocalizedText(v)) => {
                self.description = *v;
                Ok(())
            }
            (AttributeId::WriteMask, Variant::UInt32(v)) => {
                self.write_mask = v;
                Ok(())
            }
            (AttributeId::UserWriteMask, Variant::UInt32(v)) => {
                self.user_write_mask = v;
                Ok(())
            }
            (attribute_id, _) => Err(Error::new(
                StatusCode::BadTypeMismatch,
                format!("value type does not match attribute {attribute_id:?}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_common_attributes() {
        let base = Base::new(
            NodeClass::Object,
            NodeId::new(0, 84u32),
            QualifiedName::new(0, "Root"),
            LocalizedText::new("en", "Root"),
        );
        let dv = base.get_attribute_max_age(AttributeId::DisplayName, 0.0).unwrap();
        match dv.value.unwrap() {
            Variant::LocalizedText(lt) => assert_eq!(lt.text.as_ref(), Some("Root")),
            _ => panic!("expected LocalizedText"),
        }
    }

    #[test]
    fn rejects_mismatched_attribute_type() {
        let mut base = Base::new(
            NodeClass::Object,
            NodeId::new(0, 84u32),
            QualifiedName::new(0, "Root"),
            LocalizedText::new("en", "Root"),
        );
        assert!(base
            .set_attribute(AttributeId::DisplayName, Variant::Int32(1))
            .is_err());
    }
}
