// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `InformationModel`: the address space itself — every node, plus the references between
//! them.

use hashbrown::HashMap;
use opcua_types::{ids, status_code::StatusCode, Error, NodeId};

use crate::node::NodeType;
use crate::object::Object;
use crate::references::References;

/// The full address space: a node table plus the reference graph connecting it.
///
/// Guarded by nothing itself — callers needing concurrent access wrap an `InformationModel`
/// in the same `parking_lot::RwLock` the rest of this crate uses, rather than this type
/// baking in its own locking policy.
#[derive(Debug, Default)]
pub struct InformationModel {
    nodes: HashMap<NodeId, NodeType>,
    references: References,
}

impl InformationModel {
    /// An empty address space with no nodes at all, not even the standard root hierarchy.
    pub fn empty() -> Self {
        InformationModel::default()
    }

    /// An address space seeded with the standard `Root`/`Objects`/`Types`/`Views` hierarchy
    /// every OPC UA server exposes.
    pub fn new() -> Self {
        let mut model = InformationModel::empty();

        let root = Object::new(NodeId::new(0, ids::ROOT_FOLDER_NODE_ID), "Root", "Root");
        let objects = Object::new(NodeId::new(0, ids::OBJECTS_NODE_ID), "Objects", "Objects");
        let types = Object::new(NodeId::new(0, ids::TYPES_NODE_ID), "Types", "Types");
        let views = Object::new(NodeId::new(0, ids::VIEWS_NODE_ID), "Views", "Views");

        model.insert(NodeType::Object(root)).expect("root folder inserts once");
        model.insert(NodeType::Object(objects)).expect("objects folder inserts once");
        model.insert(NodeType::Object(types)).expect("types folder inserts once");
        model.insert(NodeType::Object(views)).expect("views folder inserts once");

        for child in [ids::OBJECTS_NODE_ID, ids::TYPES_NODE_ID, ids::VIEWS_NODE_ID] {
            model.add_reference(
                NodeId::new(0, ids::ROOT_FOLDER_NODE_ID),
                NodeId::new(0, ids::REFERENCE_TYPE_ORGANIZES),
                NodeId::new(0, child),
            );
        }

        model
    }

    /// Insert a new node. Fails with `BadNodeIdExists` if the id is already present.
    pub fn insert(&mut self, node: NodeType) -> Result<(), Error> {
        let id = node_id_of(&node);
        if self.nodes.contains_key(&id) {
            return Err(Error::new(
                StatusCode::BadNodeIdExists,
                format!("node {id} already exists"),
            ));
        }
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Insert a node plus the reference that attaches it to its parent in one step, the
    /// common case when building out a subtree.
    pub fn insert_with_parent(
        &mut self,
        parent: NodeId,
        reference_type: NodeId,
        node: NodeType,
    ) -> Result<(), Error> {
        let child_id = node_id_of(&node);
        self.insert(node)?;
        self.add_reference(parent, reference_type, child_id);
        Ok(())
    }

    pub fn add_reference(&mut self, source: NodeId, reference_type: NodeId, target: NodeId) {
        self.references.insert(source, reference_type, target);
    }

    /// Look up a node by id.
    pub fn find(&self, id: &NodeId) -> Option<&NodeType> {
        self.nodes.get(id)
    }

    /// Look up a node by id, mutably.
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut NodeType> {
        self.nodes.get_mut(id)
    }

    /// Remove a node and every reference touching it.
    pub fn remove(&mut self, id: &NodeId) -> Option<NodeType> {
        let node = self.nodes.remove(id)?;
        self.references.remove_node(id);
        Some(node)
    }

    /// The references store, for service sets implementing Browse.
    pub fn references(&self) -> &References {
        &self.references
    }

    /// Visit every node in the address space. Order is unspecified.
    pub fn for_each(&self, mut f: impl FnMut(&NodeType)) {
        for node in self.nodes.values() {
            f(node);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn node_id_of(node: &NodeType) -> NodeId {
    use crate::node::NodeBase;
    node.node_id().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_types::{LocalizedText, QualifiedName};

    #[test]
    fn seeds_standard_root_hierarchy() {
        let model = InformationModel::new();
        assert!(model.find(&NodeId::new(0, ids::ROOT_FOLDER_NODE_ID)).is_some());
        assert_eq!(
            model
                .references()
                .forward_references(&NodeId::new(0, ids::ROOT_FOLDER_NODE_ID), None)
                .len(),
            3
        );
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut model = InformationModel::empty();
        let node = Object::new(NodeId::new(1, 1u32), QualifiedName::new(1, "A"), LocalizedText::new("en", "A"));
        model.insert(NodeType::Object(node.clone())).unwrap();
        assert!(model.insert(NodeType::Object(node)).is_err());
    }

    #[test]
    fn remove_clears_references() {
        let mut model = InformationModel::new();
        let child = Object::new(NodeId::new(1, 1u32), "Child", "Child");
        model
            .insert_with_parent(
                NodeId::new(0, ids::OBJECTS_NODE_ID),
                NodeId::new(0, ids::REFERENCE_TYPE_ORGANIZES),
                NodeType::Object(child),
            )
            .unwrap();
        assert_eq!(
            model
                .references()
                .forward_references(&NodeId::new(0, ids::OBJECTS_NODE_ID), None)
                .len(),
            1
        );
        model.remove(&NodeId::new(1, 1u32));
        assert!(model.find(&NodeId::new(1, 1u32)).is_none());
        assert_eq!(
            model
                .references()
                .forward_references(&NodeId::new(0, ids::OBJECTS_NODE_ID), None)
                .len(),
            0
        );
    }
}
