// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! The reference store: who points to whom, and along which reference type.

use hashbrown::HashMap;
use opcua_types::NodeId;

/// Whether a stored reference was declared from the subject node (`Forward`) or points back
/// at it from another node (`Inverse`), mirroring `BrowseDirection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceDirection {
    Forward,
    Inverse,
}

/// One edge in the address space graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub reference_type: NodeId,
    pub target_node: NodeId,
}

impl Reference {
    pub fn new(reference_type: NodeId, target_node: NodeId) -> Self {
        Reference {
            reference_type,
            target_node,
        }
    }
}

/// The full set of references in the address space, indexed by source node.
///
/// Forward and inverse edges are stored separately so that `Organizes`/`HasComponent`-style
/// browsing (forward) and "who points at me" lookups (inverse) are both O(1) on the source.
#[derive(Debug, Clone, Default)]
pub struct References {
    forward: HashMap<NodeId, Vec<Reference>>,
    inverse: HashMap<NodeId, Vec<Reference>>,
}

impl References {
    pub fn new() -> Self {
        References::default()
    }

    /// Insert a reference from `source` to `target` of the given type, and its inverse edge.
    pub fn insert(&mut self, source: NodeId, reference_type: NodeId, target: NodeId) {
        self.forward
            .entry(source.clone())
            .or_default()
            .push(Reference::new(reference_type.clone(), target.clone()));
        self.inverse
            .entry(target)
            .or_default()
            .push(Reference::new(reference_type, source));
    }

    /// All forward references from `source`, optionally filtered to one reference type.
    pub fn forward_references(&self, source: &NodeId, reference_type: Option<&NodeId>) -> Vec<&Reference> {
        self.forward
            .get(source)
            .into_iter()
            .flatten()
            .filter(|r| reference_type.map(|t| &r.reference_type == t).unwrap_or(true))
            .collect()
    }

    /// All inverse references into `target`, optionally filtered to one reference type.
    pub fn inverse_references(&self, target: &NodeId, reference_type: Option<&NodeId>) -> Vec<&Reference> {
        self.inverse
            .get(target)
            .into_iter()
            .flatten()
            .filter(|r| reference_type.map(|t| &r.reference_type == t).unwrap_or(true))
            .collect()
    }

    /// Remove every reference (forward and inverse) touching `node`, used when a node is
    /// deleted from the information model.
    pub fn remove_node(&mut self, node: &NodeId) {
        if let Some(edges) = self.forward.remove(node) {
            for edge in edges {
                if let Some(back) = self.inverse.get_mut(&edge.target_node) {
                    back.retain(|r| !(r.target_node == *node && r.reference_type == edge.reference_type));
                }
            }
        }
        if let Some(edges) = self.inverse.remove(node) {
            for edge in edges {
                if let Some(fwd) = self.forward.get_mut(&edge.target_node) {
                    fwd.retain(|r| !(r.target_node == *node && r.reference_type == edge.reference_type));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nid(i: u32) -> NodeId {
        NodeId::new(0, i)
    }

    #[test]
    fn forward_and_inverse_are_symmetric() {
        let mut refs = References::new();
        refs.insert(nid(85), nid(35), nid(1000));
        assert_eq!(refs.forward_references(&nid(85), None).len(), 1);
        assert_eq!(refs.inverse_references(&nid(1000), None).len(), 1);
        assert_eq!(refs.inverse_references(&nid(1000), None)[0].target_node, nid(85));
    }

    #[test]
    fn filters_by_reference_type() {
        let mut refs = References::new();
        refs.insert(nid(85), nid(35), nid(1000));
        refs.insert(nid(85), nid(47), nid(1001));
        assert_eq!(refs.forward_references(&nid(85), Some(&nid(35))).len(), 1);
        assert_eq!(refs.forward_references(&nid(85), None).len(), 2);
    }

    #[test]
    fn remove_node_clears_both_directions() {
        let mut refs = References::new();
        refs.insert(nid(85), nid(35), nid(1000));
        refs.remove_node(&nid(1000));
        assert!(refs.forward_references(&nid(85), None).is_empty());
    }
}
