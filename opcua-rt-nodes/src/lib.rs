// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! In-memory information model graph for the OPC UA core.
//!
//! A [`information_model::InformationModel`] owns every [`node::NodeType`] plus the
//! [`references::References`] store connecting them, and is the address space a server's
//! Attribute and View service sets are implemented against.

pub mod base;
pub mod data_type;
pub mod information_model;
pub mod method;
pub mod node;
pub mod object;
pub mod object_type;
pub mod reference_type;
pub mod references;
pub mod variable;
pub mod variable_type;
pub mod view;

pub use information_model::InformationModel;
pub use node::{Node, NodeBase, NodeType};
pub use references::{Reference, ReferenceDirection, References};

use opcua_types::{variant::VariantArray, Variant};

/// Wrap a list of array dimensions (themselves `UInt32` in the standard) as a `Variant` array,
/// the shape the `ArrayDimensions` attribute is read back in.
pub(crate) fn array_dimensions_variant(dimensions: &[u32]) -> VariantArray {
    const TYPE_UINT32: u8 = 7;
    VariantArray {
        value_type: TYPE_UINT32,
        values: dimensions.iter().map(|d| Variant::UInt32(*d)).collect(),
        dimensions: None,
    }
}
