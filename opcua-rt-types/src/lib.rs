// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Binary codec and built-in/structured type system for OPC UA Binary (OPC 10000-6).
//!
//! This crate is the L1/L2 layer: every scalar, composite, and structured wire type, plus
//! the [`extension_object::ExtensionRegistry`] that resolves `ExtensionObject` payloads.

pub mod array;
pub mod attribute_id;
pub mod byte_string;
pub mod data_value;
pub mod date_time;
pub mod encoding;
pub mod extension_object;
pub mod guid;
pub mod ids;
pub mod localized_text;
pub mod node_class;
pub mod node_id;
pub mod qualified_name;
pub mod service_types;
pub mod status_code;
pub mod string;
pub mod variant;

pub use byte_string::ByteString;
pub use data_value::DataValue;
pub use date_time::UtcTime;
pub use encoding::{
    BinaryDecodable, BinaryEncodable, DecodingOptions, DepthGauge, DepthLock, Error,
    EncodingResult, UaNullable,
};
pub use extension_object::{ExtensionObject, ExtensionObjectBody, ExtensionPayload, ExtensionRegistry};
pub use guid::Guid;
pub use localized_text::LocalizedText;
pub use node_class::NodeClass;
pub use node_id::{ExpandedNodeId, Identifier, NodeId};
pub use qualified_name::QualifiedName;
pub use status_code::{Severity, StatusCode};
pub use string::UAString;
pub use variant::{Variant, VariantArray};
