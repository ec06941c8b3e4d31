// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! View service set: Browse and BrowseNext, the services the node-set builder drives.

use std::io::{Read, Write};

use crate::array::{array_byte_len, decode_array, encode_array};
use crate::byte_string::ByteString;
use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, Error, EncodingResult};
use crate::extension_object::ExtensionObject;
use crate::localized_text::LocalizedText;
use crate::node_class::NodeClass;
use crate::node_id::{ExpandedNodeId, NodeId};
use crate::qualified_name::QualifiedName;
use crate::service_types::headers::{RequestHeader, ResponseHeader};
use crate::status_code::StatusCode;

/// Which direction along a reference type the Browse should traverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseDirection {
    Forward = 0,
    Inverse = 1,
    Both = 2,
}

impl BrowseDirection {
    pub fn from_u32(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(BrowseDirection::Forward),
            1 => Ok(BrowseDirection::Inverse),
            2 => Ok(BrowseDirection::Both),
            other => Err(Error::decoding(format!(
                "unrecognized BrowseDirection {other}"
            ))),
        }
    }
}

impl BinaryEncodable for BrowseDirection {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        (*self as u32).encode(stream)
    }
}

impl BinaryDecodable for BrowseDirection {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        BrowseDirection::from_u32(u32::decode(stream, options)?)
    }
}

/// One element of a `BrowseRequest`: the frontier node and the traversal filter to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseDescription {
    pub node_id: NodeId,
    pub browse_direction: BrowseDirection,
    pub reference_type_id: NodeId,
    pub include_subtypes: bool,
    pub node_class_mask: u32,
    pub result_mask: u32,
}

impl BrowseDescription {
    /// Browse all forward hierarchical references from `node_id`, following subtypes.
    pub fn forward_hierarchical(node_id: NodeId) -> Self {
        BrowseDescription {
            node_id,
            browse_direction: BrowseDirection::Forward,
            reference_type_id: NodeId::new(0, crate::ids::REFERENCE_TYPE_ORGANIZES),
            include_subtypes: true,
            node_class_mask: 0,
            result_mask: 0x3F,
        }
    }
}

impl BinaryEncodable for BrowseDescription {
    fn byte_len(&self) -> usize {
        self.node_id.byte_len()
            + self.browse_direction.byte_len()
            + self.reference_type_id.byte_len()
            + 1
            + 4
            + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.node_id.encode(stream)?;
        self.browse_direction.encode(stream)?;
        self.reference_type_id.encode(stream)?;
        self.include_subtypes.encode(stream)?;
        self.node_class_mask.encode(stream)?;
        self.result_mask.encode(stream)
    }
}

impl BinaryDecodable for BrowseDescription {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowseDescription {
            node_id: NodeId::decode(stream, options)?,
            browse_direction: BrowseDirection::decode(stream, options)?,
            reference_type_id: NodeId::decode(stream, options)?,
            include_subtypes: bool::decode(stream, options)?,
            node_class_mask: u32::decode(stream, options)?,
            result_mask: u32::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseRequest {
    pub request_header: RequestHeader,
    pub view_id: NodeId,
    pub requested_max_references_per_node: u32,
    pub nodes_to_browse: Vec<BrowseDescription>,
}

impl BinaryEncodable for BrowseRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
            + self.view_id.byte_len()
            + 4
            + array_byte_len(&self.nodes_to_browse)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.view_id.encode(stream)?;
        self.requested_max_references_per_node.encode(stream)?;
        encode_array(&self.nodes_to_browse, stream)
    }
}

impl BinaryDecodable for BrowseRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowseRequest {
            request_header: RequestHeader::decode(stream, options)?,
            view_id: NodeId::decode(stream, options)?,
            requested_max_references_per_node: u32::decode(stream, options)?,
            nodes_to_browse: decode_array(stream, options)?,
        })
    }
}

/// One reference surfaced by a Browse, describing its target node.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDescription {
    pub reference_type_id: NodeId,
    pub is_forward: bool,
    pub node_id: ExpandedNodeId,
    pub browse_name: QualifiedName,
    pub display_name: LocalizedText,
    pub node_class: NodeClass,
    pub type_definition: ExpandedNodeId,
}

impl BinaryEncodable for ReferenceDescription {
    fn byte_len(&self) -> usize {
        self.reference_type_id.byte_len()
            + 1
            + self.node_id.byte_len()
            + self.browse_name.byte_len()
            + self.display_name.byte_len()
            + self.node_class.byte_len()
            + self.type_definition.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.reference_type_id.encode(stream)?;
        self.is_forward.encode(stream)?;
        self.node_id.encode(stream)?;
        self.browse_name.encode(stream)?;
        self.display_name.encode(stream)?;
        self.node_class.encode(stream)?;
        self.type_definition.encode(stream)
    }
}

impl BinaryDecodable for ReferenceDescription {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ReferenceDescription {
            reference_type_id: NodeId::decode(stream, options)?,
            is_forward: bool::decode(stream, options)?,
            node_id: ExpandedNodeId::decode(stream, options)?,
            browse_name: QualifiedName::decode(stream, options)?,
            display_name: LocalizedText::decode(stream, options)?,
            node_class: NodeClass::decode(stream, options)?,
            type_definition: ExpandedNodeId::decode(stream, options)?,
        })
    }
}

/// The per-node result of a Browse: a status plus a page of references and an optional
/// continuation point for `BrowseNext`.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseResult {
    pub status_code: StatusCode,
    pub continuation_point: ByteString,
    pub references: Vec<ReferenceDescription>,
}

impl BinaryEncodable for BrowseResult {
    fn byte_len(&self) -> usize {
        self.status_code.byte_len() + self.continuation_point.byte_len() + array_byte_len(&self.references)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.status_code.encode(stream)?;
        self.continuation_point.encode(stream)?;
        encode_array(&self.references, stream)
    }
}

impl BinaryDecodable for BrowseResult {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowseResult {
            status_code: StatusCode::decode(stream, options)?,
            continuation_point: ByteString::decode(stream, options)?,
            references: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<BrowseResult>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for BrowseResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
            + array_byte_len(&self.results)
            + array_byte_len(&self.diagnostic_infos)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        encode_array(&self.results, stream)?;
        encode_array(&self.diagnostic_infos, stream)
    }
}

impl BinaryDecodable for BrowseResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowseResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseNextRequest {
    pub request_header: RequestHeader,
    pub release_continuation_points: bool,
    pub continuation_points: Vec<ByteString>,
}

impl BinaryEncodable for BrowseNextRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + 1 + array_byte_len(&self.continuation_points)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.release_continuation_points.encode(stream)?;
        encode_array(&self.continuation_points, stream)
    }
}

impl BinaryDecodable for BrowseNextRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowseNextRequest {
            request_header: RequestHeader::decode(stream, options)?,
            release_continuation_points: bool::decode(stream, options)?,
            continuation_points: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseNextResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<BrowseResult>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for BrowseNextResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
            + array_byte_len(&self.results)
            + array_byte_len(&self.diagnostic_infos)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        encode_array(&self.results, stream)?;
        encode_array(&self.diagnostic_infos, stream)
    }
}

impl BinaryDecodable for BrowseNextResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowseNextResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn s3_browse_request_round_trip() {
        let options = DecodingOptions::default();
        let req = BrowseRequest {
            request_header: RequestHeader::new(4, 5000),
            view_id: NodeId::null(),
            requested_max_references_per_node: 0,
            nodes_to_browse: vec![BrowseDescription::forward_hierarchical(NodeId::new(
                0,
                crate::ids::ROOT_FOLDER_NODE_ID,
            ))],
        };
        let mut buf = Vec::new();
        req.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(BrowseRequest::decode(&mut cursor, &options).unwrap(), req);
    }

    #[test]
    fn browse_response_round_trip_with_reference() {
        let options = DecodingOptions::default();
        let resp = BrowseResponse {
            response_header: ResponseHeader::new(4, StatusCode::Good),
            results: vec![BrowseResult {
                status_code: StatusCode::Good,
                continuation_point: ByteString::null(),
                references: vec![ReferenceDescription {
                    reference_type_id: NodeId::new(0, crate::ids::REFERENCE_TYPE_ORGANIZES),
                    is_forward: true,
                    node_id: ExpandedNodeId::new(NodeId::new(0, crate::ids::OBJECTS_NODE_ID)),
                    browse_name: QualifiedName::new(0, "Objects"),
                    display_name: LocalizedText::new("en", "Objects"),
                    node_class: NodeClass::Object,
                    type_definition: ExpandedNodeId::null(),
                }],
            }],
            diagnostic_infos: Vec::new(),
        };
        let mut buf = Vec::new();
        resp.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(BrowseResponse::decode(&mut cursor, &options).unwrap(), resp);
    }
}
