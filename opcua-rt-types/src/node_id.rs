// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `NodeId` and `ExpandedNodeId`: the identity of every addressable OPC UA entity.

use std::fmt;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::byte_string::ByteString;
use crate::encoding::{
    process_decode_io_result, process_encode_io_result, BinaryDecodable, BinaryEncodable,
    DecodingOptions, EncodingResult, Error, UaNullable,
};
use crate::guid::Guid;
use crate::string::UAString;

const ENCODING_TWO_BYTE: u8 = 0x00;
const ENCODING_FOUR_BYTE: u8 = 0x01;
const ENCODING_NUMERIC: u8 = 0x02;
const ENCODING_STRING: u8 = 0x03;
const ENCODING_GUID: u8 = 0x04;
const ENCODING_BYTE_STRING: u8 = 0x05;

const NAMESPACE_URI_FLAG: u8 = 0x80;
const SERVER_INDEX_FLAG: u8 = 0x40;

/// The identifier portion of a `NodeId`, discriminated by the four wire forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// A 32-bit numeric identifier.
    Numeric(u32),
    /// A string identifier.
    String(UAString),
    /// A 16-byte guid identifier.
    Guid(Guid),
    /// An opaque byte-string identifier.
    Opaque(ByteString),
}

impl From<u32> for Identifier {
    fn from(v: u32) -> Self {
        Identifier::Numeric(v)
    }
}

impl From<UAString> for Identifier {
    fn from(v: UAString) -> Self {
        Identifier::String(v)
    }
}

impl From<Guid> for Identifier {
    fn from(v: Guid) -> Self {
        Identifier::Guid(v)
    }
}

impl From<ByteString> for Identifier {
    fn from(v: ByteString) -> Self {
        Identifier::Opaque(v)
    }
}

/// The identity of every addressable OPC UA entity: a namespace index plus one of four
/// identifier forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    /// The namespace this identifier is scoped to. Namespace 0 is the standard OPC UA namespace.
    pub namespace: u16,
    /// The identifier value.
    pub identifier: Identifier,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Identifier::Numeric(v) => write!(f, "ns={};i={}", self.namespace, v),
            Identifier::String(v) => write!(f, "ns={};s={}", self.namespace, v),
            Identifier::Guid(v) => write!(f, "ns={};g={}", self.namespace, v),
            Identifier::Opaque(_) => write!(f, "ns={};b=...", self.namespace),
        }
    }
}

impl UaNullable for NodeId {
    fn is_ua_null(&self) -> bool {
        self.is_null()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::null()
    }
}

impl NodeId {
    /// Construct a numeric NodeId.
    pub fn new(namespace: u16, identifier: impl Into<Identifier>) -> NodeId {
        NodeId {
            namespace,
            identifier: identifier.into(),
        }
    }

    /// The null NodeId: namespace 0, numeric identifier 0.
    pub fn null() -> NodeId {
        NodeId {
            namespace: 0,
            identifier: Identifier::Numeric(0),
        }
    }

    /// `true` if this is the null NodeId.
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && matches!(self.identifier, Identifier::Numeric(0))
    }

    /// The numeric identifier, if this is a numeric NodeId.
    pub fn as_u32(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(v) => Some(v),
            _ => None,
        }
    }

    fn encoding_mask(&self) -> u8 {
        match &self.identifier {
            Identifier::Numeric(v) => {
                if self.namespace == 0 && *v <= u8::MAX as u32 {
                    ENCODING_TWO_BYTE
                } else if self.namespace <= u8::MAX as u16 && *v <= u16::MAX as u32 {
                    ENCODING_FOUR_BYTE
                } else {
                    ENCODING_NUMERIC
                }
            }
            Identifier::String(_) => ENCODING_STRING,
            Identifier::Guid(_) => ENCODING_GUID,
            Identifier::Opaque(_) => ENCODING_BYTE_STRING,
        }
    }

    fn encode_body<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match self.encoding_mask() {
            ENCODING_TWO_BYTE => {
                let Identifier::Numeric(v) = &self.identifier else {
                    unreachable!()
                };
                process_encode_io_result(stream.write_u8(*v as u8))
            }
            ENCODING_FOUR_BYTE => {
                let Identifier::Numeric(v) = &self.identifier else {
                    unreachable!()
                };
                process_encode_io_result(stream.write_u8(self.namespace as u8))?;
                process_encode_io_result(stream.write_u16::<LittleEndian>(*v as u16))
            }
            ENCODING_NUMERIC => {
                let Identifier::Numeric(v) = &self.identifier else {
                    unreachable!()
                };
                process_encode_io_result(stream.write_u16::<LittleEndian>(self.namespace))?;
                process_encode_io_result(stream.write_u32::<LittleEndian>(*v))
            }
            ENCODING_STRING => {
                let Identifier::String(v) = &self.identifier else {
                    unreachable!()
                };
                process_encode_io_result(stream.write_u16::<LittleEndian>(self.namespace))?;
                v.encode(stream)
            }
            ENCODING_GUID => {
                let Identifier::Guid(v) = &self.identifier else {
                    unreachable!()
                };
                process_encode_io_result(stream.write_u16::<LittleEndian>(self.namespace))?;
                v.encode(stream)
            }
            ENCODING_BYTE_STRING => {
                let Identifier::Opaque(v) = &self.identifier else {
                    unreachable!()
                };
                process_encode_io_result(stream.write_u16::<LittleEndian>(self.namespace))?;
                v.encode(stream)
            }
            _ => unreachable!(),
        }
    }

    fn body_byte_len(&self) -> usize {
        match self.encoding_mask() {
            ENCODING_TWO_BYTE => 1,
            ENCODING_FOUR_BYTE => 3,
            ENCODING_NUMERIC => 6,
            ENCODING_STRING => {
                let Identifier::String(v) = &self.identifier else {
                    unreachable!()
                };
                2 + v.byte_len()
            }
            ENCODING_GUID => 2 + 16,
            ENCODING_BYTE_STRING => {
                let Identifier::Opaque(v) = &self.identifier else {
                    unreachable!()
                };
                2 + v.byte_len()
            }
            _ => unreachable!(),
        }
    }

    fn decode_body<S: Read + ?Sized>(
        mask: u8,
        stream: &mut S,
        options: &DecodingOptions,
    ) -> EncodingResult<NodeId> {
        match mask {
            ENCODING_TWO_BYTE => {
                let v = process_decode_io_result(stream.read_u8())?;
                Ok(NodeId::new(0, v as u32))
            }
            ENCODING_FOUR_BYTE => {
                let ns = process_decode_io_result(stream.read_u8())?;
                let v = process_decode_io_result(stream.read_u16::<LittleEndian>())?;
                Ok(NodeId::new(ns as u16, v as u32))
            }
            ENCODING_NUMERIC => {
                let ns = process_decode_io_result(stream.read_u16::<LittleEndian>())?;
                let v = process_decode_io_result(stream.read_u32::<LittleEndian>())?;
                Ok(NodeId::new(ns, v))
            }
            ENCODING_STRING => {
                let ns = process_decode_io_result(stream.read_u16::<LittleEndian>())?;
                let v = UAString::decode(stream, options)?;
                Ok(NodeId::new(ns, v))
            }
            ENCODING_GUID => {
                let ns = process_decode_io_result(stream.read_u16::<LittleEndian>())?;
                let v = Guid::decode(stream, options)?;
                Ok(NodeId::new(ns, v))
            }
            ENCODING_BYTE_STRING => {
                let ns = process_decode_io_result(stream.read_u16::<LittleEndian>())?;
                let v = ByteString::decode(stream, options)?;
                Ok(NodeId::new(ns, v))
            }
            _ => Err(Error::decoding(format!(
                "Unrecognized NodeId encoding mask {mask:#04x}"
            ))),
        }
    }
}

impl BinaryEncodable for NodeId {
    fn byte_len(&self) -> usize {
        1 + self.body_byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        process_encode_io_result(stream.write_u8(self.encoding_mask()))?;
        self.encode_body(stream)
    }
}

impl BinaryDecodable for NodeId {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let mask = process_decode_io_result(stream.read_u8())?;
        NodeId::decode_body(mask, stream, options)
    }
}

/// A `NodeId` extended with an optional namespace URI and server index, used to address
/// nodes living in another server's address space (e.g. reference targets).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedNodeId {
    /// The local (or foreign) node id.
    pub node_id: NodeId,
    /// The namespace URI, if the target namespace is identified by URI rather than index.
    pub namespace_uri: UAString,
    /// The server this node belongs to, 0 for the local server.
    pub server_index: u32,
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node_id)
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        ExpandedNodeId {
            node_id,
            namespace_uri: UAString::null(),
            server_index: 0,
        }
    }
}

impl ExpandedNodeId {
    /// Construct from a local NodeId with no namespace URI or server index.
    pub fn new(node_id: NodeId) -> Self {
        node_id.into()
    }

    /// The null ExpandedNodeId.
    pub fn null() -> Self {
        NodeId::null().into()
    }
}

impl BinaryEncodable for ExpandedNodeId {
    fn byte_len(&self) -> usize {
        let mut size = self.node_id.body_byte_len();
        size += 1; // mask byte
        if !self.namespace_uri.is_null() {
            size += self.namespace_uri.byte_len();
        }
        if self.server_index != 0 {
            size += 4;
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        let has_uri = !self.namespace_uri.is_null();
        let has_server_index = self.server_index != 0;
        let mut mask = self.node_id.encoding_mask();
        if has_uri {
            mask |= NAMESPACE_URI_FLAG;
        }
        if has_server_index {
            mask |= SERVER_INDEX_FLAG;
        }
        process_encode_io_result(stream.write_u8(mask))?;
        self.node_id.encode_body(stream)?;
        if has_uri {
            self.namespace_uri.encode(stream)?;
        }
        if has_server_index {
            process_encode_io_result(stream.write_u32::<LittleEndian>(self.server_index))?;
        }
        Ok(())
    }
}

impl BinaryDecodable for ExpandedNodeId {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let mask = process_decode_io_result(stream.read_u8())?;
        let has_uri = mask & NAMESPACE_URI_FLAG != 0;
        let has_server_index = mask & SERVER_INDEX_FLAG != 0;
        let node_id = NodeId::decode_body(mask & 0x3F, stream, options)?;
        let namespace_uri = if has_uri {
            UAString::decode(stream, options)?
        } else {
            UAString::null()
        };
        let server_index = if has_server_index {
            process_decode_io_result(stream.read_u32::<LittleEndian>())?
        } else {
            0
        };
        Ok(ExpandedNodeId {
            node_id,
            namespace_uri,
            server_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rt(id: &NodeId) -> NodeId {
        let options = DecodingOptions::default();
        let mut buf = Vec::new();
        id.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        NodeId::decode(&mut cursor, &options).unwrap()
    }

    #[test]
    fn two_byte_canonical_form() {
        let id = NodeId::new(0, 5u32);
        let mut buf = Vec::new();
        id.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![ENCODING_TWO_BYTE, 5]);
        assert_eq!(rt(&id), id);
    }

    // S6: NodeId(ns=1, i=0x7F) must use the four-byte form, not the two-byte form.
    #[test]
    fn s6_encoding_boundary() {
        let id = NodeId::new(1, 0x7Fu32);
        let mut buf = Vec::new();
        id.encode(&mut buf).unwrap();
        assert_eq!(buf[0], ENCODING_FOUR_BYTE);
        assert_eq!(rt(&id), id);
    }

    #[test]
    fn full_numeric_form_used_when_out_of_four_byte_range() {
        let id = NodeId::new(300, 5u32);
        let mut buf = Vec::new();
        id.encode(&mut buf).unwrap();
        assert_eq!(buf[0], ENCODING_NUMERIC);
        assert_eq!(rt(&id), id);

        let id = NodeId::new(0, 100_000u32);
        let mut buf = Vec::new();
        id.encode(&mut buf).unwrap();
        assert_eq!(buf[0], ENCODING_NUMERIC);
        assert_eq!(rt(&id), id);
    }

    #[test]
    fn string_guid_opaque_round_trip() {
        assert_eq!(rt(&NodeId::new(2, UAString::from("hello"))), NodeId::new(2, UAString::from("hello")));
        let g = Guid::new();
        assert_eq!(rt(&NodeId::new(1, g.clone())), NodeId::new(1, g));
        assert_eq!(
            rt(&NodeId::new(3, ByteString::from(vec![1, 2, 3]))),
            NodeId::new(3, ByteString::from(vec![1, 2, 3]))
        );
    }

    #[test]
    fn expanded_node_id_round_trip_with_uri_and_server_index() {
        let options = DecodingOptions::default();
        let expanded = ExpandedNodeId {
            node_id: NodeId::new(2, 9u32),
            namespace_uri: UAString::from("urn:test"),
            server_index: 7,
        };
        let mut buf = Vec::new();
        expanded.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(
            ExpandedNodeId::decode(&mut cursor, &options).unwrap(),
            expanded
        );
    }

    #[test]
    fn expanded_node_id_without_extras_matches_plain_node_id_body() {
        let options = DecodingOptions::default();
        let expanded = ExpandedNodeId::new(NodeId::new(0, 84u32));
        let mut buf = Vec::new();
        expanded.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let back = ExpandedNodeId::decode(&mut cursor, &options).unwrap();
        assert_eq!(back, expanded);
    }
}
