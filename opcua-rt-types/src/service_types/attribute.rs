// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Attribute service set: Read and Write.

use std::io::{Read, Write};

use crate::array::{array_byte_len, decode_array, encode_array};
use crate::attribute_id::AttributeId;
use crate::data_value::DataValue;
use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, Error, EncodingResult};
use crate::extension_object::ExtensionObject;
use crate::node_id::NodeId;
use crate::service_types::headers::{RequestHeader, ResponseHeader};
use crate::status_code::StatusCode;
use crate::string::UAString;

/// Which timestamps a Read should return alongside each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampsToReturn {
    Source = 0,
    Server = 1,
    Both = 2,
    Neither = 3,
}

impl TimestampsToReturn {
    pub fn from_u32(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(TimestampsToReturn::Source),
            1 => Ok(TimestampsToReturn::Server),
            2 => Ok(TimestampsToReturn::Both),
            3 => Ok(TimestampsToReturn::Neither),
            other => Err(Error::decoding(format!(
                "unrecognized TimestampsToReturn {other}"
            ))),
        }
    }
}

impl BinaryEncodable for TimestampsToReturn {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        (*self as u32).encode(stream)
    }
}

impl BinaryDecodable for TimestampsToReturn {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        TimestampsToReturn::from_u32(u32::decode(stream, options)?)
    }
}

/// One element of a `ReadRequest`: identifies a node, attribute, and (optionally) sub-range.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadValueId {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub index_range: UAString,
    pub data_encoding: crate::qualified_name::QualifiedName,
}

impl ReadValueId {
    /// A whole-value read of `node_id`'s Value attribute, using the default binary encoding.
    pub fn value_of(node_id: NodeId) -> Self {
        ReadValueId {
            node_id,
            attribute_id: AttributeId::Value.into(),
            index_range: UAString::null(),
            data_encoding: crate::qualified_name::QualifiedName::null(),
        }
    }
}

impl BinaryEncodable for ReadValueId {
    fn byte_len(&self) -> usize {
        self.node_id.byte_len() + 4 + self.index_range.byte_len() + self.data_encoding.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.node_id.encode(stream)?;
        self.attribute_id.encode(stream)?;
        self.index_range.encode(stream)?;
        self.data_encoding.encode(stream)
    }
}

impl BinaryDecodable for ReadValueId {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ReadValueId {
            node_id: NodeId::decode(stream, options)?,
            attribute_id: u32::decode(stream, options)?,
            index_range: UAString::decode(stream, options)?,
            data_encoding: crate::qualified_name::QualifiedName::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub request_header: RequestHeader,
    pub max_age: f64,
    pub timestamps_to_return: TimestampsToReturn,
    pub nodes_to_read: Vec<ReadValueId>,
}

impl BinaryEncodable for ReadRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + 8 + 4 + array_byte_len(&self.nodes_to_read)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.max_age.encode(stream)?;
        self.timestamps_to_return.encode(stream)?;
        encode_array(&self.nodes_to_read, stream)
    }
}

impl BinaryDecodable for ReadRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ReadRequest {
            request_header: RequestHeader::decode(stream, options)?,
            max_age: f64::decode(stream, options)?,
            timestamps_to_return: TimestampsToReturn::decode(stream, options)?,
            nodes_to_read: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<DataValue>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for ReadResponse {
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

impl BinaryDecodable for ReadResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ReadResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

/// One element of a `WriteRequest`: a node/attribute plus the value to set.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteValue {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub index_range: UAString,
    pub value: DataValue,
}

impl BinaryEncodable for WriteValue {
    fn byte_len(&self) -> usize {
        self.node_id.byte_len() + 4 + self.index_range.byte_len() + self.value.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.node_id.encode(stream)?;
        self.attribute_id.encode(stream)?;
        self.index_range.encode(stream)?;
        self.value.encode(stream)
    }
}

impl BinaryDecodable for WriteValue {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(WriteValue {
            node_id: NodeId::decode(stream, options)?,
            attribute_id: u32::decode(stream, options)?,
            index_range: UAString::decode(stream, options)?,
            value: DataValue::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub request_header: RequestHeader,
    pub nodes_to_write: Vec<WriteValue>,
}

impl BinaryEncodable for WriteRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + array_byte_len(&self.nodes_to_write)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        encode_array(&self.nodes_to_write, stream)
    }
}

impl BinaryDecodable for WriteRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(WriteRequest {
            request_header: RequestHeader::decode(stream, options)?,
            nodes_to_write: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<StatusCode>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for WriteResponse {
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

impl BinaryDecodable for WriteResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(WriteResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_code::StatusCode;
    use crate::variant::Variant;
    use std::io::Cursor;

    #[test]
    fn s2_read_request_round_trip() {
        let options = DecodingOptions::default();
        let req = ReadRequest {
            request_header: RequestHeader::new(3, 5000),
            max_age: 0.0,
            timestamps_to_return: TimestampsToReturn::Both,
            nodes_to_read: vec![ReadValueId::value_of(NodeId::new(2, 9u32))],
        };
        let mut buf = Vec::new();
        req.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(ReadRequest::decode(&mut cursor, &options).unwrap(), req);
    }

    #[test]
    fn read_response_round_trip_with_good_result() {
        let options = DecodingOptions::default();
        let resp = ReadResponse {
            response_header: ResponseHeader::new(3, StatusCode::Good),
            results: vec![DataValue::new_now(Variant::Double(21.5))],
            diagnostic_infos: Vec::new(),
        };
        let mut buf = Vec::new();
        resp.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let back = ReadResponse::decode(&mut cursor, &options).unwrap();
        assert_eq!(back.results[0].status, Some(StatusCode::Good));
    }
}
