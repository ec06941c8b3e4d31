// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `Variant`: a discriminated union over every built-in scalar type, plus array and matrix
//! forms and `ExtensionObject`.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::byte_string::ByteString;
use crate::data_value::DataValue;
use crate::date_time::UtcTime;
use crate::encoding::{
    process_decode_io_result, process_encode_io_result, write_i32, BinaryDecodable,
    BinaryEncodable, DecodingOptions, DepthGauge, EncodingResult, Error, UaNullable,
};
use crate::extension_object::ExtensionObject;
use crate::guid::Guid;
use crate::localized_text::LocalizedText;
use crate::node_id::{ExpandedNodeId, NodeId};
use crate::qualified_name::QualifiedName;
use crate::status_code::StatusCode;
use crate::string::UAString;

const ARRAY_FLAG: u8 = 0x80;
const ARRAY_DIMENSIONS_FLAG: u8 = 0x40;
const TYPE_MASK: u8 = 0x3F;

const TYPE_BOOLEAN: u8 = 1;
const TYPE_SBYTE: u8 = 2;
const TYPE_BYTE: u8 = 3;
const TYPE_INT16: u8 = 4;
const TYPE_UINT16: u8 = 5;
const TYPE_INT32: u8 = 6;
const TYPE_UINT32: u8 = 7;
const TYPE_INT64: u8 = 8;
const TYPE_UINT64: u8 = 9;
const TYPE_FLOAT: u8 = 10;
const TYPE_DOUBLE: u8 = 11;
const TYPE_STRING: u8 = 12;
const TYPE_DATE_TIME: u8 = 13;
const TYPE_GUID: u8 = 14;
const TYPE_BYTE_STRING: u8 = 15;
const TYPE_NODE_ID: u8 = 17;
const TYPE_EXPANDED_NODE_ID: u8 = 18;
const TYPE_STATUS_CODE: u8 = 19;
const TYPE_QUALIFIED_NAME: u8 = 20;
const TYPE_LOCALIZED_TEXT: u8 = 21;
const TYPE_EXTENSION_OBJECT: u8 = 22;
const TYPE_DATA_VALUE: u8 = 23;
const TYPE_VARIANT: u8 = 24;

/// One value carried by a `Variant`.
#[derive(Debug, Clone)]
pub enum Variant {
    /// No value present.
    Empty,
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(UAString),
    DateTime(Box<UtcTime>),
    Guid(Box<Guid>),
    ByteString(ByteString),
    NodeId(Box<NodeId>),
    ExpandedNodeId(Box<ExpandedNodeId>),
    StatusCode(StatusCode),
    QualifiedName(Box<QualifiedName>),
    LocalizedText(Box<LocalizedText>),
    ExtensionObject(Box<ExtensionObject>),
    DataValue(Box<DataValue>),
    /// A `Variant` nested inside a `Variant`; only meaningful as an array element type.
    Variant(Box<Variant>),
    /// A homogeneous array (optionally with matrix dimensions) of one scalar type.
    Array(VariantArray),
}

/// The homogeneous-array form of a `Variant`.
#[derive(Debug, Clone)]
pub struct VariantArray {
    /// The wire type id shared by every element.
    pub value_type: u8,
    /// The array elements, each of the same scalar variant as `value_type`.
    pub values: Vec<Variant>,
    /// Row-major dimensions, present only for matrix-shaped arrays.
    pub dimensions: Option<Vec<i32>>,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Empty
    }
}

impl UaNullable for Variant {
    fn is_ua_null(&self) -> bool {
        matches!(self, Variant::Empty)
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        let mut a = Vec::new();
        let mut b = Vec::new();
        match (self.encode(&mut a), other.encode(&mut b)) {
            (Ok(()), Ok(())) => a == b,
            _ => false,
        }
    }
}

impl Variant {
    fn type_id(&self) -> u8 {
        match self {
            Variant::Empty => 0,
            Variant::Boolean(_) => TYPE_BOOLEAN,
            Variant::SByte(_) => TYPE_SBYTE,
            Variant::Byte(_) => TYPE_BYTE,
            Variant::Int16(_) => TYPE_INT16,
            Variant::UInt16(_) => TYPE_UINT16,
            Variant::Int32(_) => TYPE_INT32,
            Variant::UInt32(_) => TYPE_UINT32,
            Variant::Int64(_) => TYPE_INT64,
            Variant::UInt64(_) => TYPE_UINT64,
            Variant::Float(_) => TYPE_FLOAT,
            Variant::Double(_) => TYPE_DOUBLE,
            Variant::String(_) => TYPE_STRING,
            Variant::DateTime(_) => TYPE_DATE_TIME,
            Variant::Guid(_) => TYPE_GUID,
            Variant::ByteString(_) => TYPE_BYTE_STRING,
            Variant::NodeId(_) => TYPE_NODE_ID,
            Variant::ExpandedNodeId(_) => TYPE_EXPANDED_NODE_ID,
            Variant::StatusCode(_) => TYPE_STATUS_CODE,
            Variant::QualifiedName(_) => TYPE_QUALIFIED_NAME,
            Variant::LocalizedText(_) => TYPE_LOCALIZED_TEXT,
            Variant::ExtensionObject(_) => TYPE_EXTENSION_OBJECT,
            Variant::DataValue(_) => TYPE_DATA_VALUE,
            Variant::Variant(_) => TYPE_VARIANT,
            Variant::Array(arr) => arr.value_type,
        }
    }

    fn encode_scalar_body<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match self {
            Variant::Empty => Ok(()),
            Variant::Boolean(v) => v.encode(stream),
            Variant::SByte(v) => v.encode(stream),
            Variant::Byte(v) => v.encode(stream),
            Variant::Int16(v) => v.encode(stream),
            Variant::UInt16(v) => v.encode(stream),
            Variant::Int32(v) => v.encode(stream),
            Variant::UInt32(v) => v.encode(stream),
            Variant::Int64(v) => v.encode(stream),
            Variant::UInt64(v) => v.encode(stream),
            Variant::Float(v) => v.encode(stream),
            Variant::Double(v) => v.encode(stream),
            Variant::String(v) => v.encode(stream),
            Variant::DateTime(v) => v.encode(stream),
            Variant::Guid(v) => v.encode(stream),
            Variant::ByteString(v) => v.encode(stream),
            Variant::NodeId(v) => v.encode(stream),
            Variant::ExpandedNodeId(v) => v.encode(stream),
            Variant::StatusCode(v) => v.encode(stream),
            Variant::QualifiedName(v) => v.encode(stream),
            Variant::LocalizedText(v) => v.encode(stream),
            Variant::ExtensionObject(v) => v.encode(stream),
            Variant::DataValue(v) => v.encode(stream),
            Variant::Variant(v) => v.encode(stream),
            Variant::Array(_) => Err(Error::encoding("nested array variant has no scalar body")),
        }
    }

    fn scalar_byte_len(&self) -> usize {
        match self {
            Variant::Empty => 0,
            Variant::Boolean(v) => v.byte_len(),
            Variant::SByte(v) => v.byte_len(),
            Variant::Byte(v) => v.byte_len(),
            Variant::Int16(v) => v.byte_len(),
            Variant::UInt16(v) => v.byte_len(),
            Variant::Int32(v) => v.byte_len(),
            Variant::UInt32(v) => v.byte_len(),
            Variant::Int64(v) => v.byte_len(),
            Variant::UInt64(v) => v.byte_len(),
            Variant::Float(v) => v.byte_len(),
            Variant::Double(v) => v.byte_len(),
            Variant::String(v) => v.byte_len(),
            Variant::DateTime(v) => v.byte_len(),
            Variant::Guid(v) => v.byte_len(),
            Variant::ByteString(v) => v.byte_len(),
            Variant::NodeId(v) => v.byte_len(),
            Variant::ExpandedNodeId(v) => v.byte_len(),
            Variant::StatusCode(v) => v.byte_len(),
            Variant::QualifiedName(v) => v.byte_len(),
            Variant::LocalizedText(v) => v.byte_len(),
            Variant::ExtensionObject(v) => v.byte_len(),
            Variant::DataValue(v) => v.byte_len(),
            Variant::Variant(v) => v.byte_len(),
            Variant::Array(_) => 0,
        }
    }

    fn decode_scalar_body<S: Read + ?Sized>(
        type_id: u8,
        stream: &mut S,
        options: &DecodingOptions,
        depth: &DepthGauge,
    ) -> EncodingResult<Variant> {
        Ok(match type_id {
            0 => Variant::Empty,
            TYPE_BOOLEAN => Variant::Boolean(bool::decode(stream, options)?),
            TYPE_SBYTE => Variant::SByte(i8::decode(stream, options)?),
            TYPE_BYTE => Variant::Byte(u8::decode(stream, options)?),
            TYPE_INT16 => Variant::Int16(i16::decode(stream, options)?),
            TYPE_UINT16 => Variant::UInt16(u16::decode(stream, options)?),
            TYPE_INT32 => Variant::Int32(i32::decode(stream, options)?),
            TYPE_UINT32 => Variant::UInt32(u32::decode(stream, options)?),
            TYPE_INT64 => Variant::Int64(i64::decode(stream, options)?),
            TYPE_UINT64 => Variant::UInt64(u64::decode(stream, options)?),
            TYPE_FLOAT => Variant::Float(f32::decode(stream, options)?),
            TYPE_DOUBLE => Variant::Double(f64::decode(stream, options)?),
            TYPE_STRING => Variant::String(UAString::decode(stream, options)?),
            TYPE_DATE_TIME => Variant::DateTime(Box::new(UtcTime::decode(stream, options)?)),
            TYPE_GUID => Variant::Guid(Box::new(Guid::decode(stream, options)?)),
            TYPE_BYTE_STRING => Variant::ByteString(ByteString::decode(stream, options)?),
            TYPE_NODE_ID => Variant::NodeId(Box::new(NodeId::decode(stream, options)?)),
            TYPE_EXPANDED_NODE_ID => {
                Variant::ExpandedNodeId(Box::new(ExpandedNodeId::decode(stream, options)?))
            }
            TYPE_STATUS_CODE => Variant::StatusCode(StatusCode::decode(stream, options)?),
            TYPE_QUALIFIED_NAME => {
                Variant::QualifiedName(Box::new(QualifiedName::decode(stream, options)?))
            }
            TYPE_LOCALIZED_TEXT => {
                Variant::LocalizedText(Box::new(LocalizedText::decode(stream, options)?))
            }
            TYPE_EXTENSION_OBJECT => {
                let _lock = depth.enter()?;
                Variant::ExtensionObject(Box::new(ExtensionObject::decode(stream, options)?))
            }
            TYPE_DATA_VALUE => {
                let _lock = depth.enter()?;
                Variant::DataValue(Box::new(DataValue::decode(stream, options)?))
            }
            TYPE_VARIANT => {
                let _lock = depth.enter()?;
                Variant::Variant(Box::new(Variant::decode_inner(stream, options, depth)?))
            }
            other => {
                return Err(Error::decoding(format!(
                    "Unrecognized Variant built-in type id {other}"
                )))
            }
        })
    }

    fn decode_inner<S: Read + ?Sized>(
        stream: &mut S,
        options: &DecodingOptions,
        depth: &DepthGauge,
    ) -> EncodingResult<Variant> {
        let mask = process_decode_io_result(stream.read_u8())?;
        let type_id = mask & TYPE_MASK;
        let is_array = mask & ARRAY_FLAG != 0;
        let has_dimensions = mask & ARRAY_DIMENSIONS_FLAG != 0;

        if !is_array {
            return Variant::decode_scalar_body(type_id, stream, options, depth);
        }

        let _lock = depth.enter()?;
        let len = crate::encoding::read_i32(stream)?;
        if len == -1 {
            return Ok(Variant::Array(VariantArray {
                value_type: type_id,
                values: Vec::new(),
                dimensions: None,
            }));
        }
        if len < -1 || len as usize > options.max_array_length {
            return Err(Error::decoding(format!(
                "Variant array length {len} is invalid or exceeds decoding limit {}",
                options.max_array_length
            )));
        }
        let mut values = Vec::with_capacity(len as usize);
        for _ in 0..len {
            values.push(Variant::decode_scalar_body(type_id, stream, options, depth)?);
        }
        let dimensions = if has_dimensions {
            let dim_len = crate::encoding::read_i32(stream)?;
            if dim_len < 0 {
                None
            } else {
                let mut dims = Vec::with_capacity(dim_len as usize);
                for _ in 0..dim_len {
                    dims.push(crate::encoding::read_i32(stream)?);
                }
                Some(dims)
            }
        } else {
            None
        };
        Ok(Variant::Array(VariantArray {
            value_type: type_id,
            values,
            dimensions,
        }))
    }
}

impl BinaryEncodable for Variant {
    fn byte_len(&self) -> usize {
        match self {
            Variant::Array(arr) => {
                let mut size = 1 + 4;
                size += arr
                    .values
                    .iter()
                    .map(Variant::scalar_byte_len)
                    .sum::<usize>();
                if let Some(dims) = &arr.dimensions {
                    size += 4 + dims.len() * 4;
                }
                size
            }
            other => 1 + other.scalar_byte_len(),
        }
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match self {
            Variant::Array(arr) => {
                let mut mask = arr.value_type | ARRAY_FLAG;
                if arr.dimensions.is_some() {
                    mask |= ARRAY_DIMENSIONS_FLAG;
                }
                process_encode_io_result(stream.write_u8(mask))?;
                write_i32(stream, arr.values.len() as i32)?;
                for v in &arr.values {
                    v.encode_scalar_body(stream)?;
                }
                if let Some(dims) = &arr.dimensions {
                    write_i32(stream, dims.len() as i32)?;
                    for d in dims {
                        write_i32(stream, *d)?;
                    }
                }
                Ok(())
            }
            other => {
                process_encode_io_result(stream.write_u8(other.type_id()))?;
                other.encode_scalar_body(stream)
            }
        }
    }
}

impl BinaryDecodable for Variant {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let depth = DepthGauge::new(options);
        Variant::decode_inner(stream, options, &depth)
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Boolean(v)
    }
}
impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int32(v)
    }
}
impl From<u32> for Variant {
    fn from(v: u32) -> Self {
        Variant::UInt32(v)
    }
}
impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Double(v)
    }
}
impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(UAString::from(v))
    }
}
impl From<NodeId> for Variant {
    fn from(v: NodeId) -> Self {
        Variant::NodeId(Box::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rt(v: Variant) -> Variant {
        let options = DecodingOptions::default();
        let mut buf = Vec::new();
        v.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        Variant::decode(&mut cursor, &options).unwrap()
    }

    #[test]
    fn scalar_round_trip() {
        assert_eq!(rt(Variant::Int32(-7)), Variant::Int32(-7));
        assert_eq!(rt(Variant::from("hello")), Variant::from("hello"));
        assert_eq!(rt(Variant::Empty), Variant::Empty);
        assert_eq!(
            rt(Variant::StatusCode(StatusCode::BadTimeout)),
            Variant::StatusCode(StatusCode::BadTimeout)
        );
    }

    #[test]
    fn array_round_trip() {
        let arr = Variant::Array(VariantArray {
            value_type: TYPE_INT32,
            values: vec![Variant::Int32(1), Variant::Int32(2), Variant::Int32(3)],
            dimensions: None,
        });
        assert_eq!(rt(arr), {
            let arr = Variant::Array(VariantArray {
                value_type: TYPE_INT32,
                values: vec![Variant::Int32(1), Variant::Int32(2), Variant::Int32(3)],
                dimensions: None,
            });
            arr
        });
    }

    #[test]
    fn null_array_round_trip() {
        let arr = Variant::Array(VariantArray {
            value_type: TYPE_INT32,
            values: Vec::new(),
            dimensions: None,
        });
        let back = rt(arr);
        match back {
            Variant::Array(a) => assert!(a.values.is_empty()),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn matrix_dimensions_round_trip() {
        let arr = Variant::Array(VariantArray {
            value_type: TYPE_INT32,
            values: vec![Variant::Int32(1), Variant::Int32(2), Variant::Int32(3), Variant::Int32(4)],
            dimensions: Some(vec![2, 2]),
        });
        let mut buf = Vec::new();
        arr.encode(&mut buf).unwrap();
        let options = DecodingOptions::default();
        let mut cursor = Cursor::new(buf);
        let back = Variant::decode(&mut cursor, &options).unwrap();
        match back {
            Variant::Array(a) => assert_eq!(a.dimensions, Some(vec![2, 2])),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn oversized_array_length_rejected() {
        let options = DecodingOptions {
            max_array_length: 2,
            ..Default::default()
        };
        let mut buf = Vec::new();
        buf.push(TYPE_INT32 | ARRAY_FLAG);
        write_i32(&mut buf, 10).unwrap();
        let mut cursor = Cursor::new(buf);
        assert!(Variant::decode(&mut cursor, &options).is_err());
    }
}
