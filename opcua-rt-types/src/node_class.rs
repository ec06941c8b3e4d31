// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `NodeClass`: the eight-valued discriminator over the information model's node kinds.

use std::io::{Read, Write};

use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult, Error};

/// The kind of a node in the information model. Values match the OPC UA `NodeClass`
/// enumeration and its bitmask encoding in `BrowseDescription.nodeClassMask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum NodeClass {
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}

impl NodeClass {
    /// Resolve a raw wire value to a known node class.
    pub fn from_u32(value: u32) -> Result<Self, Error> {
        match value {
            1 => Ok(NodeClass::Object),
            2 => Ok(NodeClass::Variable),
            4 => Ok(NodeClass::Method),
            8 => Ok(NodeClass::ObjectType),
            16 => Ok(NodeClass::VariableType),
            32 => Ok(NodeClass::ReferenceType),
            64 => Ok(NodeClass::DataType),
            128 => Ok(NodeClass::View),
            other => Err(Error::decoding(format!("unrecognized NodeClass {other}"))),
        }
    }
}

impl BinaryEncodable for NodeClass {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        (*self as u32).encode(stream)
    }
}

impl BinaryDecodable for NodeClass {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let raw = u32::decode(stream, options)?;
        NodeClass::from_u32(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trip() {
        let options = DecodingOptions::default();
        let mut buf = Vec::new();
        NodeClass::Variable.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(NodeClass::decode(&mut cursor, &options).unwrap(), NodeClass::Variable);
    }
}
