// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `QualifiedName`: a namespace-scoped name, used for browse names.

use std::fmt;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::encoding::{
    process_decode_io_result, process_encode_io_result, BinaryDecodable, BinaryEncodable,
    DecodingOptions, EncodingResult, UaNullable,
};
use crate::string::UAString;

/// A name qualified by the namespace it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName {
    /// The namespace index the name is scoped to.
    pub namespace_index: u16,
    /// The name itself.
    pub name: UAString,
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_index, self.name)
    }
}

impl UaNullable for QualifiedName {
    fn is_ua_null(&self) -> bool {
        self.namespace_index == 0 && self.name.is_null()
    }
}

impl QualifiedName {
    /// Construct a name in the given namespace.
    pub fn new(namespace_index: u16, name: impl Into<UAString>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Construct a name in namespace 0.
    pub fn null() -> Self {
        Self {
            namespace_index: 0,
            name: UAString::null(),
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        QualifiedName::new(0, value)
    }
}

impl BinaryEncodable for QualifiedName {
    fn byte_len(&self) -> usize {
        2 + self.name.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        process_encode_io_result(stream.write_u16::<LittleEndian>(self.namespace_index))?;
        self.name.encode(stream)
    }
}

impl BinaryDecodable for QualifiedName {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let namespace_index = process_decode_io_result(stream.read_u16::<LittleEndian>())?;
        let name = UAString::decode(stream, options)?;
        Ok(QualifiedName {
            namespace_index,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn qualified_name_round_trip() {
        let options = DecodingOptions::default();
        let qn = QualifiedName::new(2, "Temperature");
        let mut buf = Vec::new();
        qn.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(QualifiedName::decode(&mut cursor, &options).unwrap(), qn);
    }
}
