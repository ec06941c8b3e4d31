// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `ByteString`: a nullable sequence of octets.

use std::io::{Read, Write};

use crate::encoding::{
    process_decode_io_result, process_encode_io_result, read_i32, write_i32, BinaryDecodable,
    BinaryEncodable, DecodingOptions, EncodingResult, Error, UaNullable,
};

/// A sequence of octets, distinguishing `null` from `empty`.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct ByteString {
    /// The raw bytes, `None` if null.
    pub value: Option<Vec<u8>>,
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        self.value.as_deref().unwrap_or(&[])
    }
}

impl UaNullable for ByteString {
    fn is_ua_null(&self) -> bool {
        self.is_null()
    }
}

impl ByteString {
    /// The null byte string.
    pub fn null() -> ByteString {
        ByteString { value: None }
    }

    /// `true` if this is the null byte string.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// `true` if this has zero length (distinct from null).
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map(|v| v.is_empty()).unwrap_or(false)
    }

    /// `true` if null or empty.
    pub fn is_null_or_empty(&self) -> bool {
        self.is_null() || self.is_empty()
    }
}

impl<'a, T> From<&'a T> for ByteString
where
    T: AsRef<[u8]> + ?Sized,
{
    fn from(value: &'a T) -> Self {
        ByteString {
            value: Some(value.as_ref().to_vec()),
        }
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        ByteString { value: Some(value) }
    }
}

impl BinaryEncodable for ByteString {
    fn byte_len(&self) -> usize {
        4 + self.value.as_ref().map(|v| v.len()).unwrap_or(0)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match &self.value {
            None => write_i32(stream, -1),
            Some(v) => {
                write_i32(stream, v.len() as i32)?;
                process_encode_io_result(stream.write_all(v))
            }
        }
    }
}

impl BinaryDecodable for ByteString {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let len = read_i32(stream)?;
        if len == -1 {
            Ok(ByteString::null())
        } else if len < -1 {
            Err(Error::decoding(format!(
                "ByteString length is a negative number {len}"
            )))
        } else if len as usize > options.max_byte_string_length {
            Err(Error::decoding(format!(
                "ByteString length {len} exceeds decoding limit {}",
                options.max_byte_string_length
            )))
        } else {
            let mut buf = vec![0u8; len as usize];
            process_decode_io_result(stream.read_exact(&mut buf))?;
            Ok(ByteString { value: Some(buf) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn bytestring_null_vs_empty() {
        assert!(ByteString::null().is_null());
        assert!(!ByteString::from(&[][..]).is_null());
        assert!(ByteString::from(&[][..]).is_empty());
    }

    #[test]
    fn bytestring_round_trip() {
        let options = DecodingOptions::default();
        let bs = ByteString::from(vec![1, 2, 3, 4]);
        let mut buf = Vec::new();
        bs.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(ByteString::decode(&mut cursor, &options).unwrap(), bs);
    }
}
