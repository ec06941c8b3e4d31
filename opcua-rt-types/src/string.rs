// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `UAString`: OPC UA's nullable UTF-8 string, distinct from Rust's non-nullable `String`.

use std::fmt;
use std::io::{Read, Write};

use crate::encoding::{
    process_decode_io_result, process_encode_io_result, write_i32, BinaryDecodable,
    BinaryEncodable, DecodingOptions, EncodingResult, Error, UaNullable,
};

/// A string that may be `null`, distinct from an empty string.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct UAString {
    value: Option<String>,
}

impl UaNullable for UAString {
    fn is_ua_null(&self) -> bool {
        self.is_null()
    }
}

impl fmt::Display for UAString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.as_deref().unwrap_or(""))
    }
}

impl UAString {
    /// The null string.
    pub fn null() -> UAString {
        UAString { value: None }
    }

    /// `true` if this is the null string.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// `true` if this is null or has zero length.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map(|v| v.is_empty()).unwrap_or(true)
    }

    /// Borrow the contained string, if not null.
    pub fn as_ref(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Length in bytes, 0 if null.
    pub fn len(&self) -> usize {
        self.value.as_ref().map(|v| v.len()).unwrap_or(0)
    }
}

impl From<&str> for UAString {
    fn from(value: &str) -> Self {
        UAString {
            value: Some(value.to_string()),
        }
    }
}

impl From<String> for UAString {
    fn from(value: String) -> Self {
        UAString { value: Some(value) }
    }
}

impl From<&String> for UAString {
    fn from(value: &String) -> Self {
        UAString {
            value: Some(value.clone()),
        }
    }
}

impl From<UAString> for String {
    fn from(value: UAString) -> Self {
        value.value.unwrap_or_default()
    }
}

impl BinaryEncodable for UAString {
    fn byte_len(&self) -> usize {
        4 + self.value.as_ref().map(|v| v.len()).unwrap_or(0)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match &self.value {
            None => write_i32(stream, -1),
            Some(s) => {
                write_i32(stream, s.len() as i32)?;
                process_encode_io_result(stream.write_all(s.as_bytes()))
            }
        }
    }
}

impl BinaryDecodable for UAString {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let len = crate::encoding::read_i32(stream)?;
        if len == -1 {
            Ok(UAString::null())
        } else if len < -1 {
            Err(Error::decoding(format!(
                "String length is a negative number {len}"
            )))
        } else if len as usize > options.max_byte_string_length {
            Err(Error::decoding(format!(
                "String length {len} exceeds decoding limit {}",
                options.max_byte_string_length
            )))
        } else {
            let mut buf = vec![0u8; len as usize];
            process_decode_io_result(stream.read_exact(&mut buf))?;
            let s = String::from_utf8(buf)
                .map_err(|e| Error::decoding(format!("String is not valid UTF-8: {e}")))?;
            Ok(UAString { value: Some(s) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn string_round_trip() {
        let options = DecodingOptions::default();
        let s = UAString::from("hello world");
        let mut buf = Vec::new();
        s.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(UAString::decode(&mut cursor, &options).unwrap(), s);
    }

    #[test]
    fn null_string_encodes_as_negative_one() {
        let mut buf = Vec::new();
        UAString::null().encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0xFF, 0xFF, 0xFF, 0xFF]);
    }
}
