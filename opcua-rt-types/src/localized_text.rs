// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `LocalizedText`: a piece of human-readable text tagged with a locale.

use std::fmt;
use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::encoding::{
    process_decode_io_result, process_encode_io_result, BinaryDecodable, BinaryEncodable,
    DecodingOptions, EncodingResult, UaNullable,
};
use crate::string::UAString;

const HAS_LOCALE: u8 = 0x01;
const HAS_TEXT: u8 = 0x02;

/// Text plus the locale it is written in, e.g. `("Temperature", "en")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LocalizedText {
    /// The locale identifier, e.g. `"en"` or `"en-US"`.
    pub locale: UAString,
    /// The text itself.
    pub text: UAString,
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl UaNullable for LocalizedText {
    fn is_ua_null(&self) -> bool {
        self.locale.is_null() && self.text.is_null()
    }
}

impl LocalizedText {
    /// Construct text tagged with the given locale.
    pub fn new(locale: impl Into<UAString>, text: impl Into<UAString>) -> Self {
        Self {
            locale: locale.into(),
            text: text.into(),
        }
    }

    /// The null LocalizedText (no locale, no text).
    pub fn null() -> Self {
        Self {
            locale: UAString::null(),
            text: UAString::null(),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        LocalizedText::new(UAString::null(), UAString::from(value))
    }
}

impl BinaryEncodable for LocalizedText {
    fn byte_len(&self) -> usize {
        let mut size = 1;
        if !self.locale.is_null() {
            size += self.locale.byte_len();
        }
        if !self.text.is_null() {
            size += self.text.byte_len();
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        let mut mask = 0u8;
        if !self.locale.is_null() {
            mask |= HAS_LOCALE;
        }
        if !self.text.is_null() {
            mask |= HAS_TEXT;
        }
        process_encode_io_result(stream.write_u8(mask))?;
        if mask & HAS_LOCALE != 0 {
            self.locale.encode(stream)?;
        }
        if mask & HAS_TEXT != 0 {
            self.text.encode(stream)?;
        }
        Ok(())
    }
}

impl BinaryDecodable for LocalizedText {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let mask = process_decode_io_result(stream.read_u8())?;
        let locale = if mask & HAS_LOCALE != 0 {
            UAString::decode(stream, options)?
        } else {
            UAString::null()
        };
        let text = if mask & HAS_TEXT != 0 {
            UAString::decode(stream, options)?
        } else {
            UAString::null()
        };
        Ok(LocalizedText { locale, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn localized_text_round_trip() {
        let options = DecodingOptions::default();
        let lt = LocalizedText::new("en", "Temperature");
        let mut buf = Vec::new();
        lt.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(LocalizedText::decode(&mut cursor, &options).unwrap(), lt);
    }

    #[test]
    fn locale_only_and_text_only() {
        let options = DecodingOptions::default();
        for lt in [
            LocalizedText::new("en", UAString::null()),
            LocalizedText::new(UAString::null(), "no locale"),
            LocalizedText::null(),
        ] {
            let mut buf = Vec::new();
            lt.encode(&mut buf).unwrap();
            let mut cursor = Cursor::new(buf);
            assert_eq!(LocalizedText::decode(&mut cursor, &options).unwrap(), lt);
        }
    }
}
