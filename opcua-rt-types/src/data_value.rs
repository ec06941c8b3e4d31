// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `DataValue`: a `Variant` plus quality and timestamp metadata.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::date_time::UtcTime;
use crate::encoding::{
    process_decode_io_result, process_encode_io_result, BinaryDecodable, BinaryEncodable,
    DecodingOptions, EncodingResult, UaNullable,
};
use crate::status_code::StatusCode;
use crate::variant::Variant;

const HAS_VALUE: u8 = 0x01;
const HAS_STATUS: u8 = 0x02;
const HAS_SOURCE_TIMESTAMP: u8 = 0x04;
const HAS_SERVER_TIMESTAMP: u8 = 0x08;
const HAS_SOURCE_PICOSECONDS: u8 = 0x10;
const HAS_SERVER_PICOSECONDS: u8 = 0x20;

/// A value read from (or written to) the address space, tagged with its quality and the
/// times at which it was produced.
#[derive(Debug, Clone)]
pub struct DataValue {
    /// The value itself.
    pub value: Option<Variant>,
    /// Quality of the value.
    pub status: Option<StatusCode>,
    /// When the value was produced at the source.
    pub source_timestamp: Option<UtcTime>,
    /// When the server received or produced the value.
    pub server_timestamp: Option<UtcTime>,
    /// Sub-100ns precision for `source_timestamp`.
    pub source_picoseconds: Option<u16>,
    /// Sub-100ns precision for `server_timestamp`.
    pub server_picoseconds: Option<u16>,
}

impl Default for DataValue {
    fn default() -> Self {
        DataValue::null()
    }
}

impl UaNullable for DataValue {
    fn is_ua_null(&self) -> bool {
        self.value.is_none()
            && self.status.is_none()
            && self.source_timestamp.is_none()
            && self.server_timestamp.is_none()
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        let mut a = Vec::new();
        let mut b = Vec::new();
        match (self.encode(&mut a), other.encode(&mut b)) {
            (Ok(()), Ok(())) => a == b,
            _ => false,
        }
    }
}

impl DataValue {
    /// A `DataValue` with nothing set.
    pub fn null() -> Self {
        DataValue {
            value: None,
            status: None,
            source_timestamp: None,
            server_timestamp: None,
            source_picoseconds: None,
            server_picoseconds: None,
        }
    }

    /// Construct a good-quality value with both timestamps set to now.
    pub fn new_now(value: Variant) -> Self {
        let now = UtcTime::now();
        DataValue {
            value: Some(value),
            status: Some(StatusCode::Good),
            source_timestamp: Some(now),
            server_timestamp: Some(now),
            source_picoseconds: None,
            server_picoseconds: None,
        }
    }

    fn mask(&self) -> u8 {
        let mut mask = 0u8;
        if self.value.is_some() {
            mask |= HAS_VALUE;
        }
        if self.status.is_some() {
            mask |= HAS_STATUS;
        }
        if self.source_timestamp.is_some() {
            mask |= HAS_SOURCE_TIMESTAMP;
        }
        if self.server_timestamp.is_some() {
            mask |= HAS_SERVER_TIMESTAMP;
        }
        if self.source_picoseconds.is_some() {
            mask |= HAS_SOURCE_PICOSECONDS;
        }
        if self.server_picoseconds.is_some() {
            mask |= HAS_SERVER_PICOSECONDS;
        }
        mask
    }
}

impl BinaryEncodable for DataValue {
    fn byte_len(&self) -> usize {
        let mut size = 1;
        if let Some(v) = &self.value {
            size += v.byte_len();
        }
        if self.status.is_some() {
            size += 4;
        }
        if self.source_timestamp.is_some() {
            size += 8;
        }
        if self.server_timestamp.is_some() {
            size += 8;
        }
        if self.source_picoseconds.is_some() {
            size += 2;
        }
        if self.server_picoseconds.is_some() {
            size += 2;
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        let mask = self.mask();
        process_encode_io_result(stream.write_u8(mask))?;
        if let Some(v) = &self.value {
            v.encode(stream)?;
        }
        if let Some(v) = &self.status {
            v.encode(stream)?;
        }
        if let Some(v) = &self.source_timestamp {
            v.encode(stream)?;
        }
        if let Some(v) = &self.server_timestamp {
            v.encode(stream)?;
        }
        if let Some(v) = &self.source_picoseconds {
            process_encode_io_result(stream.write_u16::<byteorder::LittleEndian>(*v))?;
        }
        if let Some(v) = &self.server_picoseconds {
            process_encode_io_result(stream.write_u16::<byteorder::LittleEndian>(*v))?;
        }
        Ok(())
    }
}

impl BinaryDecodable for DataValue {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let mask = process_decode_io_result(stream.read_u8())?;
        let value = if mask & HAS_VALUE != 0 {
            Some(Variant::decode(stream, options)?)
        } else {
            None
        };
        let status = if mask & HAS_STATUS != 0 {
            Some(StatusCode::decode(stream, options)?)
        } else {
            None
        };
        let source_timestamp = if mask & HAS_SOURCE_TIMESTAMP != 0 {
            Some(UtcTime::decode(stream, options)?)
        } else {
            None
        };
        let server_timestamp = if mask & HAS_SERVER_TIMESTAMP != 0 {
            Some(UtcTime::decode(stream, options)?)
        } else {
            None
        };
        let source_picoseconds = if mask & HAS_SOURCE_PICOSECONDS != 0 {
            Some(process_decode_io_result(
                stream.read_u16::<byteorder::LittleEndian>(),
            )?)
        } else {
            None
        };
        let server_picoseconds = if mask & HAS_SERVER_PICOSECONDS != 0 {
            Some(process_decode_io_result(
                stream.read_u16::<byteorder::LittleEndian>(),
            )?)
        } else {
            None
        };
        Ok(DataValue {
            value,
            status,
            source_timestamp,
            server_timestamp,
            source_picoseconds,
            server_picoseconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trip_full() {
        let options = DecodingOptions::default();
        let dv = DataValue::new_now(Variant::Int32(42));
        let mut buf = Vec::new();
        dv.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(DataValue::decode(&mut cursor, &options).unwrap(), dv);
    }

    #[test]
    fn round_trip_null() {
        let options = DecodingOptions::default();
        let dv = DataValue::null();
        let mut buf = Vec::new();
        dv.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0u8]);
        let mut cursor = Cursor::new(buf);
        assert_eq!(DataValue::decode(&mut cursor, &options).unwrap(), dv);
    }
}
