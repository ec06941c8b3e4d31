// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Core binary encode/decode traits and primitive read/write helpers.
//!
//! All integers are little-endian, fixed-width, two's-complement; floats are IEEE-754
//! little-endian. This mirrors the wire rules of OPC UA Binary (OPC 10000-6).

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::status_code::StatusCode;

/// Crate-wide error type. Carries a `StatusCode` so it can be propagated directly into a
/// `ResponseHeader::serviceResult` or an application-level error path.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status}: {message}")]
pub struct Error {
    /// The status code classifying this failure.
    pub status: StatusCode,
    /// Human-readable detail.
    pub message: String,
    /// The request id this error occurred while processing, if known.
    pub request_id: Option<u32>,
    /// The request handle this error occurred while processing, if known.
    pub request_handle: Option<u32>,
}

impl Error {
    /// Build an error from a status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            request_id: None,
            request_handle: None,
        }
    }

    /// A `BadDecodingError` with the given detail.
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BadDecodingError, message)
    }

    /// A `BadEncodingError` with the given detail.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BadEncodingError, message)
    }

    /// Attach request id / handle context, used when an error crosses into a
    /// per-transaction reporting path.
    pub fn with_context(mut self, request_id: Option<u32>, request_handle: Option<u32>) -> Self {
        self.request_id = request_id;
        self.request_handle = request_handle;
        self
    }
}

impl From<StatusCode> for Error {
    fn from(status: StatusCode) -> Self {
        Self::new(status, "")
    }
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        e.status
    }
}

/// Result type used throughout the codec.
pub type EncodingResult<T> = Result<T, Error>;

pub(crate) fn process_encode_io_result(result: io::Result<()>) -> EncodingResult<()> {
    result.map_err(|e| Error::encoding(format!("write error: {e}")))
}

pub(crate) fn process_decode_io_result<T>(result: io::Result<T>) -> EncodingResult<T> {
    result.map_err(|e| Error::decoding(format!("read error: {e}")))
}

/// Limits enforced while decoding, so a hostile or corrupt peer cannot force unbounded
/// allocation or unbounded recursion.
#[derive(Debug, Clone)]
pub struct DecodingOptions {
    /// Maximum permitted length, in bytes, of a single `String`/`ByteString`.
    pub max_byte_string_length: usize,
    /// Maximum permitted element count of a single array.
    pub max_array_length: usize,
    /// Maximum permitted nesting depth for recursive types (`Variant`, `ExtensionObject`).
    pub max_nesting_depth: usize,
    /// Maximum permitted total decoded message size.
    pub max_message_size: usize,
}

impl Default for DecodingOptions {
    fn default() -> Self {
        Self {
            max_byte_string_length: 1 << 20,
            max_array_length: 1 << 16,
            max_nesting_depth: 100,
            max_message_size: 1 << 24,
        }
    }
}

/// Shared recursion-depth counter, checked on every descent into a nested type.
///
/// Mirrors the teacher's `DepthGauge`/`DepthLock` pair: a guard increments on construction
/// and decrements on drop, so a decode error unwinding through nested calls still restores
/// the counter.
#[derive(Debug)]
pub struct DepthGauge {
    current: AtomicUsize,
    max: usize,
}

impl DepthGauge {
    /// Create a gauge bounded by `max_nesting_depth` from the given options.
    pub fn new(options: &DecodingOptions) -> Self {
        Self {
            current: AtomicUsize::new(0),
            max: options.max_nesting_depth,
        }
    }

    /// Attempt to descend one level; fails if the configured maximum would be exceeded.
    pub fn enter(&self) -> EncodingResult<DepthLock<'_>> {
        let depth = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        if depth > self.max {
            self.current.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::decoding(format!(
                "Nesting depth {depth} exceeds configured limit {}",
                self.max
            )));
        }
        Ok(DepthLock { gauge: self })
    }
}

/// RAII guard returned by [`DepthGauge::enter`]; decrements the depth counter on drop.
pub struct DepthLock<'a> {
    gauge: &'a DepthGauge,
}

impl Drop for DepthLock<'_> {
    fn drop(&mut self) {
        self.gauge.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Implemented by types whose wire absence is distinguishable from their default value
/// (used to decide whether JSON/XML-style encodings would omit a field; kept here purely
/// as a marker so future non-binary encodings can reuse it without redesigning the trait).
pub trait UaNullable {
    /// `true` if this value represents the OPC UA "null" for its type.
    fn is_ua_null(&self) -> bool {
        false
    }
}

/// Implemented by every type with a binary wire encoding.
pub trait BinaryEncodable {
    /// The exact number of bytes `encode` will write.
    fn byte_len(&self) -> usize;

    /// Write this value's binary encoding to `stream`.
    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()>;
}

/// Implemented by every type with a binary wire decoding.
pub trait BinaryDecodable: Sized {
    /// Read this value's binary encoding from `stream`.
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self>;
}

macro_rules! impl_primitive {
    ($t:ty, $len:expr, $write:ident, $read:ident) => {
        impl BinaryEncodable for $t {
            fn byte_len(&self) -> usize {
                $len
            }

            fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
                process_encode_io_result(stream.$write::<LittleEndian>(*self))
            }
        }

        impl BinaryDecodable for $t {
            fn decode<S: Read + ?Sized>(
                stream: &mut S,
                _options: &DecodingOptions,
            ) -> EncodingResult<Self> {
                process_decode_io_result(stream.$read::<LittleEndian>())
            }
        }
    };
}

impl_primitive!(u16, 2, write_u16, read_u16);
impl_primitive!(i16, 2, write_i16, read_i16);
impl_primitive!(u32, 4, write_u32, read_u32);
impl_primitive!(i32, 4, write_i32, read_i32);
impl_primitive!(u64, 8, write_u64, read_u64);
impl_primitive!(i64, 8, write_i64, read_i64);
impl_primitive!(f32, 4, write_f32, read_f32);
impl_primitive!(f64, 8, write_f64, read_f64);

impl BinaryEncodable for bool {
    fn byte_len(&self) -> usize {
        1
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        process_encode_io_result(stream.write_u8(if *self { 1 } else { 0 }))
    }
}

impl BinaryDecodable for bool {
    fn decode<S: Read + ?Sized>(stream: &mut S, _options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(process_decode_io_result(stream.read_u8())? != 0)
    }
}

impl BinaryEncodable for u8 {
    fn byte_len(&self) -> usize {
        1
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        process_encode_io_result(stream.write_u8(*self))
    }
}

impl BinaryDecodable for u8 {
    fn decode<S: Read + ?Sized>(stream: &mut S, _options: &DecodingOptions) -> EncodingResult<Self> {
        process_decode_io_result(stream.read_u8())
    }
}

impl BinaryEncodable for i8 {
    fn byte_len(&self) -> usize {
        1
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        process_encode_io_result(stream.write_i8(*self))
    }
}

impl BinaryDecodable for i8 {
    fn decode<S: Read + ?Sized>(stream: &mut S, _options: &DecodingOptions) -> EncodingResult<Self> {
        process_decode_io_result(stream.read_i8())
    }
}

/// Write a raw `i32` (used by the length-prefix encodings of String/ByteString/Array).
pub fn write_i32<S: Write + ?Sized>(stream: &mut S, value: i32) -> EncodingResult<()> {
    value.encode(stream)
}

/// Read a raw `i32`.
pub fn read_i32<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<i32> {
    process_decode_io_result(stream.read_i32::<LittleEndian>())
}

/// Write `count` repeats of `byte`.
pub fn write_bytes<S: Write + ?Sized>(stream: &mut S, byte: u8, count: usize) -> EncodingResult<()> {
    let buf = vec![byte; count];
    process_encode_io_result(stream.write_all(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn primitive_round_trip() {
        let options = DecodingOptions::default();
        let mut buf = Vec::new();
        42i32.encode(&mut buf).unwrap();
        (-7i64).encode(&mut buf).unwrap();
        3.25f64.encode(&mut buf).unwrap();
        true.encode(&mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(i32::decode(&mut cursor, &options).unwrap(), 42);
        assert_eq!(i64::decode(&mut cursor, &options).unwrap(), -7);
        assert_eq!(f64::decode(&mut cursor, &options).unwrap(), 3.25);
        assert!(bool::decode(&mut cursor, &options).unwrap());
    }

    #[test]
    fn depth_gauge_rejects_beyond_limit() {
        let options = DecodingOptions {
            max_nesting_depth: 2,
            ..Default::default()
        };
        let gauge = DepthGauge::new(&options);
        let _l1 = gauge.enter().unwrap();
        let _l2 = gauge.enter().unwrap();
        assert!(gauge.enter().is_err());
    }

    #[test]
    fn depth_gauge_releases_on_drop() {
        let options = DecodingOptions {
            max_nesting_depth: 1,
            ..Default::default()
        };
        let gauge = DepthGauge::new(&options);
        {
            let _l1 = gauge.enter().unwrap();
        }
        assert!(gauge.enter().is_ok());
    }
}
