// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Generic helpers for the `i32`-length-prefixed array encoding shared by every OPC UA
//! array-of-T field (`-1` = null, decoded here as an empty `Vec`).

use std::io::{Read, Write};

use crate::encoding::{
    write_i32, BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult, Error,
};

/// Exact encoded length of [`encode_array`]'s output for `items`.
pub fn array_byte_len<T: BinaryEncodable>(items: &[T]) -> usize {
    4 + items.iter().map(BinaryEncodable::byte_len).sum::<usize>()
}

/// Encode `items` as an `i32` length prefix followed by each element's encoding.
pub fn encode_array<T: BinaryEncodable, S: Write + ?Sized>(
    items: &[T],
    stream: &mut S,
) -> EncodingResult<()> {
    write_i32(stream, items.len() as i32)?;
    for item in items {
        item.encode(stream)?;
    }
    Ok(())
}

/// Decode an array encoded by [`encode_array`]. A `-1` length prefix decodes to an empty
/// `Vec`, since this crate does not distinguish "null array" from "empty array" at the
/// `Vec` level (callers needing that distinction use `Option<Vec<T>>` explicitly).
pub fn decode_array<T: BinaryDecodable, S: Read + ?Sized>(
    stream: &mut S,
    options: &DecodingOptions,
) -> EncodingResult<Vec<T>> {
    let len = crate::encoding::read_i32(stream)?;
    if len == -1 {
        return Ok(Vec::new());
    }
    if len < -1 || len as usize > options.max_array_length {
        return Err(Error::decoding(format!(
            "array length {len} is invalid or exceeds decoding limit {}",
            options.max_array_length
        )));
    }
    let mut items = Vec::with_capacity(len as usize);
    for _ in 0..len {
        items.push(T::decode(stream, options)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_non_empty() {
        let options = DecodingOptions::default();
        let items = vec![1i32, 2, 3];
        let mut buf = Vec::new();
        encode_array(&items, &mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let back: Vec<i32> = decode_array(&mut cursor, &options).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn null_array_decodes_empty() {
        let options = DecodingOptions::default();
        let mut buf = Vec::new();
        write_i32(&mut buf, -1).unwrap();
        let mut cursor = Cursor::new(buf);
        let back: Vec<i32> = decode_array(&mut cursor, &options).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn oversized_length_rejected() {
        let options = DecodingOptions {
            max_array_length: 1,
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_i32(&mut buf, 5).unwrap();
        let mut cursor = Cursor::new(buf);
        let result: EncodingResult<Vec<i32>> = decode_array(&mut cursor, &options);
        assert!(result.is_err());
    }
}
