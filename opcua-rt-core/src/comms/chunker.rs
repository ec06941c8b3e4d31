// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Splits an encoded message body into wire chunks and reassembles chunks back into a body.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use opcua_types::{Error, EncodingResult};

use super::message_header::{ChunkType, MessageHeader, MessageType, MESSAGE_HEADER_LEN};

/// Per-chunk sequencing info that follows the security header on `OPN`/`CLO`/`MSG` chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceHeader {
    pub sequence_number: u32,
    pub request_id: u32,
}

impl SequenceHeader {
    pub const WIRE_LEN: usize = 8;

    pub fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        stream
            .write_u32::<LittleEndian>(self.sequence_number)
            .map_err(|e| Error::encoding(format!("write error: {e}")))?;
        stream
            .write_u32::<LittleEndian>(self.request_id)
            .map_err(|e| Error::encoding(format!("write error: {e}")))
    }

    pub fn decode<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<Self> {
        let sequence_number = stream
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::decoding(format!("read error: {e}")))?;
        let request_id = stream
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::decoding(format!("read error: {e}")))?;
        Ok(SequenceHeader {
            sequence_number,
            request_id,
        })
    }
}

/// One decoded chunk: its header, sequence info, and the payload bytes that follow.
#[derive(Debug, Clone)]
pub struct DecodedChunk {
    pub header: MessageHeader,
    pub sequence: SequenceHeader,
    pub body: Vec<u8>,
}

/// Splits a message body across chunks no larger than `max_chunk_size`, and reassembles a
/// run of chunks back into the original body.
///
/// Every chunk after the first in a multi-chunk message gets an ascending `sequence_number`;
/// [`Chunker::validate_chunks`] checks that property on the way back in, since a peer that
/// sends chunks out of order (or replays one) indicates either corruption or an attack.
pub struct Chunker {
    max_chunk_size: usize,
}

impl Chunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Chunker { max_chunk_size }
    }

    /// Encode `body` as one or more chunks of `message_type`, with ascending sequence numbers
    /// starting at `first_sequence_number`.
    pub fn encode_chunks(
        &self,
        message_type: MessageType,
        channel_id: u32,
        token_or_security_policy: &ChunkSecurityHeader,
        request_id: u32,
        first_sequence_number: u32,
        body: &[u8],
    ) -> EncodingResult<Vec<Vec<u8>>> {
        let security_len = token_or_security_policy.byte_len();
        let overhead = MESSAGE_HEADER_LEN + security_len + SequenceHeader::WIRE_LEN;
        let budget = self.max_chunk_size.saturating_sub(overhead).max(1);

        let body_chunks: Vec<&[u8]> = body.chunks(budget).collect();
        let body_chunks: Vec<&[u8]> = if body_chunks.is_empty() { vec![&body[0..0]] } else { body_chunks };
        let last = body_chunks.len() - 1;

        let mut chunks = Vec::with_capacity(body_chunks.len());
        for (i, part) in body_chunks.iter().enumerate() {
            let chunk_type = if i == last { ChunkType::Final } else { ChunkType::Continuation };
            let message_size = (overhead + part.len()) as u32;
            let mut buf = Vec::with_capacity(overhead + part.len());
            MessageHeader::new(message_type, chunk_type, message_size).encode(&mut buf)?;
            let _ = channel_id;
            token_or_security_policy.encode(&mut buf)?;
            SequenceHeader {
                sequence_number: first_sequence_number + i as u32,
                request_id,
            }
            .encode(&mut buf)?;
            buf.write_all(part).map_err(|e| Error::encoding(format!("write error: {e}")))?;
            chunks.push(buf);
        }
        Ok(chunks)
    }

    /// Decode a single chunk's header, security header, and sequence header, leaving the body
    /// bytes in [`DecodedChunk::body`].
    pub fn decode_chunk(&self, bytes: &[u8], is_asymmetric: bool) -> EncodingResult<DecodedChunk> {
        let mut cursor = Cursor::new(bytes);
        let header = MessageHeader::decode(&mut cursor)?;
        if is_asymmetric {
            AsymmetricSecurityHeader::decode(&mut cursor)?;
        } else {
            SymmetricSecurityHeader::decode(&mut cursor)?;
        }
        let sequence = SequenceHeader::decode(&mut cursor)?;
        let mut body = Vec::new();
        cursor
            .read_to_end(&mut body)
            .map_err(|e| Error::decoding(format!("read error: {e}")))?;
        Ok(DecodedChunk { header, sequence, body })
    }

    /// Check that a run of decoded chunks has strictly ascending sequence numbers and ends
    /// with exactly one `Final` chunk (any `Abort` chunk short-circuits with its reported
    /// reason instead of being reassembled).
    pub fn validate_chunks(chunks: &[DecodedChunk]) -> EncodingResult<()> {
        if chunks.is_empty() {
            return Err(Error::decoding("no chunks to assemble"));
        }
        let mut previous: Option<u32> = None;
        for (i, chunk) in chunks.iter().enumerate() {
            if let Some(prev) = previous {
                if chunk.sequence.sequence_number != prev.wrapping_add(1) {
                    return Err(Error::new(
                        opcua_types::status_code::StatusCode::BadSequenceNumberInvalid,
                        format!(
                            "chunk {i} sequence number {} is not {} + 1",
                            chunk.sequence.sequence_number, prev
                        ),
                    ));
                }
            }
            previous = Some(chunk.sequence.sequence_number);
            let is_last = i == chunks.len() - 1;
            match chunk.header.chunk_type {
                super::message_header::ChunkType::Final if is_last => {}
                super::message_header::ChunkType::Continuation if !is_last => {}
                super::message_header::ChunkType::Abort => {
                    return Err(Error::decoding("peer aborted chunked message"));
                }
                _ => return Err(Error::decoding("chunk sequence does not end in exactly one Final chunk")),
            }
        }
        Ok(())
    }

    /// Concatenate a validated run of chunks' bodies into the original message body.
    pub fn assemble(chunks: Vec<DecodedChunk>) -> EncodingResult<Vec<u8>> {
        Self::validate_chunks(&chunks)?;
        let total: usize = chunks.iter().map(|c| c.body.len()).sum();
        let mut body = Vec::with_capacity(total);
        for chunk in chunks {
            body.extend_from_slice(&chunk.body);
        }
        Ok(body)
    }
}

/// The security header carried by a chunk: asymmetric (policy URI + certificates, used only
/// by `OPN`) or symmetric (channel id + token id, used by `MSG`/`CLO`).
pub enum ChunkSecurityHeader {
    Asymmetric(AsymmetricSecurityHeader),
    Symmetric(SymmetricSecurityHeader),
}

impl ChunkSecurityHeader {
    fn byte_len(&self) -> usize {
        match self {
            ChunkSecurityHeader::Asymmetric(h) => h.byte_len(),
            ChunkSecurityHeader::Symmetric(h) => h.byte_len(),
        }
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match self {
            ChunkSecurityHeader::Asymmetric(h) => h.encode(stream),
            ChunkSecurityHeader::Symmetric(h) => h.encode(stream),
        }
    }
}

/// `OPN` chunks carry the secure channel id plus the security policy URI and (for policies
/// other than `#None`) certificate material; only `#None` is implemented, so the certificate
/// fields always encode as null.
#[derive(Debug, Clone)]
pub struct AsymmetricSecurityHeader {
    pub secure_channel_id: u32,
    pub security_policy_uri: opcua_types::string::UAString,
}

impl AsymmetricSecurityHeader {
    pub fn none(secure_channel_id: u32) -> Self {
        AsymmetricSecurityHeader {
            secure_channel_id,
            security_policy_uri: opcua_types::service_types::security_policy::NONE.into(),
        }
    }

    fn byte_len(&self) -> usize {
        use opcua_types::BinaryEncodable;
        4 + self.security_policy_uri.byte_len() + 4 + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        use opcua_types::BinaryEncodable;
        self.secure_channel_id.encode(stream)?;
        self.security_policy_uri.encode(stream)?;
        opcua_types::ByteString::null().encode(stream)?;
        opcua_types::ByteString::null().encode(stream)
    }

    fn decode<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<Self> {
        let options = opcua_types::DecodingOptions::default();
        use opcua_types::BinaryDecodable;
        let secure_channel_id = u32::decode(stream, &options)?;
        let security_policy_uri = opcua_types::string::UAString::decode(stream, &options)?;
        let _sender_certificate = opcua_types::ByteString::decode(stream, &options)?;
        let _receiver_certificate_thumbprint = opcua_types::ByteString::decode(stream, &options)?;
        Ok(AsymmetricSecurityHeader {
            secure_channel_id,
            security_policy_uri,
        })
    }
}

/// `MSG`/`CLO` chunks carry just the channel id and the currently active security token id.
#[derive(Debug, Clone, Copy)]
pub struct SymmetricSecurityHeader {
    pub secure_channel_id: u32,
    pub token_id: u32,
}

impl SymmetricSecurityHeader {
    fn byte_len(&self) -> usize {
        8
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        use opcua_types::BinaryEncodable;
        self.secure_channel_id.encode(stream)?;
        self.token_id.encode(stream)
    }

    fn decode<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<Self> {
        let options = opcua_types::DecodingOptions::default();
        use opcua_types::BinaryDecodable;
        Ok(SymmetricSecurityHeader {
            secure_channel_id: u32::decode(stream, &options)?,
            token_id: u32::decode(stream, &options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_round_trip() {
        let chunker = Chunker::new(1 << 16);
        let security = ChunkSecurityHeader::Symmetric(SymmetricSecurityHeader {
            secure_channel_id: 7,
            token_id: 1,
        });
        let body = b"hello world".to_vec();
        let chunks = chunker
            .encode_chunks(MessageType::Message, 7, &security, 42, 1, &body)
            .unwrap();
        assert_eq!(chunks.len(), 1);
        let decoded = chunker.decode_chunk(&chunks[0], false).unwrap();
        assert_eq!(decoded.body, body);
        assert_eq!(decoded.sequence.request_id, 42);
    }

    #[test]
    fn splits_across_chunks_and_reassembles() {
        let chunker = Chunker::new(64);
        let security = ChunkSecurityHeader::Symmetric(SymmetricSecurityHeader {
            secure_channel_id: 7,
            token_id: 1,
        });
        let body: Vec<u8> = (0..200u32).map(|b| b as u8).collect();
        let chunks = chunker
            .encode_chunks(MessageType::Message, 7, &security, 42, 1, &body)
            .unwrap();
        assert!(chunks.len() > 1);
        let decoded: Vec<DecodedChunk> = chunks.iter().map(|c| chunker.decode_chunk(c, false).unwrap()).collect();
        let assembled = Chunker::assemble(decoded).unwrap();
        assert_eq!(assembled, body);
    }

    #[test]
    fn rejects_out_of_order_sequence_numbers() {
        let chunker = Chunker::new(64);
        let security = ChunkSecurityHeader::Symmetric(SymmetricSecurityHeader {
            secure_channel_id: 7,
            token_id: 1,
        });
        let body: Vec<u8> = (0..200u32).map(|b| b as u8).collect();
        let chunks = chunker
            .encode_chunks(MessageType::Message, 7, &security, 42, 1, &body)
            .unwrap();
        let mut decoded: Vec<DecodedChunk> = chunks.iter().map(|c| chunker.decode_chunk(c, false).unwrap()).collect();
        decoded.swap(0, 1);
        assert!(Chunker::validate_chunks(&decoded).is_err());
    }
}
