// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `HelloMessage`/`AcknowledgeMessage`: the transport-level handshake that precedes any
//! secure-channel traffic.
//!
//! Not named in the wire-format tag list (only the three-letter `HEL`/`ACK` message types
//! are), but the handshake cannot complete without negotiating these fields, so both bodies
//! are carried as first-class structs.

use std::io::{Read, Write};

use opcua_types::string::UAString;
use opcua_types::{BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult};

/// Sent by the client immediately after the transport connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloMessage {
    pub protocol_version: u32,
    pub receive_buffer_size: u32,
    pub send_buffer_size: u32,
    pub max_message_size: u32,
    pub max_chunk_count: u32,
    pub endpoint_url: UAString,
}

impl HelloMessage {
    pub fn new(endpoint_url: impl Into<UAString>) -> Self {
        HelloMessage {
            protocol_version: 0,
            receive_buffer_size: 1 << 16,
            send_buffer_size: 1 << 16,
            max_message_size: 1 << 24,
            max_chunk_count: 0,
            endpoint_url: endpoint_url.into(),
        }
    }
}

impl BinaryEncodable for HelloMessage {
    fn byte_len(&self) -> usize {
        4 * 5 + self.endpoint_url.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.protocol_version.encode(stream)?;
        self.receive_buffer_size.encode(stream)?;
        self.send_buffer_size.encode(stream)?;
        self.max_message_size.encode(stream)?;
        self.max_chunk_count.encode(stream)?;
        self.endpoint_url.encode(stream)
    }
}

impl BinaryDecodable for HelloMessage {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(HelloMessage {
            protocol_version: u32::decode(stream, options)?,
            receive_buffer_size: u32::decode(stream, options)?,
            send_buffer_size: u32::decode(stream, options)?,
            max_message_size: u32::decode(stream, options)?,
            max_chunk_count: u32::decode(stream, options)?,
            endpoint_url: UAString::decode(stream, options)?,
        })
    }
}

/// Sent by the server in response to a `HelloMessage`, finalizing the transport limits both
/// sides will honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcknowledgeMessage {
    pub protocol_version: u32,
    pub receive_buffer_size: u32,
    pub send_buffer_size: u32,
    pub max_message_size: u32,
    pub max_chunk_count: u32,
}

impl BinaryEncodable for AcknowledgeMessage {
    fn byte_len(&self) -> usize {
        4 * 5
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.protocol_version.encode(stream)?;
        self.receive_buffer_size.encode(stream)?;
        self.send_buffer_size.encode(stream)?;
        self.max_message_size.encode(stream)?;
        self.max_chunk_count.encode(stream)
    }
}

impl BinaryDecodable for AcknowledgeMessage {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(AcknowledgeMessage {
            protocol_version: u32::decode(stream, options)?,
            receive_buffer_size: u32::decode(stream, options)?,
            send_buffer_size: u32::decode(stream, options)?,
            max_message_size: u32::decode(stream, options)?,
            max_chunk_count: u32::decode(stream, options)?,
        })
    }
}

impl AcknowledgeMessage {
    /// Negotiate limits against a peer's `HelloMessage`, taking the smaller of each side's
    /// proposal (a zero on either side means "no preference", so the non-zero value wins).
    pub fn negotiate(hello: &HelloMessage, server_max_message_size: u32, server_max_chunk_count: u32) -> Self {
        fn pick(client: u32, server: u32) -> u32 {
            match (client, server) {
                (0, s) => s,
                (c, 0) => c,
                (c, s) => c.min(s),
            }
        }
        AcknowledgeMessage {
            protocol_version: hello.protocol_version,
            receive_buffer_size: pick(hello.send_buffer_size, 1 << 16),
            send_buffer_size: pick(hello.receive_buffer_size, 1 << 16),
            max_message_size: pick(hello.max_message_size, server_max_message_size),
            max_chunk_count: pick(hello.max_chunk_count, server_max_chunk_count),
        }
    }
}

/// Sent instead of `AcknowledgeMessage` (or at any point) to report a fatal transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub error: opcua_types::status_code::StatusCode,
    pub reason: UAString,
}

impl BinaryEncodable for ErrorMessage {
    fn byte_len(&self) -> usize {
        4 + self.reason.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.error.encode(stream)?;
        self.reason.encode(stream)
    }
}

impl BinaryDecodable for ErrorMessage {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ErrorMessage {
            error: opcua_types::status_code::StatusCode::decode(stream, options)?,
            reason: UAString::decode(stream, options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_hello_round_trip() {
        let options = DecodingOptions::default();
        let hello = HelloMessage::new("opc.tcp://127.0.0.1:4841");
        assert_eq!(hello.protocol_version, 0);
        let mut buf = Vec::new();
        hello.encode(&mut buf).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(HelloMessage::decode(&mut cursor, &options).unwrap(), hello);
    }

    #[test]
    fn negotiate_picks_the_smaller_limit() {
        let hello = HelloMessage {
            max_message_size: 1000,
            ..HelloMessage::new("opc.tcp://127.0.0.1:4841")
        };
        let ack = AcknowledgeMessage::negotiate(&hello, 2000, 0);
        assert_eq!(ack.max_message_size, 1000);
    }
}
