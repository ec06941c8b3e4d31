// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! The 8-byte header prefixing every message on the wire: a 3-ASCII-byte message type, a
//! chunk-type byte, and the total message size.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use opcua_types::{Error, EncodingResult};

/// Offset, from the start of a chunk, of the `u32` message-size field. Chunk assembly writes
/// a placeholder size up front and patches it in at this offset once the final length of the
/// assembled message is known.
pub const MESSAGE_SIZE_OFFSET: usize = 4;

/// Size, in bytes, of the fixed header every chunk begins with.
pub const MESSAGE_HEADER_LEN: usize = 8;

/// The three-ASCII-letter tag identifying what kind of message a chunk belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Hello,
    Acknowledge,
    Error,
    OpenSecureChannel,
    CloseSecureChannel,
    Message,
}

impl MessageType {
    fn tag(self) -> &'static [u8; 3] {
        match self {
            MessageType::Hello => b"HEL",
            MessageType::Acknowledge => b"ACK",
            MessageType::Error => b"ERR",
            MessageType::OpenSecureChannel => b"OPN",
            MessageType::CloseSecureChannel => b"CLO",
            MessageType::Message => b"MSG",
        }
    }

    fn from_tag(tag: [u8; 3]) -> EncodingResult<Self> {
        match &tag {
            b"HEL" => Ok(MessageType::Hello),
            b"ACK" => Ok(MessageType::Acknowledge),
            b"ERR" => Ok(MessageType::Error),
            b"OPN" => Ok(MessageType::OpenSecureChannel),
            b"CLO" => Ok(MessageType::CloseSecureChannel),
            b"MSG" => Ok(MessageType::Message),
            other => Err(Error::decoding(format!(
                "unrecognized message type {:?}",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    /// `true` for message types that are carried across possibly-multiple chunks
    /// (`OPN`/`CLO`/`MSG`); `HEL`/`ACK`/`ERR` are always single-chunk.
    pub fn is_chunked(self) -> bool {
        matches!(
            self,
            MessageType::OpenSecureChannel | MessageType::CloseSecureChannel | MessageType::Message
        )
    }
}

/// Whether a chunk is the only (or final) one in a message, a continuation, or an abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    Final,
    Continuation,
    Abort,
}

impl ChunkType {
    fn byte(self) -> u8 {
        match self {
            ChunkType::Final => b'F',
            ChunkType::Continuation => b'C',
            ChunkType::Abort => b'A',
        }
    }

    fn from_byte(byte: u8) -> EncodingResult<Self> {
        match byte {
            b'F' => Ok(ChunkType::Final),
            b'C' => Ok(ChunkType::Continuation),
            b'A' => Ok(ChunkType::Abort),
            other => Err(Error::decoding(format!("unrecognized chunk type {:?}", other as char))),
        }
    }
}

/// The fixed 8-byte prefix of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub message_type: MessageType,
    pub chunk_type: ChunkType,
    pub message_size: u32,
}

impl MessageHeader {
    pub fn new(message_type: MessageType, chunk_type: ChunkType, message_size: u32) -> Self {
        MessageHeader {
            message_type,
            chunk_type,
            message_size,
        }
    }

    pub fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        stream
            .write_all(self.message_type.tag())
            .map_err(|e| Error::encoding(format!("write error: {e}")))?;
        stream
            .write_u8(self.chunk_type.byte())
            .map_err(|e| Error::encoding(format!("write error: {e}")))?;
        stream
            .write_u32::<LittleEndian>(self.message_size)
            .map_err(|e| Error::encoding(format!("write error: {e}")))
    }

    pub fn decode<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<Self> {
        let mut tag = [0u8; 3];
        stream
            .read_exact(&mut tag)
            .map_err(|e| Error::decoding(format!("read error: {e}")))?;
        let message_type = MessageType::from_tag(tag)?;
        let chunk_type = ChunkType::from_byte(
            stream
                .read_u8()
                .map_err(|e| Error::decoding(format!("read error: {e}")))?,
        )?;
        let message_size = stream
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::decoding(format!("read error: {e}")))?;
        Ok(MessageHeader {
            message_type,
            chunk_type,
            message_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips() {
        let header = MessageHeader::new(MessageType::Message, ChunkType::Final, 64);
        let mut buf = Vec::new();
        header.encode(&mut buf).unwrap();
        assert_eq!(&buf[0..3], b"MSG");
        assert_eq!(buf[3], b'F');
        assert_eq!(buf.len(), MESSAGE_HEADER_LEN);
        let mut cursor = Cursor::new(buf);
        assert_eq!(MessageHeader::decode(&mut cursor).unwrap(), header);
    }

    #[test]
    fn rejects_unknown_message_type() {
        let mut buf = b"XYZF".to_vec();
        buf.extend_from_slice(&0u32.to_le_bytes());
        let mut cursor = Cursor::new(buf);
        assert!(MessageHeader::decode(&mut cursor).is_err());
    }
}
