// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Transport framing: the HEL/ACK handshake, message/chunk headers, chunk assembly, and the
//! secure-channel lifecycle built on top of them.

pub mod chunker;
pub mod hello;
pub mod message_header;
pub mod secure_channel;

pub use chunker::{AsymmetricSecurityHeader, ChunkSecurityHeader, Chunker, DecodedChunk, SequenceHeader, SymmetricSecurityHeader};
pub use hello::{AcknowledgeMessage, ErrorMessage, HelloMessage};
pub use message_header::{ChunkType, MessageHeader, MessageType, MESSAGE_HEADER_LEN, MESSAGE_SIZE_OFFSET};
pub use secure_channel::{ChannelError, SecureChannel, SecureChannelState};
