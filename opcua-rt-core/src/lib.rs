// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Secure-channel transport framing for the OPC UA core: the HEL/ACK handshake, message
//! chunking, and channel lifecycle (L3), layered under the Session state machine in
//! `opcua-rt-client`.

pub mod comms;

pub use comms::{
    AcknowledgeMessage, ChannelError, ChunkType, Chunker, ErrorMessage, HelloMessage, MessageHeader,
    MessageType, SecureChannel, SecureChannelState,
};
