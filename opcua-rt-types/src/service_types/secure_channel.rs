// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! SecureChannel service set: OpenSecureChannel and CloseSecureChannel message bodies.
//!
//! These are the payloads carried inside `OPN`/`CLO` chunks; the chunk framing and security
//! header live in the transport layer, not here.

use std::io::{Read, Write};

use crate::byte_string::ByteString;
use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, Error, EncodingResult};
use crate::service_types::headers::{RequestHeader, ResponseHeader};

/// What an OpenSecureChannel request is asking the server to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityTokenRequestType {
    Issue = 0,
    Renew = 1,
}

impl SecurityTokenRequestType {
    pub fn from_u32(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(SecurityTokenRequestType::Issue),
            1 => Ok(SecurityTokenRequestType::Renew),
            other => Err(Error::decoding(format!(
                "unrecognized SecurityTokenRequestType {other}"
            ))),
        }
    }
}

impl BinaryEncodable for SecurityTokenRequestType {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        (*self as u32).encode(stream)
    }
}

impl BinaryDecodable for SecurityTokenRequestType {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        SecurityTokenRequestType::from_u32(u32::decode(stream, options)?)
    }
}

/// The requested security posture: sign only, sign and encrypt, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSecurityMode {
    Invalid = 0,
    None = 1,
    Sign = 2,
    SignAndEncrypt = 3,
}

impl MessageSecurityMode {
    pub fn from_u32(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(MessageSecurityMode::Invalid),
            1 => Ok(MessageSecurityMode::None),
            2 => Ok(MessageSecurityMode::Sign),
            3 => Ok(MessageSecurityMode::SignAndEncrypt),
            other => Err(Error::decoding(format!(
                "unrecognized MessageSecurityMode {other}"
            ))),
        }
    }
}

impl BinaryEncodable for MessageSecurityMode {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        (*self as u32).encode(stream)
    }
}

impl BinaryDecodable for MessageSecurityMode {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        MessageSecurityMode::from_u32(u32::decode(stream, options)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenSecureChannelRequest {
    pub request_header: RequestHeader,
    pub client_protocol_version: u32,
    pub request_type: SecurityTokenRequestType,
    pub security_mode: MessageSecurityMode,
    pub client_nonce: ByteString,
    pub requested_lifetime: u32,
}

impl BinaryEncodable for OpenSecureChannelRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
            + 4
            + self.request_type.byte_len()
            + self.security_mode.byte_len()
            + self.client_nonce.byte_len()
            + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.client_protocol_version.encode(stream)?;
        self.request_type.encode(stream)?;
        self.security_mode.encode(stream)?;
        self.client_nonce.encode(stream)?;
        self.requested_lifetime.encode(stream)
    }
}

impl BinaryDecodable for OpenSecureChannelRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(OpenSecureChannelRequest {
            request_header: RequestHeader::decode(stream, options)?,
            client_protocol_version: u32::decode(stream, options)?,
            request_type: SecurityTokenRequestType::decode(stream, options)?,
            security_mode: MessageSecurityMode::decode(stream, options)?,
            client_nonce: ByteString::decode(stream, options)?,
            requested_lifetime: u32::decode(stream, options)?,
        })
    }
}

/// The token issued by a successful OpenSecureChannel, renewed periodically thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSecurityToken {
    pub channel_id: u32,
    pub token_id: u32,
    pub created_at: crate::date_time::UtcTime,
    pub revised_lifetime: u32,
}

impl BinaryEncodable for ChannelSecurityToken {
    fn byte_len(&self) -> usize {
        4 + 4 + self.created_at.byte_len() + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.channel_id.encode(stream)?;
        self.token_id.encode(stream)?;
        self.created_at.encode(stream)?;
        self.revised_lifetime.encode(stream)
    }
}

impl BinaryDecodable for ChannelSecurityToken {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ChannelSecurityToken {
            channel_id: u32::decode(stream, options)?,
            token_id: u32::decode(stream, options)?,
            created_at: crate::date_time::UtcTime::decode(stream, options)?,
            revised_lifetime: u32::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenSecureChannelResponse {
    pub response_header: ResponseHeader,
    pub server_protocol_version: u32,
    pub security_token: ChannelSecurityToken,
    pub server_nonce: ByteString,
}

impl BinaryEncodable for OpenSecureChannelResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len() + 4 + self.security_token.byte_len() + self.server_nonce.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        self.server_protocol_version.encode(stream)?;
        self.security_token.encode(stream)?;
        self.server_nonce.encode(stream)
    }
}

impl BinaryDecodable for OpenSecureChannelResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(OpenSecureChannelResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            server_protocol_version: u32::decode(stream, options)?,
            security_token: ChannelSecurityToken::decode(stream, options)?,
            server_nonce: ByteString::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseSecureChannelRequest {
    pub request_header: RequestHeader,
}

impl BinaryEncodable for CloseSecureChannelRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)
    }
}

impl BinaryDecodable for CloseSecureChannelRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CloseSecureChannelRequest {
            request_header: RequestHeader::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseSecureChannelResponse {
    pub response_header: ResponseHeader,
}

impl BinaryEncodable for CloseSecureChannelResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)
    }
}

impl BinaryDecodable for CloseSecureChannelResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CloseSecureChannelResponse {
            response_header: ResponseHeader::decode(stream, options)?,
        })
    }
}

/// Identifies a security policy by its standard URI; `#None` is the only baseline this
/// implementation negotiates without external crypto collaborators.
pub mod security_policy {
    /// The no-security baseline policy URI.
    pub const NONE: &str = "http://opcfoundation.org/UA/SecurityPolicy#None";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_code::StatusCode;
    use std::io::Cursor;

    #[test]
    fn open_secure_channel_round_trip() {
        let options = DecodingOptions::default();
        let req = OpenSecureChannelRequest {
            request_header: RequestHeader::new(0, 5000),
            client_protocol_version: 0,
            request_type: SecurityTokenRequestType::Issue,
            security_mode: MessageSecurityMode::None,
            client_nonce: ByteString::null(),
            requested_lifetime: 3_600_000,
        };
        let mut buf = Vec::new();
        req.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(
            OpenSecureChannelRequest::decode(&mut cursor, &options).unwrap(),
            req
        );
    }

    #[test]
    fn open_secure_channel_response_round_trip() {
        let options = DecodingOptions::default();
        let resp = OpenSecureChannelResponse {
            response_header: ResponseHeader::new(0, StatusCode::Good),
            server_protocol_version: 0,
            security_token: ChannelSecurityToken {
                channel_id: 1,
                token_id: 1,
                created_at: crate::date_time::UtcTime::now(),
                revised_lifetime: 3_600_000,
            },
            server_nonce: ByteString::null(),
        };
        let mut buf = Vec::new();
        resp.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(
            OpenSecureChannelResponse::decode(&mut cursor, &options).unwrap(),
            resp
        );
    }
}
