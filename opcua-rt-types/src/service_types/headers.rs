// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `RequestHeader`/`ResponseHeader`: the envelope carried by every service message.

use std::io::{Read, Write};

use crate::date_time::UtcTime;
use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult};
use crate::extension_object::ExtensionObject;
use crate::node_id::NodeId;
use crate::status_code::StatusCode;
use crate::string::UAString;

/// Header sent with every service request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHeader {
    /// The session's authentication token, or null before a session exists.
    pub authentication_token: NodeId,
    /// When the caller sent this request.
    pub timestamp: UtcTime,
    /// Handle correlating this request with its response; caller-assigned, unique per session.
    pub request_handle: u32,
    /// Bitmask requesting diagnostic detail in the response.
    pub return_diagnostics: u32,
    /// Optional caller-supplied audit trail identifier.
    pub audit_entry_id: UAString,
    /// Suggested number of milliseconds the server may take before returning `Timeout`.
    pub timeout_hint: u32,
    /// Reserved extension slot, unused by this implementation.
    pub additional_header: ExtensionObject,
}

impl RequestHeader {
    /// A header for `request_handle` with no authentication token (used before Activate).
    pub fn new(request_handle: u32, timeout_hint: u32) -> Self {
        RequestHeader {
            authentication_token: NodeId::null(),
            timestamp: UtcTime::now(),
            request_handle,
            return_diagnostics: 0,
            audit_entry_id: UAString::null(),
            timeout_hint,
            additional_header: ExtensionObject::null(),
        }
    }
}

impl BinaryEncodable for RequestHeader {
    fn byte_len(&self) -> usize {
        self.authentication_token.byte_len()
            + self.timestamp.byte_len()
            + 4
            + 4
            + self.audit_entry_id.byte_len()
            + 4
            + self.additional_header.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.authentication_token.encode(stream)?;
        self.timestamp.encode(stream)?;
        self.request_handle.encode(stream)?;
        self.return_diagnostics.encode(stream)?;
        self.audit_entry_id.encode(stream)?;
        self.timeout_hint.encode(stream)?;
        self.additional_header.encode(stream)
    }
}

impl BinaryDecodable for RequestHeader {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(RequestHeader {
            authentication_token: NodeId::decode(stream, options)?,
            timestamp: UtcTime::decode(stream, options)?,
            request_handle: u32::decode(stream, options)?,
            return_diagnostics: u32::decode(stream, options)?,
            audit_entry_id: UAString::decode(stream, options)?,
            timeout_hint: u32::decode(stream, options)?,
            additional_header: ExtensionObject::decode(stream, options)?,
        })
    }
}

/// Header returned with every service response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseHeader {
    /// When the server produced this response.
    pub timestamp: UtcTime,
    /// Echoes the request's `request_handle`.
    pub request_handle: u32,
    /// Overall status of the service call.
    pub service_result: StatusCode,
    /// Reserved diagnostic detail, unused by this implementation.
    pub service_diagnostics: ExtensionObject,
    /// String table referenced by diagnostic info, empty when diagnostics are not requested.
    pub string_table: Vec<UAString>,
    /// Reserved extension slot, unused by this implementation.
    pub additional_header: ExtensionObject,
}

impl ResponseHeader {
    /// A response header echoing `request_handle` with the given overall result.
    pub fn new(request_handle: u32, service_result: StatusCode) -> Self {
        ResponseHeader {
            timestamp: UtcTime::now(),
            request_handle,
            service_result,
            service_diagnostics: ExtensionObject::null(),
            string_table: Vec::new(),
            additional_header: ExtensionObject::null(),
        }
    }
}

impl BinaryEncodable for ResponseHeader {
    fn byte_len(&self) -> usize {
        self.timestamp.byte_len()
            + 4
            + self.service_result.byte_len()
            + self.service_diagnostics.byte_len()
            + 4
            + self
                .string_table
                .iter()
                .map(BinaryEncodable::byte_len)
                .sum::<usize>()
            + self.additional_header.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.timestamp.encode(stream)?;
        self.request_handle.encode(stream)?;
        self.service_result.encode(stream)?;
        self.service_diagnostics.encode(stream)?;
        crate::array::encode_array(&self.string_table, stream)?;
        self.additional_header.encode(stream)
    }
}

impl BinaryDecodable for ResponseHeader {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ResponseHeader {
            timestamp: UtcTime::decode(stream, options)?,
            request_handle: u32::decode(stream, options)?,
            service_result: StatusCode::decode(stream, options)?,
            service_diagnostics: ExtensionObject::decode(stream, options)?,
            string_table: crate::array::decode_array(stream, options)?,
            additional_header: ExtensionObject::decode(stream, options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn request_header_round_trip() {
        let options = DecodingOptions::default();
        let header = RequestHeader::new(7, 5000);
        let mut buf = Vec::new();
        header.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(RequestHeader::decode(&mut cursor, &options).unwrap(), header);
    }

    #[test]
    fn response_header_round_trip() {
        let options = DecodingOptions::default();
        let header = ResponseHeader::new(7, StatusCode::Good);
        let mut buf = Vec::new();
        header.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(ResponseHeader::decode(&mut cursor, &options).unwrap(), header);
    }
}
