// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! CreateSession / ActivateSession / CloseSession message bodies.

use std::io::{Read, Write};

use crate::array::{array_byte_len, decode_array, encode_array};
use crate::byte_string::ByteString;
use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult};
use crate::extension_object::ExtensionObject;
use crate::node_id::NodeId;
use crate::service_types::headers::{RequestHeader, ResponseHeader};
use crate::status_code::StatusCode;
use crate::string::UAString;

/// Describes the client or server application sending a request, carried by
/// `CreateSessionRequest`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplicationDescription {
    pub application_uri: UAString,
    pub product_uri: UAString,
    pub application_name: crate::localized_text::LocalizedText,
    /// 0 = Server, 1 = Client, 2 = ClientAndServer, 3 = DiscoveryServer.
    pub application_type: u32,
    pub gateway_server_uri: UAString,
    pub discovery_profile_uri: UAString,
    pub discovery_urls: Vec<UAString>,
}

impl BinaryEncodable for ApplicationDescription {
    fn byte_len(&self) -> usize {
        self.application_uri.byte_len()
            + self.product_uri.byte_len()
            + self.application_name.byte_len()
            + 4
            + self.gateway_server_uri.byte_len()
            + self.discovery_profile_uri.byte_len()
            + array_byte_len(&self.discovery_urls)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.application_uri.encode(stream)?;
        self.product_uri.encode(stream)?;
        self.application_name.encode(stream)?;
        self.application_type.encode(stream)?;
        self.gateway_server_uri.encode(stream)?;
        self.discovery_profile_uri.encode(stream)?;
        encode_array(&self.discovery_urls, stream)
    }
}

impl BinaryDecodable for ApplicationDescription {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ApplicationDescription {
            application_uri: UAString::decode(stream, options)?,
            product_uri: UAString::decode(stream, options)?,
            application_name: crate::localized_text::LocalizedText::decode(stream, options)?,
            application_type: u32::decode(stream, options)?,
            gateway_server_uri: UAString::decode(stream, options)?,
            discovery_profile_uri: UAString::decode(stream, options)?,
            discovery_urls: decode_array(stream, options)?,
        })
    }
}

/// The minimum identity token: anonymous access identified only by a policy id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnonymousIdentityToken {
    /// Identifies which of the endpoint's advertised user token policies this selects.
    pub policy_id: UAString,
}

impl BinaryEncodable for AnonymousIdentityToken {
    fn byte_len(&self) -> usize {
        self.policy_id.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.policy_id.encode(stream)
    }
}

impl BinaryDecodable for AnonymousIdentityToken {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(AnonymousIdentityToken {
            policy_id: UAString::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSessionRequest {
    pub request_header: RequestHeader,
    pub client_description: ApplicationDescription,
    pub server_uri: UAString,
    pub endpoint_url: UAString,
    pub session_name: UAString,
    pub client_nonce: ByteString,
    pub client_certificate: ByteString,
    pub requested_session_timeout: f64,
    pub max_response_message_size: u32,
}

impl BinaryEncodable for CreateSessionRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
            + self.client_description.byte_len()
            + self.server_uri.byte_len()
            + self.endpoint_url.byte_len()
            + self.session_name.byte_len()
            + self.client_nonce.byte_len()
            + self.client_certificate.byte_len()
            + 8
            + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.client_description.encode(stream)?;
        self.server_uri.encode(stream)?;
        self.endpoint_url.encode(stream)?;
        self.session_name.encode(stream)?;
        self.client_nonce.encode(stream)?;
        self.client_certificate.encode(stream)?;
        self.requested_session_timeout.encode(stream)?;
        self.max_response_message_size.encode(stream)
    }
}

impl BinaryDecodable for CreateSessionRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CreateSessionRequest {
            request_header: RequestHeader::decode(stream, options)?,
            client_description: ApplicationDescription::decode(stream, options)?,
            server_uri: UAString::decode(stream, options)?,
            endpoint_url: UAString::decode(stream, options)?,
            session_name: UAString::decode(stream, options)?,
            client_nonce: ByteString::decode(stream, options)?,
            client_certificate: ByteString::decode(stream, options)?,
            requested_session_timeout: f64::decode(stream, options)?,
            max_response_message_size: u32::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSessionResponse {
    pub response_header: ResponseHeader,
    pub session_id: NodeId,
    pub authentication_token: NodeId,
    pub revised_session_timeout: f64,
    pub server_nonce: ByteString,
    pub server_certificate: ByteString,
    pub server_endpoints: Vec<ExtensionObject>,
    pub max_request_message_size: u32,
}

impl BinaryEncodable for CreateSessionResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
            + self.session_id.byte_len()
            + self.authentication_token.byte_len()
            + 8
            + self.server_nonce.byte_len()
            + self.server_certificate.byte_len()
            + array_byte_len(&self.server_endpoints)
            + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        self.session_id.encode(stream)?;
        self.authentication_token.encode(stream)?;
        self.revised_session_timeout.encode(stream)?;
        self.server_nonce.encode(stream)?;
        self.server_certificate.encode(stream)?;
        encode_array(&self.server_endpoints, stream)?;
        self.max_request_message_size.encode(stream)
    }
}

impl BinaryDecodable for CreateSessionResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CreateSessionResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            session_id: NodeId::decode(stream, options)?,
            authentication_token: NodeId::decode(stream, options)?,
            revised_session_timeout: f64::decode(stream, options)?,
            server_nonce: ByteString::decode(stream, options)?,
            server_certificate: ByteString::decode(stream, options)?,
            server_endpoints: decode_array(stream, options)?,
            max_request_message_size: u32::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivateSessionRequest {
    pub request_header: RequestHeader,
    pub client_signature_algorithm: UAString,
    pub client_signature: ByteString,
    pub client_software_certificates: Vec<ExtensionObject>,
    pub locale_ids: Vec<UAString>,
    pub user_identity_token: ExtensionObject,
    pub user_token_signature_algorithm: UAString,
    pub user_token_signature: ByteString,
}

impl BinaryEncodable for ActivateSessionRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
            + self.client_signature_algorithm.byte_len()
            + self.client_signature.byte_len()
            + array_byte_len(&self.client_software_certificates)
            + array_byte_len(&self.locale_ids)
            + self.user_identity_token.byte_len()
            + self.user_token_signature_algorithm.byte_len()
            + self.user_token_signature.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.client_signature_algorithm.encode(stream)?;
        self.client_signature.encode(stream)?;
        encode_array(&self.client_software_certificates, stream)?;
        encode_array(&self.locale_ids, stream)?;
        self.user_identity_token.encode(stream)?;
        self.user_token_signature_algorithm.encode(stream)?;
        self.user_token_signature.encode(stream)
    }
}

impl BinaryDecodable for ActivateSessionRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ActivateSessionRequest {
            request_header: RequestHeader::decode(stream, options)?,
            client_signature_algorithm: UAString::decode(stream, options)?,
            client_signature: ByteString::decode(stream, options)?,
            client_software_certificates: decode_array(stream, options)?,
            locale_ids: decode_array(stream, options)?,
            user_identity_token: ExtensionObject::decode(stream, options)?,
            user_token_signature_algorithm: UAString::decode(stream, options)?,
            user_token_signature: ByteString::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivateSessionResponse {
    pub response_header: ResponseHeader,
    pub server_nonce: ByteString,
    pub results: Vec<StatusCode>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for ActivateSessionResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
            + self.server_nonce.byte_len()
            + array_byte_len(&self.results)
            + array_byte_len(&self.diagnostic_infos)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        self.server_nonce.encode(stream)?;
        encode_array(&self.results, stream)?;
        encode_array(&self.diagnostic_infos, stream)
    }
}

impl BinaryDecodable for ActivateSessionResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ActivateSessionResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            server_nonce: ByteString::decode(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseSessionRequest {
    pub request_header: RequestHeader,
    pub delete_subscriptions: bool,
}

impl BinaryEncodable for CloseSessionRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + 1
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.delete_subscriptions.encode(stream)
    }
}

impl BinaryDecodable for CloseSessionRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CloseSessionRequest {
            request_header: RequestHeader::decode(stream, options)?,
            delete_subscriptions: bool::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseSessionResponse {
    pub response_header: ResponseHeader,
}

impl BinaryEncodable for CloseSessionResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)
    }
}

impl BinaryDecodable for CloseSessionResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CloseSessionResponse {
            response_header: ResponseHeader::decode(stream, options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn create_session_request_round_trip() {
        let options = DecodingOptions::default();
        let req = CreateSessionRequest {
            request_header: RequestHeader::new(1, 5000),
            client_description: ApplicationDescription {
                application_uri: UAString::from("urn:127.0.0.1:Company:MyAppl"),
                ..Default::default()
            },
            server_uri: UAString::null(),
            endpoint_url: UAString::from("opc.tcp://127.0.0.1:4841"),
            session_name: UAString::from("urn:127.0.0.1:Company:MyAppl"),
            client_nonce: ByteString::from(vec![0u8]),
            client_certificate: ByteString::null(),
            requested_session_timeout: 120_000.0,
            max_response_message_size: 0,
        };
        let mut buf = Vec::new();
        req.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(CreateSessionRequest::decode(&mut cursor, &options).unwrap(), req);
    }

    #[test]
    fn activate_session_request_round_trip_with_anonymous_token() {
        let options = DecodingOptions::default();
        let token = AnonymousIdentityToken {
            policy_id: UAString::from("Anonymous"),
        };
        let mut token_bytes = Vec::new();
        token.encode(&mut token_bytes).unwrap();
        let req = ActivateSessionRequest {
            request_header: RequestHeader::new(2, 5000),
            client_signature_algorithm: UAString::null(),
            client_signature: ByteString::null(),
            client_software_certificates: Vec::new(),
            locale_ids: vec![UAString::from("en")],
            user_identity_token: ExtensionObject::from_raw(NodeId::new(0, 1u32), token_bytes),
            user_token_signature_algorithm: UAString::null(),
            user_token_signature: ByteString::null(),
        };
        let mut buf = Vec::new();
        req.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(
            ActivateSessionRequest::decode(&mut cursor, &options).unwrap(),
            req
        );
    }
}
