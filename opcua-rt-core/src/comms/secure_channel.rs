// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `SecureChannel`: the per-connection transport state — channel id, active security token,
//! sequence numbering, and the OPN/CLO request/response lifecycle around it.

use opcua_types::service_types::secure_channel::{
    ChannelSecurityToken, CloseSecureChannelRequest, CloseSecureChannelResponse,
    MessageSecurityMode, OpenSecureChannelRequest, OpenSecureChannelResponse,
    SecurityTokenRequestType,
};
use opcua_types::service_types::headers::{RequestHeader, ResponseHeader};
use opcua_types::service_types::secure_channel::security_policy;
use opcua_types::{ByteString, Error, StatusCode};

/// Lifecycle states of a `SecureChannel`, independent of the `Session` layered on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecureChannelState {
    Closed,
    Connecting,
    Open,
}

/// Transport-level failures distinct from a decoded `BadXxx` service result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChannelError {
    #[error("secure channel is closed")]
    ChannelClosed,
    #[error("chunk sequence number out of order")]
    SequenceNumberMismatch,
    #[error("message exceeds the negotiated maximum size")]
    MessageTooLarge,
    #[error("secure channel timed out waiting for a response")]
    ChannelTimeout,
}

/// The client side of an OPC UA secure channel: negotiation state plus the bookkeeping
/// needed to frame outgoing chunks and validate incoming ones.
///
/// Only `MessageSecurityMode::None` is implemented; `security_mode` and `security_policy_uri`
/// are carried through the state machine so a future signed/encrypted mode has somewhere to
/// plug in, but no cryptographic operations are performed.
#[derive(Debug)]
pub struct SecureChannel {
    state: SecureChannelState,
    channel_id: u32,
    security_mode: MessageSecurityMode,
    security_policy_uri: String,
    token: Option<ChannelSecurityToken>,
    next_sequence_number: u32,
    next_request_id: u32,
    request_handle_counter: u32,
}

impl Default for SecureChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureChannel {
    pub fn new() -> Self {
        SecureChannel {
            state: SecureChannelState::Closed,
            channel_id: 0,
            security_mode: MessageSecurityMode::None,
            security_policy_uri: security_policy::NONE.to_string(),
            token: None,
            next_sequence_number: 1,
            next_request_id: 1,
            request_handle_counter: 0,
        }
    }

    pub fn state(&self) -> SecureChannelState {
        self.state
    }

    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    pub fn current_token_id(&self) -> Option<u32> {
        self.token.as_ref().map(|t| t.token_id)
    }

    /// The next sequence number to stamp on an outgoing chunk, advancing the counter.
    pub fn take_sequence_number(&mut self) -> u32 {
        let n = self.next_sequence_number;
        self.next_sequence_number = self.next_sequence_number.wrapping_add(1);
        n
    }

    /// The next request id to stamp on an outgoing message, advancing the counter.
    pub fn take_request_id(&mut self) -> u32 {
        let n = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        n
    }

    /// The next request handle for a new service call's `RequestHeader`, advancing the
    /// counter. Distinct from `request_id`: the handle is application-level and chosen by
    /// the Session, while `request_id` tags the secure-channel message itself.
    pub fn take_request_handle(&mut self) -> u32 {
        self.request_handle_counter = self.request_handle_counter.wrapping_add(1);
        self.request_handle_counter
    }

    /// Build an `OpenSecureChannelRequest` to establish a brand new channel.
    pub fn build_open_request(&mut self, requested_lifetime: u32, client_nonce: ByteString) -> OpenSecureChannelRequest {
        self.state = SecureChannelState::Connecting;
        OpenSecureChannelRequest {
            request_header: RequestHeader::new(self.take_request_handle(), 10_000),
            client_protocol_version: 0,
            request_type: SecurityTokenRequestType::Issue,
            security_mode: self.security_mode,
            client_nonce,
            requested_lifetime,
        }
    }

    /// Build an `OpenSecureChannelRequest` that renews the token on an already-open channel.
    pub fn build_renew_request(&mut self, requested_lifetime: u32, client_nonce: ByteString) -> Result<OpenSecureChannelRequest, Error> {
        if self.state != SecureChannelState::Open {
            return Err(Error::new(StatusCode::BadInvalidState, "cannot renew a channel that is not open"));
        }
        Ok(OpenSecureChannelRequest {
            request_header: RequestHeader::new(self.take_request_handle(), 10_000),
            client_protocol_version: 0,
            request_type: SecurityTokenRequestType::Renew,
            security_mode: self.security_mode,
            client_nonce,
            requested_lifetime,
        })
    }

    /// Apply a server's `OpenSecureChannelResponse`, adopting its channel id and token.
    pub fn apply_open_response(&mut self, response: &OpenSecureChannelResponse) -> Result<(), Error> {
        if !response.response_header.service_result.is_good() {
            self.state = SecureChannelState::Closed;
            return Err(Error::new(
                response.response_header.service_result,
                "server rejected OpenSecureChannelRequest",
            ));
        }
        self.channel_id = response.security_token.channel_id;
        self.token = Some(response.security_token.clone());
        self.state = SecureChannelState::Open;
        Ok(())
    }

    pub fn build_close_request(&mut self) -> CloseSecureChannelRequest {
        CloseSecureChannelRequest {
            request_header: RequestHeader::new(self.take_request_handle(), 10_000),
        }
    }

    pub fn apply_close_response(&mut self, _response: &CloseSecureChannelResponse) {
        self.state = SecureChannelState::Closed;
        self.token = None;
    }

    /// Validate that `response_header.service_result` is Good, producing a `ChannelError`
    /// classification where the status maps onto one.
    pub fn classify(result: StatusCode) -> Option<ChannelError> {
        match result {
            StatusCode::BadSecureChannelClosed => Some(ChannelError::ChannelClosed),
            StatusCode::BadSequenceNumberInvalid => Some(ChannelError::SequenceNumberMismatch),
            StatusCode::BadRequestTooLarge | StatusCode::BadResponseTooLarge => Some(ChannelError::MessageTooLarge),
            StatusCode::BadTimeout => Some(ChannelError::ChannelTimeout),
            _ => None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_round_trips_state() {
        let mut channel = SecureChannel::new();
        assert_eq!(channel.state(), SecureChannelState::Closed);
        let _req = channel.build_open_request(3_600_000, ByteString::from(vec![0u8]));
        assert_eq!(channel.state(), SecureChannelState::Connecting);

        let response = OpenSecureChannelResponse {
            response_header: ResponseHeader::new(1, StatusCode::Good),
            server_protocol_version: 0,
            security_token: ChannelSecurityToken {
                channel_id: 7,
                token_id: 1,
                created_at: opcua_types::UtcTime::now(),
                revised_lifetime: 3_600_000,
            },
            server_nonce: ByteString::from(vec![0u8]),
        };
        channel.apply_open_response(&response).unwrap();
        assert_eq!(channel.state(), SecureChannelState::Open);
        assert_eq!(channel.channel_id(), 7);
        assert_eq!(channel.current_token_id(), Some(1));

        let _close_req = channel.build_close_request();
        channel.apply_close_response(&CloseSecureChannelResponse {
            response_header: ResponseHeader::new(2, StatusCode::Good),
        });
        assert_eq!(channel.state(), SecureChannelState::Closed);
    }

    #[test]
    fn renew_requires_an_open_channel() {
        let mut channel = SecureChannel::new();
        assert!(channel.build_renew_request(3_600_000, ByteString::null()).is_err());
    }

    #[test]
    fn sequence_numbers_strictly_ascend() {
        let mut channel = SecureChannel::new();
        let a = channel.take_sequence_number();
        let b = channel.take_sequence_number();
        assert_eq!(b, a + 1);
    }
}
