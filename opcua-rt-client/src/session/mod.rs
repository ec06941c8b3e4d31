// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `Session`: the request/response correlation engine layered above a `SecureChannel`.

pub mod pending;
pub mod services;
pub mod state;

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use opcua_types::service_types::session::{
    ActivateSessionRequest, ActivateSessionResponse, AnonymousIdentityToken, ApplicationDescription,
    CreateSessionRequest, CreateSessionResponse,
};
use opcua_types::service_types::headers::RequestHeader;
use opcua_types::{
    ids, BinaryDecodable, BinaryEncodable, ByteString, DecodingOptions, Error, ExtensionObject, LocalizedText,
    NodeId, UAString,
};

pub use pending::{Completion, PendingTable, PendingTransaction};
pub use state::SessionState;

/// Default time a caller's transaction may wait before being completed with `BadTimeout`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// A typed callback invoked when an incoming `typeId` has no registered pending transaction,
/// e.g. a server-initiated notification a `ServiceSet` wants to see regardless of handle.
pub type ServiceComponent = Box<dyn Fn(&NodeId, &[u8]) + Send>;

/// What happened to a just-decoded incoming message.
pub enum DispatchOutcome {
    /// Consumed internally by the create/activate session handshake.
    HandledByStateMachine,
    /// Routed to the pending transaction waiting on this `requestHandle`, with the bytes of
    /// the response struct (starting at its `ResponseHeader` field) handed to its completion.
    RoutedToPending,
    /// No pending transaction matched; forwarded to a type-registered component if one
    /// exists for `typeId`, otherwise logged and discarded.
    Forwarded,
    Discarded,
}

/// The session-level state machine: owns the pending-transaction table and the
/// authentication token that, once obtained, stamps every subsequent request.
pub struct Session {
    state: SessionState,
    endpoint_url: UAString,
    session_name: UAString,
    requested_session_timeout: f64,
    authentication_token: NodeId,
    next_request_handle: u32,
    pending: PendingTable,
    registered_services: HashMap<NodeId, ServiceComponent>,
    awaiting_create_session: Option<u32>,
    awaiting_activate_session: Option<u32>,
}

impl Session {
    pub fn new(endpoint_url: impl Into<UAString>, session_name: impl Into<UAString>) -> Self {
        Session {
            state: SessionState::Closed,
            endpoint_url: endpoint_url.into(),
            session_name: session_name.into(),
            requested_session_timeout: 120_000.0,
            authentication_token: NodeId::null(),
            next_request_handle: 0,
            pending: PendingTable::new(),
            registered_services: HashMap::new(),
            awaiting_create_session: None,
            awaiting_activate_session: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn authentication_token(&self) -> &NodeId {
        &self.authentication_token
    }

    fn next_handle(&mut self) -> u32 {
        self.next_request_handle = self.next_request_handle.wrapping_add(1);
        self.next_request_handle
    }

    fn invalid_state(&self, operation: &str) -> Error {
        Error::new(
            opcua_types::StatusCode::BadInvalidState,
            format!("{operation} is not valid in state {:?}", self.state),
        )
    }

    /// Valid only in `Closed`. Transitions to `ConnectingToSecureChannel`; the caller is
    /// responsible for actually asking its transport to connect.
    pub fn create_session(&mut self) -> Result<(), Error> {
        if self.state != SessionState::Closed {
            return Err(self.invalid_state("createSession"));
        }
        self.state = SessionState::ConnectingToSecureChannel;
        Ok(())
    }

    /// `onChannelConnected`: valid only in `ConnectingToSecureChannel`. Builds the
    /// `CreateSessionRequest` and transitions to `SendCreateSession`.
    pub fn on_channel_connected(&mut self) -> Result<(NodeId, CreateSessionRequest), Error> {
        if self.state != SessionState::ConnectingToSecureChannel {
            return Err(self.invalid_state("onChannelConnected"));
        }
        let handle = self.next_handle();
        self.awaiting_create_session = Some(handle);
        self.state = SessionState::SendCreateSession;

        let request = CreateSessionRequest {
            request_header: RequestHeader::new(handle, 10_000),
            client_description: ApplicationDescription {
                application_uri: UAString::from("urn:127.0.0.1:Company:MyAppl"),
                product_uri: UAString::from("urn:127.0.0.1:Company:MyAppl:Product"),
                application_name: LocalizedText::new("en", "MyAppl"),
                application_type: 0,
                gateway_server_uri: UAString::null(),
                discovery_profile_uri: UAString::null(),
                discovery_urls: Vec::new(),
            },
            server_uri: UAString::null(),
            endpoint_url: self.endpoint_url.clone(),
            session_name: self.session_name.clone(),
            client_nonce: ByteString::from(vec![0u8]),
            client_certificate: ByteString::null(),
            requested_session_timeout: self.requested_session_timeout,
            max_response_message_size: 1 << 24,
        };
        Ok((NodeId::new(0, ids::CREATE_SESSION_REQUEST), request))
    }

    /// Valid only in `ReceiveCreateSession`. Builds `ActivateSessionRequest` with an
    /// anonymous identity token and transitions to `SendActivateSession`.
    pub fn activate_session(&mut self, locale_ids: Vec<UAString>, policy_id: impl Into<UAString>) -> Result<(NodeId, ActivateSessionRequest), Error> {
        if self.state != SessionState::ReceiveCreateSession {
            return Err(self.invalid_state("activateSession"));
        }
        let handle = self.next_handle();
        self.awaiting_activate_session = Some(handle);
        self.state = SessionState::SendActivateSession;

        let identity_token = AnonymousIdentityToken {
            policy_id: policy_id.into(),
        };
        let mut token_bytes = Vec::with_capacity(identity_token.byte_len());
        identity_token
            .encode(&mut token_bytes)
            .expect("encoding an in-memory AnonymousIdentityToken cannot fail");

        let mut request_header = RequestHeader::new(handle, 10_000);
        request_header.authentication_token = self.authentication_token.clone();

        let request = ActivateSessionRequest {
            request_header,
            client_signature_algorithm: UAString::null(),
            client_signature: ByteString::null(),
            client_software_certificates: Vec::new(),
            locale_ids,
            user_identity_token: ExtensionObject::from_raw(NodeId::new(0, 0u32), token_bytes),
            user_token_signature_algorithm: UAString::null(),
            user_token_signature: ByteString::null(),
        };
        Ok((NodeId::new(0, ids::ACTIVATE_SESSION_REQUEST), request))
    }

    /// Valid only once activated. Encodes `request` with a fresh `requestHandle`, registers
    /// the pending transaction with `timeout`, and returns the bytes ready to send.
    pub fn send<Req: BinaryEncodable>(
        &mut self,
        request_type_id: NodeId,
        response_type_id: NodeId,
        mut request_header: RequestHeader,
        request: &Req,
        timeout: Duration,
        completion: Completion,
    ) -> Result<(Vec<u8>, u32), Error> {
        if !self.state.is_activated() {
            return Err(self.invalid_state("send"));
        }
        let handle = self.next_handle();
        request_header.request_handle = handle;
        request_header.authentication_token = self.authentication_token.clone();

        let mut bytes = Vec::new();
        request_type_id
            .encode(&mut bytes)
            .map_err(|e| Error::encoding(format!("encoding request type id: {e}")))?;
        request_header.encode(&mut bytes)?;
        request.encode(&mut bytes)?;

        self.pending.insert(PendingTransaction {
            request_handle: handle,
            response_type_id,
            deadline: Instant::now() + timeout,
            completion,
        });
        Ok((bytes, handle))
    }

    /// Register an upstream component for unmatched `typeId`s (e.g. push-style
    /// notifications). Fails with `BadNodeIdExists` on a duplicate registration.
    pub fn register_service(&mut self, type_id: NodeId, component: ServiceComponent) -> Result<(), Error> {
        if self.registered_services.contains_key(&type_id) {
            return Err(Error::new(
                opcua_types::StatusCode::BadNodeIdExists,
                format!("a component is already registered for {type_id}"),
            ));
        }
        self.registered_services.insert(type_id, component);
        Ok(())
    }

    pub fn deregister_service(&mut self, type_id: &NodeId) {
        self.registered_services.remove(type_id);
    }

    /// `onMessage`: decode the leading `typeId` and route the rest of `bytes` accordingly.
    pub fn on_message(&mut self, bytes: &[u8]) -> Result<DispatchOutcome, Error> {
        let options = DecodingOptions::default();
        let mut cursor = Cursor::new(bytes);
        let type_id = NodeId::decode(&mut cursor, &options)?;
        let body_start = cursor.position();

        if type_id == NodeId::new(0, ids::CREATE_SESSION_RESPONSE) {
            return self.handle_create_session_response(&mut cursor, &options);
        }
        if type_id == NodeId::new(0, ids::ACTIVATE_SESSION_RESPONSE) {
            return self.handle_activate_session_response(&mut cursor, &options);
        }

        let header_for_handle = {
            let mut peek = Cursor::new(&bytes[body_start as usize..]);
            opcua_types::service_types::headers::ResponseHeader::decode(&mut peek, &options)?
        };
        cursor.seek(SeekFrom::Start(body_start)).ok();
        let mut remaining = Vec::new();
        cursor
            .read_to_end(&mut remaining)
            .map_err(|e| Error::decoding(format!("read error: {e}")))?;

        match self.pending.pop(header_for_handle.request_handle) {
            Some(tx) => {
                if type_id != tx.response_type_id {
                    let err = Error::new(
                        opcua_types::StatusCode::BadDecodingError,
                        format!(
                            "request handle {} expected response type {} but got {type_id}",
                            header_for_handle.request_handle, tx.response_type_id
                        ),
                    );
                    tx.completion.complete(Err(err.clone()));
                    return Err(err);
                }
                tx.completion.complete(Ok(remaining));
                Ok(DispatchOutcome::RoutedToPending)
            }
            None => {
                if let Some(component) = self.registered_services.get(&type_id) {
                    component(&type_id, &remaining);
                    Ok(DispatchOutcome::Forwarded)
                } else {
                    log::debug!("discarding message with unroutable type id {type_id}");
                    Ok(DispatchOutcome::Discarded)
                }
            }
        }
    }

    fn handle_create_session_response<S: Read>(
        &mut self,
        cursor: &mut S,
        options: &DecodingOptions,
    ) -> Result<DispatchOutcome, Error> {
        if self.state != SessionState::SendCreateSession {
            return Err(self.invalid_state("CreateSessionResponse"));
        }
        let response = CreateSessionResponse::decode(cursor, options)?;
        self.awaiting_create_session = None;
        if !response.response_header.service_result.is_good() {
            self.state = SessionState::ConnectedToSecureChannel;
            return Err(Error::new(response.response_header.service_result, "CreateSession failed"));
        }
        self.authentication_token = response.authentication_token;
        self.state = SessionState::ReceiveCreateSession;
        Ok(DispatchOutcome::HandledByStateMachine)
    }

    fn handle_activate_session_response<S: Read>(
        &mut self,
        cursor: &mut S,
        options: &DecodingOptions,
    ) -> Result<DispatchOutcome, Error> {
        if self.state != SessionState::SendActivateSession {
            return Err(self.invalid_state("ActivateSessionResponse"));
        }
        let response = ActivateSessionResponse::decode(cursor, options)?;
        self.awaiting_activate_session = None;
        if !response.response_header.service_result.is_good() {
            self.state = SessionState::ReceiveCreateSession;
            return Err(Error::new(response.response_header.service_result, "ActivateSession failed"));
        }
        self.state = SessionState::ReceiveActivateSession;
        Ok(DispatchOutcome::HandledByStateMachine)
    }

    /// `onChannelDisconnected`: fail every pending transaction and return to `Closed`.
    pub fn on_channel_disconnected(&mut self) {
        self.pending.fail_all_channel_closed();
        self.state = SessionState::Closed;
    }

    /// Sweep the pending table for expired deadlines.
    pub fn sweep_timeouts(&mut self) -> Vec<u32> {
        self.pending.sweep_timeouts(Instant::now())
    }
}

/// Test-only constructors shared by this crate's `services` façade tests, which need a
/// `Session` already past the create/activate handshake without replaying it by hand.
#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    pub(crate) fn activated_session() -> Session {
        Session {
            state: SessionState::ReceiveActivateSession,
            endpoint_url: UAString::from("opc.tcp://127.0.0.1:4841"),
            session_name: UAString::from("test"),
            requested_session_timeout: 120_000.0,
            authentication_token: NodeId::new(0, 1001u32),
            next_request_handle: 0,
            pending: PendingTable::new(),
            registered_services: HashMap::new(),
            awaiting_create_session: None,
            awaiting_activate_session: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_types::StatusCode;
    use std::sync::mpsc::sync_channel;

    fn encode_response<B: BinaryEncodable>(type_id: NodeId, body: &B) -> Vec<u8> {
        let mut buf = Vec::new();
        type_id.encode(&mut buf).unwrap();
        body.encode(&mut buf).unwrap();
        buf
    }

    #[test]
    fn s1_create_and_activate_session_state_machine() {
        let mut session = Session::new("opc.tcp://127.0.0.1:4841", "urn:127.0.0.1:Company:MyAppl");
        session.create_session().unwrap();
        assert_eq!(session.state(), SessionState::ConnectingToSecureChannel);

        let (type_id, _request) = session.on_channel_connected().unwrap();
        assert_eq!(type_id, NodeId::new(0, ids::CREATE_SESSION_REQUEST));
        assert_eq!(session.state(), SessionState::SendCreateSession);

        let response = CreateSessionResponse {
            response_header: opcua_types::service_types::headers::ResponseHeader::new(1, StatusCode::Good),
            session_id: NodeId::new(0, 1000u32),
            authentication_token: NodeId::new(0, 1001u32),
            revised_session_timeout: 120_000.0,
            server_nonce: ByteString::from(vec![0u8]),
            server_certificate: ByteString::null(),
            server_endpoints: Vec::new(),
            max_request_message_size: 1 << 24,
        };
        let bytes = encode_response(NodeId::new(0, ids::CREATE_SESSION_RESPONSE), &response);
        matches!(session.on_message(&bytes).unwrap(), DispatchOutcome::HandledByStateMachine);
        assert_eq!(session.state(), SessionState::ReceiveCreateSession);
        assert_eq!(session.authentication_token(), &NodeId::new(0, 1001u32));

        let (type_id, activate_request) = session.activate_session(vec![UAString::from("en")], "Anonymous").unwrap();
        assert_eq!(type_id, NodeId::new(0, ids::ACTIVATE_SESSION_REQUEST));
        assert_eq!(activate_request.locale_ids, vec![UAString::from("en")]);
        assert_eq!(session.state(), SessionState::SendActivateSession);

        let activate_response = ActivateSessionResponse {
            response_header: opcua_types::service_types::headers::ResponseHeader::new(2, StatusCode::Good),
            server_nonce: ByteString::from(vec![0u8]),
            results: Vec::new(),
            diagnostic_infos: Vec::new(),
        };
        let bytes = encode_response(NodeId::new(0, ids::ACTIVATE_SESSION_RESPONSE), &activate_response);
        session.on_message(&bytes).unwrap();
        assert_eq!(session.state(), SessionState::ReceiveActivateSession);
        assert!(session.state().is_activated());
    }

    #[test]
    fn send_is_rejected_before_activation() {
        let mut session = Session::new("opc.tcp://127.0.0.1:4841", "test");
        let (sender, _receiver) = sync_channel(1);
        let result = session.send(
            NodeId::new(0, ids::READ_REQUEST),
            NodeId::new(0, ids::READ_RESPONSE),
            RequestHeader::new(0, 3000),
            &opcua_types::service_types::attribute::ReadRequest {
                request_header: RequestHeader::new(0, 3000),
                max_age: 0.0,
                timestamps_to_return: opcua_types::service_types::attribute::TimestampsToReturn::Both,
                nodes_to_read: Vec::new(),
            },
            DEFAULT_TIMEOUT,
            Completion::Sync(sender),
        );
        assert!(result.is_err());
    }

    #[test]
    fn response_type_mismatch_is_rejected_not_silently_routed() {
        let mut session = tests_support::activated_session();
        let (sender, receiver) = sync_channel(1);
        session.pending.insert(PendingTransaction {
            request_handle: 1,
            response_type_id: NodeId::new(0, ids::READ_RESPONSE),
            deadline: Instant::now() + Duration::from_secs(5),
            completion: Completion::Sync(sender),
        });

        let response = opcua_types::service_types::view::BrowseResponse {
            response_header: opcua_types::service_types::headers::ResponseHeader::new(1, StatusCode::Good),
            results: Vec::new(),
            diagnostic_infos: Vec::new(),
        };
        let bytes = encode_response(NodeId::new(0, ids::BROWSE_RESPONSE), &response);

        assert!(session.on_message(&bytes).is_err());
        assert!(receiver.recv().unwrap().is_err());
        assert!(session.pending.is_empty());
    }

    #[test]
    fn channel_disconnect_fails_pending_transactions() {
        let mut session = Session::new("opc.tcp://127.0.0.1:4841", "test");
        session.pending.insert(PendingTransaction {
            request_handle: 1,
            response_type_id: NodeId::new(0, ids::READ_RESPONSE),
            deadline: Instant::now() + Duration::from_secs(5),
            completion: Completion::Sync(sync_channel(1).0),
        });
        session.on_channel_disconnected();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.pending.is_empty());
    }
}
