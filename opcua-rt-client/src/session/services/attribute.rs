// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Attribute service set façade: Read and Write.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use opcua_types::service_types::attribute::{ReadRequest, ReadResponse, WriteRequest, WriteResponse};
use opcua_types::{ids, BinaryDecodable, DecodingOptions, Error, NodeId};

use crate::session::Session;

pub struct AttributeServiceSet;

impl AttributeServiceSet {
    pub fn send_read(
        session: &mut Session,
        request: ReadRequest,
        timeout: Duration,
        on_complete: impl FnOnce(Result<ReadResponse, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::READ_REQUEST),
            NodeId::new(0, ids::READ_RESPONSE),
            &request,
            timeout,
            move |result| on_complete(result.and_then(|bytes| Self::decode_read_response(&bytes))),
        )
    }

    pub fn send_read_sync(
        session: &mut Session,
        request: ReadRequest,
        timeout: Duration,
    ) -> Result<(Vec<u8>, Receiver<Result<Vec<u8>, Error>>), Error> {
        super::send_sync(
            session,
            NodeId::new(0, ids::READ_REQUEST),
            NodeId::new(0, ids::READ_RESPONSE),
            &request,
            timeout,
        )
    }

    pub fn decode_read_response(bytes: &[u8]) -> Result<ReadResponse, Error> {
        let options = DecodingOptions::default();
        let mut cursor = std::io::Cursor::new(bytes);
        ReadResponse::decode(&mut cursor, &options)
    }

    pub fn send_write(
        session: &mut Session,
        request: WriteRequest,
        timeout: Duration,
        on_complete: impl FnOnce(Result<WriteResponse, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::WRITE_REQUEST),
            NodeId::new(0, ids::WRITE_RESPONSE),
            &request,
            timeout,
            move |result| on_complete(result.and_then(|bytes| Self::decode_write_response(&bytes))),
        )
    }

    pub fn send_write_sync(
        session: &mut Session,
        request: WriteRequest,
        timeout: Duration,
    ) -> Result<(Vec<u8>, Receiver<Result<Vec<u8>, Error>>), Error> {
        super::send_sync(
            session,
            NodeId::new(0, ids::WRITE_REQUEST),
            NodeId::new(0, ids::WRITE_RESPONSE),
            &request,
            timeout,
        )
    }

    pub fn decode_write_response(bytes: &[u8]) -> Result<WriteResponse, Error> {
        let options = DecodingOptions::default();
        let mut cursor = std::io::Cursor::new(bytes);
        WriteResponse::decode(&mut cursor, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_types::service_types::attribute::{ReadValueId, TimestampsToReturn};
    use opcua_types::service_types::headers::ResponseHeader;
    use opcua_types::{BinaryEncodable, DataValue, StatusCode, Variant};

    #[test]
    fn read_sync_round_trips_through_session_dispatch() {
        let mut session = crate::session::tests_support::activated_session();
        let request = ReadRequest {
            request_header: opcua_types::service_types::headers::RequestHeader::new(0, 3000),
            max_age: 0.0,
            timestamps_to_return: TimestampsToReturn::Both,
            nodes_to_read: vec![ReadValueId::value_of(NodeId::new(0, ids::ROOT_FOLDER_NODE_ID))],
        };
        let (_bytes, rx) = AttributeServiceSet::send_read_sync(&mut session, request, Duration::from_secs(1)).unwrap();

        let response = ReadResponse {
            response_header: ResponseHeader::new(1, StatusCode::Good),
            results: vec![DataValue::new_now(Variant::Int32(42))],
            diagnostic_infos: Vec::new(),
        };
        let mut wire = Vec::new();
        NodeId::new(0, ids::READ_RESPONSE).encode(&mut wire).unwrap();
        response.encode(&mut wire).unwrap();
        session.on_message(&wire).unwrap();

        let bytes = rx.recv().unwrap().unwrap();
        let decoded = AttributeServiceSet::decode_read_response(&bytes).unwrap();
        assert_eq!(decoded.results[0].value, Some(Variant::Int32(42)));
    }
}
