// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! View service set façade: Browse, BrowseNext, and TranslateBrowsePaths.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use opcua_types::service_types::subscription::{
    TranslateBrowsePathsToNodeIdsRequest, TranslateBrowsePathsToNodeIdsResponse,
};
use opcua_types::service_types::view::{BrowseNextRequest, BrowseNextResponse, BrowseRequest, BrowseResponse};
use opcua_types::{ids, BinaryDecodable, DecodingOptions, Error, NodeId};

use crate::session::Session;

pub struct ViewServiceSet;

impl ViewServiceSet {
    pub fn send_browse(
        session: &mut Session,
        request: BrowseRequest,
        timeout: Duration,
        on_complete: impl FnOnce(Result<BrowseResponse, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::BROWSE_REQUEST),
            NodeId::new(0, ids::BROWSE_RESPONSE),
            &request,
            timeout,
            move |result| on_complete(result.and_then(|bytes| Self::decode_browse_response(&bytes))),
        )
    }

    pub fn send_browse_sync(
        session: &mut Session,
        request: BrowseRequest,
        timeout: Duration,
    ) -> Result<(Vec<u8>, Receiver<Result<Vec<u8>, Error>>), Error> {
        super::send_sync(
            session,
            NodeId::new(0, ids::BROWSE_REQUEST),
            NodeId::new(0, ids::BROWSE_RESPONSE),
            &request,
            timeout,
        )
    }

    pub fn decode_browse_response(bytes: &[u8]) -> Result<BrowseResponse, Error> {
        let options = DecodingOptions::default();
        let mut cursor = std::io::Cursor::new(bytes);
        BrowseResponse::decode(&mut cursor, &options)
    }

    pub fn send_browse_next(
        session: &mut Session,
        request: BrowseNextRequest,
        timeout: Duration,
        on_complete: impl FnOnce(Result<BrowseNextResponse, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::BROWSE_NEXT_REQUEST),
            NodeId::new(0, ids::BROWSE_NEXT_RESPONSE),
            &request,
            timeout,
            move |result| on_complete(result.and_then(|bytes| Self::decode_browse_next_response(&bytes))),
        )
    }

    pub fn decode_browse_next_response(bytes: &[u8]) -> Result<BrowseNextResponse, Error> {
        let options = DecodingOptions::default();
        let mut cursor = std::io::Cursor::new(bytes);
        BrowseNextResponse::decode(&mut cursor, &options)
    }

    pub fn send_translate_browse_paths(
        session: &mut Session,
        request: TranslateBrowsePathsToNodeIdsRequest,
        timeout: Duration,
        on_complete: impl FnOnce(Result<TranslateBrowsePathsToNodeIdsResponse, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::TRANSLATE_BROWSE_PATHS_TO_NODE_IDS_REQUEST),
            NodeId::new(0, ids::TRANSLATE_BROWSE_PATHS_TO_NODE_IDS_RESPONSE),
            &request,
            timeout,
            move |result| on_complete(result.and_then(|bytes| Self::decode_translate_browse_paths_response(&bytes))),
        )
    }

    pub fn decode_translate_browse_paths_response(bytes: &[u8]) -> Result<TranslateBrowsePathsToNodeIdsResponse, Error> {
        let options = DecodingOptions::default();
        let mut cursor = std::io::Cursor::new(bytes);
        TranslateBrowsePathsToNodeIdsResponse::decode(&mut cursor, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_types::service_types::headers::ResponseHeader;
    use opcua_types::service_types::view::BrowseDescription;
    use opcua_types::{BinaryEncodable, StatusCode};

    #[test]
    fn s3_browse_sync_round_trips_through_session_dispatch() {
        let mut session = crate::session::tests_support::activated_session();
        let request = BrowseRequest {
            request_header: opcua_types::service_types::headers::RequestHeader::new(0, 3000),
            view_id: NodeId::null(),
            requested_max_references_per_node: 0,
            nodes_to_browse: vec![BrowseDescription::forward_hierarchical(NodeId::new(
                0,
                ids::ROOT_FOLDER_NODE_ID,
            ))],
        };
        let (_bytes, rx) = ViewServiceSet::send_browse_sync(&mut session, request, Duration::from_secs(1)).unwrap();

        let response = BrowseResponse {
            response_header: ResponseHeader::new(1, StatusCode::Good),
            results: Vec::new(),
            diagnostic_infos: Vec::new(),
        };
        let mut wire = Vec::new();
        NodeId::new(0, ids::BROWSE_RESPONSE).encode(&mut wire).unwrap();
        response.encode(&mut wire).unwrap();
        session.on_message(&wire).unwrap();

        let bytes = rx.recv().unwrap().unwrap();
        let decoded = ViewServiceSet::decode_browse_response(&bytes).unwrap();
        assert!(decoded.results.is_empty());
    }
}
