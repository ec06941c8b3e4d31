// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! NodeManagement service set façade: AddNodes, AddReferences, DeleteNodes, DeleteReferences.
//!
//! Registration and routing only, per the same thin-stub rationale as
//! [`super::monitored_item`].

use std::time::Duration;

use opcua_types::{ids, Error, NodeId};

use super::RawBody;
use crate::session::Session;

pub struct NodeManagementServiceSet;

impl NodeManagementServiceSet {
    pub fn send_add_nodes(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::ADD_NODES_REQUEST),
            NodeId::new(0, ids::ADD_NODES_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_add_references(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::ADD_REFERENCES_REQUEST),
            NodeId::new(0, ids::ADD_REFERENCES_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_delete_nodes(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::DELETE_NODES_REQUEST),
            NodeId::new(0, ids::DELETE_NODES_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_delete_references(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::DELETE_REFERENCES_REQUEST),
            NodeId::new(0, ids::DELETE_REFERENCES_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }
}
