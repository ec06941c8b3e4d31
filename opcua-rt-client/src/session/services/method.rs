// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Method service set façade: Call.
//!
//! Registration and routing only, per the same thin-stub rationale as
//! [`super::monitored_item`].

use std::sync::mpsc::Receiver;
use std::time::Duration;

use opcua_types::{ids, Error, NodeId};

use super::RawBody;
use crate::session::Session;

pub struct MethodServiceSet;

impl MethodServiceSet {
    pub fn send_call(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::CALL_REQUEST),
            NodeId::new(0, ids::CALL_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_call_sync(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
    ) -> Result<(Vec<u8>, Receiver<Result<Vec<u8>, Error>>), Error> {
        super::send_sync(
            session,
            NodeId::new(0, ids::CALL_REQUEST),
            NodeId::new(0, ids::CALL_RESPONSE),
            &RawBody(request_bytes),
            timeout,
        )
    }
}
