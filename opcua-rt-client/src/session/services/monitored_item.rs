// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! MonitoredItem service set façade: CreateMonitoredItems, ModifyMonitoredItems,
//! DeleteMonitoredItems, SetMonitoringMode, SetTriggering.
//!
//! Registration and routing only — callers encode the operation-specific request body
//! themselves and get the raw response bytes back; none of these need bespoke behavior
//! beyond what `Session::send` already provides.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use opcua_types::{ids, Error, NodeId};

use super::RawBody;
use crate::session::Session;

pub struct MonitoredItemServiceSet;

impl MonitoredItemServiceSet {
    pub fn send_create(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::CREATE_MONITORED_ITEMS_REQUEST),
            NodeId::new(0, ids::CREATE_MONITORED_ITEMS_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_create_sync(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
    ) -> Result<(Vec<u8>, Receiver<Result<Vec<u8>, Error>>), Error> {
        super::send_sync(
            session,
            NodeId::new(0, ids::CREATE_MONITORED_ITEMS_REQUEST),
            NodeId::new(0, ids::CREATE_MONITORED_ITEMS_RESPONSE),
            &RawBody(request_bytes),
            timeout,
        )
    }

    pub fn send_modify(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::MODIFY_MONITORED_ITEMS_REQUEST),
            NodeId::new(0, ids::MODIFY_MONITORED_ITEMS_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_delete(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::DELETE_MONITORED_ITEMS_REQUEST),
            NodeId::new(0, ids::DELETE_MONITORED_ITEMS_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_set_monitoring_mode(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::SET_MONITORING_MODE_REQUEST),
            NodeId::new(0, ids::SET_MONITORING_MODE_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_set_triggering(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::SET_TRIGGERING_REQUEST),
            NodeId::new(0, ids::SET_TRIGGERING_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }
}
