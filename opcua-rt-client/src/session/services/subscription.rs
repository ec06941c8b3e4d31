// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Subscription service set façade: CreateSubscription, Publish, Republish.
//!
//! Registration and routing only, per the same thin-stub rationale as
//! [`super::monitored_item`].

use std::sync::mpsc::Receiver;
use std::time::Duration;

use opcua_types::{ids, Error, NodeId};

use super::RawBody;
use crate::session::Session;

pub struct SubscriptionServiceSet;

impl SubscriptionServiceSet {
    pub fn send_create(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::CREATE_SUBSCRIPTION_REQUEST),
            NodeId::new(0, ids::CREATE_SUBSCRIPTION_RESPONSE),
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
            NodeId::new(0, ids::CREATE_SUBSCRIPTION_REQUEST),
            NodeId::new(0, ids::CREATE_SUBSCRIPTION_RESPONSE),
            &RawBody(request_bytes),
            timeout,
        )
    }

    pub fn send_publish(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::PUBLISH_REQUEST),
            NodeId::new(0, ids::PUBLISH_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }

    pub fn send_republish(
        session: &mut Session,
        request_bytes: Vec<u8>,
        timeout: Duration,
        on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
    ) -> Result<Vec<u8>, Error> {
        super::send(
            session,
            NodeId::new(0, ids::REPUBLISH_REQUEST),
            NodeId::new(0, ids::REPUBLISH_RESPONSE),
            &RawBody(request_bytes),
            timeout,
            on_complete,
        )
    }
}
