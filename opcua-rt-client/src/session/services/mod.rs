// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Service set façades: one thin wrapper per OPC UA service family, each routing through
//! [`Session::send`] rather than touching the wire or the pending table directly.
//!
//! Every façade exposes the same three operations: `send` (fire-and-forget, completion runs
//! on whichever thread routes the response), `send_sync` (hands back a `Receiver` the caller
//! blocks on from a non-reactor thread), and a `decode_*` helper `receive` uses to turn the
//! routed bytes back into a typed response.

pub mod attribute;
pub mod method;
pub mod monitored_item;
pub mod node_management;
pub mod subscription;
pub mod view;

use std::io::Write;
use std::sync::mpsc::{sync_channel, Receiver};
use std::time::Duration;

use opcua_types::service_types::headers::RequestHeader;
use opcua_types::{BinaryEncodable, EncodingResult, Error, NodeId};

use crate::session::{Completion, Session};

/// A request body already encoded by the caller. The thin stub service sets (MonitoredItem,
/// Subscription, Method, NodeManagement) use this instead of a typed struct per operation,
/// since only the registration/routing mechanism is in scope for them, not bespoke behavior.
pub struct RawBody(pub Vec<u8>);

impl BinaryEncodable for RawBody {
    fn byte_len(&self) -> usize {
        self.0.len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        stream
            .write_all(&self.0)
            .map_err(|e| Error::encoding(format!("writing raw body: {e}")))
    }
}

/// Encode `request` and register a fire-and-forget completion with `Session`.
pub(crate) fn send<Req: BinaryEncodable>(
    session: &mut Session,
    request_type_id: NodeId,
    response_type_id: NodeId,
    request: &Req,
    timeout: Duration,
    on_complete: impl FnOnce(Result<Vec<u8>, Error>) + Send + 'static,
) -> Result<Vec<u8>, Error> {
    let (bytes, _handle) = session.send(
        request_type_id,
        response_type_id,
        RequestHeader::new(0, timeout.as_millis() as u32),
        request,
        timeout,
        Completion::Async(Box::new(on_complete)),
    )?;
    Ok(bytes)
}

/// Encode `request` and register a sync completion. Returns the bytes to transmit plus the
/// receiver the caller blocks on (from a non-reactor thread) once those bytes are on the wire.
pub(crate) fn send_sync<Req: BinaryEncodable>(
    session: &mut Session,
    request_type_id: NodeId,
    response_type_id: NodeId,
    request: &Req,
    timeout: Duration,
) -> Result<(Vec<u8>, Receiver<Result<Vec<u8>, Error>>), Error> {
    let (tx, rx) = sync_channel(1);
    let (bytes, _handle) = session.send(
        request_type_id,
        response_type_id,
        RequestHeader::new(0, timeout.as_millis() as u32),
        request,
        timeout,
        Completion::Sync(tx),
    )?;
    Ok((bytes, rx))
}
