// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `SessionState`: the session-level state machine layered above a `SecureChannel`.

/// The lifecycle of a `Session`, independent of the `SecureChannel` carrying it.
///
/// Every outbound operation except `createSession` requires the state it documents itself
/// as valid in; anything else is rejected with `BadInvalidState` and leaves the state
/// unchanged (see `Session::transition_error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    ConnectingToSecureChannel,
    ConnectedToSecureChannel,
    SendCreateSession,
    ReceiveCreateSession,
    SendActivateSession,
    ReceiveActivateSession,
}

impl SessionState {
    /// `true` once the session has a usable authentication token and can carry ordinary
    /// service transactions.
    pub fn is_activated(self) -> bool {
        matches!(self, SessionState::ReceiveActivateSession)
    }
}
