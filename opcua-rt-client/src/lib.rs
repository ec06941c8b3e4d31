// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Session state machine, service sets, and node-set builder for the OPC UA core (L4-L7),
//! layered above the secure channel in `opcua-rt-core`.

pub mod node_set_builder;
pub mod session;

pub use node_set_builder::{NodeSetBuilder, Transport};
pub use session::services::attribute::AttributeServiceSet;
pub use session::services::method::MethodServiceSet;
pub use session::services::monitored_item::MonitoredItemServiceSet;
pub use session::services::node_management::NodeManagementServiceSet;
pub use session::services::subscription::SubscriptionServiceSet;
pub use session::services::view::ViewServiceSet;
pub use session::{Completion, DispatchOutcome, PendingTable, PendingTransaction, ServiceComponent, Session, SessionState};
