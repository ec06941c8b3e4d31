// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Recursive Browse + Read orchestrator that materializes an `InformationModel` from a live
//! server, starting at the Root folder.

use std::collections::VecDeque;
use std::time::Duration;

use opcua_nodes::data_type::DataType;
use opcua_nodes::method::Method;
use opcua_nodes::node::{Node, NodeType};
use opcua_nodes::object::Object;
use opcua_nodes::object_type::ObjectType;
use opcua_nodes::reference_type::ReferenceType;
use opcua_nodes::variable::Variable;
use opcua_nodes::variable_type::VariableType;
use opcua_nodes::view::View;
use opcua_nodes::InformationModel;
use opcua_types::attribute_id::AttributeId;
use opcua_types::service_types::attribute::{ReadRequest, ReadValueId, TimestampsToReturn};
use opcua_types::service_types::headers::RequestHeader;
use opcua_types::service_types::view::{BrowseDescription, BrowseRequest, ReferenceDescription};
use opcua_types::{ids, Error, LocalizedText, NodeClass, NodeId, QualifiedName, UAString, Variant};

use crate::session::services::attribute::AttributeServiceSet;
use crate::session::services::view::ViewServiceSet;
use crate::session::Session;

/// The synchronous request/response exchange the builder drives a `Session` with. A real
/// implementation hands `request` to a socket and waits for the matching reply; tests wire up
/// an in-memory stand-in that loops a canned server straight back.
pub trait Transport {
    fn exchange(&mut self, request: Vec<u8>) -> Result<Vec<u8>, Error>;
}

/// Best-effort attributes to read and apply via `set_attribute` once the node exists. Values
/// the node class doesn't recognize, or that come back with a non-`Good` status, are logged
/// and skipped rather than failing the whole node.
fn post_construction_attributes(node_class: NodeClass) -> &'static [AttributeId] {
    // Description/WriteMask/UserWriteMask are common to every node class (handled generically
    // by `Base::set_attribute`), so every class's list carries them alongside its own.
    match node_class {
        NodeClass::Object => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::EventNotifier,
        ],
        NodeClass::Variable => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::ValueRank,
            AttributeId::ArrayDimensions,
            AttributeId::AccessLevel,
            AttributeId::UserAccessLevel,
            AttributeId::MinimumSamplingInterval,
            AttributeId::Historizing,
        ],
        NodeClass::Method => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::Executable,
            AttributeId::UserExecutable,
        ],
        NodeClass::ObjectType => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::IsAbstract,
        ],
        NodeClass::VariableType => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::Value,
            AttributeId::IsAbstract,
        ],
        NodeClass::ReferenceType => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::IsAbstract,
            AttributeId::InverseName,
        ],
        NodeClass::DataType => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::IsAbstract,
        ],
        NodeClass::View => &[
            AttributeId::Description,
            AttributeId::WriteMask,
            AttributeId::UserWriteMask,
            AttributeId::ContainsNoLoops,
            AttributeId::EventNotifier,
        ],
    }
}

/// Walks Browse/Read over a `Session` + `Transport` and returns the address space it found.
pub struct NodeSetBuilder<'a, T: Transport> {
    session: &'a mut Session,
    transport: &'a mut T,
    timeout: Duration,
}

impl<'a, T: Transport> NodeSetBuilder<'a, T> {
    pub fn new(session: &'a mut Session, transport: &'a mut T) -> Self {
        NodeSetBuilder {
            session,
            transport,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a complete address space by a recursive forward-hierarchical Browse from Root,
    /// starting from an empty model.
    pub fn build(mut self) -> Result<InformationModel, Error> {
        let mut model = InformationModel::empty();
        self.build_into(&mut model)?;
        Ok(model)
    }

    /// Walk Browse/Read from Root into `model`, which may already be populated. Re-invoking
    /// against a model a previous `build_into` (or `build`) already populated is benign: every
    /// node the traversal would re-discover hits `InformationModel::insert`'s `BadNodeIdExists`
    /// cycle terminator instead of being re-read or re-inserted.
    pub fn build_into(&mut self, model: &mut InformationModel) -> Result<(), Error> {
        let root_id = NodeId::new(0, ids::ROOT_FOLDER_NODE_ID);
        if model.find(&root_id).is_none() {
            model
                .insert(NodeType::Object(Object::new(root_id.clone(), "Root", LocalizedText::new("en", "Root"))))
                .expect("root node inserts once into a model that was just checked not to have it");
        }

        let mut frontier = VecDeque::new();
        frontier.push_back(root_id);

        while let Some(parent) = frontier.pop_front() {
            let references = match self.browse(parent.clone()) {
                Ok(references) => references,
                Err(e) => {
                    log::warn!("browse of {parent} failed: {e}");
                    continue;
                }
            };

            for reference in references {
                let target = reference.node_id.node_id.clone();
                model.add_reference(parent.clone(), reference.reference_type_id.clone(), target.clone());

                if model.find(&target).is_some() {
                    continue;
                }

                let node = match self.construct_node(&target, reference.node_class, &reference.browse_name, &reference.display_name) {
                    Ok(node) => node,
                    Err(e) => {
                        log::warn!("reading attributes of {target} failed: {e}");
                        continue;
                    }
                };

                match model.insert(node) {
                    Ok(()) => frontier.push_back(target),
                    Err(_) => {
                        // lost a race with another reference to the same target discovered
                        // earlier in this same browse result; the reference above still stands.
                    }
                }
            }
        }

        Ok(())
    }

    fn browse(&mut self, node_id: NodeId) -> Result<Vec<ReferenceDescription>, Error> {
        let request = BrowseRequest {
            request_header: RequestHeader::new(0, self.timeout.as_millis() as u32),
            view_id: NodeId::null(),
            requested_max_references_per_node: 0,
            nodes_to_browse: vec![BrowseDescription::forward_hierarchical(node_id)],
        };
        let (bytes, rx) = ViewServiceSet::send_browse_sync(self.session, request, self.timeout)?;
        let reply = self.transport.exchange(bytes)?;
        self.session.on_message(&reply)?;
        let response_bytes = rx
            .recv()
            .map_err(|_| Error::decoding("browse response channel closed before completion"))??;
        let response = ViewServiceSet::decode_browse_response(&response_bytes)?;

        let mut references = Vec::new();
        for result in response.results {
            if !result.status_code.is_good() {
                log::warn!("browse result returned {:?}", result.status_code);
                continue;
            }
            references.extend(result.references);
        }
        Ok(references)
    }

    fn read_attribute(&mut self, node_id: &NodeId, attribute_id: AttributeId) -> Result<Variant, Error> {
        let request = ReadRequest {
            request_header: RequestHeader::new(0, self.timeout.as_millis() as u32),
            max_age: 0.0,
            timestamps_to_return: TimestampsToReturn::Neither,
            nodes_to_read: vec![ReadValueId {
                node_id: node_id.clone(),
                attribute_id: attribute_id.into(),
                index_range: UAString::null(),
                data_encoding: QualifiedName::null(),
            }],
        };
        let (bytes, rx) = AttributeServiceSet::send_read_sync(self.session, request, self.timeout)?;
        let reply = self.transport.exchange(bytes)?;
        self.session.on_message(&reply)?;
        let response_bytes = rx
            .recv()
            .map_err(|_| Error::decoding("read response channel closed before completion"))??;
        let response = AttributeServiceSet::decode_read_response(&response_bytes)?;

        let data_value = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::decoding("read response carried no results"))?;
        if let Some(status) = data_value.status {
            if !status.is_good() {
                return Err(Error::new(status, format!("reading {attribute_id:?} of {node_id} returned bad status")));
            }
        }
        data_value
            .value
            .ok_or_else(|| Error::decoding(format!("{attribute_id:?} of {node_id} had no value")))
    }

    fn construct_node(
        &mut self,
        node_id: &NodeId,
        node_class: NodeClass,
        browse_name: &QualifiedName,
        display_name: &LocalizedText,
    ) -> Result<NodeType, Error> {
        let mut node = match node_class {
            NodeClass::Object => NodeType::Object(Object::new(node_id.clone(), browse_name.clone(), display_name.clone())),
            NodeClass::Variable => {
                let data_type = self.read_node_id(node_id, AttributeId::DataType)?;
                let value = self.read_attribute(node_id, AttributeId::Value)?;
                NodeType::Variable(Variable::new(node_id.clone(), browse_name.clone(), display_name.clone(), data_type, value))
            }
            NodeClass::Method => NodeType::Method(Method::new(node_id.clone(), browse_name.clone(), display_name.clone())),
            NodeClass::ObjectType => {
                NodeType::ObjectType(ObjectType::new(node_id.clone(), browse_name.clone(), display_name.clone()))
            }
            NodeClass::VariableType => {
                let data_type = self.read_node_id(node_id, AttributeId::DataType)?;
                NodeType::VariableType(VariableType::new(node_id.clone(), browse_name.clone(), display_name.clone(), data_type))
            }
            NodeClass::ReferenceType => {
                let symmetric = match self.read_attribute(node_id, AttributeId::Symmetric) {
                    Ok(Variant::Boolean(v)) => v,
                    _ => false,
                };
                NodeType::ReferenceType(ReferenceType::new(
                    node_id.clone(),
                    browse_name.clone(),
                    display_name.clone(),
                    symmetric,
                    LocalizedText::null(),
                ))
            }
            NodeClass::DataType => NodeType::DataType(DataType::new(node_id.clone(), browse_name.clone(), display_name.clone())),
            NodeClass::View => NodeType::View(View::new(node_id.clone(), browse_name.clone(), display_name.clone())),
        };

        for &attribute_id in post_construction_attributes(node_class) {
            match self.read_attribute(node_id, attribute_id) {
                Ok(value) => {
                    if let Err(e) = node.set_attribute(attribute_id, value) {
                        log::debug!("{node_id} does not accept {attribute_id:?}: {e}");
                    }
                }
                Err(e) => log::debug!("reading {attribute_id:?} of {node_id} failed: {e}"),
            }
        }

        Ok(node)
    }

    fn read_node_id(&mut self, node_id: &NodeId, attribute_id: AttributeId) -> Result<NodeId, Error> {
        match self.read_attribute(node_id, attribute_id)? {
            Variant::NodeId(v) => Ok(*v),
            other => Err(Error::decoding(format!("{attribute_id:?} of {node_id} was not a NodeId: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_types::service_types::headers::ResponseHeader;
    use opcua_types::service_types::view::{BrowseResponse, BrowseResult};
    use opcua_types::{BinaryEncodable, ExpandedNodeId, StatusCode};
    use std::collections::VecDeque as Queue;

    /// Replays a fixed sequence of encoded responses, one per request received, regardless of
    /// what was asked for. Good enough to drive the builder through a small fixed topology.
    struct ScriptedTransport {
        responses: Queue<Vec<u8>>,
    }

    impl Transport for ScriptedTransport {
        fn exchange(&mut self, _request: Vec<u8>) -> Result<Vec<u8>, Error> {
            self.responses
                .pop_front()
                .ok_or_else(|| Error::decoding("scripted transport ran out of responses"))
        }
    }

    fn encode_response<B: BinaryEncodable>(type_id: NodeId, body: &B) -> Vec<u8> {
        let mut buf = Vec::new();
        type_id.encode(&mut buf).unwrap();
        body.encode(&mut buf).unwrap();
        buf
    }

    fn empty_browse_response(handle: u32) -> Vec<u8> {
        encode_response(
            NodeId::new(0, ids::BROWSE_RESPONSE),
            &BrowseResponse {
                response_header: ResponseHeader::new(handle, StatusCode::Good),
                results: vec![BrowseResult {
                    status_code: StatusCode::Good,
                    continuation_point: opcua_types::ByteString::null(),
                    references: Vec::new(),
                }],
                diagnostic_infos: Vec::new(),
            },
        )
    }

    #[test]
    fn builds_single_child_object_from_root() {
        let mut session = crate::session::tests_support::activated_session();

        let child_id = NodeId::new(1, 42u32);
        let root_browse = encode_response(
            NodeId::new(0, ids::BROWSE_RESPONSE),
            &BrowseResponse {
                response_header: ResponseHeader::new(1, StatusCode::Good),
                results: vec![BrowseResult {
                    status_code: StatusCode::Good,
                    continuation_point: opcua_types::ByteString::null(),
                    references: vec![ReferenceDescription {
                        reference_type_id: NodeId::new(0, ids::REFERENCE_TYPE_ORGANIZES),
                        is_forward: true,
                        node_id: ExpandedNodeId::from(child_id.clone()),
                        browse_name: QualifiedName::new(1, "Child"),
                        display_name: LocalizedText::new("en", "Child"),
                        node_class: NodeClass::Object,
                        type_definition: ExpandedNodeId::from(NodeId::null()),
                    }],
                }],
                diagnostic_infos: Vec::new(),
            },
        );
        let child_browse = empty_browse_response(2);

        let mut transport = ScriptedTransport {
            responses: Queue::from(vec![root_browse, child_browse]),
        };

        let model = NodeSetBuilder::new(&mut session, &mut transport).build().unwrap();

        assert!(model.find(&child_id).is_some());
        assert_eq!(
            model
                .references()
                .forward_references(&NodeId::new(0, ids::ROOT_FOLDER_NODE_ID), None)
                .len(),
            1
        );
    }

    #[test]
    fn bad_browse_status_is_skipped_not_fatal() {
        let mut session = crate::session::tests_support::activated_session();
        let bad_response = encode_response(
            NodeId::new(0, ids::BROWSE_RESPONSE),
            &BrowseResponse {
                response_header: ResponseHeader::new(1, StatusCode::Good),
                results: vec![BrowseResult {
                    status_code: StatusCode::BadNodeIdUnknown,
                    continuation_point: opcua_types::ByteString::null(),
                    references: Vec::new(),
                }],
                diagnostic_infos: Vec::new(),
            },
        );
        let mut transport = ScriptedTransport {
            responses: Queue::from(vec![bad_response]),
        };

        let model = NodeSetBuilder::new(&mut session, &mut transport).build().unwrap();
        assert!(model.find(&NodeId::new(0, ids::ROOT_FOLDER_NODE_ID)).is_some());
    }

    #[test]
    fn duplicate_target_reference_is_still_recorded() {
        let mut session = crate::session::tests_support::activated_session();
        let child_id = NodeId::new(1, 7u32);
        let reference = ReferenceDescription {
            reference_type_id: NodeId::new(0, ids::REFERENCE_TYPE_ORGANIZES),
            is_forward: true,
            node_id: ExpandedNodeId::from(child_id.clone()),
            browse_name: QualifiedName::new(1, "Shared"),
            display_name: LocalizedText::new("en", "Shared"),
            node_class: NodeClass::Object,
            type_definition: ExpandedNodeId::from(NodeId::null()),
        };
        let root_browse = encode_response(
            NodeId::new(0, ids::BROWSE_RESPONSE),
            &BrowseResponse {
                response_header: ResponseHeader::new(1, StatusCode::Good),
                results: vec![BrowseResult {
                    status_code: StatusCode::Good,
                    continuation_point: opcua_types::ByteString::null(),
                    references: vec![reference.clone(), reference],
                }],
                diagnostic_infos: Vec::new(),
            },
        );
        let child_browse = empty_browse_response(2);
        let mut transport = ScriptedTransport {
            responses: Queue::from(vec![root_browse, child_browse]),
        };

        let model = NodeSetBuilder::new(&mut session, &mut transport).build().unwrap();
        assert_eq!(
            model
                .references()
                .forward_references(&NodeId::new(0, ids::ROOT_FOLDER_NODE_ID), None)
                .len(),
            2
        );
        assert!(model.find(&child_id).is_some());
    }

    fn organizes_reference(node_id: NodeId, name: &str, node_class: NodeClass) -> ReferenceDescription {
        ReferenceDescription {
            reference_type_id: NodeId::new(0, ids::REFERENCE_TYPE_ORGANIZES),
            is_forward: true,
            node_id: ExpandedNodeId::from(node_id),
            browse_name: QualifiedName::new(0, name),
            display_name: LocalizedText::new("en", name),
            node_class,
            type_definition: ExpandedNodeId::from(NodeId::null()),
        }
    }

    fn standard_hierarchy_responses() -> Queue<Vec<u8>> {
        let root_browse = encode_response(
            NodeId::new(0, ids::BROWSE_RESPONSE),
            &BrowseResponse {
                response_header: ResponseHeader::new(1, StatusCode::Good),
                results: vec![BrowseResult {
                    status_code: StatusCode::Good,
                    continuation_point: opcua_types::ByteString::null(),
                    references: vec![
                        organizes_reference(NodeId::new(0, ids::OBJECTS_NODE_ID), "Objects", NodeClass::Object),
                        organizes_reference(NodeId::new(0, ids::TYPES_NODE_ID), "Types", NodeClass::Object),
                        organizes_reference(NodeId::new(0, ids::VIEWS_NODE_ID), "Views", NodeClass::Object),
                    ],
                }],
                diagnostic_infos: Vec::new(),
            },
        );
        Queue::from(vec![
            root_browse,
            empty_browse_response(2),
            empty_browse_response(3),
            empty_browse_response(4),
        ])
    }

    #[test]
    fn s3_builder_discovers_standard_hierarchy_from_root() {
        let mut session = crate::session::tests_support::activated_session();
        let mut transport = ScriptedTransport {
            responses: standard_hierarchy_responses(),
        };

        let model = NodeSetBuilder::new(&mut session, &mut transport).build().unwrap();

        assert!(model.find(&NodeId::new(0, ids::OBJECTS_NODE_ID)).is_some());
        assert!(model.find(&NodeId::new(0, ids::TYPES_NODE_ID)).is_some());
        assert!(model.find(&NodeId::new(0, ids::VIEWS_NODE_ID)).is_some());
    }

    #[test]
    fn s4_reinvoking_builder_from_root_is_idempotent() {
        let mut model = InformationModel::empty();
        let mut session = crate::session::tests_support::activated_session();

        let mut first_transport = ScriptedTransport {
            responses: standard_hierarchy_responses(),
        };
        NodeSetBuilder::new(&mut session, &mut first_transport)
            .build_into(&mut model)
            .unwrap();
        let first_len = model.len();

        // Re-invoking from Root against the already-populated `model` must be benign: every
        // node the traversal rediscovers hits `BadNodeIdExists` rather than being reinserted.
        let mut second_transport = ScriptedTransport {
            responses: standard_hierarchy_responses(),
        };
        NodeSetBuilder::new(&mut session, &mut second_transport)
            .build_into(&mut model)
            .unwrap();

        assert_eq!(model.len(), first_len);
    }
}
