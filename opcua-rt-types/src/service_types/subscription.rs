// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Subscription and MonitoredItem service sets.
//!
//! The spec treats Attribute and View as the only fully-specified service sets; these are
//! kept to the minimum needed to tabulate their `typeId`s and round-trip their envelopes
//! (§6), without modeling publishing/sampling semantics this crate does not implement.

use std::io::{Read, Write};

use crate::array::{array_byte_len, decode_array, encode_array};
use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult};
use crate::extension_object::ExtensionObject;
use crate::node_id::NodeId;
use crate::service_types::headers::{RequestHeader, ResponseHeader};
use crate::status_code::StatusCode;

macro_rules! result_only_response {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub response_header: ResponseHeader,
            pub results: Vec<StatusCode>,
            pub diagnostic_infos: Vec<ExtensionObject>,
        }

        impl BinaryEncodable for $name {
            fn byte_len(&self) -> usize {
                self.response_header.byte_len()
                    + array_byte_len(&self.results)
                    + array_byte_len(&self.diagnostic_infos)
            }

            fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
                self.response_header.encode(stream)?;
                encode_array(&self.results, stream)?;
                encode_array(&self.diagnostic_infos, stream)
            }
        }

        impl BinaryDecodable for $name {
            fn decode<S: Read + ?Sized>(
                stream: &mut S,
                options: &DecodingOptions,
            ) -> EncodingResult<Self> {
                Ok($name {
                    response_header: ResponseHeader::decode(stream, options)?,
                    results: decode_array(stream, options)?,
                    diagnostic_infos: decode_array(stream, options)?,
                })
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubscriptionRequest {
    pub request_header: RequestHeader,
    pub requested_publishing_interval: f64,
    pub requested_lifetime_count: u32,
    pub requested_max_keep_alive_count: u32,
    pub max_notifications_per_publish: u32,
    pub publishing_enabled: bool,
    pub priority: u8,
}

impl BinaryEncodable for CreateSubscriptionRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + 8 + 4 + 4 + 4 + 1 + 1
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.requested_publishing_interval.encode(stream)?;
        self.requested_lifetime_count.encode(stream)?;
        self.requested_max_keep_alive_count.encode(stream)?;
        self.max_notifications_per_publish.encode(stream)?;
        self.publishing_enabled.encode(stream)?;
        self.priority.encode(stream)
    }
}

impl BinaryDecodable for CreateSubscriptionRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CreateSubscriptionRequest {
            request_header: RequestHeader::decode(stream, options)?,
            requested_publishing_interval: f64::decode(stream, options)?,
            requested_lifetime_count: u32::decode(stream, options)?,
            requested_max_keep_alive_count: u32::decode(stream, options)?,
            max_notifications_per_publish: u32::decode(stream, options)?,
            publishing_enabled: bool::decode(stream, options)?,
            priority: u8::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubscriptionResponse {
    pub response_header: ResponseHeader,
    pub subscription_id: u32,
    pub revised_publishing_interval: f64,
    pub revised_lifetime_count: u32,
    pub revised_max_keep_alive_count: u32,
}

impl BinaryEncodable for CreateSubscriptionResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len() + 4 + 8 + 4 + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        self.revised_publishing_interval.encode(stream)?;
        self.revised_lifetime_count.encode(stream)?;
        self.revised_max_keep_alive_count.encode(stream)
    }
}

impl BinaryDecodable for CreateSubscriptionResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CreateSubscriptionResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            revised_publishing_interval: f64::decode(stream, options)?,
            revised_lifetime_count: u32::decode(stream, options)?,
            revised_max_keep_alive_count: u32::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItemCreateRequest {
    pub item_to_monitor: crate::service_types::attribute::ReadValueId,
    pub monitoring_mode: u32,
    pub requested_queue_size: u32,
    pub sampling_interval: f64,
    pub discard_oldest: bool,
}

impl BinaryEncodable for MonitoredItemCreateRequest {
    fn byte_len(&self) -> usize {
        self.item_to_monitor.byte_len() + 4 + 4 + 8 + 4 + 1
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.item_to_monitor.encode(stream)?;
        self.monitoring_mode.encode(stream)?;
        self.sampling_interval.encode(stream)?;
        self.requested_queue_size.encode(stream)?;
        self.discard_oldest.encode(stream)
    }
}

impl BinaryDecodable for MonitoredItemCreateRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(MonitoredItemCreateRequest {
            item_to_monitor: crate::service_types::attribute::ReadValueId::decode(stream, options)?,
            monitoring_mode: u32::decode(stream, options)?,
            sampling_interval: f64::decode(stream, options)?,
            requested_queue_size: u32::decode(stream, options)?,
            discard_oldest: bool::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMonitoredItemsRequest {
    pub request_header: RequestHeader,
    pub subscription_id: u32,
    pub timestamps_to_return: crate::service_types::attribute::TimestampsToReturn,
    pub items_to_create: Vec<MonitoredItemCreateRequest>,
}

impl BinaryEncodable for CreateMonitoredItemsRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
            + 4
            + self.timestamps_to_return.byte_len()
            + array_byte_len(&self.items_to_create)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        self.timestamps_to_return.encode(stream)?;
        encode_array(&self.items_to_create, stream)
    }
}

impl BinaryDecodable for CreateMonitoredItemsRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CreateMonitoredItemsRequest {
            request_header: RequestHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            timestamps_to_return: crate::service_types::attribute::TimestampsToReturn::decode(
                stream, options,
            )?,
            items_to_create: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItemCreateResult {
    pub status_code: StatusCode,
    pub monitored_item_id: u32,
    pub revised_sampling_interval: f64,
    pub revised_queue_size: u32,
    pub filter_result: ExtensionObject,
}

impl BinaryEncodable for MonitoredItemCreateResult {
    fn byte_len(&self) -> usize {
        self.status_code.byte_len() + 4 + 8 + 4 + self.filter_result.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.status_code.encode(stream)?;
        self.monitored_item_id.encode(stream)?;
        self.revised_sampling_interval.encode(stream)?;
        self.revised_queue_size.encode(stream)?;
        self.filter_result.encode(stream)
    }
}

impl BinaryDecodable for MonitoredItemCreateResult {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(MonitoredItemCreateResult {
            status_code: StatusCode::decode(stream, options)?,
            monitored_item_id: u32::decode(stream, options)?,
            revised_sampling_interval: f64::decode(stream, options)?,
            revised_queue_size: u32::decode(stream, options)?,
            filter_result: ExtensionObject::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMonitoredItemsResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<MonitoredItemCreateResult>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for CreateMonitoredItemsResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
            + array_byte_len(&self.results)
            + array_byte_len(&self.diagnostic_infos)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        encode_array(&self.results, stream)?;
        encode_array(&self.diagnostic_infos, stream)
    }
}

impl BinaryDecodable for CreateMonitoredItemsResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(CreateMonitoredItemsResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

result_only_response!(DeleteMonitoredItemsResponse);

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteMonitoredItemsRequest {
    pub request_header: RequestHeader,
    pub subscription_id: u32,
    pub monitored_item_ids: Vec<u32>,
}

impl BinaryEncodable for DeleteMonitoredItemsRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + 4 + array_byte_len(&self.monitored_item_ids)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        encode_array(&self.monitored_item_ids, stream)
    }
}

impl BinaryDecodable for DeleteMonitoredItemsRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(DeleteMonitoredItemsRequest {
            request_header: RequestHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            monitored_item_ids: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifyMonitoredItemsRequest {
    pub request_header: RequestHeader,
    pub subscription_id: u32,
    pub timestamps_to_return: crate::service_types::attribute::TimestampsToReturn,
    pub items_to_modify: Vec<MonitoredItemCreateRequest>,
}

impl BinaryEncodable for ModifyMonitoredItemsRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
            + 4
            + self.timestamps_to_return.byte_len()
            + array_byte_len(&self.items_to_modify)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        self.timestamps_to_return.encode(stream)?;
        encode_array(&self.items_to_modify, stream)
    }
}

impl BinaryDecodable for ModifyMonitoredItemsRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ModifyMonitoredItemsRequest {
            request_header: RequestHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            timestamps_to_return: crate::service_types::attribute::TimestampsToReturn::decode(
                stream, options,
            )?,
            items_to_modify: decode_array(stream, options)?,
        })
    }
}

result_only_response!(ModifyMonitoredItemsResponse);

#[derive(Debug, Clone, PartialEq)]
pub struct SetMonitoringModeRequest {
    pub request_header: RequestHeader,
    pub subscription_id: u32,
    pub monitoring_mode: u32,
    pub monitored_item_ids: Vec<u32>,
}

impl BinaryEncodable for SetMonitoringModeRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + 4 + 4 + array_byte_len(&self.monitored_item_ids)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        self.monitoring_mode.encode(stream)?;
        encode_array(&self.monitored_item_ids, stream)
    }
}

impl BinaryDecodable for SetMonitoringModeRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(SetMonitoringModeRequest {
            request_header: RequestHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            monitoring_mode: u32::decode(stream, options)?,
            monitored_item_ids: decode_array(stream, options)?,
        })
    }
}

result_only_response!(SetMonitoringModeResponse);

#[derive(Debug, Clone, PartialEq)]
pub struct SetTriggeringRequest {
    pub request_header: RequestHeader,
    pub subscription_id: u32,
    pub triggering_item_id: u32,
    pub links_to_add: Vec<u32>,
    pub links_to_remove: Vec<u32>,
}

impl BinaryEncodable for SetTriggeringRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len()
            + 4
            + 4
            + array_byte_len(&self.links_to_add)
            + array_byte_len(&self.links_to_remove)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        self.triggering_item_id.encode(stream)?;
        encode_array(&self.links_to_add, stream)?;
        encode_array(&self.links_to_remove, stream)
    }
}

impl BinaryDecodable for SetTriggeringRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(SetTriggeringRequest {
            request_header: RequestHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            triggering_item_id: u32::decode(stream, options)?,
            links_to_add: decode_array(stream, options)?,
            links_to_remove: decode_array(stream, options)?,
        })
    }
}

result_only_response!(SetTriggeringResponse);

#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub request_header: RequestHeader,
    pub subscription_acknowledgements: Vec<ExtensionObject>,
}

impl BinaryEncodable for PublishRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + array_byte_len(&self.subscription_acknowledgements)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        encode_array(&self.subscription_acknowledgements, stream)
    }
}

impl BinaryDecodable for PublishRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(PublishRequest {
            request_header: RequestHeader::decode(stream, options)?,
            subscription_acknowledgements: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResponse {
    pub response_header: ResponseHeader,
    pub subscription_id: u32,
    pub available_sequence_numbers: Vec<u32>,
    pub more_notifications: bool,
    pub notification_data: Vec<ExtensionObject>,
    pub results: Vec<StatusCode>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for PublishResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
            + 4
            + array_byte_len(&self.available_sequence_numbers)
            + 1
            + array_byte_len(&self.notification_data)
            + array_byte_len(&self.results)
            + array_byte_len(&self.diagnostic_infos)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        encode_array(&self.available_sequence_numbers, stream)?;
        self.more_notifications.encode(stream)?;
        encode_array(&self.notification_data, stream)?;
        encode_array(&self.results, stream)?;
        encode_array(&self.diagnostic_infos, stream)
    }
}

impl BinaryDecodable for PublishResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(PublishResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            available_sequence_numbers: decode_array(stream, options)?,
            more_notifications: bool::decode(stream, options)?,
            notification_data: decode_array(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepublishRequest {
    pub request_header: RequestHeader,
    pub subscription_id: u32,
    pub retransmit_sequence_number: u32,
}

impl BinaryEncodable for RepublishRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + 4 + 4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        self.subscription_id.encode(stream)?;
        self.retransmit_sequence_number.encode(stream)
    }
}

impl BinaryDecodable for RepublishRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(RepublishRequest {
            request_header: RequestHeader::decode(stream, options)?,
            subscription_id: u32::decode(stream, options)?,
            retransmit_sequence_number: u32::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepublishResponse {
    pub response_header: ResponseHeader,
    pub notification_message: ExtensionObject,
}

impl BinaryEncodable for RepublishResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len() + self.notification_message.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        self.notification_message.encode(stream)
    }
}

impl BinaryDecodable for RepublishResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(RepublishResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            notification_message: ExtensionObject::decode(stream, options)?,
        })
    }
}

/// `TranslateBrowsePathsToNodeIds`: resolves a relative path from a starting node.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowsePath {
    pub starting_node: NodeId,
    pub relative_path: ExtensionObject,
}

impl BinaryEncodable for BrowsePath {
    fn byte_len(&self) -> usize {
        self.starting_node.byte_len() + self.relative_path.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.starting_node.encode(stream)?;
        self.relative_path.encode(stream)
    }
}

impl BinaryDecodable for BrowsePath {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowsePath {
            starting_node: NodeId::decode(stream, options)?,
            relative_path: ExtensionObject::decode(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslateBrowsePathsToNodeIdsRequest {
    pub request_header: RequestHeader,
    pub browse_paths: Vec<BrowsePath>,
}

impl BinaryEncodable for TranslateBrowsePathsToNodeIdsRequest {
    fn byte_len(&self) -> usize {
        self.request_header.byte_len() + array_byte_len(&self.browse_paths)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.request_header.encode(stream)?;
        encode_array(&self.browse_paths, stream)
    }
}

impl BinaryDecodable for TranslateBrowsePathsToNodeIdsRequest {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(TranslateBrowsePathsToNodeIdsRequest {
            request_header: RequestHeader::decode(stream, options)?,
            browse_paths: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowsePathResult {
    pub status_code: StatusCode,
    pub targets: Vec<ExtensionObject>,
}

impl BinaryEncodable for BrowsePathResult {
    fn byte_len(&self) -> usize {
        self.status_code.byte_len() + array_byte_len(&self.targets)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.status_code.encode(stream)?;
        encode_array(&self.targets, stream)
    }
}

impl BinaryDecodable for BrowsePathResult {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(BrowsePathResult {
            status_code: StatusCode::decode(stream, options)?,
            targets: decode_array(stream, options)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslateBrowsePathsToNodeIdsResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<BrowsePathResult>,
    pub diagnostic_infos: Vec<ExtensionObject>,
}

impl BinaryEncodable for TranslateBrowsePathsToNodeIdsResponse {
    fn byte_len(&self) -> usize {
        self.response_header.byte_len()
            + array_byte_len(&self.results)
            + array_byte_len(&self.diagnostic_infos)
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.response_header.encode(stream)?;
        encode_array(&self.results, stream)?;
        encode_array(&self.diagnostic_infos, stream)
    }
}

impl BinaryDecodable for TranslateBrowsePathsToNodeIdsResponse {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(TranslateBrowsePathsToNodeIdsResponse {
            response_header: ResponseHeader::decode(stream, options)?,
            results: decode_array(stream, options)?,
            diagnostic_infos: decode_array(stream, options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_code::StatusCode;
    use std::io::Cursor;

    #[test]
    fn create_subscription_round_trip() {
        let options = DecodingOptions::default();
        let req = CreateSubscriptionRequest {
            request_header: RequestHeader::new(10, 5000),
            requested_publishing_interval: 500.0,
            requested_lifetime_count: 600,
            requested_max_keep_alive_count: 20,
            max_notifications_per_publish: 0,
            publishing_enabled: true,
            priority: 0,
        };
        let mut buf = Vec::new();
        req.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(
            CreateSubscriptionRequest::decode(&mut cursor, &options).unwrap(),
            req
        );
    }

    #[test]
    fn publish_response_round_trip() {
        let options = DecodingOptions::default();
        let resp = PublishResponse {
            response_header: ResponseHeader::new(11, StatusCode::Good),
            subscription_id: 1,
            available_sequence_numbers: vec![1, 2],
            more_notifications: false,
            notification_data: Vec::new(),
            results: Vec::new(),
            diagnostic_infos: Vec::new(),
        };
        let mut buf = Vec::new();
        resp.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(PublishResponse::decode(&mut cursor, &options).unwrap(), resp);
    }
}
