// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! Well-known numeric identifiers from the standard OPC UA namespace (ns=0).
//!
//! These are the subset the core actually dispatches on: well-known address-space nodes, and
//! the request/response type ids tabulated in the external-interface section.

/// The root folder of the address space.
pub const ROOT_FOLDER_NODE_ID: u32 = 84;
/// The `Objects` organizational folder, a direct child of Root.
pub const OBJECTS_NODE_ID: u32 = 85;
/// The `Types` organizational folder.
pub const TYPES_NODE_ID: u32 = 86;
/// The `Views` organizational folder.
pub const VIEWS_NODE_ID: u32 = 87;

/// `HierarchicalReferences` and the reference types the node-set builder follows by default.
pub const REFERENCE_TYPE_ORGANIZES: u32 = 35;
pub const REFERENCE_TYPE_HAS_COMPONENT: u32 = 47;
pub const REFERENCE_TYPE_HAS_PROPERTY: u32 = 46;
pub const REFERENCE_TYPE_HAS_TYPE_DEFINITION: u32 = 40;
pub const REFERENCE_TYPE_HAS_SUBTYPE: u32 = 45;

macro_rules! service_ids {
    ($($name:ident = $value:expr),* $(,)?) => {
        $(
            #[doc = concat!("Numeric type id for `", stringify!($name), "`.")]
            pub const $name: u32 = $value;
        )*
    };
}

service_ids! {
    OPEN_SECURE_CHANNEL_REQUEST = 446,
    OPEN_SECURE_CHANNEL_RESPONSE = 449,
    CLOSE_SECURE_CHANNEL_REQUEST = 452,
    CLOSE_SECURE_CHANNEL_RESPONSE = 455,
    CREATE_SESSION_REQUEST = 461,
    CREATE_SESSION_RESPONSE = 464,
    ACTIVATE_SESSION_REQUEST = 467,
    ACTIVATE_SESSION_RESPONSE = 470,
    CLOSE_SESSION_REQUEST = 473,
    CLOSE_SESSION_RESPONSE = 476,
    READ_REQUEST = 631,
    READ_RESPONSE = 634,
    WRITE_REQUEST = 673,
    WRITE_RESPONSE = 676,
    BROWSE_REQUEST = 527,
    BROWSE_RESPONSE = 528,
    BROWSE_NEXT_REQUEST = 531,
    BROWSE_NEXT_RESPONSE = 534,
    TRANSLATE_BROWSE_PATHS_TO_NODE_IDS_REQUEST = 554,
    TRANSLATE_BROWSE_PATHS_TO_NODE_IDS_RESPONSE = 557,
    CREATE_SUBSCRIPTION_REQUEST = 787,
    CREATE_SUBSCRIPTION_RESPONSE = 790,
    CREATE_MONITORED_ITEMS_REQUEST = 751,
    CREATE_MONITORED_ITEMS_RESPONSE = 754,
    MODIFY_MONITORED_ITEMS_REQUEST = 757,
    MODIFY_MONITORED_ITEMS_RESPONSE = 760,
    DELETE_MONITORED_ITEMS_REQUEST = 781,
    DELETE_MONITORED_ITEMS_RESPONSE = 784,
    SET_MONITORING_MODE_REQUEST = 767,
    SET_MONITORING_MODE_RESPONSE = 770,
    SET_TRIGGERING_REQUEST = 773,
    SET_TRIGGERING_RESPONSE = 776,
    PUBLISH_REQUEST = 826,
    PUBLISH_RESPONSE = 829,
    REPUBLISH_REQUEST = 832,
    REPUBLISH_RESPONSE = 835,
    CALL_REQUEST = 712,
    CALL_RESPONSE = 715,
    ADD_NODES_REQUEST = 488,
    ADD_NODES_RESPONSE = 491,
    ADD_REFERENCES_REQUEST = 494,
    ADD_REFERENCES_RESPONSE = 497,
    DELETE_NODES_REQUEST = 500,
    DELETE_NODES_RESPONSE = 503,
    DELETE_REFERENCES_REQUEST = 506,
    DELETE_REFERENCES_RESPONSE = 509,
}
