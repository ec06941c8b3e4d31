// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `ExtensionObject`: a self-describing polymorphic payload, and the registry that resolves
//! its wire bytes into a concrete typed body.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use byteorder::{ReadBytesExt, WriteBytesExt};
use parking_lot::RwLock;

use crate::byte_string::ByteString;
use crate::encoding::{
    process_decode_io_result, process_encode_io_result, BinaryDecodable, BinaryEncodable,
    DecodingOptions, EncodingResult, Error, UaNullable,
};
use crate::node_id::NodeId;

const ENCODING_NONE: u8 = 0x00;
const ENCODING_BINARY: u8 = 0x01;
const ENCODING_XML: u8 = 0x02;

/// Implemented by structured message bodies that can live inside an `ExtensionObject`.
///
/// Downcasting via [`Any`] lets a caller recover the concrete type after a registry lookup,
/// mirroring the way the teacher's generated request/response types are boxed behind a
/// dynamic dispatch table.
pub trait ExtensionPayload: fmt::Debug + Any + Send + Sync {
    /// Encode this payload's body (not including the ExtensionObject envelope).
    fn encode_payload(&self, stream: &mut dyn Write) -> EncodingResult<()>;

    /// The exact encoded length of [`ExtensionPayload::encode_payload`]'s output.
    fn payload_byte_len(&self) -> usize;

    /// Support downcasting back to the concrete payload type.
    fn as_any(&self) -> &dyn Any;
}

/// A constructor that decodes a payload's bytes into a concrete [`ExtensionPayload`].
pub type PayloadDecoder =
    Arc<dyn Fn(&mut dyn Read, &DecodingOptions) -> EncodingResult<Box<dyn ExtensionPayload>> + Send + Sync>;

/// Maps a structured type's `NodeId` to the decoder that can reconstruct it.
///
/// Deliberately *not* a process-wide singleton: callers construct one explicitly and thread
/// it wherever `ExtensionObject` payloads need to be resolved (the root client/server object
/// owns one and shares it by `Arc`).
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    decoders: Arc<RwLock<HashMap<NodeId, PayloadDecoder>>>,
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("registered", &self.decoders.read().len())
            .finish()
    }
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder for `type_id`. Fails with `BadNodeIdExists` if already registered.
    pub fn register(&self, type_id: NodeId, decoder: PayloadDecoder) -> EncodingResult<()> {
        let mut decoders = self.decoders.write();
        if decoders.contains_key(&type_id) {
            return Err(Error::new(
                crate::status_code::StatusCode::BadNodeIdExists,
                format!("type {type_id} is already registered"),
            ));
        }
        decoders.insert(type_id, decoder);
        Ok(())
    }

    /// Remove a previously registered decoder.
    pub fn deregister(&self, type_id: &NodeId) {
        self.decoders.write().remove(type_id);
    }

    /// Attempt to decode `bytes` as the payload registered for `type_id`.
    pub fn construct(
        &self,
        type_id: &NodeId,
        bytes: &[u8],
        options: &DecodingOptions,
    ) -> Option<EncodingResult<Box<dyn ExtensionPayload>>> {
        let decoder = self.decoders.read().get(type_id).cloned()?;
        let mut cursor = Cursor::new(bytes);
        Some(decoder(&mut cursor, options))
    }
}

/// The body of an `ExtensionObject`: absent, a type the registry resolved, or raw bytes the
/// registry could not (or was not asked to) resolve.
pub enum ExtensionObjectBody {
    /// No body present.
    None,
    /// A body decoded into a concrete payload via the registry.
    Typed(Box<dyn ExtensionPayload>),
    /// Raw, unresolved bytes (either the registry had no entry, or decoding used the plain
    /// `BinaryDecodable` path which never consults a registry).
    Raw(ByteString),
}

impl fmt::Debug for ExtensionObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionObjectBody::None => write!(f, "None"),
            ExtensionObjectBody::Typed(v) => write!(f, "Typed({v:?})"),
            ExtensionObjectBody::Raw(v) => write!(f, "Raw({} bytes)", v.as_ref().len()),
        }
    }
}

impl Clone for ExtensionObjectBody {
    /// A `Typed` body clones down to `Raw` bytes; `Box<dyn ExtensionPayload>` has no generic
    /// clone, and re-encoding is the only type-erased way to duplicate it.
    fn clone(&self) -> Self {
        match self {
            ExtensionObjectBody::None => ExtensionObjectBody::None,
            ExtensionObjectBody::Raw(bytes) => ExtensionObjectBody::Raw(bytes.clone()),
            ExtensionObjectBody::Typed(payload) => {
                let mut buf = Vec::with_capacity(payload.payload_byte_len());
                match payload.encode_payload(&mut buf) {
                    Ok(()) => ExtensionObjectBody::Raw(ByteString::from(buf)),
                    Err(_) => ExtensionObjectBody::None,
                }
            }
        }
    }
}

/// A self-describing polymorphic payload: a type id plus a body whose concrete shape is
/// resolved out-of-band via an [`ExtensionRegistry`].
#[derive(Debug, Clone)]
pub struct ExtensionObject {
    /// The NodeId identifying the structured type of the body.
    pub type_id: NodeId,
    /// The body.
    pub body: ExtensionObjectBody,
}

impl PartialEq for ExtensionObject {
    fn eq(&self, other: &Self) -> bool {
        let mut a = Vec::new();
        let mut b = Vec::new();
        match (self.encode(&mut a), other.encode(&mut b)) {
            (Ok(()), Ok(())) => a == b,
            _ => false,
        }
    }
}

impl Default for ExtensionObject {
    fn default() -> Self {
        ExtensionObject::null()
    }
}

impl UaNullable for ExtensionObject {
    fn is_ua_null(&self) -> bool {
        matches!(self.body, ExtensionObjectBody::None) && self.type_id.is_null()
    }
}

impl ExtensionObject {
    /// The null ExtensionObject: null type id, no body.
    pub fn null() -> Self {
        ExtensionObject {
            type_id: NodeId::null(),
            body: ExtensionObjectBody::None,
        }
    }

    /// Wrap an already-typed payload for encoding.
    pub fn from_payload(type_id: NodeId, payload: Box<dyn ExtensionPayload>) -> Self {
        ExtensionObject {
            type_id,
            body: ExtensionObjectBody::Typed(payload),
        }
    }

    /// Wrap raw, already-encoded bytes.
    pub fn from_raw(type_id: NodeId, bytes: Vec<u8>) -> Self {
        ExtensionObject {
            type_id,
            body: ExtensionObjectBody::Raw(ByteString::from(bytes)),
        }
    }

    /// Downcast a typed body to `T`, if the body is typed and matches.
    pub fn downcast_ref<T: ExtensionPayload>(&self) -> Option<&T> {
        match &self.body {
            ExtensionObjectBody::Typed(payload) => payload.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// The raw bytes, if the body is raw (unresolved).
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            ExtensionObjectBody::Raw(bytes) => Some(bytes.as_ref()),
            _ => None,
        }
    }

    fn encoding_byte(&self) -> u8 {
        match &self.body {
            ExtensionObjectBody::None => ENCODING_NONE,
            ExtensionObjectBody::Typed(_) | ExtensionObjectBody::Raw(_) => ENCODING_BINARY,
        }
    }

    /// Decode, consulting `registry` to resolve the body into a typed payload when possible.
    /// Falls back to [`ExtensionObjectBody::Raw`] when the type id is unregistered.
    pub fn decode_with_registry<S: Read + ?Sized>(
        stream: &mut S,
        options: &DecodingOptions,
        registry: &ExtensionRegistry,
    ) -> EncodingResult<Self> {
        let type_id = NodeId::decode(stream, options)?;
        let encoding = process_decode_io_result(stream.read_u8())?;
        let body = match encoding {
            ENCODING_NONE => ExtensionObjectBody::None,
            ENCODING_BINARY => {
                let bytes = ByteString::decode(stream, options)?;
                let raw = bytes.value.clone().unwrap_or_default();
                match registry.construct(&type_id, &raw, options) {
                    Some(Ok(payload)) => ExtensionObjectBody::Typed(payload),
                    Some(Err(_)) | None => ExtensionObjectBody::Raw(bytes),
                }
            }
            ENCODING_XML => {
                return Err(Error::decoding(
                    "XML-encoded ExtensionObject bodies are not supported",
                ))
            }
            other => {
                return Err(Error::decoding(format!(
                    "Unrecognized ExtensionObject encoding byte {other:#04x}"
                )))
            }
        };
        Ok(ExtensionObject { type_id, body })
    }
}

impl BinaryEncodable for ExtensionObject {
    fn byte_len(&self) -> usize {
        let body_len = match &self.body {
            ExtensionObjectBody::None => 0,
            ExtensionObjectBody::Typed(payload) => 4 + payload.payload_byte_len(),
            ExtensionObjectBody::Raw(bytes) => bytes.byte_len(),
        };
        self.type_id.byte_len() + 1 + body_len
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.type_id.encode(stream)?;
        process_encode_io_result(stream.write_u8(self.encoding_byte()))?;
        match &self.body {
            ExtensionObjectBody::None => {}
            ExtensionObjectBody::Typed(payload) => {
                let mut buf = Vec::with_capacity(payload.payload_byte_len());
                payload.encode_payload(&mut buf)?;
                ByteString::from(buf).encode(stream)?;
            }
            ExtensionObjectBody::Raw(bytes) => {
                bytes.encode(stream)?;
            }
        }
        Ok(())
    }
}

/// Decodes without consulting any registry; the body is always [`ExtensionObjectBody::Raw`]
/// (or `None`). Use [`ExtensionObject::decode_with_registry`] to resolve typed bodies.
impl BinaryDecodable for ExtensionObject {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let type_id = NodeId::decode(stream, options)?;
        let encoding = process_decode_io_result(stream.read_u8())?;
        let body = match encoding {
            ENCODING_NONE => ExtensionObjectBody::None,
            ENCODING_BINARY => ExtensionObjectBody::Raw(ByteString::decode(stream, options)?),
            ENCODING_XML => {
                return Err(Error::decoding(
                    "XML-encoded ExtensionObject bodies are not supported",
                ))
            }
            other => {
                return Err(Error::decoding(format!(
                    "Unrecognized ExtensionObject encoding byte {other:#04x}"
                )))
            }
        };
        Ok(ExtensionObject { type_id, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::EncodingResult as Res;
    use std::io::Cursor;

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Ping {
        sequence: u32,
    }

    impl ExtensionPayload for Ping {
        fn encode_payload(&self, stream: &mut dyn Write) -> Res<()> {
            process_encode_io_result(stream.write_u32::<byteorder::LittleEndian>(self.sequence))
        }

        fn payload_byte_len(&self) -> usize {
            4
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn ping_type_id() -> NodeId {
        NodeId::new(1, 1000u32)
    }

    #[test]
    fn raw_round_trip_without_registry() {
        let options = DecodingOptions::default();
        let eo = ExtensionObject::from_raw(ping_type_id(), vec![1, 2, 3, 4]);
        let mut buf = Vec::new();
        eo.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let back = ExtensionObject::decode(&mut cursor, &options).unwrap();
        assert_eq!(back.type_id, ping_type_id());
        assert_eq!(back.raw_bytes().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn registry_resolves_typed_payload() {
        let options = DecodingOptions::default();
        let registry = ExtensionRegistry::new();
        registry
            .register(
                ping_type_id(),
                Arc::new(|stream: &mut dyn Read, _opts: &DecodingOptions| {
                    use byteorder::ReadBytesExt;
                    let sequence = process_decode_io_result(
                        stream.read_u32::<byteorder::LittleEndian>(),
                    )?;
                    Ok(Box::new(Ping { sequence }) as Box<dyn ExtensionPayload>)
                }),
            )
            .unwrap();

        let eo = ExtensionObject::from_payload(ping_type_id(), Box::new(Ping { sequence: 42 }));
        let mut buf = Vec::new();
        eo.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let back = ExtensionObject::decode_with_registry(&mut cursor, &options, &registry).unwrap();
        assert_eq!(back.downcast_ref::<Ping>().unwrap(), &Ping { sequence: 42 });
    }

    #[test]
    fn unregistered_type_falls_back_to_raw() {
        let options = DecodingOptions::default();
        let registry = ExtensionRegistry::new();
        let eo = ExtensionObject::from_raw(ping_type_id(), vec![9, 9]);
        let mut buf = Vec::new();
        eo.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let back = ExtensionObject::decode_with_registry(&mut cursor, &options, &registry).unwrap();
        assert_eq!(back.raw_bytes().unwrap(), &[9, 9]);
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = ExtensionRegistry::new();
        let decoder: PayloadDecoder = Arc::new(|_s, _o| {
            Ok(Box::new(Ping { sequence: 0 }) as Box<dyn ExtensionPayload>)
        });
        registry.register(ping_type_id(), decoder.clone()).unwrap();
        assert!(registry.register(ping_type_id(), decoder).is_err());
    }
}
