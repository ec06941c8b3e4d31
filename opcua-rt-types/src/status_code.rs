// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `StatusCode`: the 32-bit result code carried by every OPC UA response.

use std::fmt;

use crate::encoding::{
    process_decode_io_result, process_encode_io_result, BinaryDecodable, BinaryEncodable,
    DecodingOptions, EncodingResult,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// High two bits of a `StatusCode` classify its severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation succeeded, `0x0000_0000`.
    Good,
    /// The operation succeeded, but the result may not be fully accurate.
    Uncertain,
    /// The operation failed.
    Bad,
}

/// A 32-bit result code. The high 16 bits encode severity and the sub-code; the low 16
/// bits carry flags this crate does not interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusCode(pub u32);

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

macro_rules! status_codes {
    ($($name:ident = $value:expr),* $(,)?) => {
        impl StatusCode {
            $(
                #[allow(missing_docs)]
                pub const $name: StatusCode = StatusCode($value);
            )*
        }
    };
}

status_codes! {
    Good = 0x0000_0000,
    GoodCallAgain = 0x0002_0000,
    UncertainTimestampsToReturn = 0x4320_0000,
    BadUnexpectedError = 0x8001_0000,
    BadInternalError = 0x8002_0000,
    BadOutOfMemory = 0x8003_0000,
    BadNotImplemented = 0x8004_0000,
    BadTimeout = 0x800A_0000,
    BadServiceUnsupported = 0x800B_0000,
    BadShutdown = 0x800C_0000,
    BadNoCommunication = 0x800D_0000,
    BadRequestTooLarge = 0x8083_0000,
    BadResponseTooLarge = 0x8084_0000,
    BadInvalidState = 0x8010_0000,
    BadSessionIdInvalid = 0x8026_0000,
    BadSessionClosed = 0x8027_0000,
    BadSessionNotActivated = 0x8028_0000,
    BadSecureChannelIdInvalid = 0x8023_0000,
    BadSecureChannelClosed = 0x8086_0000,
    BadSequenceNumberInvalid = 0x8087_0000,
    BadTcpMessageTypeInvalid = 0x807C_0000,
    BadDecodingError = 0x8007_0000,
    BadEncodingError = 0x8006_0000,
    BadEncodingLimitsExceeded = 0x8008_0000,
    BadAttributeIdInvalid = 0x8035_0000,
    BadTypeMismatch = 0x8036_0000,
    BadNodeIdInvalid = 0x8033_0000,
    BadNodeIdUnknown = 0x8034_0000,
    BadNodeIdExists = 0x803E_0000,
    BadNotReadable = 0x803A_0000,
    BadNotWritable = 0x803B_0000,
    BadNoMatch = 0x8039_0000,
    BadNothingToDo = 0x800F_0000,
    BadTooManyOperations = 0x8092_0000,
    BadConnectionClosed = 0x80AE_0000,
    BadNonceInvalid = 0x8048_0000,
    BadCertificateInvalid = 0x8045_0000,
    BadDuplicateReferenceNotAllowed = 0x80BC_0000,
    BadViewParameterMismatch = 0x80CB_0000,
}

impl StatusCode {
    /// Severity classification of this code.
    pub fn severity(&self) -> Severity {
        match self.0 & 0xC000_0000 {
            0x0000_0000 => Severity::Good,
            0x4000_0000 => Severity::Uncertain,
            _ => Severity::Bad,
        }
    }

    /// `true` if this is a `Good`-severity code (possibly with sub-flags).
    pub fn is_good(&self) -> bool {
        self.severity() == Severity::Good
    }

    /// `true` if this is a `Bad`-severity code.
    pub fn is_bad(&self) -> bool {
        self.severity() == Severity::Bad
    }

    /// `true` if this is an `Uncertain`-severity code.
    pub fn is_uncertain(&self) -> bool {
        self.severity() == Severity::Uncertain
    }

    /// The name part (severity+code, masking out the low 16 flag bits).
    pub fn name_bits(&self) -> u32 {
        self.0 & 0xFFFF_0000
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        StatusCode(value)
    }
}

impl From<StatusCode> for u32 {
    fn from(value: StatusCode) -> Self {
        value.0
    }
}

impl BinaryEncodable for StatusCode {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: std::io::Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        process_encode_io_result(stream.write_u32::<LittleEndian>(self.0))
    }
}

impl BinaryDecodable for StatusCode {
    fn decode<S: std::io::Read + ?Sized>(
        stream: &mut S,
        _options: &DecodingOptions,
    ) -> EncodingResult<Self> {
        Ok(StatusCode(process_decode_io_result(
            stream.read_u32::<LittleEndian>(),
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(StatusCode::Good.is_good());
        assert!(StatusCode::BadTimeout.is_bad());
        assert!(StatusCode::UncertainTimestampsToReturn.is_uncertain());
    }
}
