// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! `UtcTime`: OPC UA's wire timestamp, 100-nanosecond ticks since 1601-01-01.

use std::io::{Read, Write};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::encoding::{BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult, UaNullable};

/// Ticks per second in the OPC UA epoch (100ns resolution).
const TICKS_PER_SECOND: i64 = 10_000_000;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).unwrap()
}

/// A point in time, encoded on the wire as `i64` ticks (100ns) since 1601-01-01 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTime {
    ticks: i64,
}

impl Default for UtcTime {
    fn default() -> Self {
        UtcTime::null()
    }
}

impl UaNullable for UtcTime {
    fn is_ua_null(&self) -> bool {
        self.ticks == 0
    }
}

impl UtcTime {
    /// The null timestamp (ticks == 0, conventionally 1601-01-01).
    pub fn null() -> Self {
        UtcTime { ticks: 0 }
    }

    /// The current instant.
    pub fn now() -> Self {
        UtcTime::from(Utc::now())
    }

    /// Raw tick count since the OPC UA epoch.
    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Construct directly from a raw tick count.
    pub fn from_ticks(ticks: i64) -> Self {
        UtcTime { ticks }
    }
}

impl From<DateTime<Utc>> for UtcTime {
    fn from(value: DateTime<Utc>) -> Self {
        let delta = value - epoch();
        let ticks = delta.num_nanoseconds().map(|ns| ns / 100).unwrap_or(0);
        UtcTime { ticks }
    }
}

impl From<UtcTime> for DateTime<Utc> {
    fn from(value: UtcTime) -> Self {
        epoch() + Duration::nanoseconds(value.ticks.saturating_mul(100))
    }
}

impl BinaryEncodable for UtcTime {
    fn byte_len(&self) -> usize {
        8
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.ticks.encode(stream)
    }
}

impl BinaryDecodable for UtcTime {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let ticks = i64::decode(stream, options)?;
        Ok(UtcTime { ticks })
    }
}

#[allow(dead_code)]
const _UNUSED_TICKS_PER_SECOND_CHECK: i64 = TICKS_PER_SECOND;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_through_wire_encoding() {
        let options = DecodingOptions::default();
        let now = UtcTime::now();
        let mut buf = Vec::new();
        now.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(UtcTime::decode(&mut cursor, &options).unwrap(), now);
    }

    #[test]
    fn null_time_is_zero_ticks() {
        assert!(UtcTime::null().is_ua_null());
        assert_eq!(UtcTime::null().ticks(), 0);
    }

    #[test]
    fn converts_to_and_from_chrono() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let ua: UtcTime = dt.into();
        let back: DateTime<Utc> = ua.into();
        assert_eq!(back, dt);
    }
}
