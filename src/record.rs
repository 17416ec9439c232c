/*!
 # Alarm records

 The fixed 8-byte record shared between the alarm scheduler and the
 application code that stores alarms. Every field is a single byte, in
 storage order:

 | offset | field           |
 |--------|-----------------|
 | 0      | `alarm_id`      |
 | 1      | `id`            |
 | 2      | `day_of_week`   |
 | 3      | `hour`          |
 | 4      | `minute`        |
 | 5      | `second`        |
 | 6      | `function_name` |
 | 7      | `is_active`     |
*/

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::{Error, Result};

/// Size of one record in memory and in storage
pub const RECORD_SIZE: usize = 8;

/// A scheduled alarm as stored by the microcontroller
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlarmRecord {
    /// Id handed out by the timer/alarm library
    pub alarm_id: u8,
    /// Slot index in the backing store
    pub id: u8,
    /// Day-of-week selector, encoding chosen by the caller
    pub day_of_week: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Selector of the action to run when the alarm fires
    pub function_name: u8,
    /// Whether the alarm is enabled
    #[serde(default)]
    pub is_active: bool,
}

const _: () = assert!(std::mem::size_of::<AlarmRecord>() == RECORD_SIZE);
const _: () = assert!(std::mem::align_of::<AlarmRecord>() == 1);

impl AlarmRecord {
    /// Creates a record from its fields. No range checks are made, see [`AlarmRecord::validate`].
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn new(
        alarm_id: u8,
        id: u8,
        day_of_week: u8,
        hour: u8,
        minute: u8,
        second: u8,
        function_name: u8,
        is_active: bool,
    ) -> Self {
        Self {
            alarm_id,
            id,
            day_of_week,
            hour,
            minute,
            second,
            function_name,
            is_active,
        }
    }

    /// Encodes the record in storage order
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        [
            self.alarm_id,
            self.id,
            self.day_of_week,
            self.hour,
            self.minute,
            self.second,
            self.function_name,
            self.is_active as u8,
        ]
    }

    /// Decodes a record from storage order.
    ///
    /// Any nonzero active byte counts as active.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; RECORD_SIZE]) -> Self {
        Self {
            alarm_id: bytes[0],
            id: bytes[1],
            day_of_week: bytes[2],
            hour: bytes[3],
            minute: bytes[4],
            second: bytes[5],
            function_name: bytes[6],
            is_active: bytes[7] != 0,
        }
    }

    /// Enables the alarm
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Disables the alarm
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Sets the trigger time without checking it
    pub fn set_time(&mut self, hour: u8, minute: u8, second: u8) {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
    }

    /// Trigger time, if the time fields form a valid wall-clock time
    #[must_use]
    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }

    /// Checks that the time fields are in range.
    ///
    /// The other fields are opaque and accept any value.
    pub fn validate(&self) -> Result<()> {
        for (field, value, max) in [
            ("hour", self.hour, 23),
            ("minute", self.minute, 59),
            ("second", self.second, 59),
        ] {
            if value > max {
                trace!("{} {} exceeds {}", field, value, max);
                return Err(Error::ValueOutOfRange(field, value, max));
            }
        }
        Ok(())
    }
}

impl From<[u8; RECORD_SIZE]> for AlarmRecord {
    fn from(bytes: [u8; RECORD_SIZE]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<AlarmRecord> for [u8; RECORD_SIZE] {
    fn from(record: AlarmRecord) -> Self {
        record.to_bytes()
    }
}

impl TryFrom<&[u8]> for AlarmRecord {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; RECORD_SIZE] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: RECORD_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self::from_bytes(bytes))
    }
}

impl fmt::Display for AlarmRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot {} (alarm {}) day {:#04x} {:02}:{:02}:{:02} fn {} {}",
            self.id,
            self.alarm_id,
            self.day_of_week,
            self.hour,
            self.minute,
            self.second,
            self.function_name,
            if self.is_active { "active" } else { "inactive" }
        )
    }
}

/// Formats bytes as space separated lowercase hex
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses hex bytes, ignoring whitespace, commas and `0x` prefixes
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|part| part.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();

    if digits.len() % 2 != 0 {
        return Err(Error::InvalidHex(format!("odd number of digits in {input:?}")));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| Error::InvalidHex(format!("bad byte at offset {} in {input:?}", i / 2)))
        })
        .collect()
}
