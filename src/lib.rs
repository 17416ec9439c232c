/*!
 # Alarm slot records for microcontroller alarm schedulers

 A Rust library for building and storing the 8-byte alarm
 records that a microcontroller keeps in EEPROM or RAM and hands to its
 hardware timer/alarm library.

 ## Features

 * Fixed 8-byte `AlarmRecord` layout with no padding
 * Byte codec matching the stored layout
 * Optional range checks for the time fields
 * Day-of-week bitmask vocabulary
 * Fixed-size slot tables and their raw images
 * TOML alarm files

 ## Example

 ```rust
 use alarm_slots::*;

 fn main() -> Result<()> {
     let alarm = AlarmRecord::new(1, 0, WEEK_DAYS.tuesday, 7, 30, 0, 5, true);
     assert_eq!(alarm.to_bytes(), [0x01, 0x00, 0x02, 0x07, 0x1e, 0x00, 0x05, 0x01]);

     let mut table = AlarmTable::new(16)?;
     table.insert(alarm)?;
     assert_eq!(table.to_image().len(), 16 * RECORD_SIZE);

     Ok(())
 }
 ```
*/

use thiserror::Error;

/// Error types for the alarm slot library
#[derive(Error, Debug)]
pub enum Error {
    /// Byte buffer has the wrong length
    #[error("Expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Field value out of range
    #[error("{0} value {1} out of range (0..={2})")]
    ValueOutOfRange(&'static str, u8, u8),

    /// Day name that `parse_days` does not know
    #[error("Unknown day: {0}")]
    UnknownDay(String),

    /// Table created with an unusable number of slots
    #[error("Invalid slot count {0} (1..=256)")]
    InvalidSlotCount(usize),

    /// Record id does not address a slot of the table
    #[error("Slot {id} out of range for a table with {capacity} slots")]
    SlotOutOfRange { id: u8, capacity: usize },

    /// Record stored at a slot that does not match its id
    #[error("Record with id {id} found in slot {slot}")]
    SlotMismatch { slot: usize, id: u8 },

    /// Two alarms claim the same slot
    #[error("More than one alarm for slot {id}")]
    DuplicateSlot { id: u8 },

    /// Malformed hex input
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// I/O error while reading or writing files
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Alarm file could not be parsed
    #[error(transparent)]
    ConfigParse(#[from] toml::de::Error),

    /// Alarm file could not be written
    #[error(transparent)]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
pub mod record;
pub mod schedule;
pub mod table;

pub use config::AlarmFile;
pub use record::{decode_hex, encode_hex, AlarmRecord, RECORD_SIZE};
pub use schedule::{parse_days, Days, WEEK_DAYS};
pub use table::{AlarmTable, MAX_SLOTS};
