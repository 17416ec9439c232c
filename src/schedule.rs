/*!
 # Day-of-week bitmasks

 A bitmask vocabulary for the `day_of_week` byte of an alarm record.
 Records do not require it; callers using another encoding can store
 any byte they like.
*/

use tracing::{debug, instrument, trace};

use crate::{Error, Result};

/// Represents days of the week as bits of the `day_of_week` byte
#[derive(Debug, Clone, Copy)]
pub struct Days {
    /// Monday (0x01)
    pub monday: u8,
    /// Tuesday (0x02)
    pub tuesday: u8,
    /// Wednesday (0x04)
    pub wednesday: u8,
    /// Thursday (0x08)
    pub thursday: u8,
    /// Friday (0x10)
    pub friday: u8,
    /// Saturday (0x20)
    pub saturday: u8,
    /// Sunday (0x40)
    pub sunday: u8,
    /// All days (0x7F)
    pub all: u8,
    /// Week days (Monday-Friday, 0x1F)
    pub week_days: u8,
    /// Weekend days (Saturday-Sunday, 0x60)
    pub weekend_days: u8,
    /// No days (0x00)
    pub none: u8,
}

/// Predefined day constants
pub const WEEK_DAYS: Days = Days {
    monday: 0x01,
    tuesday: 0x02,
    wednesday: 0x04,
    thursday: 0x08,
    friday: 0x10,
    saturday: 0x20,
    sunday: 0x40,
    all: 0x01 | 0x02 | 0x04 | 0x08 | 0x10 | 0x20 | 0x40,
    week_days: 0x01 | 0x02 | 0x04 | 0x08 | 0x10,
    weekend_days: 0x20 | 0x40,
    none: 0x00,
};

/// Parses a days string into a bitmask.
///
/// Accepts day names (`mon`, `monday`, ...), `all`, `weekdays`, `weekend`,
/// `none`, raw numbers (`0x1f`, `31`) and comma separated combinations.
#[instrument]
pub fn parse_days(days: &str) -> Result<u8> {
    let days = days.trim();
    let result = match days.to_lowercase().as_str() {
        "mon" | "monday" => WEEK_DAYS.monday,
        "tue" | "tuesday" => WEEK_DAYS.tuesday,
        "wed" | "wednesday" => WEEK_DAYS.wednesday,
        "thu" | "thursday" => WEEK_DAYS.thursday,
        "fri" | "friday" => WEEK_DAYS.friday,
        "sat" | "saturday" => WEEK_DAYS.saturday,
        "sun" | "sunday" => WEEK_DAYS.sunday,
        "all" => WEEK_DAYS.all,
        "weekdays" => WEEK_DAYS.week_days,
        "weekend" => WEEK_DAYS.weekend_days,
        "none" => WEEK_DAYS.none,
        lower if lower.contains(',') => {
            debug!("Parsing composite days string");
            let mut combined = 0;
            for day in lower.split(',') {
                let day_value = parse_days(day)?;
                debug!("  Day '{}' = {:#04x}", day, day_value);
                combined |= day_value;
            }
            combined
        }
        lower => parse_number(lower).ok_or_else(|| Error::UnknownDay(days.to_string()))?,
    };

    trace!("Days '{}' parsed to bitmask: {:#04x}", days, result);
    Ok(result)
}

fn parse_number(value: &str) -> Option<u8> {
    let (digits, radix) = match value.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u8::from_str_radix(digits, radix).ok()
}
