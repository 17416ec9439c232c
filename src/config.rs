/*!
 # Alarm files

 Alarm tables kept as TOML on the host, one `[[alarms]]` entry per record:

 ```toml
 slots = 16

 [[alarms]]
 alarm_id = 1
 id = 0
 day_of_week = 0x1f
 hour = 7
 minute = 30
 second = 0
 function_name = 5
 is_active = true
 ```
*/

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::record::AlarmRecord;
use crate::table::AlarmTable;
use crate::{Error, Result};

#[inline]
#[must_use]
pub const fn default_slots() -> u16 {
    16
}

/// Alarm table stored as TOML, one `[[alarms]]` entry per record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmFile {
    #[serde(default = "default_slots")]
    pub slots: u16,
    #[serde(default)]
    pub alarms: Vec<AlarmRecord>,
}

impl Default for AlarmFile {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            alarms: vec![],
        }
    }
}

impl AlarmFile {
    /// Parses an alarm file from TOML source
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Renders the alarm file as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Reads and parses an alarm file
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let file = Self::from_toml(&source)?;
        debug!("Loaded {} alarms", file.alarms.len());
        Ok(file)
    }

    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let source = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, source)?;
        info!("Saved {} alarms to {}", self.alarms.len(), path.display());
        Ok(())
    }

    /// Builds the slot table. Each slot may be claimed by one alarm only.
    pub fn into_table(self) -> Result<AlarmTable> {
        let mut table = AlarmTable::new(usize::from(self.slots))?;
        for alarm in self.alarms {
            if table.insert(alarm)?.is_some() {
                warn!("Slot {} is claimed by more than one alarm", alarm.id);
                return Err(Error::DuplicateSlot { id: alarm.id });
            }
        }
        Ok(table)
    }

    /// Like [`AlarmFile::into_table`], but first rejects alarms whose time is
    /// not a valid wall-clock time
    pub fn into_validated_table(self) -> Result<AlarmTable> {
        for alarm in &self.alarms {
            alarm.validate().inspect_err(|e| {
                warn!("Alarm in slot {} rejected: {}", alarm.id, e);
            })?;
        }
        self.into_table()
    }

    /// Collects the occupied slots of a table
    pub fn from_table(table: &AlarmTable) -> Result<Self> {
        let slots = u16::try_from(table.capacity())
            .map_err(|_| Error::InvalidSlotCount(table.capacity()))?;
        Ok(Self {
            slots,
            alarms: table.iter().copied().collect(),
        })
    }

    /// Decodes a raw table image into an alarm file
    #[instrument(skip(image), fields(len = image.len()))]
    pub fn from_image(image: &[u8]) -> Result<Self> {
        Self::from_table(&AlarmTable::from_image(image)?)
    }
}
