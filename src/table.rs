/*!
 # Alarm slot tables

 A fixed number of slots, each holding at most one record whose `id`
 equals the slot index. The raw image is the records laid end to end,
 which is how the microcontroller keeps them in EEPROM.
*/

use tracing::{debug, instrument, trace, warn};

use crate::record::{AlarmRecord, RECORD_SIZE};
use crate::{Error, Result};

/// Largest table addressable by a `u8` slot id
pub const MAX_SLOTS: usize = u8::MAX as usize + 1;

/// Fixed-size table of alarm records indexed by slot id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmTable {
    slots: Vec<Option<AlarmRecord>>,
}

impl AlarmTable {
    /// Creates an empty table with `slots` slots (1-256)
    pub fn new(slots: usize) -> Result<Self> {
        if slots == 0 || slots > MAX_SLOTS {
            return Err(Error::InvalidSlotCount(slots));
        }
        Ok(Self {
            slots: vec![None; slots],
        })
    }

    /// Number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Stores a record in the slot named by its `id`, returning the previous occupant
    #[instrument(skip(self), fields(capacity = self.capacity()))]
    pub fn insert(&mut self, record: AlarmRecord) -> Result<Option<AlarmRecord>> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(usize::from(record.id))
            .ok_or(Error::SlotOutOfRange {
                id: record.id,
                capacity,
            })?;

        let previous = slot.replace(record);
        if previous.is_some() {
            debug!("Replaced alarm in slot {}", record.id);
        } else {
            trace!("Stored alarm in slot {}", record.id);
        }
        Ok(previous)
    }

    #[must_use]
    pub fn get(&self, id: u8) -> Option<&AlarmRecord> {
        self.slots.get(usize::from(id)).and_then(Option::as_ref)
    }

    /// Mutable access to a stored record. Changing its `id` is not reflected in the slot.
    pub fn get_mut(&mut self, id: u8) -> Option<&mut AlarmRecord> {
        self.slots.get_mut(usize::from(id)).and_then(Option::as_mut)
    }

    /// Empties a slot, returning its record
    pub fn remove(&mut self, id: u8) -> Option<AlarmRecord> {
        self.slots.get_mut(usize::from(id)).and_then(Option::take)
    }

    /// Finds the record registered under a timer library id
    #[must_use]
    pub fn find_by_alarm_id(&self, alarm_id: u8) -> Option<&AlarmRecord> {
        self.iter().find(|record| record.alarm_id == alarm_id)
    }

    /// Occupied slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = &AlarmRecord> {
        self.slots.iter().flatten()
    }

    /// Active records in slot order
    pub fn active(&self) -> impl Iterator<Item = &AlarmRecord> {
        self.iter().filter(|record| record.is_active)
    }

    /// Encodes every slot, writing empty slots as zero bytes
    #[must_use]
    pub fn to_image(&self) -> Vec<u8> {
        self.slots
            .iter()
            .flat_map(|slot| slot.map_or([0; RECORD_SIZE], |record| record.to_bytes()))
            .collect()
    }

    /// Decodes a raw image.
    ///
    /// All-zero chunks are empty slots. Every other chunk must carry the id of
    /// the slot it sits in.
    #[instrument(skip(image), fields(len = image.len()))]
    pub fn from_image(image: &[u8]) -> Result<Self> {
        if image.is_empty() || image.len() % RECORD_SIZE != 0 {
            return Err(Error::InvalidLength {
                expected: image.len().next_multiple_of(RECORD_SIZE).max(RECORD_SIZE),
                actual: image.len(),
            });
        }

        let mut table = Self::new(image.len() / RECORD_SIZE)?;
        for (slot, chunk) in image.chunks_exact(RECORD_SIZE).enumerate() {
            if chunk.iter().all(|b| *b == 0) {
                continue;
            }
            let record = AlarmRecord::try_from(chunk)?;
            if usize::from(record.id) != slot {
                warn!("Slot {} holds a record with id {}", slot, record.id);
                return Err(Error::SlotMismatch {
                    slot,
                    id: record.id,
                });
            }
            table.slots[slot] = Some(record);
        }

        debug!(
            "Decoded image with {} of {} slots in use",
            table.len(),
            table.capacity()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alarm(id: u8, alarm_id: u8, active: bool) -> AlarmRecord {
        AlarmRecord::new(alarm_id, id, 0x1f, 6, 45, 0, 2, active)
    }

    #[test]
    fn slot_count_must_fit_a_byte_id() {
        assert!(matches!(AlarmTable::new(0), Err(Error::InvalidSlotCount(0))));
        assert!(matches!(
            AlarmTable::new(257),
            Err(Error::InvalidSlotCount(257))
        ));
        assert_eq!(AlarmTable::new(256).unwrap().capacity(), 256);
    }

    #[test]
    fn insert_uses_record_id_as_slot() {
        let mut table = AlarmTable::new(4).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.insert(alarm(2, 7, true)).unwrap(), None);
        assert_eq!(table.get(2), Some(&alarm(2, 7, true)));
        assert_eq!(table.get(1), None);
        assert_eq!(table.len(), 1);

        let previous = table.insert(alarm(2, 8, false)).unwrap();
        assert_eq!(previous, Some(alarm(2, 7, true)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn insert_rejects_ids_past_capacity() {
        let mut table = AlarmTable::new(4).unwrap();
        assert!(matches!(
            table.insert(alarm(4, 1, true)),
            Err(Error::SlotOutOfRange { id: 4, capacity: 4 })
        ));
    }

    #[test]
    fn lookups_and_removal() {
        let mut table = AlarmTable::new(8).unwrap();
        table.insert(alarm(0, 10, true)).unwrap();
        table.insert(alarm(3, 11, false)).unwrap();
        table.insert(alarm(5, 12, true)).unwrap();

        assert_eq!(table.find_by_alarm_id(11).map(|r| r.id), Some(3));
        assert_eq!(table.find_by_alarm_id(99), None);
        assert_eq!(
            table.active().map(|r| r.id).collect::<Vec<_>>(),
            vec![0, 5]
        );

        if let Some(record) = table.get_mut(3) {
            record.activate();
        }
        assert_eq!(table.active().count(), 3);

        assert_eq!(table.remove(0).map(|r| r.alarm_id), Some(10));
        assert_eq!(table.remove(0), None);
        assert_eq!(table.remove(200), None);
        assert_eq!(table.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn image_places_slot_at_its_offset() {
        let mut table = AlarmTable::new(3).unwrap();
        table.insert(alarm(1, 9, true)).unwrap();

        let image = table.to_image();
        assert_eq!(image.len(), 3 * RECORD_SIZE);
        assert_eq!(&image[..8], &[0; 8]);
        assert_eq!(&image[8..16], &alarm(1, 9, true).to_bytes());
        assert_eq!(&image[16..], &[0; 8]);

        assert_eq!(AlarmTable::from_image(&image).unwrap(), table);
    }

    #[test]
    fn all_zero_record_reads_back_as_empty_slot() {
        let mut table = AlarmTable::new(2).unwrap();
        table.insert(AlarmRecord::default()).unwrap();
        assert_eq!(table.len(), 1);

        let decoded = AlarmTable::from_image(&table.to_image()).unwrap();
        assert_eq!(decoded.len(), 0);
        assert_eq!(decoded.get(0), None);
        assert_eq!(decoded.to_image(), table.to_image());

        let mut active = AlarmRecord::default();
        active.activate();
        table.insert(active).unwrap();
        let decoded = AlarmTable::from_image(&table.to_image()).unwrap();
        assert_eq!(decoded.get(0), Some(&active));
    }

    #[test]
    fn image_length_must_be_whole_records() {
        assert!(matches!(
            AlarmTable::from_image(&[]),
            Err(Error::InvalidLength { actual: 0, .. })
        ));
        assert!(matches!(
            AlarmTable::from_image(&[0; 12]),
            Err(Error::InvalidLength {
                expected: 16,
                actual: 12
            })
        ));
    }

    #[test]
    fn image_rejects_record_in_foreign_slot() {
        let mut image = vec![0; 2 * RECORD_SIZE];
        image[..8].copy_from_slice(&alarm(1, 3, true).to_bytes());
        assert!(matches!(
            AlarmTable::from_image(&image),
            Err(Error::SlotMismatch { slot: 0, id: 1 })
        ));
    }
}
