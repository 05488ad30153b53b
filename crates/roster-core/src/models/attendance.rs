//! Fixed-width attendance record.

use crate::error::{Error, Result};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of tracked event slots.
pub const EVENT_COUNT: usize = 8;

/// Minimum attended events for item eligibility (half of [`EVENT_COUNT`]).
pub const ATTENDANCE_THRESHOLD: usize = EVENT_COUNT / 2;

/// Attendance flags, one per tracked event slot.
///
/// The slot index is the event's identity. Stored documents with the wrong
/// number of flags are repaired on load: extra flags are dropped and missing
/// ones read as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attendance([bool; EVENT_COUNT]);

impl Attendance {
    /// Attendance with every slot marked present or absent.
    pub fn filled(present: bool) -> Self {
        Self([present; EVENT_COUNT])
    }

    /// Build from exactly [`EVENT_COUNT`] flags.
    pub fn try_from_flags(flags: &[bool]) -> Result<Self> {
        if flags.len() != EVENT_COUNT {
            return Err(Error::InvalidInput(format!(
                "attendance needs {} flags, got {}",
                EVENT_COUNT,
                flags.len()
            )));
        }
        Ok(Self::from_flags_lenient(flags))
    }

    /// Build from any number of flags, truncating or padding with `false`.
    pub fn from_flags_lenient(flags: &[bool]) -> Self {
        if flags.len() != EVENT_COUNT {
            tracing::warn!(
                len = flags.len(),
                expected = EVENT_COUNT,
                "attendance length mismatch, clamping"
            );
        }
        let mut slots = [false; EVENT_COUNT];
        for (slot, flag) in slots.iter_mut().zip(flags) {
            *slot = *flag;
        }
        Self(slots)
    }

    /// Number of attended events.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|present| **present).count()
    }

    /// Whether the member attended enough events to be eligible.
    pub fn meets_threshold(&self) -> bool {
        self.count() >= ATTENDANCE_THRESHOLD
    }

    /// Flag for one slot, `None` when out of range.
    pub fn get(&self, slot: usize) -> Option<bool> {
        self.0.get(slot).copied()
    }

    /// Mark one slot present or absent.
    pub fn set(&mut self, slot: usize, present: bool) -> Result<()> {
        let flag = self.0.get_mut(slot).ok_or(Error::SlotOutOfRange {
            slot,
            max: EVENT_COUNT,
        })?;
        *flag = present;
        Ok(())
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

/// One stored attendance entry. Only a literal `true` counts as present.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFlag {
    Flag(bool),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl<'de> Deserialize<'de> for Attendance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let stored = Option::<Vec<StoredFlag>>::deserialize(deserializer)?.unwrap_or_default();
        let malformed = stored
            .iter()
            .filter(|flag| matches!(flag, StoredFlag::Other(_)))
            .count();
        if malformed > 0 {
            tracing::warn!(malformed, "non-boolean attendance entries, reading as absent");
        }
        let flags: Vec<bool> = stored
            .into_iter()
            .map(|flag| matches!(flag, StoredFlag::Flag(true)))
            .collect();
        Ok(Self::from_flags_lenient(&flags))
    }
}
