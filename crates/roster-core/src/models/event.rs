//! Event slot metadata (labels/dates shown alongside attendance columns).

use super::attendance::EVENT_COUNT;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Optional label for each tracked event slot.
///
/// Purely presentational; eligibility only looks at attendance flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventLabels([Option<String>; EVENT_COUNT]);

impl EventLabels {
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).and_then(|label| label.as_deref())
    }

    /// Set or clear the label of a slot. Blank labels clear it.
    pub fn set(&mut self, slot: usize, label: Option<String>) -> Result<()> {
        let entry = self.0.get_mut(slot).ok_or(Error::SlotOutOfRange {
            slot,
            max: EVENT_COUNT,
        })?;
        *entry = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Ok(())
    }

    pub fn as_slice(&self) -> &[Option<String>] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EventLabels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let stored = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
        let mut labels = Self::default();
        for (slot, label) in labels.0.iter_mut().zip(stored) {
            *slot = label;
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut labels = EventLabels::default();
        labels.set(2, Some(" 2024-05-01 ".to_string())).unwrap();
        assert_eq!(labels.get(2), Some("2024-05-01"));

        labels.set(2, Some("   ".to_string())).unwrap();
        assert_eq!(labels.get(2), None);
    }

    #[test]
    fn out_of_range() {
        let mut labels = EventLabels::default();
        assert!(labels.set(EVENT_COUNT, Some("late".to_string())).is_err());
        assert_eq!(labels.get(EVENT_COUNT), None);
    }

    #[test]
    fn short_document_is_padded() {
        let labels: EventLabels = serde_json::from_str(r#"["Siege", null]"#).unwrap();
        assert_eq!(labels.get(0), Some("Siege"));
        assert_eq!(labels.as_slice().len(), EVENT_COUNT);
    }
}
