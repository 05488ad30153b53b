//! Member model - a tracked roster participant.

use super::attendance::Attendance;
use serde::{Deserialize, Serialize};

/// A roster member with attendance history and item assignments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    /// Unique identifier, fixed at creation
    pub id: String,

    /// Display name (not unique)
    pub name: String,

    /// One flag per tracked event
    #[serde(default)]
    pub attendance: Attendance,

    /// Item assignments, at most one per category when written through [`Member::assign`]
    #[serde(default)]
    pub items: Vec<Assignment>,
}

/// A member's claim on one item of one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub category_id: String,
    pub item_id: String,
}

impl Assignment {
    pub fn new(category_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            item_id: item_id.into(),
        }
    }
}

impl Member {
    /// Create a member with no attendance and no items.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            attendance: Attendance::default(),
            items: Vec::new(),
        }
    }

    /// The assignment held for a category, if any.
    pub fn assignment_for(&self, category_id: &str) -> Option<&Assignment> {
        self.items.iter().find(|a| a.category_id == category_id)
    }

    /// Assign an item, replacing whatever the member held in that category.
    ///
    /// Older documents may carry several assignments per category; all of
    /// them are collapsed into the new one.
    pub fn assign(&mut self, category_id: &str, item_id: &str) {
        self.items.retain(|a| a.category_id != category_id);
        self.items.push(Assignment::new(category_id, item_id));
    }

    /// Drop every assignment in a category. Returns whether anything was removed.
    pub fn unassign(&mut self, category_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.category_id != category_id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_member() {
        let member = Member::new("m1".to_string(), "Alice".to_string());
        assert_eq!(member.id, "m1");
        assert_eq!(member.attendance.count(), 0);
        assert!(member.items.is_empty());
    }

    #[test]
    fn assign_replaces_by_category() {
        let mut member = Member::new("m1".to_string(), "Alice".to_string());
        member.assign("c1", "i1");
        member.assign("c2", "i9");
        member.assign("c1", "i2");

        assert_eq!(member.items.len(), 2);
        assert_eq!(member.assignment_for("c1").unwrap().item_id, "i2");
        assert_eq!(member.assignment_for("c2").unwrap().item_id, "i9");
    }

    #[test]
    fn assign_collapses_legacy_duplicates() {
        let mut member = Member::new("m1".to_string(), "Alice".to_string());
        member.items.push(Assignment::new("c1", "i1"));
        member.items.push(Assignment::new("c1", "i2"));

        member.assign("c1", "i3");
        assert_eq!(member.items, vec![Assignment::new("c1", "i3")]);
    }

    #[test]
    fn unassign() {
        let mut member = Member::new("m1".to_string(), "Alice".to_string());
        member.assign("c1", "i1");
        assert!(member.unassign("c1"));
        assert!(!member.unassign("c1"));
        assert!(member.assignment_for("c1").is_none());
    }

    #[test]
    fn reads_legacy_document() {
        let json = r#"{
            "id": "m1",
            "name": "Alice",
            "attendance": [true, false, true],
            "items": [{"categoryId": "c1", "itemId": "i1"}]
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.attendance.count(), 2);
        assert_eq!(member.items, vec![Assignment::new("c1", "i1")]);
    }

    #[test]
    fn missing_fields_default() {
        let member: Member = serde_json::from_str(r#"{"id": "m1", "name": "Bob"}"#).unwrap();
        assert_eq!(member.attendance.count(), 0);
        assert!(member.items.is_empty());
    }
}
