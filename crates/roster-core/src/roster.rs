//! The roster document: members, categories and event metadata.
//!
//! All mutations go through [`Roster`] methods so that write-side rules
//! (trimmed non-blank names, replace-by-category assignment, validated
//! references) hold for every caller. Reads stay lenient: stale references
//! left behind by deletions are skipped, never reported as errors.

use crate::error::{Error, Result};
use crate::ids::generate_id;
use crate::models::{Attendance, Category, EventLabels, Item, Member};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Complete roster snapshot, persisted as a single JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roster {
    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub events: EventLabels,
}

/// An assignment resolved to display names.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAssignment {
    pub category_id: String,
    pub category_name: String,
    pub item_id: String,
    pub item_name: String,
}

fn clean_name(kind: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput(format!("{} name must not be blank", kind)));
    }
    Ok(name.to_string())
}

/// Display ordering for member listings: case-insensitive, then exact.
fn display_order(a: &Member, b: &Member) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

impl Roster {
    // --- Lookups ---

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    fn member_mut(&mut self, id: &str) -> Result<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::MemberNotFound(id.to_string()))
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn category_mut(&mut self, id: &str) -> Result<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }

    /// Resolve a (category, item) reference, `None` if either side is gone.
    pub fn resolve_item(&self, category_id: &str, item_id: &str) -> Option<(&Category, &Item)> {
        let category = self.category(category_id)?;
        let item = category.item(item_id)?;
        Some((category, item))
    }

    /// Members in display order.
    pub fn members_sorted(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.iter().collect();
        members.sort_by(|a, b| display_order(a, b));
        members
    }

    /// A member's assignments with names filled in. Dangling entries are skipped.
    pub fn resolved_assignments(&self, member: &Member) -> Vec<ResolvedAssignment> {
        member
            .items
            .iter()
            .filter_map(|a| {
                let (category, item) = self.resolve_item(&a.category_id, &a.item_id)?;
                Some(ResolvedAssignment {
                    category_id: category.id.clone(),
                    category_name: category.name.clone(),
                    item_id: item.id.clone(),
                    item_name: item.name.clone(),
                })
            })
            .collect()
    }

    /// Number of assignments across all members that no longer resolve.
    pub fn dangling_assignment_count(&self) -> usize {
        self.members
            .iter()
            .flat_map(|m| &m.items)
            .filter(|a| self.resolve_item(&a.category_id, &a.item_id).is_none())
            .count()
    }

    // --- Members ---

    /// Add a member with a fresh id and no attendance.
    pub fn add_member(&mut self, name: &str) -> Result<Member> {
        let member = Member::new(generate_id(), clean_name("member", name)?);
        self.members.push(member.clone());
        Ok(member)
    }

    pub fn rename_member(&mut self, id: &str, name: &str) -> Result<Member> {
        let name = clean_name("member", name)?;
        let member = self.member_mut(id)?;
        member.name = name;
        Ok(member.clone())
    }

    pub fn remove_member(&mut self, id: &str) -> Result<Member> {
        let index = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| Error::MemberNotFound(id.to_string()))?;
        Ok(self.members.remove(index))
    }

    pub fn set_attendance(&mut self, id: &str, attendance: Attendance) -> Result<Member> {
        let member = self.member_mut(id)?;
        member.attendance = attendance;
        Ok(member.clone())
    }

    pub fn set_attendance_slot(&mut self, id: &str, slot: usize, present: bool) -> Result<Member> {
        let member = self.member_mut(id)?;
        member.attendance.set(slot, present)?;
        Ok(member.clone())
    }

    /// Assign an item to a member, replacing their previous pick in that category.
    pub fn assign_item(
        &mut self,
        member_id: &str,
        category_id: &str,
        item_id: &str,
    ) -> Result<Member> {
        let category = self
            .category(category_id)
            .ok_or_else(|| Error::CategoryNotFound(category_id.to_string()))?;
        if category.item(item_id).is_none() {
            return Err(Error::ItemNotFound {
                category_id: category_id.to_string(),
                item_id: item_id.to_string(),
            });
        }
        let member = self.member_mut(member_id)?;
        member.assign(category_id, item_id);
        Ok(member.clone())
    }

    /// Remove a member's assignment in a category. Missing assignments are a no-op.
    pub fn unassign_item(&mut self, member_id: &str, category_id: &str) -> Result<Member> {
        let member = self.member_mut(member_id)?;
        member.unassign(category_id);
        Ok(member.clone())
    }

    // --- Categories and items ---

    pub fn add_category(&mut self, name: &str) -> Result<Category> {
        let category = Category::new(generate_id(), clean_name("category", name)?);
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> Result<Category> {
        let name = clean_name("category", name)?;
        let category = self.category_mut(id)?;
        category.name = name;
        Ok(category.clone())
    }

    /// Remove a category. Member assignments pointing at it are left to dangle.
    pub fn remove_category(&mut self, id: &str) -> Result<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))?;
        Ok(self.categories.remove(index))
    }

    pub fn add_item(&mut self, category_id: &str, name: &str) -> Result<Item> {
        let name = clean_name("item", name)?;
        let category = self.category_mut(category_id)?;
        let item = Item::new(generate_id(), name);
        category.items.push(item.clone());
        Ok(item)
    }

    pub fn rename_item(&mut self, category_id: &str, item_id: &str, name: &str) -> Result<Item> {
        let name = clean_name("item", name)?;
        let category = self.category_mut(category_id)?;
        let item = category.item_mut(item_id).ok_or_else(|| Error::ItemNotFound {
            category_id: category_id.to_string(),
            item_id: item_id.to_string(),
        })?;
        item.name = name;
        Ok(item.clone())
    }

    pub fn remove_item(&mut self, category_id: &str, item_id: &str) -> Result<Item> {
        let category = self.category_mut(category_id)?;
        category.remove_item(item_id).ok_or_else(|| Error::ItemNotFound {
            category_id: category_id.to_string(),
            item_id: item_id.to_string(),
        })
    }

    // --- Events ---

    pub fn set_event_label(&mut self, slot: usize, label: Option<String>) -> Result<()> {
        self.events.set(slot, label)
    }
}
