//! Attendance-gated item eligibility.
//!
//! A member is eligible for an item when they attended at least
//! [`ATTENDANCE_THRESHOLD`] of the tracked events and hold an assignment for
//! it within the selector's candidate categories. A concrete category
//! selector is the one-category case and matches the exact item id. Group
//! selectors widen the candidate set to parallel slots and match by item
//! name, so a ring catalogued under "Ring 1" also matches its twin under
//! "Ring 2".
//!
//! Evaluation never fails: unknown selectors, unknown items and stale
//! assignments all degrade to "no match".

use crate::models::{Assignment, Category, Member, ATTENDANCE_THRESHOLD};
use crate::roster::Roster;
use crate::selector::CategorySelector;

/// Candidate categories plus the item being distributed.
#[derive(Debug, Clone)]
pub struct MatchScope<'a> {
    categories: Vec<&'a Category>,
    item_name: &'a str,
    /// Set for concrete selectors: assignments must name this exact item.
    exact_item_id: Option<&'a str>,
}

impl<'a> MatchScope<'a> {
    /// Resolve the candidate set and target item name.
    ///
    /// Returns `None` when no candidate category holds `item_id`. When
    /// several do, the first in roster order supplies the name.
    pub fn resolve(roster: &'a Roster, selector: &CategorySelector, item_id: &str) -> Option<Self> {
        let categories: Vec<&Category> = roster
            .categories
            .iter()
            .filter(|category| selector.selects(category))
            .collect();

        let item = categories
            .iter()
            .copied()
            .find_map(|category| category.item(item_id))?;

        let exact_item_id = match selector {
            CategorySelector::Category(_) => Some(item.id.as_str()),
            CategorySelector::Group(_) => None,
        };

        Some(Self {
            categories,
            item_name: item.name.as_str(),
            exact_item_id,
        })
    }

    /// Name of the item being distributed.
    pub fn item_name(&self) -> &str {
        self.item_name
    }

    pub fn categories(&self) -> &[&'a Category] {
        &self.categories
    }

    /// Whether an assignment names the target item inside the candidate set.
    ///
    /// Concrete scopes compare item ids; group scopes compare item names.
    pub fn covers(&self, assignment: &Assignment) -> bool {
        let Some(category) = self
            .categories
            .iter()
            .find(|category| category.id == assignment.category_id)
        else {
            return false;
        };

        match category.item(&assignment.item_id) {
            Some(item) => match self.exact_item_id {
                Some(item_id) => item.id == item_id,
                None => item.name == self.item_name,
            },
            None => {
                tracing::debug!(
                    category_id = %assignment.category_id,
                    item_id = %assignment.item_id,
                    "skipping assignment to a deleted item"
                );
                false
            }
        }
    }

    /// Full eligibility check for one member.
    pub fn admits(&self, member: &Member) -> bool {
        member.attendance.meets_threshold() && member.items.iter().any(|a| self.covers(a))
    }
}

/// Members eligible for `item_id` under `selector`, sorted by name.
///
/// Sorting is plain lexicographic on the name and stable, so members
/// sharing a name keep their roster order.
pub fn evaluate(roster: &Roster, selector: &CategorySelector, item_id: &str) -> Vec<Member> {
    let Some(scope) = MatchScope::resolve(roster, selector, item_id) else {
        tracing::debug!(%selector, item_id, "item not found in selected categories");
        return Vec::new();
    };

    let mut eligible: Vec<Member> = roster
        .members
        .iter()
        .filter(|member| scope.admits(member))
        .cloned()
        .collect();
    eligible.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(
        %selector,
        item = scope.item_name(),
        threshold = ATTENDANCE_THRESHOLD,
        eligible = eligible.len(),
        "evaluated eligibility"
    );
    eligible
}
