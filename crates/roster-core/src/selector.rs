//! Category selectors for eligibility queries.

use crate::models::Category;
use std::fmt;

/// Fixed groups of parallel categories searched together by item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    /// Both ring slots
    Ring,
    /// Both archboss weapon slots
    Archboss,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 2] = [CategoryGroup::Ring, CategoryGroup::Archboss];

    /// Selector key used in queries.
    pub fn key(self) -> &'static str {
        match self {
            CategoryGroup::Ring => "ring",
            CategoryGroup::Archboss => "archboss",
        }
    }

    /// Exact category names covered by the group.
    pub fn category_names(self) -> &'static [&'static str] {
        match self {
            CategoryGroup::Ring => &["Ring 1", "Ring 2"],
            CategoryGroup::Archboss => &["Archboss Weap 1", "Archboss Weap 2"],
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.key() == key)
    }

    /// Whether a category belongs to this group.
    pub fn contains(self, category: &Category) -> bool {
        self.category_names().contains(&category.name.as_str())
    }
}

/// Which categories an eligibility query searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategorySelector {
    /// A single category by id
    Category(String),
    /// Every category named in a fixed group
    Group(CategoryGroup),
}

impl CategorySelector {
    /// Parse a raw selector. Group keys take precedence over category ids.
    pub fn parse(raw: &str) -> Self {
        match CategoryGroup::from_key(raw) {
            Some(group) => CategorySelector::Group(group),
            None => CategorySelector::Category(raw.to_string()),
        }
    }

    /// Whether a category falls inside this selector's candidate set.
    pub fn selects(&self, category: &Category) -> bool {
        match self {
            CategorySelector::Category(id) => category.id == *id,
            CategorySelector::Group(group) => group.contains(category),
        }
    }
}

impl From<&str> for CategorySelector {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::Category(id) => f.write_str(id),
            CategorySelector::Group(group) => f.write_str(group.key()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_groups() {
        assert_eq!(CategorySelector::parse("ring"), CategorySelector::Group(CategoryGroup::Ring));
        assert_eq!(
            CategorySelector::parse("archboss"),
            CategorySelector::Group(CategoryGroup::Archboss)
        );
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(CategorySelector::parse("Ring"), CategorySelector::Category("Ring".to_string()));
    }

    #[test]
    fn parse_concrete() {
        assert_eq!(CategorySelector::parse("c1"), CategorySelector::Category("c1".to_string()));
    }

    #[test]
    fn display_round_trips_key() {
        for group in CategoryGroup::ALL {
            assert_eq!(CategorySelector::parse(group.key()).to_string(), group.key());
        }
    }

    #[test]
    fn group_membership_uses_exact_names() {
        let ring2 = Category::new("c2".to_string(), "Ring 2".to_string());
        let ring3 = Category::new("c3".to_string(), "Ring 3".to_string());
        let weapon = Category::new("c4".to_string(), "Archboss Weap 1".to_string());

        assert!(CategorySelector::Group(CategoryGroup::Ring).selects(&ring2));
        assert!(!CategorySelector::Group(CategoryGroup::Ring).selects(&ring3));
        assert!(CategorySelector::Group(CategoryGroup::Archboss).selects(&weapon));
        assert!(CategorySelector::Category("c2".to_string()).selects(&ring2));
        assert!(!CategorySelector::Category("c2".to_string()).selects(&weapon));
    }
}
