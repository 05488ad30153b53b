//! Category model - a named slot holding assignable items.

use serde::{Deserialize, Serialize};

/// A category of items, e.g. an equipment slot.
///
/// The name doubles as the grouping key for multi-category selectors, so
/// parallel slots such as "Ring 1" and "Ring 2" must keep their exact names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Items in display order, unique by id
    #[serde(default)]
    pub items: Vec<Item>,
}

/// An item inside a category. Names may repeat across categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Identifier, unique within the owning category
    pub id: String,

    /// Display name
    pub name: String,
}

impl Item {
    pub fn new(id: String, name: String) -> Self {
        Self { id, name }
    }
}

impl Category {
    /// Create a new, empty category.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            items: Vec::new(),
        }
    }

    /// Look up an item by id.
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Remove an item by id. Returns the removed item.
    pub fn remove_item(&mut self, item_id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(index))
    }
}
