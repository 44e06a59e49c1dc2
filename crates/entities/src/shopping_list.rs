//! Shopping list entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntityError, EntityResult, error::normalize_name};

/// A product placed on a shopping list.
///
/// Checked state belongs to the entry, so the same product can be ticked off
/// on one list and still be pending on another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning list ID.
    pub list_id: Uuid,
    /// Referenced product ID.
    pub product_id: Uuid,
    /// Whether the product has been picked up on this list.
    pub is_checked: bool,
    /// When the product was added to the list.
    pub added_at: DateTime<Utc>,
}

impl ShoppingListItem {
    /// Creates a new unchecked item.
    pub fn new(list_id: Uuid, product_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            list_id,
            product_id,
            is_checked: false,
            added_at: Utc::now(),
        }
    }
}

/// Checked and total item counts of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListProgress {
    pub total: usize,
    pub checked: usize,
}

impl ListProgress {
    /// Whether every item has been checked. False for an empty list.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.checked == self.total
    }
}

/// A named shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShoppingListData")]
pub struct ShoppingList {
    /// Unique identifier.
    pub id: Uuid,
    /// List name.
    name: String,
    /// Entries, at most one per product.
    items: Vec<ShoppingListItem>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ShoppingListData {
    id: Uuid,
    name: String,
    #[serde(default)]
    items: Vec<ShoppingListItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShoppingListData> for ShoppingList {
    type Error = EntityError;

    fn try_from(data: ShoppingListData) -> EntityResult<Self> {
        Ok(ShoppingList::from_parts(
            data.id,
            normalize_name(data.name)?,
            data.items,
            data.created_at,
            data.updated_at,
        ))
    }
}

impl ShoppingList {
    /// Creates a new empty list.
    pub fn new(name: impl Into<String>) -> EntityResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(name)?,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a list from stored parts. Repeated products keep their first entry.
    pub fn from_parts(
        id: Uuid,
        name: String,
        items: Vec<ShoppingListItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut list = Self {
            id,
            name,
            items: Vec::with_capacity(items.len()),
            created_at,
            updated_at,
        };
        for item in items {
            if !list.contains(item.product_id) {
                list.items.push(item);
            }
        }
        list
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// Renames the list.
    pub fn rename(&mut self, name: impl Into<String>) -> EntityResult<()> {
        self.name = normalize_name(name)?;
        self.touch();
        Ok(())
    }

    /// Returns the entry for a product.
    pub fn item(&self, product_id: Uuid) -> Option<&ShoppingListItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.item(product_id).is_some()
    }

    /// Whether the product is on this list and checked.
    pub fn is_checked(&self, product_id: Uuid) -> bool {
        self.item(product_id).is_some_and(|i| i.is_checked)
    }

    /// Adds a product. Adding a product that is already listed is a no-op
    /// and returns false.
    pub fn add_product(&mut self, product_id: Uuid) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.items.push(ShoppingListItem::new(self.id, product_id));
        self.touch();
        true
    }

    /// Removes a product. Returns false if it was not listed.
    pub fn remove_product(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before {
            return false;
        }
        self.touch();
        true
    }

    /// Flips the checked state. Returns the new state, or None if the
    /// product is not listed.
    pub fn toggle_product(&mut self, product_id: Uuid) -> Option<bool> {
        let item = self.items.iter_mut().find(|i| i.product_id == product_id)?;
        item.is_checked = !item.is_checked;
        let checked = item.is_checked;
        self.touch();
        Some(checked)
    }

    /// Sets the checked state. Returns false if the product is not listed.
    pub fn set_checked(&mut self, product_id: Uuid, checked: bool) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) else {
            return false;
        };
        if item.is_checked != checked {
            item.is_checked = checked;
            self.touch();
        }
        true
    }

    /// Unchecks every item. Returns how many were checked.
    pub fn clear_checked(&mut self) -> usize {
        let mut cleared = 0;
        for item in self.items.iter_mut().filter(|i| i.is_checked) {
            item.is_checked = false;
            cleared += 1;
        }
        if cleared > 0 {
            self.touch();
        }
        cleared
    }

    pub fn progress(&self) -> ListProgress {
        ListProgress {
            total: self.items.len(),
            checked: self.items.iter().filter(|i| i.is_checked).count(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
