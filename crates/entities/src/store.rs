//! Store entity definitions.

use std::{collections::HashSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntityError, EntityResult};

/// Kind of store. Decides which categories a new store starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Supermarket or grocery store.
    #[default]
    Grocery,
    /// Pharmacy.
    Pharmacy,
    /// Hardware or DIY store.
    Hardware,
    /// Small convenience store.
    Convenience,
}

impl StoreType {
    /// All store types.
    pub const ALL: [StoreType; 4] = [
        StoreType::Grocery,
        StoreType::Pharmacy,
        StoreType::Hardware,
        StoreType::Convenience,
    ];

    /// Returns the string representation used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Grocery => "grocery",
            StoreType::Pharmacy => "pharmacy",
            StoreType::Hardware => "hardware",
            StoreType::Convenience => "convenience",
        }
    }

    /// Category names a new store of this type is arranged by, in aisle order.
    pub fn default_category_names(&self) -> &'static [&'static str] {
        match self {
            StoreType::Grocery => &[
                "Fruits & Vegetables",
                "Bakery",
                "Dairy",
                "Meat",
                "Fish & Seafood",
                "Pantry",
                "Canned Goods",
                "Spices & Condiments",
                "Snacks",
                "Beverages",
                "Frozen",
                "Household",
                "Personal Care",
                "Baby",
            ],
            StoreType::Pharmacy => &["Medicine", "First Aid", "Personal Care", "Baby"],
            StoreType::Hardware => &[
                "Tools",
                "Fasteners",
                "Paint",
                "Electrical",
                "Garden",
                "Household",
            ],
            StoreType::Convenience => &[
                "Bakery",
                "Dairy",
                "Snacks",
                "Beverages",
                "Frozen",
                "Household",
                "Personal Care",
            ],
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grocery" => Ok(StoreType::Grocery),
            "pharmacy" => Ok(StoreType::Pharmacy),
            "hardware" => Ok(StoreType::Hardware),
            "convenience" => Ok(StoreType::Convenience),
            _ => Err(EntityError::UnknownStoreType(s.to_string())),
        }
    }
}

/// Geographic location of a store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Human readable address, if known.
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }

    /// Sets the address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// A physical store with its own arrangement of categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreData")]
pub struct Store {
    /// Unique identifier.
    pub id: Uuid,
    /// Store name.
    pub name: String,
    /// Store type.
    pub store_type: StoreType,
    /// Where the store is.
    pub location: Location,
    /// Category IDs in shopping order. Holds no duplicates.
    category_order: Vec<Uuid>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StoreData {
    id: Uuid,
    name: String,
    store_type: StoreType,
    location: Location,
    #[serde(default)]
    category_order: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreData> for Store {
    type Error = EntityError;

    fn try_from(data: StoreData) -> EntityResult<Self> {
        let mut store = Store::new(data.name, data.store_type, data.location)
            .with_category_order(data.category_order)?;
        store.id = data.id;
        store.created_at = data.created_at;
        store.updated_at = data.updated_at;
        Ok(store)
    }
}

impl Store {
    /// Creates a new store with an empty category order.
    pub fn new(name: impl Into<String>, store_type: StoreType, location: Location) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            store_type,
            location,
            category_order: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the category order for this store.
    pub fn with_category_order(mut self, order: Vec<Uuid>) -> EntityResult<Self> {
        self.set_category_order(order)?;
        Ok(self)
    }

    /// Category IDs in shopping order.
    pub fn category_order(&self) -> &[Uuid] {
        &self.category_order
    }

    /// Replaces the category order, rejecting duplicates.
    pub fn set_category_order(&mut self, order: Vec<Uuid>) -> EntityResult<()> {
        let mut seen = HashSet::with_capacity(order.len());
        if let Some(duplicate) = order.iter().find(|id| !seen.insert(**id)) {
            return Err(EntityError::DuplicateCategory(*duplicate));
        }
        self.category_order = order;
        self.touch();
        Ok(())
    }

    /// Whether the category belongs to this store.
    pub fn contains_category(&self, category_id: Uuid) -> bool {
        self.category_order.contains(&category_id)
    }

    /// Appends a category. Returns false if it was already present.
    pub fn add_category(&mut self, category_id: Uuid) -> bool {
        if self.contains_category(category_id) {
            return false;
        }
        self.category_order.push(category_id);
        self.touch();
        true
    }

    /// Removes a category. Returns false if it was not present.
    pub fn remove_category(&mut self, category_id: Uuid) -> bool {
        let Some(position) = self.category_order.iter().position(|id| *id == category_id) else {
            return false;
        };
        self.category_order.remove(position);
        self.touch();
        true
    }

    /// Moves the category at `from` so that it ends up at `to`.
    pub fn move_category(&mut self, from: usize, to: usize) -> EntityResult<()> {
        let len = self.category_order.len();
        for position in [from, to] {
            if position >= len {
                return Err(EntityError::PositionOutOfRange { position, len });
            }
        }
        if from != to {
            let category_id = self.category_order.remove(from);
            self.category_order.insert(to, category_id);
            self.touch();
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
