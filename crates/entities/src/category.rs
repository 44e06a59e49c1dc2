//! Category entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A grouping label for products, carrying keyword hints and a default unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CategoryData")]
pub struct Category {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lowercase keywords used for auto-categorization.
    keywords: Vec<String>,
    /// Unit suggested for products in this category (e.g. "kg", "L").
    pub default_unit: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

/// Serialized form of a category. Keywords are normalized on the way in.
#[derive(Deserialize)]
struct CategoryData {
    id: Uuid,
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
    default_unit: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryData> for Category {
    fn from(data: CategoryData) -> Self {
        let mut category = Category::new(data.name).with_keywords(data.keywords);
        category.id = data.id;
        category.created_at = data.created_at;
        if let Some(unit) = data.default_unit {
            category = category.with_default_unit(unit);
        }
        category
    }
}

impl Category {
    /// Creates a new category without keywords.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            keywords: Vec::new(),
            default_unit: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the keywords for this category.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_keywords(keywords);
        self
    }

    /// Sets the default unit for this category.
    pub fn with_default_unit(mut self, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        let unit = unit.trim();
        self.default_unit = (!unit.is_empty()).then(|| unit.to_string());
        self
    }

    /// Keywords in insertion order, always lowercase.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Replaces all keywords.
    pub fn set_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords.clear();
        for keyword in keywords {
            self.add_keyword(keyword.as_ref());
        }
    }

    /// Adds a keyword. Returns false when it is blank or already present.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() || self.keywords.contains(&keyword) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }

    /// Removes a keyword, matching case-insensitively.
    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        let before = self.keywords.len();
        self.keywords.retain(|k| *k != keyword);
        self.keywords.len() != before
    }
}
