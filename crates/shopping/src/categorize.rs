//! Keyword based category suggestions.
//!
//! A product name is matched against every category keyword by substring
//! containment. The category owning the longest matching keyword wins, so
//! "hammer" (Tools) beats "ham" (Meat) for the input "Hammer". Equal lengths
//! are resolved by the order of the categories passed in.

use entities::Category;
use serde::Serialize;
use uuid::Uuid;

/// A category suggested for a product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub category_id: Uuid,
    pub category_name: String,
    /// Unit to pre-fill the quantity with, if the category has one.
    pub default_unit: Option<String>,
    /// Keyword that decided the match.
    pub matched_keyword: String,
}

/// Returns the category whose longest keyword occurs in `product_name`.
///
/// Returns `None` for blank names and when no keyword matches.
pub fn suggest_category<'a>(product_name: &str, categories: &'a [Category]) -> Option<&'a Category> {
    best_match(product_name, categories).map(|(category, _)| category)
}

/// Same as [`suggest_category`], returning the details a product form needs.
pub fn suggest(product_name: &str, categories: &[Category]) -> Option<Suggestion> {
    best_match(product_name, categories).map(|(category, keyword)| Suggestion {
        category_id: category.id,
        category_name: category.name.clone(),
        default_unit: category.default_unit.clone(),
        matched_keyword: keyword.to_string(),
    })
}

fn best_match<'a>(product_name: &str, categories: &'a [Category]) -> Option<(&'a Category, &'a str)> {
    let name = product_name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }

    let mut best: Option<(&Category, &str, usize)> = None;
    for category in categories {
        let Some((keyword, len)) = longest_keyword(&name, category) else {
            continue;
        };
        // strictly longer only: earlier categories keep ties
        if best.is_none_or(|(_, _, best_len)| len > best_len) {
            best = Some((category, keyword, len));
        }
    }

    best.map(|(category, keyword, _)| (category, keyword))
}

fn longest_keyword<'a>(name: &str, category: &'a Category) -> Option<(&'a str, usize)> {
    let mut longest: Option<(&str, usize)> = None;
    for keyword in category.keywords() {
        if keyword.is_empty() || !name.contains(keyword.as_str()) {
            continue;
        }
        let len = keyword.chars().count();
        if longest.is_none_or(|(_, longest_len)| len > longest_len) {
            longest = Some((keyword.as_str(), len));
        }
    }
    longest
}
