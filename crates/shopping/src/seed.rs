//! Built-in category catalog.

use entities::{Category, StoreType};
use uuid::Uuid;

/// A category definition in the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySeed {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub default_unit: Option<&'static str>,
}

impl CategorySeed {
    /// Creates a fresh category from this definition.
    pub fn to_category(&self) -> Category {
        let category = Category::new(self.name).with_keywords(self.keywords);
        match self.default_unit {
            Some(unit) => category.with_default_unit(unit),
            None => category,
        }
    }
}

/// Categories created on first run. Keywords cover English and Romanian.
pub const BUILTIN_CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        name: "Fruits & Vegetables",
        keywords: &[
            "apple", "mere", "banana", "orange", "portocale", "lemon", "lamaie", "tomato",
            "rosii", "potato", "cartofi", "onion", "ceapa", "garlic", "usturoi", "carrot",
            "morcov", "lettuce", "salata", "cucumber", "castraveti", "bell pepper", "ardei",
            "vinete", "fruit", "fructe", "vegetable", "legume",
        ],
        default_unit: Some("kg"),
    },
    CategorySeed {
        name: "Bakery",
        keywords: &[
            "bread", "paine", "croissant", "bagel", "baguette", "cake", "prajitura", "covrig",
            "muffin", "bakery",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Dairy",
        keywords: &[
            "milk", "lapte", "cheese", "branza", "yogurt", "iaurt", "butter", "unt", "cream",
            "smantana", "kefir", "lactate",
        ],
        default_unit: Some("L"),
    },
    CategorySeed {
        name: "Meat",
        keywords: &[
            "chicken", "pui", "beef", "vita", "pork", "porc", "ham", "sunca", "sausage",
            "carnati", "steak", "bacon", "salam", "mici", "meat", "carne",
        ],
        default_unit: Some("kg"),
    },
    CategorySeed {
        name: "Fish & Seafood",
        keywords: &[
            "fish", "peste", "salmon", "somon", "tuna", "shrimp", "creveti", "sardine", "hering",
        ],
        default_unit: Some("kg"),
    },
    CategorySeed {
        name: "Pantry",
        keywords: &[
            "rice", "orez", "pasta", "paste", "flour", "faina", "sugar", "zahar", "oats", "ovaz",
            "cereal", "honey", "miere", "peanut butter",
        ],
        default_unit: Some("kg"),
    },
    CategorySeed {
        name: "Canned Goods",
        keywords: &[
            "canned", "conserva", "beans", "fasole", "soup", "supa", "tomato paste", "bulion",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Spices & Condiments",
        keywords: &[
            "salt", "sare", "pepper", "piper", "ketchup", "mustard", "mustar", "oil", "ulei",
            "vinegar", "otet", "mayonnaise", "maioneza", "spice", "condiment",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Snacks",
        keywords: &[
            "chips", "chipsuri", "cookies", "biscuiti", "chocolate", "ciocolata", "candy",
            "bomboane", "nuts", "nuci", "popcorn", "crackers",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Beverages",
        keywords: &[
            "water", "apa", "juice", "orange juice", "suc", "soda", "coffee", "cafea", "tea",
            "ceai", "beer", "bere", "wine", "vin",
        ],
        default_unit: Some("L"),
    },
    CategorySeed {
        name: "Frozen",
        keywords: &["frozen", "congelat", "ice cream", "inghetata", "pizza"],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Household",
        keywords: &[
            "detergent", "soap", "sapun", "bleach", "inalbitor", "sponge", "burete",
            "toilet paper", "hartie igienica", "trash bags", "saci menajeri", "dishwasher",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Personal Care",
        keywords: &[
            "shampoo", "sampon", "toothpaste", "pasta de dinti", "toothbrush", "periuta",
            "deodorant", "razor", "aparat de ras", "lotion", "nail polish",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Baby",
        keywords: &[
            "diaper", "scutece", "baby food", "formula", "wipes", "servetele umede",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Medicine",
        keywords: &[
            "aspirin", "ibuprofen", "paracetamol", "nurofen", "pills", "pastile", "syrup",
            "sirop", "vitamin", "antibiotic",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "First Aid",
        keywords: &[
            "bandage", "bandaj", "plaster", "antiseptic", "gauze", "tifon", "alcohol sanitar",
            "thermometer", "termometru",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Tools",
        keywords: &[
            "hammer", "ciocan", "screwdriver", "surubelnita", "wrench", "drill", "bormasina",
            "saw", "fierastrau", "pliers", "cleste", "tape measure", "ruleta",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Fasteners",
        keywords: &[
            "screw", "surub", "nail", "cui", "bolt", "piulita", "dowel", "diblu", "washer",
            "saiba",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Paint",
        keywords: &[
            "paint", "vopsea", "primer", "grund", "brush", "pensula", "roller", "trafalet",
        ],
        default_unit: Some("L"),
    },
    CategorySeed {
        name: "Electrical",
        keywords: &[
            "bulb", "bec", "cable", "cablu", "battery", "baterie", "switch", "priza", "socket",
            "fuse", "siguranta", "extension cord", "prelungitor",
        ],
        default_unit: Some("pcs"),
    },
    CategorySeed {
        name: "Garden",
        keywords: &[
            "seeds", "seminte", "soil", "pamant", "hose", "furtun", "fertilizer", "ingrasamant",
            "rake", "grebla", "flower pot", "ghiveci",
        ],
        default_unit: Some("pcs"),
    },
];

/// Resolves a store type's default category names against `categories`.
///
/// Names are matched case-insensitively; names without a matching category
/// are skipped.
pub fn default_category_order(store_type: StoreType, categories: &[Category]) -> Vec<Uuid> {
    let mut order: Vec<Uuid> = Vec::new();
    for name in store_type.default_category_names() {
        let found = categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.id);
        if let Some(id) = found.filter(|id| !order.contains(id)) {
            order.push(id);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::suggest_category;

    fn catalog() -> Vec<Category> {
        BUILTIN_CATEGORIES.iter().map(CategorySeed::to_category).collect()
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<&str> = BUILTIN_CATEGORIES.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), BUILTIN_CATEGORIES.len());
        assert!(BUILTIN_CATEGORIES.len() >= 20);
    }

    #[test]
    fn test_catalog_keywords_are_lowercase() {
        for seed in BUILTIN_CATEGORIES {
            for keyword in seed.keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "{}", seed.name);
            }
        }
    }

    #[test]
    fn test_every_store_type_default_exists_in_catalog() {
        let categories = catalog();
        for store_type in StoreType::ALL {
            let order = default_category_order(store_type, &categories);
            assert_eq!(
                order.len(),
                store_type.default_category_names().len(),
                "{store_type}"
            );
        }
    }

    #[test]
    fn test_default_order_skips_missing_categories() {
        let tools = Category::new("tools");
        let paint = Category::new("Paint");

        let order = default_category_order(StoreType::Hardware, &[paint.clone(), tools.clone()]);
        assert_eq!(order, vec![tools.id, paint.id]);
    }

    #[test]
    fn test_catalog_suggestions() {
        let categories = catalog();
        let cases = [
            ("Hammer", "Tools"),
            ("Ham", "Meat"),
            ("Shampoo", "Personal Care"),
            ("Pasta de dinti", "Personal Care"),
            ("Pasta", "Pantry"),
            ("Orange juice", "Beverages"),
            ("Oranges", "Fruits & Vegetables"),
            ("Ice cream", "Frozen"),
            ("Sour cream", "Dairy"),
            ("Vitamin C", "Medicine"),
            ("Biscuiti", "Snacks"),
            ("Screwdriver", "Tools"),
            ("Wood screws", "Fasteners"),
            ("Toilet paper", "Household"),
            ("Beef steak", "Meat"),
        ];

        for (name, expected) in cases {
            let category = suggest_category(name, &categories).unwrap();
            assert_eq!(category.name, expected, "{name}");
        }
    }

    #[test]
    fn test_to_category_keeps_default_unit() {
        let category = BUILTIN_CATEGORIES[0].to_category();
        assert_eq!(category.name, "Fruits & Vegetables");
        assert_eq!(category.default_unit.as_deref(), Some("kg"));
    }
}
