//! Catalog entries: categories, plants and the active category filter.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, PlantId};
use super::price::Price;

/// Sentinel value of the "show everything" filter.
pub const ALL_CATEGORIES: &str = "all";

/// A plant category offered as a catalog filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Short description, shown as the filter button's tooltip.
    pub description: Option<String>,
}

/// A purchasable plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    /// Category display name (not an id).
    pub category: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
}

/// The filter driving which catalog fetch is issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActiveCategory {
    /// No filter; the full catalog.
    #[default]
    All,
    /// Plants of one category.
    Category(CategoryId),
}

impl ActiveCategory {
    /// Parse a filter value, where [`ALL_CATEGORIES`] selects everything.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" => None,
            ALL_CATEGORIES => Some(Self::All),
            id => Some(Self::Category(CategoryId::new(id))),
        }
    }

    /// The value carried by the filter button (`all` or the category id).
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(id) => id.as_str(),
        }
    }

    /// Whether the filter button with `key` is the active one.
    #[must_use]
    pub fn is(&self, key: &str) -> bool {
        self.key() == key
    }
}

impl fmt::Display for ActiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentinel() {
        assert_eq!(ActiveCategory::parse("all"), Some(ActiveCategory::All));
    }

    #[test]
    fn test_parse_category_id() {
        assert_eq!(
            ActiveCategory::parse(" 5 "),
            Some(ActiveCategory::Category(CategoryId::new("5")))
        );
    }

    #[test]
    fn test_parse_blank_is_none() {
        assert_eq!(ActiveCategory::parse("  "), None);
    }

    #[test]
    fn test_is_matches_exactly_one_key() {
        let active = ActiveCategory::Category(CategoryId::new("5"));
        assert!(active.is("5"));
        assert!(!active.is("all"));
        assert!(!active.is("50"));
        assert!(ActiveCategory::All.is("all"));
    }
}
