//! Catalog response normalization.
//!
//! The catalog API is inconsistent about envelope keys and field names. Each
//! lookup below tries a fixed list of keys in priority order and falls back
//! to a documented default.

use std::str::FromStr;

use green_earth_core::{Category, CategoryId, Plant, PlantId, Price};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};

use super::CatalogError;

/// Envelope keys holding the category list.
pub const CATEGORY_LIST_KEYS: &[&str] = &["categories", "data"];
/// Envelope keys holding a plant list.
pub const PLANT_LIST_KEYS: &[&str] = &["plants", "data"];
/// Envelope keys holding a single plant; the body itself is the last resort.
pub const PLANT_DETAIL_KEYS: &[&str] = &["plants", "plant", "data"];

const CATEGORY_NAME_KEYS: &[&str] = &["category_name", "name"];
const CATEGORY_DESCRIPTION_KEYS: &[&str] = &["small_description", "description"];
const PLANT_NAME_KEYS: &[&str] = &["name", "plant_name"];
const PLANT_CATEGORY_KEYS: &[&str] = &["category", "category_name"];
const PLANT_DESCRIPTION_KEYS: &[&str] = &["description", "small_description"];
const PLANT_IMAGE_KEYS: &[&str] = &["img", "image"];

/// Fallback for plant names and categories.
pub const DEFAULT_PLANT_NAME: &str = "Tree";
/// Fallback description on product cards.
pub const DEFAULT_CARD_DESCRIPTION: &str = "Beautiful tree";
/// Fallback description in the detail view.
pub const DEFAULT_DETAIL_DESCRIPTION: &str = "—";

/// Extract the category list from a `/categories` response.
///
/// Entries without an id are skipped.
///
/// # Errors
///
/// Returns `CatalogError::Malformed` if no list is found under any of
/// [`CATEGORY_LIST_KEYS`].
pub fn categories(body: &Value) -> Result<Vec<Category>, CatalogError> {
    let list = find_list(body, CATEGORY_LIST_KEYS)?;
    Ok(list.iter().filter_map(category).collect())
}

/// Extract a plant list from a `/plants` or `/category/{id}` response.
///
/// Entries without an id are skipped.
///
/// # Errors
///
/// Returns `CatalogError::Malformed` if no list is found under any of
/// [`PLANT_LIST_KEYS`].
pub fn plant_list(body: &Value) -> Result<Vec<Plant>, CatalogError> {
    let list = find_list(body, PLANT_LIST_KEYS)?;
    Ok(list
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|fields| {
            let id = id_field(fields).map(PlantId::new)?;
            Some(plant(fields, id, DEFAULT_CARD_DESCRIPTION))
        })
        .collect())
}

/// Extract a single plant from a `/plant/{id}` response.
///
/// Best effort: an unrecognized shape still yields a plant built from
/// defaults, carrying the `requested` id when the body has none.
#[must_use]
pub fn plant_detail(body: &Value, requested: &PlantId) -> Plant {
    let empty = Map::new();
    let fields = PLANT_DETAIL_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_object))
        .or_else(|| body.as_object())
        .unwrap_or(&empty);

    let id = id_field(fields).map_or_else(|| requested.clone(), PlantId::new);
    plant(fields, id, DEFAULT_DETAIL_DESCRIPTION)
}

fn find_list<'a>(body: &'a Value, keys: &[&str]) -> Result<&'a Vec<Value>, CatalogError> {
    keys.iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .ok_or_else(|| {
            let expected = keys
                .iter()
                .map(|k| format!("`{k}`"))
                .collect::<Vec<_>>()
                .join(" or ");
            CatalogError::Malformed(format!("no {expected} list in response"))
        })
}

fn category(value: &Value) -> Option<Category> {
    let fields = value.as_object()?;
    let id = id_field(fields)?;
    Some(Category {
        id: CategoryId::new(id),
        name: text_field(fields, CATEGORY_NAME_KEYS).unwrap_or_else(|| DEFAULT_PLANT_NAME.to_string()),
        description: text_field(fields, CATEGORY_DESCRIPTION_KEYS),
    })
}

fn plant(fields: &Map<String, Value>, id: PlantId, default_description: &str) -> Plant {
    Plant {
        id,
        name: text_field(fields, PLANT_NAME_KEYS).unwrap_or_else(|| DEFAULT_PLANT_NAME.to_string()),
        category: text_field(fields, PLANT_CATEGORY_KEYS)
            .unwrap_or_else(|| DEFAULT_PLANT_NAME.to_string()),
        description: text_field(fields, PLANT_DESCRIPTION_KEYS)
            .unwrap_or_else(|| default_description.to_string()),
        price: fields.get("price").map_or(Price::ZERO, price_value),
        image_url: text_field(fields, PLANT_IMAGE_KEYS),
    }
}

/// The `id` field as a string; the API sends both numbers and strings.
fn id_field(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-blank string among `keys`.
fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        fields
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    })
}

/// Numeric or numeric-string price; anything else is zero.
fn price_value(value: &Value) -> Price {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .map_or(Price::ZERO, Price::new),
        Value::String(s) => Price::parse_or_zero(s),
        _ => Price::ZERO,
    }
}
