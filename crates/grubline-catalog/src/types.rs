//! Raw catalog document shapes, decoded leniently.
//!
//! The backend relays upstream food-delivery responses verbatim, so every
//! shape here is backend-owned and drifts without notice. All location
//! knowledge (JSON pointers) and all field decoding lives in this module;
//! [`crate::normalize`] only converts these shapes into domain types.
//!
//! ## Observed shapes
//!
//! ### Listing
//! The mock backend serves a bare JSON array of `{ "info": { ... } }` cards.
//! The upstream v5 listing nests the same array at
//! [`LISTING_RESTAURANTS_POINTER`]. Both are accepted.
//!
//! ### Menu detail
//! A `cards` array where position 2 holds restaurant info and position 4 the
//! grouped category cards. Each category card is wrapped twice
//! (`{ "card": { "card": { ... } } }`) and carries an `@type` discriminator.
//!
//! ### Numbers as strings
//! `avgRating` is a number on listing cards, but item ratings
//! (`ratings.aggregatedRating.rating`) and counts (`ratingCountV2`) arrive
//! as strings such as `"4.3"` and `"36"`. Ids arrive as strings on most
//! entries and as numbers on a few. The `lenient_*` decoders accept both and
//! turn anything else into `None`.
//!
//! ### Prices
//! Integer paise. `price` is absent on some items, which then carry
//! `defaultPrice` instead.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Restaurant array inside the upstream v5 listing response.
pub const LISTING_RESTAURANTS_POINTER: &str =
    "/data/cards/1/card/card/gridElements/infoWithStyle/restaurants";

/// Restaurant info inside a menu-detail document.
pub const MENU_HEADER_POINTER: &str = "/cards/2/card/card/info";

/// Grouped category cards inside a menu-detail document.
pub const MENU_CATEGORIES_POINTER: &str = "/cards/4/groupedCard/cardGroupMap/REGULAR/cards";

/// Unwraps `{ "card": { "card": ... } }` around a category entry.
pub const CATEGORY_CARD_POINTER: &str = "/card/card";

/// Unwraps `{ "card": { "info": ... } }` around an item entry.
pub const ITEM_INFO_POINTER: &str = "/card/info";

/// Discriminator of a category that directly lists items.
pub const ITEM_CATEGORY_TYPE: &str = "type.googleapis.com/swiggy.presentation.food.v2.ItemCategory";

/// Discriminator of a category that lists sub-categories.
pub const NESTED_ITEM_CATEGORY_TYPE: &str =
    "type.googleapis.com/swiggy.presentation.food.v2.NestedItemCategory";

/// One entry of the listing array.
#[derive(Debug, Deserialize)]
pub struct RawRestaurantCard {
    #[serde(default)]
    pub info: Option<RawRestaurantInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRestaurantInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cloudinary_image_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub sla: Option<RawSla>,
    /// Absent on almost every card; only sponsored listings set it.
    #[serde(default)]
    pub promoted: Option<bool>,
}

/// Delivery estimate block shared by listing cards and menu headers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSla {
    #[serde(default)]
    pub sla_string: Option<String>,
}

/// Restaurant info at [`MENU_HEADER_POINTER`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMenuHeader {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cuisines: Vec<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub total_ratings_string: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub sla: Option<RawSla>,
    #[serde(default)]
    pub cost_for_two_message: Option<String>,
}

/// A category card after unwrapping [`CATEGORY_CARD_POINTER`].
///
/// Items and sub-categories stay as raw values so that a single malformed
/// entry can be skipped without losing its siblings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    #[serde(rename = "@type", default)]
    pub type_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub item_cards: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<Value>,
}

/// An item after unwrapping [`ITEM_INFO_POINTER`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItemInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub price: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub default_price: Option<u64>,
    #[serde(default)]
    pub ratings: Option<RawRatings>,
    #[serde(default)]
    pub image_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRatings {
    #[serde(default)]
    pub aggregated_rating: Option<RawAggregatedRating>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAggregatedRating {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64", rename = "ratingCountV2")]
    pub rating_count: Option<u64>,
}

/// Interprets a JSON number or numeric string as a finite `f64`.
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Interprets a JSON number or numeric string as a non-negative integer.
/// Fractional values are rounded.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn value_as_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    if let Some(s) = value.as_str() {
        if let Ok(n) = s.trim().parse::<u64>() {
            return Some(n);
        }
    }
    value_as_f64(value)
        .filter(|f| *f >= 0.0 && *f <= u64::MAX as f64)
        .map(|f| f.round() as u64)
}

/// Interprets a JSON string or number as a non-empty identifier.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_f64))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_u64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_string))
}

/// Treats an explicit `null` array as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
