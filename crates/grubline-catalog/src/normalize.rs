//! Normalization from raw catalog documents to [`grubline_core`] domain types.
//!
//! Document locations and field decoding live in [`crate::types`]; this module
//! walks the decoded shapes, applies the category discriminator rules, and
//! drops individual entries that cannot be used. A bad entry never aborts
//! normalization of its siblings, and source order is always preserved.

use std::collections::HashSet;

use grubline_core::{CategoryNode, MenuDetail, MenuHeader, MenuItem, RestaurantSummary};
use serde::Deserialize;
use serde_json::Value;

use crate::error::NormalizeError;
use crate::types::{
    RawCategory, RawItemInfo, RawMenuHeader, RawRestaurantCard, CATEGORY_CARD_POINTER,
    ITEM_CATEGORY_TYPE, ITEM_INFO_POINTER, LISTING_RESTAURANTS_POINTER, MENU_CATEGORIES_POINTER,
    MENU_HEADER_POINTER, NESTED_ITEM_CATEGORY_TYPE,
};

/// Deepest category level that is rendered: a category and its sub-categories.
pub const MAX_CATEGORY_DEPTH: usize = 2;

/// Which kind of catalog document is being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Listing,
    MenuDetail,
}

/// Output of [`normalize`], one variant per [`DocumentKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Catalog {
    Listing(Vec<RestaurantSummary>),
    Menu(MenuDetail),
}

/// Normalizes `document` according to `kind`.
#[must_use]
pub fn normalize(document: &Value, kind: DocumentKind) -> Catalog {
    match kind {
        DocumentKind::Listing => Catalog::Listing(normalize_listing(document)),
        DocumentKind::MenuDetail => Catalog::Menu(normalize_menu(document)),
    }
}

/// Flattens a listing document into restaurant summaries.
///
/// Entries without an `id` or `name`, entries of the wrong shape, and repeated
/// ids are skipped with a warning. A document without a recognizable
/// restaurant array yields an empty list.
#[must_use]
pub fn normalize_listing(document: &Value) -> Vec<RestaurantSummary> {
    let Some(entries) = locate_restaurants(document) else {
        tracing::warn!("listing document has no restaurant array; treating as empty");
        return Vec::new();
    };

    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
    let mut restaurants = Vec::with_capacity(entries.len());

    for (position, entry) in entries.iter().enumerate() {
        let result = restaurant_summary(entry, position).and_then(|summary| {
            if seen.insert(summary.id.clone()) {
                Ok(summary)
            } else {
                Err(NormalizeError::DuplicateId { id: summary.id })
            }
        });
        match result {
            Ok(summary) => restaurants.push(summary),
            Err(error) => tracing::warn!(position, %error, "skipping listing entry"),
        }
    }

    restaurants
}

/// Normalizes a menu-detail document into its header and category tree.
///
/// A missing category section yields an empty category list; a missing or
/// malformed header yields `header: None`.
#[must_use]
pub fn normalize_menu(document: &Value) -> MenuDetail {
    let header = document
        .pointer(MENU_HEADER_POINTER)
        .and_then(|raw| match RawMenuHeader::deserialize(raw) {
            Ok(header) => Some(menu_header(header)),
            Err(error) => {
                tracing::warn!(%error, "menu header does not match the expected shape");
                None
            }
        });

    let categories = match document
        .pointer(MENU_CATEGORIES_POINTER)
        .and_then(Value::as_array)
    {
        Some(entries) => collect_categories(
            entries.iter().enumerate().filter_map(|(position, entry)| {
                // Non-category cards (offers, carousels) may lack the wrapper.
                let card = entry.pointer(CATEGORY_CARD_POINTER);
                if card.is_none() {
                    tracing::debug!(position, "menu card without category wrapper; skipping");
                }
                card.map(|card| (format!("category #{position}"), card))
            }),
            1,
        ),
        None => {
            tracing::warn!("menu document has no category section; treating as empty");
            Vec::new()
        }
    };

    MenuDetail { header, categories }
}

fn locate_restaurants(document: &Value) -> Option<&Vec<Value>> {
    document.as_array().or_else(|| {
        document
            .pointer(LISTING_RESTAURANTS_POINTER)
            .and_then(Value::as_array)
    })
}

fn restaurant_summary(entry: &Value, position: usize) -> Result<RestaurantSummary, NormalizeError> {
    let label = || format!("restaurant #{position}");

    let card = RawRestaurantCard::deserialize(entry).map_err(|source| NormalizeError::Malformed {
        entry: label(),
        source,
    })?;
    let info = card.info.ok_or_else(|| NormalizeError::MissingField {
        entry: label(),
        field: "info",
    })?;
    let id = info.id.ok_or_else(|| NormalizeError::MissingField {
        entry: label(),
        field: "id",
    })?;
    let name = non_empty(info.name).ok_or_else(|| NormalizeError::MissingField {
        entry: format!("restaurant {id}"),
        field: "name",
    })?;

    Ok(RestaurantSummary {
        id,
        name,
        cuisines: info.cuisines,
        area_name: info.area_name.unwrap_or_default(),
        avg_rating: info.avg_rating.unwrap_or(0.0),
        delivery_eta_text: info
            .sla
            .and_then(|sla| sla.sla_string)
            .unwrap_or_default(),
        image_ref: info.cloudinary_image_id.unwrap_or_default(),
        promoted: info.promoted.unwrap_or(false),
    })
}

fn menu_header(raw: RawMenuHeader) -> MenuHeader {
    MenuHeader {
        name: raw.name.unwrap_or_default(),
        cuisines: raw.cuisines,
        avg_rating: raw.avg_rating,
        total_ratings_text: raw.total_ratings_string.unwrap_or_default(),
        area_name: raw.area_name.unwrap_or_default(),
        delivery_eta_text: raw.sla.and_then(|sla| sla.sla_string).unwrap_or_default(),
        cost_for_two_text: raw.cost_for_two_message.unwrap_or_default(),
    }
}

/// Builds category nodes at `depth`, logging and dropping entries that fail.
fn collect_categories<'a>(
    entries: impl Iterator<Item = (String, &'a Value)>,
    depth: usize,
) -> Vec<CategoryNode> {
    entries
        .filter_map(|(label, raw)| match category_node(raw, depth, &label) {
            Ok(node) => node,
            Err(error) => {
                tracing::warn!(depth, %error, "skipping category entry");
                None
            }
        })
        .collect()
}

/// Builds one category node.
///
/// Returns `Ok(None)` for entries that are silently excluded: top-level cards
/// whose discriminator is not a known category type.
fn category_node(
    raw: &Value,
    depth: usize,
    label: &str,
) -> Result<Option<CategoryNode>, NormalizeError> {
    let category = RawCategory::deserialize(raw).map_err(|source| NormalizeError::Malformed {
        entry: label.to_owned(),
        source,
    })?;

    let nested = match category.type_url.as_deref() {
        Some(ITEM_CATEGORY_TYPE) => false,
        Some(NESTED_ITEM_CATEGORY_TYPE) => true,
        // Sub-categories are untyped; their shape decides.
        None if depth > 1 => !category.categories.is_empty(),
        other => {
            tracing::debug!(
                entry = label,
                type_url = other.unwrap_or("<none>"),
                "dropping category of unrecognized type"
            );
            return Ok(None);
        }
    };

    let title = category.title.unwrap_or_default();
    let id = category
        .category_id
        .or_else(|| Some(title.clone()).filter(|t| !t.is_empty()))
        .ok_or_else(|| NormalizeError::MissingField {
            entry: label.to_owned(),
            field: "categoryId",
        })?;

    if nested {
        if depth >= MAX_CATEGORY_DEPTH {
            return Err(NormalizeError::UnsupportedNesting {
                category: id,
                max_depth: MAX_CATEGORY_DEPTH,
            });
        }
        let sub_categories = collect_categories(
            category
                .categories
                .iter()
                .enumerate()
                .map(|(position, sub)| (format!("{id} / sub-category #{position}"), sub)),
            depth + 1,
        );
        return Ok(Some(CategoryNode::nested(id, title, sub_categories)));
    }

    let items = category
        .item_cards
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| match menu_item(entry) {
            Ok(item) => Some(item),
            Err(error) => {
                tracing::warn!(category = %id, position, %error, "skipping menu item");
                None
            }
        })
        .collect();

    Ok(Some(CategoryNode::leaf(id, title, items)))
}

fn menu_item(entry: &Value) -> Result<MenuItem, NormalizeError> {
    let raw = entry
        .pointer(ITEM_INFO_POINTER)
        .ok_or_else(|| NormalizeError::MissingField {
            entry: "item card".to_owned(),
            field: "card.info",
        })?;
    let info = RawItemInfo::deserialize(raw).map_err(|source| NormalizeError::Malformed {
        entry: "item card".to_owned(),
        source,
    })?;

    let id = info.id.ok_or_else(|| NormalizeError::MissingField {
        entry: "item card".to_owned(),
        field: "id",
    })?;
    let name = non_empty(info.name).ok_or_else(|| NormalizeError::MissingField {
        entry: format!("item {id}"),
        field: "name",
    })?;

    // A zero price means "not set" upstream; `defaultPrice` takes over.
    let price_minor_units = info
        .price
        .filter(|p| *p > 0)
        .or(info.default_price)
        .unwrap_or(0);

    let aggregated = info.ratings.and_then(|r| r.aggregated_rating);
    let (rating, rating_count) = aggregated.map_or((None, None), |agg| (agg.rating, agg.rating_count));

    Ok(MenuItem {
        id,
        name,
        description: info.description.unwrap_or_default(),
        price_minor_units,
        rating,
        rating_count,
        image_ref: info.image_id.unwrap_or_default(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
