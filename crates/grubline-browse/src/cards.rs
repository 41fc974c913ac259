//! Plain-text rendering of restaurants and menus.

use grubline_core::{CategoryContent, CategoryNode, MenuDetail, MenuHeader, MenuItem, RestaurantSummary};

use crate::promoted::with_promoted_label;
use crate::truncate::{ExpandableText, ExpandedItems};

/// Shown in place of a list that filtered down to nothing.
pub const NO_RESULTS: &str = "No results found";

const INDENT: &str = "  ";

/// Formats paise as rupees, e.g. `12050` as `₹120.50`. Returns `None` for a
/// zero price, which means the backend sent none.
#[must_use]
pub fn format_price(minor_units: u64) -> Option<String> {
    (minor_units > 0).then(|| format!("₹{}.{:02}", minor_units / 100, minor_units % 100))
}

/// One restaurant as a few lines of text.
#[must_use]
pub fn restaurant_card(restaurant: &RestaurantSummary) -> String {
    let mut lines = vec![format!("{} ({})", restaurant.name, restaurant.id)];
    if !restaurant.cuisines.is_empty() {
        lines.push(format!("{INDENT}{}", restaurant.cuisines.join(", ")));
    }

    let mut facts = vec![format!("{:.1} stars", restaurant.avg_rating)];
    if !restaurant.delivery_eta_text.is_empty() {
        facts.push(restaurant.delivery_eta_text.clone());
    }
    if !restaurant.area_name.is_empty() {
        facts.push(restaurant.area_name.clone());
    }
    lines.push(format!("{INDENT}{}", facts.join(" | ")));

    lines.join("\n")
}

/// Renders a (possibly filtered) restaurant list, promoted restaurants
/// labelled, or [`NO_RESULTS`] when it is empty.
#[must_use]
pub fn render_restaurant_list(restaurants: &[RestaurantSummary]) -> String {
    if restaurants.is_empty() {
        return NO_RESULTS.to_owned();
    }
    let render = with_promoted_label(restaurant_card);
    restaurants
        .iter()
        .map(render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders a menu: header, then every category in source order.
///
/// Item descriptions are collapsed to `limit` characters unless expanded in
/// `expanded`.
#[must_use]
pub fn render_menu(menu: &MenuDetail, expanded: &ExpandedItems, limit: usize) -> String {
    let mut lines = Vec::new();
    if let Some(header) = &menu.header {
        header_lines(header, &mut lines);
        lines.push(String::new());
    }
    for category in &menu.categories {
        category_lines(category, 0, expanded, limit, &mut lines);
    }
    lines.join("\n")
}

fn header_lines(header: &MenuHeader, lines: &mut Vec<String>) {
    lines.push(header.name.clone());
    if !header.cuisines.is_empty() {
        lines.push(header.cuisines.join(", "));
    }

    let mut facts = Vec::new();
    if let Some(rating) = header.avg_rating {
        if header.total_ratings_text.is_empty() {
            facts.push(format!("{rating:.1} stars"));
        } else {
            facts.push(format!("{rating:.1} stars ({})", header.total_ratings_text));
        }
    }
    for text in [&header.cost_for_two_text, &header.delivery_eta_text, &header.area_name] {
        if !text.is_empty() {
            facts.push(text.clone());
        }
    }
    if !facts.is_empty() {
        lines.push(facts.join(" | "));
    }
}

fn category_lines(
    category: &CategoryNode,
    level: usize,
    expanded: &ExpandedItems,
    limit: usize,
    lines: &mut Vec<String>,
) {
    let indent = INDENT.repeat(level);
    match &category.content {
        CategoryContent::Items(items) => {
            lines.push(format!("{indent}{} ({})", category.title, items.len()));
            for item in items {
                let state = expanded.get(&category.id, &item.id);
                item_lines(item, &format!("{indent}{INDENT}"), state, limit, lines);
            }
        }
        CategoryContent::SubCategories(subs) => {
            lines.push(format!("{indent}{}", category.title));
            for sub in subs {
                category_lines(sub, level + 1, expanded, limit, lines);
            }
        }
    }
}

fn item_lines(
    item: &MenuItem,
    indent: &str,
    state: ExpandableText,
    limit: usize,
    lines: &mut Vec<String>,
) {
    let mut line = format!("{indent}- {} [{}]", item.name, item.id);
    if let Some(price) = format_price(item.price_minor_units) {
        line.push_str(&format!("  {price}"));
    }
    if let Some(rating) = item.rating {
        match item.rating_count {
            Some(count) => line.push_str(&format!("  {rating:.1} stars ({count})")),
            None => line.push_str(&format!("  {rating:.1} stars")),
        }
    }
    lines.push(line);

    let description = Some(item.description.as_str());
    if let Some(view) = state.render(description, limit) {
        match view.toggle {
            Some(toggle) => lines.push(format!("{indent}  {} [{toggle}]", view.display)),
            None => lines.push(format!("{indent}  {}", view.display)),
        }
    }
}
