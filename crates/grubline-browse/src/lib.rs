//! Presentation-side logic for browsing the catalog: name search, collapsible
//! descriptions, and plain-text rendering of restaurants and menus.

pub mod cards;
pub mod promoted;
pub mod search;
pub mod truncate;

pub use cards::{
    format_price, render_menu, render_restaurant_list, restaurant_card, NO_RESULTS,
};
pub use promoted::{with_promoted_label, PROMOTED_LABEL};
pub use search::{filter_by_name, Named, SearchQuery, SearchState};
pub use truncate::{ExpandableText, ExpandedItems, TextView, ToggleLabel, ELLIPSIS};
