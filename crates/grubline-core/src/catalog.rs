use serde::{Deserialize, Serialize};

/// A restaurant card from the listing document, flattened for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    /// Backend restaurant id; unique within a single listing response.
    pub id: String,
    pub name: String,
    pub cuisines: Vec<String>,
    pub area_name: String,
    /// Average rating, `0.0` when the backend omits it.
    pub avg_rating: f64,
    /// Human-readable delivery estimate, e.g. `"25-30 mins"`.
    pub delivery_eta_text: String,
    /// Image CDN id; empty when absent.
    pub image_ref: String,
    pub promoted: bool,
}

/// Restaurant information carried by a menu-detail document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuHeader {
    pub name: String,
    pub cuisines: Vec<String>,
    pub avg_rating: Option<f64>,
    /// e.g. `"1K+ ratings"`.
    pub total_ratings_text: String,
    pub area_name: String,
    pub delivery_eta_text: String,
    /// e.g. `"₹400 for two"`.
    pub cost_for_two_text: String,
}

/// A single dish.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in paise. `0` means the backend sent no usable price.
    pub price_minor_units: u64,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub image_ref: String,
}

/// Discriminant of a [`CategoryNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Leaf,
    Nested,
}

/// What a category holds. A node carries items or sub-categories, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryContent {
    Items(Vec<MenuItem>),
    SubCategories(Vec<CategoryNode>),
}

/// A menu category, either a leaf holding items or a nested category holding
/// leaf sub-categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub title: String,
    pub content: CategoryContent,
}

impl CategoryNode {
    #[must_use]
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: CategoryContent::Items(items),
        }
    }

    #[must_use]
    pub fn nested(
        id: impl Into<String>,
        title: impl Into<String>,
        sub_categories: Vec<CategoryNode>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: CategoryContent::SubCategories(sub_categories),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CategoryKind {
        match self.content {
            CategoryContent::Items(_) => CategoryKind::Leaf,
            CategoryContent::SubCategories(_) => CategoryKind::Nested,
        }
    }

    /// Items of a leaf category; empty for nested categories.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        match &self.content {
            CategoryContent::Items(items) => items,
            CategoryContent::SubCategories(_) => &[],
        }
    }

    /// Sub-categories of a nested category; empty for leaf categories.
    #[must_use]
    pub fn sub_categories(&self) -> &[CategoryNode] {
        match &self.content {
            CategoryContent::Items(_) => &[],
            CategoryContent::SubCategories(subs) => subs,
        }
    }

    /// Total number of items reachable from this node.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match &self.content {
            CategoryContent::Items(items) => items.len(),
            CategoryContent::SubCategories(subs) => subs.iter().map(Self::item_count).sum(),
        }
    }
}

/// A normalized menu-detail document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuDetail {
    pub header: Option<MenuHeader>,
    pub categories: Vec<CategoryNode>,
}

impl MenuDetail {
    /// Looks up an item by id anywhere in the category tree.
    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<&MenuItem> {
        fn walk<'a>(nodes: &'a [CategoryNode], item_id: &str) -> Option<&'a MenuItem> {
            nodes.iter().find_map(|node| {
                node.items()
                    .iter()
                    .find(|item| item.id == item_id)
                    .or_else(|| walk(node.sub_categories(), item_id))
            })
        }
        walk(&self.categories, item_id)
    }

    /// Ids of the leaf categories listing `item_id`, in menu order. The same
    /// dish often appears under "Recommended" and under its own category.
    #[must_use]
    pub fn item_categories(&self, item_id: &str) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [CategoryNode], item_id: &str, found: &mut Vec<&'a str>) {
            for node in nodes {
                if node.items().iter().any(|item| item.id == item_id) {
                    found.push(node.id.as_str());
                }
                walk(node.sub_categories(), item_id, found);
            }
        }
        let mut found = Vec::new();
        walk(&self.categories, item_id, &mut found);
        found
    }
}
