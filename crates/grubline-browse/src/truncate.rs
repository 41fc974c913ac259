//! Collapsible long text.
//!
//! Lengths are counted in `char`s so that multi-byte text is never cut in the
//! middle of a code point.

use std::collections::HashSet;
use std::fmt;

/// Appended to collapsed text.
pub const ELLIPSIS: &str = "...";

/// Label of the control that flips a long text between collapsed and full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLabel {
    More,
    Less,
}

impl fmt::Display for ToggleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleLabel::More => write!(f, "more"),
            ToggleLabel::Less => write!(f, "less"),
        }
    }
}

/// What to show for one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextView {
    pub display: String,
    /// Present only when the text exceeds the limit.
    pub toggle: Option<ToggleLabel>,
}

/// Expand/collapse state of one text. Starts collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandableText {
    expanded: bool,
}

impl ExpandableText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_expanded(self) -> bool {
        self.expanded
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        Self {
            expanded: !self.expanded,
        }
    }

    /// Renders `text` against `limit` characters.
    ///
    /// Absent or empty text renders nothing.
    #[must_use]
    pub fn render(self, text: Option<&str>, limit: usize) -> Option<TextView> {
        let text = text.filter(|t| !t.is_empty())?;

        let Some((cut, _)) = text.char_indices().nth(limit) else {
            return Some(TextView {
                display: text.to_owned(),
                toggle: None,
            });
        };

        Some(if self.expanded {
            TextView {
                display: text.to_owned(),
                toggle: Some(ToggleLabel::Less),
            }
        } else {
            TextView {
                display: format!("{}{ELLIPSIS}", &text[..cut]),
                toggle: Some(ToggleLabel::More),
            }
        })
    }
}

/// Expansion state for many texts, such as item descriptions in a menu.
///
/// Keyed by `(category id, item id)`: a dish listed under two categories is
/// expanded in one place at a time.
#[derive(Debug, Clone, Default)]
pub struct ExpandedItems {
    expanded: HashSet<(String, String)>,
}

impl ExpandedItems {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the state of `item_id` within `category_id` and returns the new
    /// state.
    pub fn toggle(&mut self, category_id: &str, item_id: &str) -> ExpandableText {
        let key = (category_id.to_owned(), item_id.to_owned());
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
        self.get(category_id, item_id)
    }

    #[must_use]
    pub fn get(&self, category_id: &str, item_id: &str) -> ExpandableText {
        ExpandableText {
            expanded: self
                .expanded
                .contains(&(category_id.to_owned(), item_id.to_owned())),
        }
    }

    /// Collapses everything, e.g. when a different menu is opened.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}
