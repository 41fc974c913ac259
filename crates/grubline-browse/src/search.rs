//! Prefix-per-word name search.
//!
//! A candidate matches when any whitespace-delimited word of its lower-cased
//! name starts with the lower-cased query. An empty query matches everything.

use grubline_core::{MenuItem, RestaurantSummary};

/// Anything that can be searched by display name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for RestaurantSummary {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for MenuItem {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A trimmed, lower-cased search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// `true` when the query filters nothing out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.is_empty()
            || name
                .to_lowercase()
                .split_whitespace()
                .any(|word| word.starts_with(self.0.as_str()))
    }
}

/// Returns the items whose name matches `query`, in their original order.
#[must_use]
pub fn filter_by_name<T: Named + Clone>(items: &[T], query: &SearchQuery) -> Vec<T> {
    if query.is_empty() {
        return items.to_vec();
    }
    let matched: Vec<T> = items
        .iter()
        .filter(|item| query.matches(item.name()))
        .cloned()
        .collect();
    tracing::debug!(
        query = query.as_str(),
        total = items.len(),
        matched = matched.len(),
        "applied name filter"
    );
    matched
}

/// Search box state: the text being edited and the query last submitted.
///
/// Editing never changes results; only [`SearchState::submit`] does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub draft: String,
    pub applied: SearchQuery,
}

impl SearchState {
    #[must_use]
    pub fn edit(self, text: impl Into<String>) -> Self {
        Self {
            draft: text.into(),
            ..self
        }
    }

    #[must_use]
    pub fn submit(self) -> Self {
        let applied = SearchQuery::new(&self.draft);
        Self {
            draft: self.draft,
            applied,
        }
    }

    /// Filters `items` with the applied query.
    #[must_use]
    pub fn apply<T: Named + Clone>(&self, items: &[T]) -> Vec<T> {
        filter_by_name(items, &self.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry(&'static str);

    impl Named for Entry {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn restaurants() -> Vec<Entry> {
        vec![
            Entry("Barbeque Nation"),
            Entry("Dusk"),
            Entry("ODR - On Da Rocks"),
        ]
    }

    fn names(entries: &[Entry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.0).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let items = restaurants();
        assert_eq!(filter_by_name(&items, &SearchQuery::new("")), items);
        assert_eq!(filter_by_name(&items, &SearchQuery::new("   ")), items);
    }

    #[test]
    fn matches_word_prefix() {
        let filtered = filter_by_name(&restaurants(), &SearchQuery::new("od"));
        assert_eq!(names(&filtered), ["ODR - On Da Rocks"]);
    }

    #[test]
    fn does_not_match_inside_words() {
        let filtered = filter_by_name(&restaurants(), &SearchQuery::new("usk"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn query_is_trimmed_and_case_insensitive() {
        let filtered = filter_by_name(&restaurants(), &SearchQuery::new("  NATION "));
        assert_eq!(names(&filtered), ["Barbeque Nation"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let query = SearchQuery::new("d");
        let once = filter_by_name(&restaurants(), &query);
        let twice = filter_by_name(&once, &query);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_preserves_order() {
        let items = vec![Entry("Pizza Hut"), Entry("Burger King"), Entry("Pizza Express")];
        let filtered = filter_by_name(&items, &SearchQuery::new("pizza"));
        assert_eq!(names(&filtered), ["Pizza Hut", "Pizza Express"]);
    }

    #[test]
    fn non_ascii_names_match_case_insensitively() {
        let items = vec![Entry("Éclair Café"), Entry("Bistro")];
        let filtered = filter_by_name(&items, &SearchQuery::new("caf"));
        assert_eq!(names(&filtered), ["Éclair Café"]);
    }

    #[test]
    fn editing_draft_does_not_change_results_until_submit() {
        let state = SearchState::default().edit("dusk");
        assert_eq!(state.apply(&restaurants()).len(), 3);

        let state = state.submit();
        assert_eq!(names(&state.apply(&restaurants())), ["Dusk"]);
        assert_eq!(state.draft, "dusk");
    }

    #[test]
    fn submitting_empty_draft_clears_filter() {
        let state = SearchState::default().edit("dusk").submit().edit("").submit();
        assert!(state.applied.is_empty());
        assert_eq!(state.apply(&restaurants()).len(), 3);
    }
}
