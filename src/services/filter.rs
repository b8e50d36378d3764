// src/services/filter.rs

//! Client-side search and category filtering.
//!
//! Pure functions over an explicit slice; the page re-runs them on every
//! change to its `FilterState`.

use serde::{Deserialize, Serialize};

use crate::models::ListItem;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Search box and category selector state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search_term: String,
    #[serde(default = "all_categories")]
    pub selected_category: String,
}

fn all_categories() -> String {
    ALL_CATEGORIES.to_string()
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_category: all_categories(),
        }
    }
}

impl FilterState {
    pub fn new(search_term: impl Into<String>, selected_category: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            selected_category: selected_category.into(),
        }
    }

    /// Lowercased category to require, or `None` for "all".
    fn category(&self) -> Option<String> {
        let category = self.selected_category.trim().to_lowercase();
        (!category.is_empty() && category != ALL_CATEGORIES).then_some(category)
    }

    /// Lowercased search term, or `None` when blank.
    fn term(&self) -> Option<String> {
        let term = self.search_term.trim().to_lowercase();
        (!term.is_empty()).then_some(term)
    }

    /// Whether `item` passes both the category and the search filter.
    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        Matcher::new(self).matches(item)
    }
}

/// Something that can be narrowed by `FilterState`.
pub trait Filterable {
    /// Text fields searched by the free-text term.
    fn search_fields(&self) -> Vec<&str>;

    /// Values the category selector can match.
    fn categories(&self) -> Vec<&str>;

    /// Category shown in the selector's option list.
    fn primary_category(&self) -> Option<&str> {
        self.categories().into_iter().find(|c| !c.is_empty())
    }
}

impl Filterable for ListItem {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn categories(&self) -> Vec<&str> {
        let mut categories = vec![self.category.as_str(), self.department.as_str()];
        categories.extend(self.tags.iter().map(String::as_str));
        categories
    }
}

/// Keep the items matching `state`, in their original order.
///
/// The search term matches case-insensitively but only where it begins a
/// word, so "ai" finds "AI Summit" and not "Art Fair", and "story" does not
/// find "History".
pub fn filter_items<T: Filterable + Clone>(items: &[T], state: &FilterState) -> Vec<T> {
    let matcher = Matcher::new(state);
    items
        .iter()
        .filter(|item| matcher.matches(*item))
        .cloned()
        .collect()
}

/// Options for the category selector: `"all"` then each distinct category
/// in first-seen order.
pub fn category_options<T: Filterable>(items: &[T]) -> Vec<String> {
    let mut options = vec![all_categories()];
    for item in items {
        if let Some(category) = item.primary_category() {
            let category = category.trim();
            if !options.iter().any(|o| o.eq_ignore_ascii_case(category)) {
                options.push(category.to_string());
            }
        }
    }
    options
}

/// Filter state with its inputs normalized once.
struct Matcher {
    category: Option<String>,
    term: Option<String>,
}

impl Matcher {
    fn new(state: &FilterState) -> Self {
        Self {
            category: state.category(),
            term: state.term(),
        }
    }

    fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        if let Some(category) = &self.category {
            let in_category = item
                .categories()
                .iter()
                .any(|c| c.trim().to_lowercase() == *category);
            if !in_category {
                return false;
            }
        }
        match &self.term {
            Some(term) => item
                .search_fields()
                .iter()
                .any(|field| contains_at_word_start(field, term)),
            None => true,
        }
    }
}

/// Case-insensitive substring test where the match must begin a word:
/// it sits at the start of `field` or right after a non-alphanumeric
/// character. Mid-word hits ("story" in "History") do not count.
///
/// `term` must already be lowercase.
fn contains_at_word_start(field: &str, term: &str) -> bool {
    let field = field.to_lowercase();
    field.match_indices(term).any(|(start, _)| {
        field[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}
