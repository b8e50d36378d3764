//! List item view model.
//!
//! Events, news articles, faculty members, gallery images, programs and
//! scholarships all arrive as loosely shaped JSON records. They are
//! normalized into one `ListItem` so the filter and the CLI can treat them
//! alike. Normalization never fails: anything missing becomes empty.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::html_to_text;

/// A single row in a filterable collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Backend identifier, if the record has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub title: String,

    #[serde(default)]
    pub date: String,

    /// Plain-text description or excerpt
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub department: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub image_url: String,
}

impl ListItem {
    /// Normalize a raw JSON record.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: value.get("id").and_then(scalar_string),
            title: first_text(value, &["title", "name"]),
            date: first_raw(value, &["date", "start_date", "published"]),
            description: first_text(value, &["description", "excerpt", "summary", "bio"]),
            category: first_text(value, &["category", "type"]),
            department: first_text(value, &["department"]),
            tags: value.get("tags").map(string_list).unwrap_or_default(),
            image_url: first_raw(value, &["image_url", "image", "photo", "featured_image"]),
        }
    }

    /// Uniqueness key: the id, else the title, else the image URL.
    ///
    /// Empty when the record has none of them.
    pub fn key(&self) -> &str {
        [self.id.as_deref(), Some(self.title.as_str()), Some(self.image_url.as_str())]
            .into_iter()
            .flatten()
            .find(|key| !key.is_empty())
            .unwrap_or("")
    }
}

/// Normalize an array of records, keeping the first item per key.
///
/// Records without a key are always kept.
pub fn unique_items(values: &[Value]) -> Vec<ListItem> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(ListItem::from_value)
        .filter(|item| item.key().is_empty() || seen.insert(item.key().to_string()))
        .collect()
}

/// First non-empty text among `keys`, with markup stripped.
fn first_text(value: &Value, keys: &[&str]) -> String {
    first_with(value, keys, text_of)
}

/// First non-empty value among `keys`, copied verbatim (URLs, dates).
fn first_raw(value: &Value, keys: &[&str]) -> String {
    first_with(value, keys, raw_of)
}

fn first_with(value: &Value, keys: &[&str], read: fn(&Value) -> String) -> String {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .map(read)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Text of a field that may be a plain string, a number, a WordPress
/// `{ "rendered": "<p>..</p>" }` object or an image `{ "url": .. }` object.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => html_to_text(s),
        Value::Number(n) => n.to_string(),
        Value::Object(obj) => obj
            .get("rendered")
            .or_else(|| obj.get("url"))
            .or_else(|| obj.get("name"))
            .and_then(Value::as_str)
            .map(html_to_text)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Like [`text_of`] but without touching the characters of the string.
fn raw_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(obj) => obj
            .get("url")
            .or_else(|| obj.get("rendered"))
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_plain_record() {
        let item = ListItem::from_value(&json!({
            "id": 7,
            "title": "AI Summit",
            "date": "2025-03-14",
            "description": "Talks and demos",
            "category": "tech",
            "tags": ["ai", "ml"],
            "image_url": "https://cdn.example.edu/ai.jpg"
        }));

        assert_eq!(item.id.as_deref(), Some("7"));
        assert_eq!(item.title, "AI Summit");
        assert_eq!(item.category, "tech");
        assert_eq!(item.tags, vec!["ai", "ml"]);
        assert_eq!(item.key(), "7");
    }

    #[test]
    fn test_from_wordpress_record() {
        let item = ListItem::from_value(&json!({
            "title": { "rendered": "Commencement <em>2025</em>" },
            "excerpt": { "rendered": "<p>Ceremony details &amp; parking.</p>" },
            "featured_image": { "url": "https://cdn.example.edu/c.jpg" },
            "tags": "ceremony, students"
        }));

        assert_eq!(item.title, "Commencement 2025");
        assert_eq!(item.description, "Ceremony details & parking.");
        assert_eq!(item.image_url, "https://cdn.example.edu/c.jpg");
        assert_eq!(item.tags, vec!["ceremony", "students"]);
        assert_eq!(item.id, None);
    }

    #[test]
    fn test_faculty_record_uses_name_and_bio() {
        let item = ListItem::from_value(&json!({
            "name": "Dr. Grace Hopper",
            "department": "Computer Science",
            "bio": "Compilers pioneer"
        }));

        assert_eq!(item.title, "Dr. Grace Hopper");
        assert_eq!(item.department, "Computer Science");
        assert_eq!(item.description, "Compilers pioneer");
    }

    #[test]
    fn test_malformed_record_is_empty() {
        assert_eq!(ListItem::from_value(&json!(null)), ListItem::default());
        assert_eq!(ListItem::from_value(&json!("oops")), ListItem::default());
        let item = ListItem::from_value(&json!({ "title": 5, "tags": 3 }));
        assert_eq!(item.title, "5");
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_unique_items_keeps_first_by_key() {
        let values = vec![
            json!({ "id": 1, "title": "A" }),
            json!({ "id": 1, "title": "A (dup)" }),
            json!({ "title": "B" }),
            json!({ "title": "B" }),
            json!({ "id": 2, "title": "B" }),
        ];

        let items = unique_items(&values);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "B"]);
    }

    #[test]
    fn test_unique_items_keeps_untitled_records() {
        let images = vec![
            json!({ "image_url": "a.jpg" }),
            json!({ "image_url": "b.jpg" }),
            json!({ "image_url": "c.jpg" }),
            json!({ "image_url": "a.jpg" }),
        ];
        let urls: Vec<String> = unique_items(&images)
            .into_iter()
            .map(|i| i.image_url)
            .collect();
        assert_eq!(urls, vec!["a.jpg", "b.jpg", "c.jpg"]);

        let blanks = vec![json!({}), json!({ "caption": 1 }), json!(null)];
        assert_eq!(unique_items(&blanks).len(), 3);
    }

    #[test]
    fn test_urls_and_dates_are_kept_verbatim() {
        let item = ListItem::from_value(&json!({
            "title": "Spring &amp; Summer",
            "date": "Mar 3 & 4, 2025",
            "image_url": "https://cdn.example.edu/i.jpg?w=1&copy=2"
        }));

        assert_eq!(item.title, "Spring & Summer");
        assert_eq!(item.date, "Mar 3 & 4, 2025");
        assert_eq!(item.image_url, "https://cdn.example.edu/i.jpg?w=1&copy=2");

        let photo = ListItem::from_value(&json!({
            "photo": { "url": "https://cdn.example.edu/p.jpg?a=1&lt=2" }
        }));
        assert_eq!(photo.image_url, "https://cdn.example.edu/p.jpg?a=1&lt=2");
    }
}
