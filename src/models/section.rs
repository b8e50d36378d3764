//! Content section catalogue and the field schemas each page reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Expected JSON shape of a section field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Array; defaults to `[]`
    List,
    /// Object; defaults to `{}`
    Object,
    /// String; defaults to `""`
    Text,
}

impl FieldKind {
    /// Default value used when the field is absent or has the wrong type.
    pub fn default_value(self) -> Value {
        match self {
            FieldKind::List => Value::Array(Vec::new()),
            FieldKind::Object => Value::Object(Map::new()),
            FieldKind::Text => Value::String(String::new()),
        }
    }

    /// Whether `value` already has this shape.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::List => value.is_array(),
            FieldKind::Object => value.is_object(),
            FieldKind::Text => value.is_string(),
        }
    }

    /// Return `value` if it has this shape, else the default.
    pub fn coerce(self, value: Option<&Value>) -> Value {
        match value {
            Some(v) if self.matches(v) => v.clone(),
            _ => self.default_value(),
        }
    }
}

/// One expected field of a section payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

/// The fields a page destructures from its section payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an array field.
    pub fn list(self, name: &str) -> Self {
        self.field(name, FieldKind::List)
    }

    /// Add an object field.
    pub fn object(self, name: &str) -> Self {
        self.field(name, FieldKind::Object)
    }

    /// Add a string field.
    pub fn text(self, name: &str) -> Self {
        self.field(name, FieldKind::Text)
    }

    pub fn field(mut self, name: &str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }

    /// Names of the array fields, in declaration order.
    pub fn list_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::List)
            .map(|f| f.name.as_str())
    }

    /// Build a payload holding only schema fields, each coerced to its kind.
    ///
    /// A payload that is not a JSON object is treated as empty.
    pub fn coerce(&self, payload: &Value) -> Map<String, Value> {
        let source = payload.as_object();
        self.fields
            .iter()
            .map(|spec| {
                let raw = source.and_then(|obj| obj.get(&spec.name));
                (spec.name.clone(), spec.kind.coerce(raw))
            })
            .collect()
    }

    /// All fields at their defaults.
    pub fn defaults(&self) -> Map<String, Value> {
        self.coerce(&Value::Null)
    }
}

/// A content section served by one fixed endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Home,
    About,
    Academics,
    Admissions,
    CampusLife,
    Research,
    Contact,
    Portals,
    Events,
    Giving,
    Visit,
    News,
    Awards,
    Alumni,
    Gallery,
    Faculty,
}

impl Section {
    pub const ALL: [Section; 16] = [
        Section::Home,
        Section::About,
        Section::Academics,
        Section::Admissions,
        Section::CampusLife,
        Section::Research,
        Section::Contact,
        Section::Portals,
        Section::Events,
        Section::Giving,
        Section::Visit,
        Section::News,
        Section::Awards,
        Section::Alumni,
        Section::Gallery,
        Section::Faculty,
    ];

    /// Endpoint slug under `/wp-json/<namespace>/v1/`.
    pub fn slug(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::About => "about",
            Section::Academics => "academics",
            Section::Admissions => "admissions",
            Section::CampusLife => "campus-life",
            Section::Research => "research",
            Section::Contact => "contact",
            Section::Portals => "portals",
            Section::Events => "events",
            Section::Giving => "giving",
            Section::Visit => "visit",
            Section::News => "news",
            Section::Awards => "awards",
            Section::Alumni => "alumni",
            Section::Gallery => "gallery",
            Section::Faculty => "faculty",
        }
    }

    /// Fields the section's page reads from its payload.
    pub fn schema(self) -> FieldSchema {
        let schema = FieldSchema::new();
        match self {
            Section::Home => schema
                .list("hero_slides")
                .list("statistics")
                .list("featured_programs")
                .list("news_highlights")
                .list("upcoming_events")
                .list("testimonials"),
            Section::About => schema
                .text("mission")
                .text("vision")
                .object("history")
                .list("leadership")
                .list("milestones")
                .list("accreditations"),
            Section::Academics => schema
                .list("programs")
                .list("departments")
                .list("featured_courses")
                .object("calendar"),
            Section::Admissions => schema
                .list("requirements")
                .list("deadlines")
                .object("tuition")
                .list("scholarships")
                .list("faqs"),
            Section::CampusLife => schema
                .list("clubs")
                .list("housing")
                .list("dining")
                .list("athletics")
                .list("facilities"),
            Section::Research => schema
                .list("centers")
                .list("projects")
                .list("publications")
                .object("funding"),
            Section::Contact => schema
                .list("offices")
                .list("departments")
                .object("hours")
                .object("address"),
            Section::Portals => schema.list("portals").list("quick_links"),
            Section::Events => schema.list("events").list("categories"),
            Section::Giving => schema
                .list("funds")
                .list("campaigns")
                .list("giving_levels")
                .list("impact_stats"),
            Section::Visit => schema
                .list("tours")
                .list("accommodations")
                .object("directions")
                .list("visitor_faqs"),
            Section::News => schema
                .list("articles")
                .list("featured")
                .list("categories"),
            Section::Awards => schema
                .list("awards")
                .list("eligibility")
                .text("application_deadline"),
            Section::Alumni => schema
                .list("notable_alumni")
                .list("chapters")
                .list("events")
                .list("benefits"),
            Section::Gallery => schema.list("images").list("albums"),
            Section::Faculty => schema.list("faculty").list("departments"),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.slug())
    }
}

impl FromStr for Section {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        Section::ALL
            .into_iter()
            .find(|section| section.slug() == needle)
            .ok_or_else(|| AppError::UnknownSection(s.to_string()))
    }
}
