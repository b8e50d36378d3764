//! Client-side route table.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::Section;

/// A top-level page of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    About,
    Academics,
    Admissions,
    CampusLife,
    Research,
    Contact,
    Portals,
    WebApp,
    Events,
    Giving,
    Visit,
    News,
    AwardsApplication,
    Alumni,
    Gallery,
    Faculty,
}

/// Path pattern for each page. `:name` segments capture a parameter.
const ROUTES: [(&str, Page); 17] = [
    ("/", Page::Home),
    ("/about", Page::About),
    ("/academics", Page::Academics),
    ("/admissions", Page::Admissions),
    ("/campus-life", Page::CampusLife),
    ("/research", Page::Research),
    ("/contact", Page::Contact),
    ("/portals", Page::Portals),
    ("/webapp/:userType", Page::WebApp),
    ("/events", Page::Events),
    ("/giving", Page::Giving),
    ("/visit", Page::Visit),
    ("/news", Page::News),
    ("/awards-application", Page::AwardsApplication),
    ("/alumni", Page::Alumni),
    ("/gallery", Page::Gallery),
    ("/faculty", Page::Faculty),
];

impl Page {
    /// Path pattern of the page.
    pub fn pattern(self) -> &'static str {
        ROUTES
            .iter()
            .find(|(_, page)| *page == self)
            .map(|(pattern, _)| *pattern)
            .unwrap_or("/")
    }

    /// Content section the page loads on mount.
    pub fn section(self) -> Section {
        match self {
            Page::Home => Section::Home,
            Page::About => Section::About,
            Page::Academics => Section::Academics,
            Page::Admissions => Section::Admissions,
            Page::CampusLife => Section::CampusLife,
            Page::Research => Section::Research,
            Page::Contact => Section::Contact,
            Page::Portals | Page::WebApp => Section::Portals,
            Page::Events => Section::Events,
            Page::Giving => Section::Giving,
            Page::Visit => Section::Visit,
            Page::News => Section::News,
            Page::AwardsApplication => Section::Awards,
            Page::Alumni => Section::Alumni,
            Page::Gallery => Section::Gallery,
            Page::Faculty => Section::Faculty,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.pattern())
    }
}

/// A resolved path with its captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub page: Page,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// All route patterns with their pages, in table order.
pub fn routes() -> impl Iterator<Item = (&'static str, Page)> {
    ROUTES.into_iter()
}

/// Resolve a path against the route table.
///
/// Query strings, fragments and trailing slashes are ignored.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES.iter().find_map(|(pattern, page)| {
        match_pattern(pattern, &segments).map(|params| RouteMatch {
            page: *page,
            params,
        })
    })
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (part, segment) in parts.iter().zip(segments) {
        if let Some(name) = part.strip_prefix(':') {
            params.insert(name.to_string(), (*segment).to_string());
        } else if part != segment {
            return None;
        }
    }
    Some(params)
}
