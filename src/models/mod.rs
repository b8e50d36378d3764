// src/models/mod.rs

//! Domain models for the site content client.
//!
//! This module contains the configuration, the section catalogue, list item
//! view models and the route table.

mod config;
mod item;
pub mod route;
mod section;

// Re-export all public types
pub use config::{ApiConfig, Config, LoggingConfig};
pub use item::{ListItem, unique_items};
pub use route::{Page, RouteMatch};
pub use section::{FieldKind, FieldSchema, FieldSpec, Section};
