//! Service layer for the site content client.
//!
//! This module contains the business logic for:
//! - Section state containers (`SectionStore`)
//! - Client-side list filtering (`filter_items`)
//! - The per-instance page context (`Site`)
//! - Placeholder form actions (`StubAction`)

mod actions;
pub mod filter;
mod site;
pub mod store;

pub use actions::{Notification, StubAction};
pub use filter::{FilterState, Filterable, category_options, filter_items};
pub use site::{MountedPage, Site};
pub use store::{FetchOutcome, PageView, SectionData, SectionState, SectionStore, ViewScope};
