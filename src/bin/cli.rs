//! campus-site CLI
//!
//! Headless front end for the site's content layer: fetch sections, filter
//! their lists, resolve routes and try the placeholder actions.

use std::path::PathBuf;

use campus_site::{
    config,
    error::{AppError, Result},
    models::{FieldKind, Section, route},
    services::{
        FetchOutcome, FilterState, PageView, SectionData, Site, StubAction, ViewScope,
        category_options, filter_items,
    },
    utils::{excerpt, log as console},
};
use clap::{Parser, Subcommand};

/// campus-site - University site content client
#[derive(Parser, Debug)]
#[command(
    name = "campus-site",
    version,
    about = "University marketing site content client"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config/campus.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the route table
    Routes,

    /// List content sections and their expected fields
    Sections,

    /// Fetch one section and show its state
    Fetch {
        /// Section slug (e.g. "events", "campus-life")
        section: Section,

        /// Print the coerced payload as JSON
        #[arg(long)]
        json: bool,

        /// Also write the coerced payload to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch every section once
    FetchAll,

    /// Fetch a section and filter one of its lists
    List {
        /// Section slug
        section: Section,

        /// List field to show (e.g. "events", "faculty")
        field: String,

        /// Free-text search term
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category filter ("all" disables it)
        #[arg(long, default_value = "all")]
        category: String,
    },

    /// Resolve a route, mount its page and load it
    Open {
        /// Site path (e.g. "/webapp/student")
        path: String,
    },

    /// Invoke a placeholder action
    Action {
        /// Action name (e.g. "donate", "apply-now")
        name: StubAction,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
    console::init(level);
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = config::load(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Routes => {
            console::header("Routes");
            for (pattern, page) in route::routes() {
                console::sub_item(&format!("{pattern:<22} -> {}", page.section()));
            }
        }

        Command::Sections => {
            console::header("Sections");
            for section in Section::ALL {
                let fields: Vec<String> = section
                    .schema()
                    .fields()
                    .iter()
                    .map(|f| f.name.clone())
                    .collect();
                console::sub_item(&format!(
                    "{:<12} {} [{}]",
                    section.slug(),
                    config.api.endpoint(section.slug()),
                    fields.join(", ")
                ));
            }
        }

        Command::Fetch {
            section,
            json,
            output,
        } => {
            let site = Site::new(config)?;
            let store = site.create_store(section);
            let scope = ViewScope::new();

            console::info(&format!("Fetching {}", store.endpoint()));
            if let FetchOutcome::Failed(message) = store.fetch_all_data(&scope).await {
                console::error(&message);
                return Err(AppError::fetch(section.slug(), message));
            }

            let state = store.state();
            if let Some(path) = output {
                let body = serde_json::to_string_pretty(&state.data)?;
                tokio::fs::write(&path, body).await?;
                console::success(&format!("Saved {} to {}", section, path.display()));
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&state.data)?);
            } else {
                print_summary(section, &state.data);
            }
        }

        Command::FetchAll => {
            let site = Site::new(config)?;
            console::header("Fetching all sections");

            let results = site.fetch_all().await;
            let mut failures = 0;
            for (section, store, outcome) in &results {
                match outcome {
                    FetchOutcome::Applied => {
                        let state = store.state();
                        let lists = section.schema().list_fields().count();
                        let filled = section
                            .schema()
                            .list_fields()
                            .filter(|f| !state.data.list(f).is_empty())
                            .count();
                        console::sub_item(&format!("{section:<12} ok ({filled}/{lists} lists filled)"));
                    }
                    FetchOutcome::Failed(message) => {
                        failures += 1;
                        console::sub_item(&format!("{section:<12} FAILED: {message}"));
                    }
                    FetchOutcome::Discarded => {
                        console::sub_item(&format!("{section:<12} discarded"));
                    }
                }
            }

            console::summary(
                "Fetch",
                &[
                    ("Sections", results.len().to_string()),
                    ("Failures", failures.to_string()),
                ],
            );
        }

        Command::List {
            section,
            field,
            search,
            category,
        } => {
            if section.schema().kind_of(&field) != Some(FieldKind::List) {
                return Err(AppError::validation(format!(
                    "{section} has no list field '{field}'"
                )));
            }

            let site = Site::new(config)?;
            let store = site.create_store(section);
            let scope = ViewScope::new();
            if let FetchOutcome::Failed(message) = store.fetch_all_data(&scope).await {
                console::error(&message);
                return Err(AppError::fetch(section.slug(), message));
            }

            let items = store.state().data.items(&field);
            let filter = FilterState::new(search, category);
            let matched = filter_items(&items, &filter);

            console::header(&format!("{section} / {field}"));
            console::sub_item(&format!(
                "Categories: {}",
                category_options(&items).join(", ")
            ));
            for item in &matched {
                let meta = [item.date.as_str(), item.category.as_str()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" · ");
                console::sub_item(&format!("{}  {}", item.title, meta));
                if !item.description.is_empty() {
                    console::sub_item(&format!("    {}", excerpt(&item.description, 80)));
                }
            }
            console::summary(
                "Filter",
                &[
                    ("Search", format!("{:?}", filter.search_term)),
                    ("Category", filter.selected_category.clone()),
                    ("Matched", format!("{}/{}", matched.len(), items.len())),
                ],
            );
        }

        Command::Open { path } => {
            let site = Site::new(config)?;
            let page = site.mount(&path)?;
            console::header(&format!("{} ({})", path, page.page().section()));
            for (name, value) in &page.route().params {
                console::sub_item(&format!("{name} = {value}"));
            }

            page.load().await;
            match page.view() {
                PageView::Loading => console::info("Still loading"),
                PageView::Error(message) => {
                    console::error(&message);
                    console::info("Retrying once...");
                    page.retry().await;
                    if let PageView::Error(message) = page.view() {
                        console::error(&message);
                    }
                }
                PageView::Empty => console::warn("Section has no content"),
                PageView::Ready(data) => print_summary(page.page().section(), &data),
            }
        }

        Command::Action { name } => {
            let note = name.invoke();
            console::info(&format!("[{}] {}: {}", name.page(), note.title, note.message));
        }

        Command::Validate => {
            console::info("Validating configuration...");
            if let Err(e) = config.validate() {
                console::error(&format!("Config validation failed: {e}"));
                return Err(e);
            }
            console::success("Config OK");
            console::sub_item(&format!("Base URL: {}", config.api.base_url));
            console::sub_item(&format!("Namespace: {}", config.api.namespace));
            console::sub_item(&format!("Timeout: {}ms", config.api.timeout_ms));
        }
    }

    Ok(())
}

/// Print how many entries each field of a section holds.
fn print_summary(section: Section, data: &SectionData) {
    console::summary(section.slug(), &summary_rows(section, data));
}

/// One `(field, description)` row per schema field.
fn summary_rows(section: Section, data: &SectionData) -> Vec<(String, String)> {
    let schema = section.schema();
    schema
        .fields()
        .iter()
        .map(|spec| {
            let value = match data.get(&spec.name) {
                Some(serde_json::Value::Array(a)) => format!("{} items", a.len()),
                Some(serde_json::Value::Object(o)) => format!("{} keys", o.len()),
                Some(serde_json::Value::String(s)) if !s.is_empty() => excerpt(s, 60),
                _ => "(empty)".to_string(),
            };
            (spec.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_rows_follow_schema() {
        let schema = Section::About.schema();
        let data = SectionData::new(schema.coerce(&json!({
            "mission": "Teach and discover",
            "history": { "founded": 1891 },
            "leadership": [{ "name": "President" }, { "name": "Provost" }]
        })));

        let rows = summary_rows(Section::About, &data);
        assert_eq!(rows.len(), schema.fields().len());
        assert_eq!(rows[0], ("mission".to_string(), "Teach and discover".to_string()));
        assert_eq!(rows[1], ("vision".to_string(), "(empty)".to_string()));
        assert_eq!(rows[2], ("history".to_string(), "1 keys".to_string()));
        assert_eq!(rows[3], ("leadership".to_string(), "2 items".to_string()));
    }
}
