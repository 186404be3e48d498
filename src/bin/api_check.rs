//! Compare the remote todo list against the locally stored categories.

use std::collections::BTreeMap;

use taskplanner::config::PlannerConfig;
use taskplanner::core::category::{CATEGORIES_KEY, default_categories};
use taskplanner::storage::{FileStore, KeyValueStore};
use taskplanner::sync::http::HttpBackend;
use taskplanner::sync::{ListResponse, TodoBackend};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = PlannerConfig::load(&PlannerConfig::default_path());
    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.api_base_url.clone());

    println!("=== Todo API vs Local Categories ===\n");

    // Read only; a first run would otherwise persist the defaults.
    let store = FileStore::open(config.store_path());
    let categories: Vec<String> = store
        .get(CATEGORIES_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_else(default_categories);
    println!("Local categories: {}", categories.join(", "));

    let backend = match HttpBackend::new(&base) {
        Ok(b) => b,
        Err(e) => {
            println!("  Client error: {}", e);
            return;
        }
    };

    println!("\n--- {} ---", backend.base_url());
    let todos = match backend.list().await {
        Ok(ListResponse::RawList(todos)) => {
            println!("  Response shape: bare list");
            todos
        }
        Ok(ListResponse::Wrapped { data }) => {
            println!("  Response shape: wrapped in \"data\"");
            data
        }
        Ok(ListResponse::Unrecognized(value)) => {
            println!("  Response shape not recognized: {}", value);
            return;
        }
        Err(e) => {
            println!("  Error listing todos: {}", e);
            return;
        }
    };

    let mut per_category: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    let mut missing_id = 0;
    let mut blank_title = 0;
    for todo in &todos {
        let entry = per_category.entry(todo.category.as_str()).or_default();
        entry.0 += 1;
        if todo.completed {
            entry.1 += 1;
        }
        if todo.id.is_none() {
            missing_id += 1;
        }
        if todo.title.is_empty() {
            blank_title += 1;
        }
    }

    println!("  Remote: {} todos", todos.len());
    for (category, (total, done)) in &per_category {
        let known = if categories.iter().any(|c| c == category) { "" } else { "  (not a local category)" };
        println!("    {}: {} ({} completed){}", category, total, done, known);
    }

    if missing_id > 0 {
        println!("\n  WITHOUT ID: {}", missing_id);
    }
    if blank_title > 0 {
        println!("  BLANK TITLE: {}", blank_title);
    }

    println!("\n=== Done ===");
}
