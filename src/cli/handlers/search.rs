use crate::cli::commands::OutputFormat;
use crate::cli::utils::spinner;
use crate::gateway::{prompts, AiGateway, SearchStatus};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tracing::warn;

pub async fn handle_search_command(
    gateway: &AiGateway,
    topic: String,
    category: String,
    format: OutputFormat,
) -> Result<()> {
    if !prompts::categories().contains(&category.trim().to_lowercase().as_str()) {
        warn!(
            "Unknown category '{}', using general portals. Known: {}",
            category,
            prompts::categories().join(", ")
        );
    }

    let progress = spinner("Searching portals...");
    let search = gateway.search_grounded(&topic, &category).await;
    progress.finish_and_clear();

    if format == OutputFormat::Json {
        let status = match &search.status {
            SearchStatus::Answered => "answered".to_string(),
            SearchStatus::NoResults => "no_results".to_string(),
            SearchStatus::Failed(e) => format!("failed: {}", e),
        };
        let value = json!({
            "text": search.text,
            "sources": search.sources,
            "status": status,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match &search.status {
        SearchStatus::Failed(_) => println!("{}", search.text.yellow()),
        _ => println!("{}", search.text),
    }

    if !search.sources.is_empty() {
        println!();
        println!("{}", "Sources".bold());
        for (i, source) in search.sources.iter().enumerate() {
            println!("  {}. {} {}", i + 1, source.title, source.uri.dimmed());
        }
    }

    Ok(())
}
