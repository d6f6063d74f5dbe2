use crate::analyst::find_template;
use crate::cli::commands::OutputFormat;
use crate::cli::utils::spinner;
use crate::gateway::{AiGateway, SqlAnalysis};
use anyhow::{anyhow, Result};
use colored::Colorize;
use tracing::info;

pub async fn handle_ask_command(
    gateway: &AiGateway,
    question: Option<String>,
    template: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let question = match (question, template) {
        (_, Some(id)) => {
            let template = find_template(&id)
                .ok_or_else(|| anyhow!("Unknown template '{}'. Run `estatemind templates` to list them", id))?;
            info!("Running template {}: {}", template.id, template.label);
            template.query.to_string()
        }
        (Some(question), None) => question,
        (None, None) => return Err(anyhow!("A question or --template is required")),
    };

    let progress = spinner("Translating question to SQL...");
    let result = gateway.translate_to_query(&question).await;
    progress.finish_and_clear();

    let analysis = result?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Text => print_analysis(&analysis),
    }

    Ok(())
}

pub fn print_analysis(analysis: &SqlAnalysis) {
    println!("{}", analysis.explanation);
    println!();
    println!("{}", "Optimized SQL Query".bold().blue());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", analysis.query.green());
}
