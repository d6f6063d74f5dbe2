use crate::analyst::TEMPLATES;
use crate::gateway::prompts::DB_SCHEMA;
use colored::Colorize;

pub fn handle_templates_command() {
    println!("{}", "Quick analysis templates".bold());
    println!("{}", "─".repeat(40).dimmed());
    for template in TEMPLATES {
        println!("{}  {}", template.id.cyan().bold(), template.label.bold());
        println!("   {}", template.description.dimmed());
    }
    println!();
    println!("Run one with: estatemind ask --template <id>");
}

pub fn handle_schema_command() {
    println!("{}", DB_SCHEMA.trim_matches('\n'));
}
