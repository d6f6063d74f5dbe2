use anyhow::Result;
use clap::Parser;
use estatemind::cli::commands::{Cli, Commands};
use estatemind::cli::handlers::{
    handle_ask_command, handle_chat_command, handle_nearby_command, handle_schema_command,
    handle_search_command, handle_templates_command,
};
use estatemind::cli::utils::{build_gateway, init_logging, load_config, print_info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format)?;

    // Commands that never touch the network
    match cli.command {
        Commands::Templates => {
            handle_templates_command();
            return Ok(());
        }
        Commands::Schema => {
            handle_schema_command();
            return Ok(());
        }
        Commands::Info => {
            print_info();
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(cli.env_file.as_deref(), cli.verbose)?;
    let gateway = build_gateway(&config)?;

    match cli.command {
        Commands::Ask { question, template, format } => {
            handle_ask_command(&gateway, question, template, format).await
        }

        Commands::Chat => handle_chat_command(gateway).await,

        Commands::Search { topic, category, format } => {
            handle_search_command(&gateway, topic, category, format).await
        }

        Commands::Nearby { lat, lng, kind, raw } => {
            handle_nearby_command(&gateway, lat, lng, kind, raw).await
        }

        Commands::Templates | Commands::Schema | Commands::Info => Ok(()),
    }
}
