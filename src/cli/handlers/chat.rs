use crate::analyst::{AnalystSession, SqlMessage};
use crate::cli::utils::spinner;
use crate::gateway::AiGateway;
use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub async fn handle_chat_command(gateway: Arc<AiGateway>) -> Result<()> {
    let mut session = AnalystSession::new(gateway);
    for message in session.messages() {
        print_reply(message);
    }
    println!(
        "{}",
        "Type a question, `/t <id>` for a template, `/templates` to list them, or `exit` to quit.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "exit" | "quit" => break,
            "/templates" => {
                for template in session.templates() {
                    println!("  {}  {} - {}", template.id.cyan(), template.label.bold(), template.description);
                }
                continue;
            }
            _ => {}
        }

        let progress = spinner("Analyzing...");
        let reply = match line.strip_prefix("/t ") {
            Some(id) => session.ask_template(id).await,
            None => session.ask(line).await,
        };
        progress.finish_and_clear();

        match reply {
            Some(message) => print_reply(message),
            None => println!("{}", "Unknown template. Use /templates to list them.".yellow()),
        }
    }

    Ok(())
}

fn print_reply(message: &SqlMessage) {
    if message.is_error {
        println!("{} {}", "✗".red().bold(), message.text.red());
        return;
    }

    println!("{} {}", "🤖".bold(), message.text);
    if let Some(sql) = &message.sql {
        println!();
        println!("{}", sql.green());
    }
}
