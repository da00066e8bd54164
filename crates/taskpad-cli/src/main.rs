use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::time::Instant;

use taskpad_cli::{apply, ChatWidget, Exchange, Outcome, TaskCommand};
use taskpad_core::TodoList;

#[derive(Parser)]
#[command(name = "taskpad-cli")]
#[command(about = "Terminal task board with a chat assistant")]
#[command(version)]
struct Cli {
    #[arg(long, env = "TASKPAD_SERVER_URL", default_value = "http://localhost:3000")]
    server_url: String,

    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Task board with the chat assistant on `ask` (default)
    Tasks,
    /// Start interactive chat
    Chat,
    /// Send a single message
    Send {
        /// Message content
        message: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        eprintln!("{}", "[DEBUG] Debug mode enabled".dimmed());
        eprintln!(
            "{}",
            format!("[DEBUG] Server URL: {}", cli.server_url).dimmed()
        );
    }

    let mut widget = ChatWidget::new(&cli.server_url);

    match cli.command.unwrap_or(Commands::Tasks) {
        Commands::Tasks => run_task_board(&mut widget, cli.debug).await,
        Commands::Chat => run_interactive_chat(&mut widget, cli.debug).await,
        Commands::Send { message } => {
            let exchange = ask(&mut widget, &message, cli.debug).await;
            if matches!(exchange, Exchange::Failed(_)) {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{} ", label.cyan().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// Stream one exchange to stdout.
async fn ask(widget: &mut ChatWidget, message: &str, debug: bool) -> Exchange {
    if debug {
        eprintln!("{}", format!("[DEBUG] POST {}", widget.endpoint()).dimmed());
        eprintln!(
            "{}",
            format!("[DEBUG] History turns: {}", widget.history().len()).dimmed()
        );
    }

    println!("{}", "Assistant:".green().bold());

    let start = Instant::now();
    let exchange = widget
        .send(message, |fragment| {
            print!("{}", fragment.green());
            let _ = io::stdout().flush();
        })
        .await;

    match &exchange {
        Exchange::Completed(_) => println!(),
        Exchange::Failed(error) => {
            // Partial output already on screen is superseded by the error.
            println!();
            println!("{}", format!("❌ {}", error).red());
        }
        Exchange::Skipped => {}
    }

    if debug {
        eprintln!(
            "{}",
            format!("[DEBUG] Exchange finished in {:?}", start.elapsed()).dimmed()
        );
    }

    exchange
}

async fn run_interactive_chat(widget: &mut ChatWidget, debug: bool) -> anyhow::Result<()> {
    println!("{}", "💬 Taskpad Chat".cyan().bold());
    println!("{}", "Type 'exit' or 'quit' to leave".dimmed());
    println!();

    while let Some(input) = prompt("You:")? {
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        ask(widget, &input, debug).await;
        println!();
    }

    println!("{}", "👋 Goodbye!".cyan());
    Ok(())
}

async fn run_task_board(widget: &mut ChatWidget, debug: bool) -> anyhow::Result<()> {
    let mut list = TodoList::new();

    println!("{}", "📝 Taskpad".cyan().bold());
    println!("{}", "Type 'help' for commands, 'quit' to leave".dimmed());
    println!();
    println!("{}", list.render());

    while let Some(line) = prompt(">")? {
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<TaskCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                continue;
            }
        };

        match apply(&mut list, command) {
            Ok(Outcome::Board(board)) => println!("{}", board),
            Ok(Outcome::Message(message)) => println!("{}", message.dimmed()),
            Ok(Outcome::Ask(message)) => {
                if message.is_empty() {
                    println!("{}", "Usage: ask <message>".yellow());
                } else {
                    ask(widget, &message, debug).await;
                }
            }
            Ok(Outcome::Quit) => break,
            Err(e) => println!("{}", e.to_string().yellow()),
        }
        println!();
    }

    println!("{}", "👋 Goodbye!".cyan());
    Ok(())
}
