// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DocMind - chat with your documents from the terminal.
//!
//! This is the binary entry point for the DocMind client.

mod shell;

use clap::{Parser, Subcommand};

/// DocMind - chat with your documents from the terminal.
#[derive(Parser, Debug)]
#[command(name = "docmind", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive chat shell.
    Shell,
    /// Print the resolved configuration (secrets redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match docmind_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            docmind_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    match cli.command {
        Some(Commands::Shell) => {
            if let Err(e) = shell::run_shell(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(&config);
        }
        None => {
            println!("docmind: use --help for available commands");
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docmind={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Prints the resolved configuration with secrets redacted.
fn print_config(config: &docmind_config::DocmindConfig) {
    println!("[app]");
    println!("user_id = {:?}", config.app.user_id);
    println!("log_level = {:?}", config.app.log_level);
    println!();
    println!("[supabase]");
    println!("url = {:?}", config.supabase.url);
    println!(
        "service_key = {}",
        if config.supabase.service_key.is_some() {
            "<redacted>"
        } else {
            "<unset>"
        }
    );
    println!();
    println!("[backend]");
    println!("base_url = {:?}", config.backend.base_url);
}
