use clap::{Parser, Subcommand};
use emmet_lsp::config::EmmetConfig;
use emmet_lsp::lsp::{EmmetLs, SettingsEventKind, load_settings};
use std::path::PathBuf;
use tokio::io::{stdin, stdout};
use tower_lsp_server::{LspService, Server};

/// A Language Server Protocol (LSP) server for Emmet abbreviation expansion
#[derive(Parser)]
#[command(name = "emmet-lsp")]
#[command(version)]
#[command(about = "A Language Server Protocol (LSP) server for Emmet abbreviation expansion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings the server would use, as TOML
    PrintConfig {
        /// Project root whose emmet-lsp.toml is applied (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // stdout carries the protocol, so logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::PrintConfig { root }) => {
            let root = root.or_else(|| std::env::current_dir().ok());
            let outcome = load_settings(root.as_deref(), None);

            for event in &outcome.events {
                match event.kind {
                    SettingsEventKind::Info => log::info!("{}", event.message),
                    SettingsEventKind::Warning => eprintln!("Warning: {}", event.message),
                }
            }

            let Some(settings) = outcome.settings else {
                eprintln!("Error: No settings could be resolved");
                std::process::exit(1);
            };

            match toml::to_string(&EmmetConfig::from(&settings)) {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let stdin = stdin();
            let stdout = stdout();

            let (service, socket) = LspService::new(EmmetLs::new);
            Server::new(stdin, stdout, socket).serve(service).await;
        }
    }
}
