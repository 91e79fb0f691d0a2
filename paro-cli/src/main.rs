use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

/// paro - inspect how listing query strings are parsed
#[derive(Parser)]
#[command(name = "paro")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./paro.toml)
    #[arg(long, global = true, value_name = "FILE", env = "PARO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query string and print the resulting options as JSON
    Parse {
        /// URL-encoded query string, with or without the leading `?`
        #[arg(value_name = "QUERY_STRING")]
        query: Option<String>,

        /// Raw parameter, not URL-encoded (repeatable, overrides QUERY_STRING)
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Defaults as a JSON object, replacing the configured ones
        #[arg(long, value_name = "JSON")]
        defaults: Option<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Show the query-string key and default of every parameter
    Params,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    let result = match cli.command {
        Commands::Parse {
            query,
            params,
            defaults,
            pretty,
        } => commands::parse::execute(cli.config, query, params, defaults, pretty).await,
        Commands::Params => commands::params::execute(cli.config).await,
    };

    // Handle result
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            // Show context if available
            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
