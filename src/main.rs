//! Search Agent - command line entry point
//!
//! Runs one query-answer cycle and prints the answer to stdout. Logs go to
//! stderr.

use clap::{Parser, Subcommand};
use search_agent::agent::build_agent;
use search_agent::config::AppConfig;
use search_agent::credentials::load_credentials;
use search_agent::observability::{init_default_logging, verbosity_level};
use search_agent::tools::builtin::web_tool_descriptions;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

/// Question asked when none is given on the command line
const DEFAULT_QUERY: &str = "What is the capital of France? Answer in one sentence.";

/// Config files tried in order when `--config` is not given
const DEFAULT_CONFIG_PATHS: &[&str] = &["search-agent.toml", "config/search-agent.toml"];

/// Tool-augmented LLM query agent with web search and page scraping
#[derive(Parser)]
#[command(name = "search-agent")]
#[command(about = "Answer a question with an LLM that can search the web and read pages")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one query and print the result
    Ask {
        /// The question to answer
        #[arg(default_value = DEFAULT_QUERY)]
        query: String,
    },
    /// List the tools exposed to the model
    Tools,
    /// Validate configuration
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging(verbosity_level(cli.verbose));
    info!("Starting search-agent v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Ask { query } => ask(&config, &query).await,
        Commands::Tools => list_tools(&config),
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn load_configuration(
    config_path: Option<&PathBuf>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());
        return Ok(AppConfig::load_from_file(path)?);
    }

    for path_str in DEFAULT_CONFIG_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading configuration from: {}", path.display());
            return Ok(AppConfig::load_from_file(&path)?);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(AppConfig::default())
}

async fn ask(config: &AppConfig, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = load_credentials(&config.credentials)?;
    let agent = build_agent(config, &credentials)?;

    let answer = agent.run(query).await?;
    println!("{answer}");
    Ok(())
}

fn list_tools(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    for tool in web_tool_descriptions(&config.provider) {
        println!("{}: {}", tool.name, tool.description);
        for param in &tool.parameters {
            println!("    {} ({}): {}", param.name, param.kind, param.description);
        }
    }
    Ok(())
}

fn handle_config_command(config: &AppConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}
