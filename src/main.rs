use anyhow::{anyhow, Result};
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{info, warn};

mod config;
mod llm;
mod preprocess;
mod report;

#[cfg(feature = "api")]
mod api;

use crate::config::Config;
use crate::llm::analyzer::PolicyAnalyzer;
use crate::preprocess::clean;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("InsureScan (Rust)")
        .version("0.1.0")
        .about("Insurance policy risk analysis relay")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Analyze the extracted policy text in FILE and print JSON"),
        )
        .arg(
            Arg::new("serve")
                .short('s')
                .long("serve")
                .help("Run the HTTP API server")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the HTTP API server"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logging
    let filter = if matches.get_flag("verbose") {
        "insurescan_rust=debug,info"
    } else {
        "insurescan_rust=info,warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = Config::load();
    config.validate()?;

    info!("🏥 InsureScan (Rust) starting...");
    info!("{}", config.summary());

    if !config.providers.openrouter.is_configured()
        && !config.providers.gemini.is_configured()
        && !config.providers.bytez.is_configured()
    {
        warn!("No provider credentials configured; every analysis will return demonstration data");
    }

    if matches.get_flag("serve") {
        let port = match matches.get_one::<String>("port") {
            Some(port) => port.parse()?,
            None => config.server.port,
        };
        return serve(config, port).await;
    }

    let Some(file) = matches.get_one::<String>("file") else {
        return Err(anyhow!("nothing to do: pass --file <FILE> or --serve"));
    };
    analyze_file(&config, PathBuf::from(file)).await
}

/// Analyze a single already-extracted document and print the result
async fn analyze_file(config: &Config, path: PathBuf) -> Result<()> {
    let raw = tokio::fs::read_to_string(&path).await?;
    let text = clean(&raw);
    let text_length = text.chars().count();

    if text_length < config.analysis.min_text_length {
        return Err(anyhow!(
            "document has only {} usable characters (minimum {})",
            text_length,
            config.analysis.min_text_length
        ));
    }

    info!("📄 Analyzing {} ({} characters)", path.display(), text_length);

    let analyzer = PolicyAnalyzer::new(config)?;
    let mut analysis = analyzer.analyze(&text).await;
    analysis.text_length = Some(text_length);

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

#[cfg(feature = "api")]
async fn serve(config: Config, port: u16) -> Result<()> {
    use std::sync::Arc;

    let analyzer = Arc::new(PolicyAnalyzer::new(&config)?);
    api::start_http_server(analyzer, Arc::new(config), port).await
}

#[cfg(not(feature = "api"))]
async fn serve(_config: Config, _port: u16) -> Result<()> {
    Err(anyhow!(
        "this binary was built without the `api` feature; rebuild with --features api"
    ))
}
