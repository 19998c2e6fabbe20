use anyhow::Context;
use clap::Parser;
use kb_search_mcp::cli::{Cli, Commands};
use kb_search_mcp::error::Result;
use kb_search_mcp::search::SearchEngine;
use kb_search_mcp::tools::{format_facets, format_search_results, format_suggestions};
use kb_search_mcp::{KnowledgeServer, tracing as logging};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Serve);

    let level = if matches!(command, Commands::Serve) {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    logging::init(level, cli.log_format);

    let engine = cli.load_engine()?;

    match command {
        Commands::Serve => serve(engine).await,
        Commands::Search(args) => {
            let request = args.to_request();
            let response = engine.search(&request)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", format_search_results(&response, &request));
            }
            Ok(())
        }
        Commands::Suggest { query, limit, json } => {
            let suggestions = engine.suggest(&query, limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print!("{}", format_suggestions(&suggestions));
            }
            Ok(())
        }
        Commands::Facets { json } => {
            let facets = engine.facets();
            if json {
                println!("{}", serde_json::to_string_pretty(&facets)?);
            } else {
                print!("{}", format_facets(&facets));
            }
            Ok(())
        }
    }
}

async fn serve(engine: SearchEngine) -> Result<()> {
    tracing::info!(
        entries = engine.index().len(),
        clock = ?engine.clock(),
        "Starting kb-search-mcp MCP server"
    );

    // Create and serve the MCP server over stdio
    let server = KnowledgeServer::new(engine);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service
        .waiting()
        .await
        .context("MCP service terminated abnormally")?;

    Ok(())
}
