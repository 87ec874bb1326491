//! agentsql CLI - AlloyDB webhook fulfillment for conversational agents
//!
//! This is the entry point for the agentsql command-line tool, which provides:
//! - The webhook HTTP server (`serve` subcommand)
//! - Direct statement execution through the static path (`exec` subcommand)
//! - The investments vector search from the terminal (`search` subcommand)

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sqlx::PgPool;
use tracing::info;

use agentsql_core::{error_reply, table_reply, AlloyDbConfig, ResultSet, SqlFailure, NO_RESULTS};
use agentsql_server::db::{self, DEFAULT_MAX_CONNECTIONS};
use agentsql_server::{query, run_server, ServerConfig};

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "agentsql",
    author,
    version,
    about = "Webhook fulfillment bridging conversational agents to AlloyDB",
    long_about = "Serve Dialogflow CX style webhook requests against AlloyDB: run \
                  platform-supplied SQL or a vector-similarity search over the \
                  investments table, and render results as rich-content tables."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the webhook HTTP server
    Serve(ServeArgs),
    /// Execute a SQL statement (the static fulfillment path)
    Exec(ExecArgs),
    /// Run the vector search over investments (the parameterized path)
    Search(SearchArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Connect directly to this URL instead of the AlloyDB environment config
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum connections in the pool
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Args, Debug)]
struct ExecArgs {
    /// SQL statement to execute verbatim
    sql: String,

    /// Print the webhook reply body instead of tab-separated rows
    #[arg(long)]
    json: bool,

    /// Connect directly to this URL instead of the AlloyDB environment config
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Free-text search phrase
    phrase: String,

    /// Print the webhook reply body instead of tab-separated rows
    #[arg(long)]
    json: bool,

    /// Connect directly to this URL instead of the AlloyDB environment config
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so DATABASE_URL fallbacks in clap see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(cli.debug)?;

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Exec(args) => {
            let pool = build_pool(args.database_url.as_deref(), DEFAULT_MAX_CONNECTIONS).await?;
            let outcome = query::run_statement(&pool, &args.sql).await;
            print_outcome(outcome, args.json)
        }
        Commands::Search(args) => {
            let pool = build_pool(args.database_url.as_deref(), DEFAULT_MAX_CONNECTIONS).await?;
            let outcome = query::vector_search(&pool, &args.phrase).await;
            print_outcome(outcome, args.json)
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let pool = build_pool(args.database_url.as_deref(), args.max_connections).await?;
    let config = ServerConfig {
        bind_addr: args.bind,
        request_timeout: Duration::from_secs(args.timeout),
    };
    run_server(pool, config).await?;
    Ok(())
}

/// Build the process-wide pool: a URL override for development, otherwise
/// the AlloyDB environment configuration. Configuration problems abort here,
/// before any request is served.
async fn build_pool(database_url: Option<&str>, max_connections: u32) -> Result<PgPool> {
    match database_url {
        Some(url) => db::create_pool_with_options(url, max_connections)
            .await
            .context("failed to connect to database"),
        None => {
            let config = AlloyDbConfig::from_env()?;
            info!(instance = %config.instance_uri(), "using AlloyDB configuration");
            db::create_pool_from_config(&config, max_connections)
                .await
                .context("failed to connect to AlloyDB")
        }
    }
}

fn print_outcome(outcome: std::result::Result<ResultSet, SqlFailure>, json: bool) -> Result<()> {
    if json {
        let body = match &outcome {
            Ok(result) => serde_json::to_string_pretty(&table_reply(result))?,
            Err(failure) => serde_json::to_string_pretty(&error_reply(failure))?,
        };
        println!("{body}");
        return Ok(());
    }

    match outcome {
        Ok(result) if result.row_count() == 0 => println!("{NO_RESULTS}"),
        Ok(result) => {
            println!("{}", result.columns.join("\t"));
            for row in &result.rows {
                println!("{}", row.join("\t"));
            }
        }
        Err(failure) => anyhow::bail!("{} {}", failure.message, failure.details),
    }
    Ok(())
}
