//! Server health check.
//!
//! Diagnostic entry point that exercises, in order: environment-variable
//! presence, configuration loading, a live database round-trip, and a
//! representative subset of the MCP tools. Exits non-zero if any stage
//! fails. Peripheral tooling - not part of the server core.

use clap::Parser;
use sql_agent_mcp::config::Config;
use sql_agent_mcp::db::ConnectionProvider;
use sql_agent_mcp::tools::format;
use sql_agent_mcp::tools::{QueryToolHandler, SchemaToolHandler};
use std::sync::Arc;

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

fn print_status(message: &str, ok: bool) {
    if ok {
        println!("{GREEN}\u{2713} {message}{RESET}");
    } else {
        println!("{RED}\u{2717} {message}{RESET}");
    }
}

fn print_heading(step: u32, title: &str) {
    println!();
    println!("{}", "=".repeat(60));
    println!("{step}. {title}");
    println!("{}", "=".repeat(60));
}

fn check_environment() -> bool {
    print_heading(1, "CHECKING ENVIRONMENT VARIABLES");

    let mut all_present = true;
    for var in ["DB_HOST", "DB_NAME", "DB_USER", "DB_PASSWORD"] {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => {
                let display = if var == "DB_PASSWORD" {
                    "****"
                } else {
                    value.as_str()
                };
                print_status(&format!("{var}: {display}"), true);
            }
            _ => {
                print_status(&format!("{var}: NOT SET"), false);
                all_present = false;
            }
        }
    }
    all_present
}

fn check_configuration(config: &Config) -> Option<Arc<ConnectionProvider>> {
    print_heading(2, "LOADING SERVER CONFIGURATION");

    let provider = Arc::new(ConnectionProvider::new(config.db_settings()));
    match provider.connect_options() {
        Ok(_) => {
            print_status("Connection settings validated", true);
            Some(provider)
        }
        Err(e) => {
            print_status(&format!("Configuration invalid: {e}"), false);
            None
        }
    }
}

async fn check_database_connection(provider: &Arc<ConnectionProvider>, config: &Config) -> bool {
    print_heading(3, "TESTING DATABASE CONNECTION");

    match provider.ping().await {
        Ok(()) => {
            print_status(
                &format!(
                    "Connected to database: {}",
                    config.db_name.as_deref().unwrap_or("?")
                ),
                true,
            );
            print_status(
                &format!(
                    "Database host: {}",
                    config.db_host.as_deref().unwrap_or("?")
                ),
                true,
            );
            true
        }
        Err(e) => {
            print_status(&format!("Database connection failed: {e}"), false);
            false
        }
    }
}

/// A tool response is healthy when it is non-empty and not an error block.
fn tool_ok(name: &str, output: &str) -> bool {
    let ok = !output.is_empty() && !output.starts_with("Error");
    if ok {
        print_status(&format!("{name}: OK"), true);
        let preview: String = output.chars().take(200).collect();
        println!("  {BLUE}Preview:{RESET} {}...", preview.replace('\n', " "));
    } else {
        let head: String = output.chars().take(100).collect();
        print_status(&format!("{name}: FAILED - {head}"), false);
    }
    ok
}

async fn check_tools(provider: &Arc<ConnectionProvider>) -> bool {
    print_heading(4, "TESTING MCP SERVER TOOLS");

    let schemas = SchemaToolHandler::new(provider.clone());
    let queries = QueryToolHandler::new(provider.clone());

    let mut results = Vec::new();

    let listing = format::schema_listing(schemas.list_schemas().await);
    results.push(tool_ok("list_schemas", &listing));

    let tables = format::table_listing("public", schemas.list_tables("public").await);
    results.push(tool_ok("list_tables (schema: public)", &tables));

    let select = format::select_result(
        "SELECT 1 as test",
        queries.execute_select("SELECT 1 as test").await,
    );
    results.push(tool_ok("execute_select_query (SELECT 1)", &select));

    results.into_iter().all(|ok| ok)
}

#[tokio::main]
async fn main() {
    let config = Config::parse();

    println!();
    println!("{}", "=".repeat(60));
    println!("{:^60}", "SQL AGENT MCP SERVER HEALTH CHECK");
    println!("{}", "=".repeat(60));

    let env_ok = check_environment();

    let provider = check_configuration(&config);
    let config_ok = provider.is_some();

    let (db_ok, tools_ok) = match &provider {
        Some(provider) => {
            let db_ok = check_database_connection(provider, &config).await;
            let tools_ok = if db_ok {
                check_tools(provider).await
            } else {
                false
            };
            (db_ok, tools_ok)
        }
        None => (false, false),
    };

    print_heading(5, "HEALTH CHECK SUMMARY");
    let stages = [
        ("Environment Variables", env_ok),
        ("Server Configuration", config_ok),
        ("Database Connection", db_ok),
        ("MCP Tools", tools_ok),
    ];
    for (stage, ok) in stages {
        print_status(
            &format!("{stage}: {}", if ok { "PASSED" } else { "FAILED" }),
            ok,
        );
    }

    println!();
    if stages.iter().all(|(_, ok)| *ok) {
        print_status("ALL CHECKS PASSED", true);
        print_status("MCP server is ready to use", true);
    } else {
        print_status("SOME CHECKS FAILED", false);
        print_status("Fix the issues above before running the server", false);
        std::process::exit(1);
    }
}
