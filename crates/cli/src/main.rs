//! Walk-in Queue CLI - front-of-house client for the queue daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9530";

#[derive(Parser)]
#[command(name = "walkin")]
#[command(about = "Walk-in Queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WALKIN_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a customer to the end of the queue
    Join {
        /// Customer first name
        #[arg(short, long)]
        name: String,

        /// Location (see `walkin locations`)
        #[arg(short, long)]
        location: String,
    },

    /// Show the pending queue
    List,

    /// Show one customer by id
    Show { customer_id: i64 },

    /// Show the customer at a queue position
    At { position: i64 },

    /// Start serving a pending customer
    Promote { customer_id: i64 },

    /// Finish serving an in-progress customer
    Complete { customer_id: i64 },

    /// Take the customer at a queue position off the queue
    Remove { position: i64 },

    /// A pending customer leaves the queue
    Cancel { customer_id: i64 },

    /// List configured locations
    Locations,

    /// Show daemon status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    #[tabled(rename = "#")]
    queue_position: i64,
    #[tabled(rename = "id")]
    customer_id: i64,
    #[tabled(rename = "name")]
    first_name: String,
    location: String,
}

#[derive(Deserialize, Tabled)]
struct CustomerRow {
    #[tabled(rename = "id")]
    customer_id: i64,
    #[tabled(rename = "name")]
    first_name: String,
    location: String,
    status: String,
    #[tabled(rename = "position")]
    queue_position: i64,
}

#[derive(Deserialize)]
struct ActionResult {
    customer_id: i64,
    message: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// One customer as a table, with an optional success headline above it
fn render_customer(result: serde_json::Value, headline: Option<&str>) -> Result<String> {
    let customer: CustomerRow = serde_json::from_value(result)?;
    let table = Table::new(vec![customer]).to_string();
    Ok(match headline {
        Some(headline) => format!("{}\n{}", format!("✓ {}", headline).green().bold(), table),
        None => table,
    })
}

/// Nothing is printed unless the call succeeds
async fn print_customer(
    url: &str,
    method: &str,
    params: serde_json::Value,
    headline: Option<&str>,
) -> Result<()> {
    let result = call_rpc(url, method, params).await?;
    println!("{}", render_customer(result, headline)?);
    Ok(())
}

async fn print_action(url: &str, method: &str, params: serde_json::Value) -> Result<()> {
    let result: ActionResult = serde_json::from_value(call_rpc(url, method, params).await?)?;
    println!(
        "{}",
        format!("✓ {} (customer {})", result.message, result.customer_id)
            .green()
            .bold()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let url = cli.rpc_url.as_str();

    match cli.command {
        Commands::Join { name, location } => {
            let params = json!({ "first_name": name, "location": location });
            let result = call_rpc(url, "queue.enqueue.v1", params).await?;

            println!("{}", "✓ Customer added to queue".green().bold());
            println!(
                "  {} {}   {} {}",
                "id:".bold(),
                result["customer_id"],
                "position:".bold(),
                result["queue_position"]
            );
        }

        Commands::List => {
            let result = call_rpc(url, "queue.list.v1", json!({})).await?;
            let rows: Vec<QueueRow> = serde_json::from_value(result)?;

            if rows.is_empty() {
                println!("{}", "Queue is empty".yellow());
            } else {
                println!("{}", Table::new(rows));
            }
        }

        Commands::Show { customer_id } => {
            print_customer(url, "queue.get.v1", json!({ "customer_id": customer_id }), None)
                .await?;
        }

        Commands::At { position } => {
            print_customer(url, "queue.at_position.v1", json!({ "position": position }), None)
                .await?;
        }

        Commands::Promote { customer_id } => {
            print_customer(
                url,
                "queue.promote.v1",
                json!({ "customer_id": customer_id }),
                Some("Customer promoted"),
            )
            .await?;
        }

        Commands::Complete { customer_id } => {
            print_action(url, "queue.complete.v1", json!({ "customer_id": customer_id })).await?;
        }

        Commands::Remove { position } => {
            print_action(url, "queue.remove.v1", json!({ "position": position })).await?;
        }

        Commands::Cancel { customer_id } => {
            print_action(url, "queue.cancel.v1", json!({ "customer_id": customer_id })).await?;
        }

        Commands::Locations => {
            let result = call_rpc(url, "meta.locations.v1", json!({})).await?;
            let locations: Vec<String> = serde_json::from_value(result)?;
            for location in locations {
                println!("  • {}", location);
            }
        }

        Commands::Status => {
            println!("{}", "Queue Status".cyan().bold());
            println!();

            match call_rpc(url, "admin.health.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Waiting:".bold(), stats["pending"]);
                    println!("  {} {}", "In service:".bold(), stats["in_progress"]);
                    println!("  {} {}", "Completed:".bold(), stats["completed"]);
                    println!("  {} {}", "Cancelled:".bold(), stats["cancelled"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
