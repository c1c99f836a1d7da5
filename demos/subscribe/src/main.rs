//! Runs one GraphQL operation over `graphql-ws` and prints each result.
//!
//! ```text
//! subscribe <ws-url> <query> [variables-json] [operation-name]
//! ```
//!
//! Ctrl-C stops the operation and ends the session. Set `RUST_LOG` for
//! more detail (defaults to `info`).

use gqlws::prelude::*;
use gqlws::{DEFAULT_ACK_TIMEOUT, initialize, next_message};
use tracing_subscriber::EnvFilter;

const OPERATION_ID: &str = "1";

struct Args {
    url: String,
    query: String,
    variables: Option<serde_json::Value>,
    operation_name: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let usage = "usage: subscribe <ws-url> <query> [variables-json] [operation-name]";
    let url = args.next().ok_or(usage)?;
    let query = args.next().ok_or(usage)?;
    let variables: Option<serde_json::Value> = args
        .next()
        .map(|raw| serde_json::from_str(&raw))
        .transpose()?;
    let operation_name = args.next();
    Ok(Args {
        url,
        query,
        variables,
        operation_name,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;
    let start = StartMessage::new(
        OPERATION_ID,
        args.query,
        args.variables,
        args.operation_name.map(serde_json::Value::String),
    )?;

    let conn = gqlws::connect(&ConnectConfig::new(args.url)).await?;
    initialize(&conn, InitMessage::default(), DEFAULT_ACK_TIMEOUT).await?;
    send(&conn, start)?;

    loop {
        tokio::select! {
            message = next_message(&conn) => match message {
                Ok(Some(ServerMessage::Data(data))) => {
                    let payload = data.payload().cloned().unwrap_or_default();
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                Ok(Some(ServerMessage::Error(err))) => {
                    tracing::error!(payload = ?err.payload(), "operation failed");
                    break;
                }
                Ok(Some(ServerMessage::Complete(_))) => {
                    tracing::info!("operation complete");
                    break;
                }
                Ok(Some(other)) => {
                    tracing::debug!(message_type = other.message_type(), "ignored");
                }
                Ok(None) => {
                    tracing::warn!("server closed the connection");
                    return Ok(());
                }
                // Keep-alives (`ka`) and other extensions.
                Err(e) if e.is_unknown_message_type() => {
                    tracing::warn!(error = %e, "skipping message");
                }
                Err(e) => return Err(e.into()),
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping operation");
                send(&conn, StopMessage::new(OPERATION_ID)?)?;
                break;
            }
        }
    }

    send(&conn, ConnectionTerminateMessage::new())?;
    conn.shutdown().await?;
    Ok(())
}
