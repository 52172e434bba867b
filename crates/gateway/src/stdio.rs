//! Newline-delimited JSON-RPC serve loop over stdin/stdout.
//!
//! Each message is a single line of JSON.  Logs go to stderr; stdout
//! carries only protocol frames.  Non-JSON lines are skipped, matching
//! how tolerant MCP stdio peers behave.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::mcp::jsonrpc::JsonRpcMessage;
use crate::mcp::McpConnection;

/// Serve one MCP connection until stdin closes.
pub async fn serve(mut conn: McpConnection) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    tracing::info!("serving MCP over stdio");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let msg: JsonRpcMessage = match serde_json::from_str(line) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unparseable line");
                continue;
            }
        };

        if let Some(resp) = conn.handle_message(msg).await {
            let json = serde_json::to_string(&resp)?;
            stdout.write_all(json.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
