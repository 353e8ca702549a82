// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Line-delimited JSON server.
//!
//! Reads one call per line and writes one JSON result per line, in order.
//! Blank lines are skipped. The loop ends at end of input or on Ctrl+C.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::Dispatcher;

/// Serve calls from `reader` until it is exhausted, returning the number answered
pub async fn serve<R, W>(dispatcher: &Dispatcher, reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read request line")? {
        let Some(response) = dispatcher.handle_line(&line) else {
            continue;
        };
        let mut text = serde_json::to_string(&response).context("Failed to encode response")?;
        text.push('\n');
        writer
            .write_all(text.as_bytes())
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to flush response")?;
        answered += 1;
        debug!(answered, "answered call");
    }

    Ok(answered)
}

/// Serve over stdin/stdout on a fresh runtime
pub fn serve_stdio(dispatcher: &Dispatcher) -> Result<usize> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async {
        info!("serving line-delimited JSON on stdin/stdout");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();

        tokio::select! {
            served = serve(dispatcher, reader, writer) => {
                let served = served?;
                info!(served, "input closed");
                Ok(served)
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                Ok(0)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn run(input: &str) -> (usize, Vec<Value>) {
        let mut output = Vec::new();
        let answered = serve(&Dispatcher::default(), input.as_bytes(), &mut output)
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();
        let values = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (answered, values)
    }

    #[tokio::test]
    async fn test_serve_answers_in_order() {
        let input = concat!(
            r#"{"function": "get_available_styles"}"#,
            "\n\n",
            r#"{"function": "validate_environment", "params": {}}"#,
            "\n",
            r#"{"function": "missing"}"#,
            "\n",
        );

        let (answered, values) = run(input).await;
        assert_eq!(answered, 3);
        assert_eq!(values.len(), 3);
        assert_eq!(values[0]["styles"][0], "Jazz Pop");
        assert_eq!(values[1]["valid"], true);
        assert_eq!(values[2]["error"], "Unknown function: missing");
    }

    #[tokio::test]
    async fn test_serve_survives_malformed_lines() {
        let input = "garbage\n{\"function\": \"get_available_keys\"}\n";
        let (answered, values) = run(input).await;
        assert_eq!(answered, 2);
        assert!(values[0]["error"].is_string());
        assert_eq!(values[1]["keys"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_serve_empty_input() {
        let (answered, values) = run("").await;
        assert_eq!(answered, 0);
        assert!(values.is_empty());
    }
}
