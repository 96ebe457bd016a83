//! HTTP plumbing shared by the hosted providers.

use super::error::ProviderError;
use std::time::Duration;

pub fn build_client(timeout_ms: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(ProviderError::from)
}

/// Read a response body as JSON. Non-2xx statuses become
/// [`ProviderError::Http`] carrying the raw body.
pub async fn read_json(
    response: reqwest::Response,
    provider: &str,
) -> Result<serde_json::Value, ProviderError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        log::error!(
            "[LLM] {} API returned {} ({} bytes of body)",
            provider,
            status.as_u16(),
            body.len()
        );
        return Err(ProviderError::Http {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}

/// Log token usage and an estimated dollar cost from per-million prices.
pub fn log_usage(input_tokens: u64, output_tokens: u64, input_per_million: f64, output_per_million: f64) {
    if input_tokens == 0 && output_tokens == 0 {
        return;
    }
    let cost = (input_tokens as f64 * input_per_million
        + output_tokens as f64 * output_per_million)
        / 1_000_000.0;
    log::info!("[LLM] Tokens: {} in / {} out", input_tokens, output_tokens);
    log::info!("[LLM] Estimated cost: ${:.6}", cost);
}

/// Trim a completion and reject empty ones.
pub fn non_empty_completion(text: Option<&str>) -> Result<String, ProviderError> {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        Some(_) => Err(ProviderError::MalformedResponse("empty completion".to_string())),
        None => Err(ProviderError::MalformedResponse("no completion text in response".to_string())),
    }
}

/// One-shot local HTTP server for driving the clients in tests.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer the next request with `status` and `body`, then close.
    /// Returns the base URL to point a client at.
    pub async fn serve_once(status: u16, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}", addr)
    }

    /// Consume headers and any content-length body.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}
