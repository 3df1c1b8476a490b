// HTTP client for the OpenRouter chat-completions API

use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::streaming::{apply_chunk, parse_sse_line, SseLine};
use super::types::{ApiError, CompletionRequest, CompletionResponse, ErrorResponse, TokenUsage};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    /// Separate client without a blanket timeout: streams legitimately run
    /// longer than the non-streaming request timeout, and cancellation is
    /// handled through the CancellationToken instead.
    stream_client: Client,
    api_key: String,
    url: String,
}

impl ApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to create HTTP client")?;
        let stream_client = Client::builder()
            .build()
            .context("failed to create streaming HTTP client")?;

        Ok(Self {
            client,
            stream_client,
            api_key,
            url: OPENROUTER_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Send a non-streaming completion request and return the response text
    /// with its token usage. Retries once on transport errors and 5xx
    /// responses.
    pub async fn complete(
        &self,
        mut req: CompletionRequest,
    ) -> Result<(String, TokenUsage), ApiError> {
        req.stream = false;

        let response = match self.send_once(&req).await {
            Ok(resp) if resp.status().is_server_error() => {
                tracing::debug!(status = %resp.status(), "server error, retrying once");
                tokio::time::sleep(RETRY_DELAY).await;
                self.send_once(&req).await?
            }
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(error = %e, "transport error, retrying once");
                tokio::time::sleep(RETRY_DELAY).await;
                self.send_once(&req).await?
            }
        };

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let completion: CompletionResponse = response.json().await?;
        let usage = completion.usage.unwrap_or_default();
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Stream("no choices in response".to_string()))?;
        Ok((choice.message.content, usage))
    }

    /// Send a streaming completion request, invoking `on_token` for each text
    /// fragment as it arrives. Returns token usage when the stream completes.
    ///
    /// Cancelling the token returns `ApiError::Cancelled` promptly and drops
    /// the response, which aborts the underlying connection — that is what
    /// makes the upstream provider stop processing (and billing) the request,
    /// rather than us merely ceasing to read.
    pub async fn stream_complete(
        &self,
        cancel: &CancellationToken,
        mut req: CompletionRequest,
        on_token: &mut (dyn FnMut(&str) + Send),
    ) -> Result<TokenUsage, ApiError> {
        req.stream = true;

        let send = self
            .stream_client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", "https://github.com/plume-cli/plume")
            .header("X-Title", "plume")
            .json(&req)
            .send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            response = send => response?,
        };

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut usage = TokenUsage::default();

        loop {
            let bytes = tokio::select! {
                _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => bytes,
                    Some(Err(e)) => return Err(ApiError::Transport(e)),
                    None => break,
                },
            };

            buffer.extend_from_slice(&bytes);

            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();
                let line = String::from_utf8_lossy(&line_bytes);

                match parse_sse_line(&line) {
                    SseLine::Ignore => {}
                    SseLine::Done => return Ok(usage),
                    SseLine::Chunk(chunk) => apply_chunk(chunk, &mut usage, on_token)?,
                }
            }
        }

        Ok(usage)
    }

    async fn send_once(&self, req: &CompletionRequest) -> Result<reqwest::Response, reqwest::Error> {
        tracing::debug!(model = %req.model, stream = req.stream, "sending completion request");
        self.client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", "https://github.com/plume-cli/plume")
            .header("X-Title", "plume")
            .json(req)
            .send()
            .await
    }

    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
            _ => body,
        };

        ApiError::Api { status, message }
    }
}
