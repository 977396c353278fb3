//! Retrying HTTP executor.
//!
//! # Design
//! `execute` takes a request *builder* rather than a request. A transport
//! request is consumed by sending it, so every attempt asks the builder for a
//! fresh descriptor. Transient transport failures (connect, timeout, broken
//! body read) are retried after a fixed delay until the policy's attempt
//! budget is spent. Well-formed responses are handed back untouched for the
//! caller to interpret; 5xx responses are retried only when the policy opts
//! in.
//!
//! All executors built with [`HttpExecutor::shared`] reuse one pooled
//! `reqwest::Client`, created on first use behind a compute-once cell.

use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

static SHARED_CLIENT: OnceCell<Client> = OnceCell::new();

/// Outcome of a single failed attempt.
#[derive(Debug)]
enum AttemptError {
    Transient(String),
    Fatal(ApiError),
}

/// Submits request descriptors with retry semantics.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    /// Wrap an explicitly configured transport.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Executor over the process-wide connection pool.
    ///
    /// The pool assumes the process runs a single tokio runtime: pooled
    /// connections stay bound to the runtime that opened them and fail once
    /// it shuts down. Code that starts several runtimes (one per test, for
    /// instance) should give each its own transport through
    /// [`HttpExecutor::new`].
    pub fn shared() -> Result<Self, ApiError> {
        let client = SHARED_CLIENT.get_or_try_init(|| {
            Client::builder()
                .build()
                .map_err(|err| ApiError::Transport(err.to_string()))
        })?;
        Ok(Self {
            client: client.clone(),
        })
    }

    /// Run `build` through the attempt loop described by `policy`.
    ///
    /// Returns the first response that is not a retryable failure, the last
    /// 5xx response when server-error retries are enabled and exhausted, or
    /// `ApiError::RetriesExhausted` when every attempt failed in transport.
    pub async fn execute<F>(&self, build: F, policy: &RetryPolicy) -> Result<HttpResponse, ApiError>
    where
        F: Fn() -> HttpRequest,
    {
        let max_attempts = policy.max_attempts();
        let mut attempt: u32 = 1;

        loop {
            let request = build();
            let method = request.method;
            let uri = request.uri.clone();
            debug!(attempt, %method, %uri, "sending HTTP request");

            match self.send(request, policy.attempt_timeout()).await {
                Ok(response) => {
                    debug!(attempt, %method, %uri, status = response.status, "received HTTP response");

                    if policy.retry_server_errors() && response.is_server_error() && attempt < max_attempts {
                        warn!(attempt, %method, %uri, status = response.status, "server error, retrying");
                        sleep(policy.delay()).await;
                        attempt += 1;
                        continue;
                    }

                    return Ok(response);
                }
                Err(AttemptError::Fatal(err)) => {
                    debug!(attempt, %method, %uri, error = %err, "HTTP request cannot be sent");
                    return Err(err);
                }
                Err(AttemptError::Transient(reason)) => {
                    debug!(attempt, %method, %uri, error = %reason, "HTTP request failed");

                    if attempt < max_attempts {
                        warn!(attempt, max_attempts, %method, %uri, "transient failure, retrying");
                        sleep(policy.delay()).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(ApiError::RetriesExhausted {
                        attempts: attempt,
                        last_error: reason,
                    });
                }
            }
        }
    }

    async fn send(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse, AttemptError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.uri.as_str())
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(classify)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn classify(err: reqwest::Error) -> AttemptError {
    if err.is_builder() {
        return AttemptError::Fatal(ApiError::Transport(err.to_string()));
    }
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
        return AttemptError::Transient(err.to_string());
    }
    AttemptError::Fatal(ApiError::Transport(err.to_string()))
}

async fn sleep(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
