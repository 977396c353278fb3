//! Resilient generic REST repository client.
//!
//! # Overview
//! `RestClientRepository<T>` performs create / read / read-all / update /
//! delete against one remote resource for any serde-compatible entity type.
//! Requests go through `HttpExecutor`, which retries transient transport
//! failures with a fixed delay.
//!
//! # Design
//! - Operations are split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is explicit
//!   and the wire contract is testable without a server.
//! - The executor asks for a fresh request on every attempt.
//! - Not-found is an absent result (`None` / `false`), never an error. Any
//!   other non-success status is an `ApiError::Http`.
//! - Executors created with `HttpExecutor::shared` use one process-wide
//!   connection pool. Base addresses are per client and immutable.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod response;
pub mod types;

pub use client::RestClientRepository;
pub use config::{ClientConfig, RetryPolicy};
pub use error::ApiError;
pub use executor::HttpExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::KeyedPayload;
