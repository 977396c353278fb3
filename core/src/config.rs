//! Client configuration: where a resource lives and how hard to try.

use std::time::Duration;

/// Address of one remote resource. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    host: String,
    port: u16,
    resource: String,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, resource: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            resource: resource.into().trim_matches('/').to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// `http://{host}:{port}/`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    /// `{base_url}api/{resource}`
    pub fn resource_url(&self) -> String {
        format!("{}api/{}", self.base_url(), self.resource)
    }

    /// Read-by-id endpoint. The suffix is the literal segment `id`; the
    /// identifier itself travels in the request body.
    pub fn item_url(&self) -> String {
        format!("{}/id", self.resource_url())
    }
}

/// Attempt budget for one logical request.
///
/// The delay between attempts is fixed. `max_attempts` counts the initial
/// try and is never below 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    attempt_timeout: Duration,
    retry_server_errors: bool,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);
    pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            ..Self::default()
        }
    }

    /// A single attempt with no retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Treat 5xx responses as transient and retry them while attempts remain.
    pub fn with_server_error_retries(mut self, enabled: bool) -> Self {
        self.retry_server_errors = enabled;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn retry_server_errors(&self) -> bool {
        self.retry_server_errors
    }

    /// Upper bound on the wall-clock time of one `execute` call.
    pub fn worst_case_duration(&self) -> Duration {
        (self.attempt_timeout + self.delay).saturating_mul(self.max_attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
            attempt_timeout: Self::DEFAULT_ATTEMPT_TIMEOUT,
            retry_server_errors: false,
        }
    }
}
