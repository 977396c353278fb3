//! Generic typed CRUD client for one remote resource.
//!
//! # Design
//! `RestClientRepository<T>` holds its `ClientConfig`, an executor handle and
//! a retry policy, and carries no mutable state between calls. Each CRUD
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`; the async method
//! of the same name runs the request through the executor in between.
//!
//! The entity type is fixed per client. Search criteria are chosen per call
//! and always travel as a JSON body, never in the path.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ClientConfig, RetryPolicy};
use crate::error::ApiError;
use crate::executor::HttpExecutor;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{absent_if_not_found, check_status, deserialize_response};
use crate::types::KeyedPayload;

/// Typed client for the resource at `http://{host}:{port}/api/{resource}`.
pub struct RestClientRepository<T> {
    config: ClientConfig,
    executor: HttpExecutor,
    policy: RetryPolicy,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for RestClientRepository<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            executor: self.executor.clone(),
            policy: self.policy.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> RestClientRepository<T> {
    /// Client over the shared connection pool with the default retry policy.
    pub fn new(host: impl Into<String>, port: u16, resource: impl Into<String>) -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::new(host, port, resource))
    }

    /// Same as [`RestClientRepository::new`] for an already built config.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_executor(config, HttpExecutor::shared()?))
    }

    pub fn with_executor(config: ClientConfig, executor: HttpExecutor) -> Self {
        Self {
            config,
            executor,
            policy: RetryPolicy::default(),
            _entity: PhantomData,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<T> RestClientRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn build_create(&self, entity: &T) -> Result<HttpRequest, ApiError> {
        let body = to_json(entity)?;
        Ok(HttpRequest::json(HttpMethod::Post, self.config.resource_url(), body))
    }

    pub fn build_update<K: Serialize>(&self, id: &K, entity: &T) -> Result<HttpRequest, ApiError> {
        let body = to_json(&KeyedPayload::new(id, entity))?;
        Ok(HttpRequest::json(HttpMethod::Put, self.config.resource_url(), body))
    }

    pub fn build_delete<K: Serialize>(&self, id: &K) -> Result<HttpRequest, ApiError> {
        let body = to_json(id)?;
        Ok(HttpRequest::json(HttpMethod::Delete, self.config.resource_url(), body))
    }

    pub fn build_get<K: Serialize>(&self, id: &K) -> Result<HttpRequest, ApiError> {
        let body = to_json(id)?;
        Ok(HttpRequest::json(HttpMethod::Get, self.config.item_url(), body))
    }

    pub fn build_get_all(&self) -> HttpRequest {
        HttpRequest::empty(HttpMethod::Get, self.config.resource_url())
    }

    /// `None` only when the server answers success with an empty body.
    pub fn parse_create(&self, response: HttpResponse) -> Result<Option<T>, ApiError> {
        deserialize_response(response)
    }

    /// `true` when the update was applied, `false` when the key was unknown.
    pub fn parse_update(&self, response: HttpResponse) -> Result<bool, ApiError> {
        absent_if_not_found(check_status(&response).map(|()| true), false)
    }

    /// `true` when the entity was removed, `false` when the key was unknown.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<bool, ApiError> {
        absent_if_not_found(check_status(&response).map(|()| true), false)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Option<T>, ApiError> {
        absent_if_not_found(deserialize_response(response), None)
    }

    /// An absent collection is reported as an empty one.
    pub fn parse_get_all(&self, response: HttpResponse) -> Result<Vec<T>, ApiError> {
        let entities = absent_if_not_found(deserialize_response::<Vec<T>>(response), None)?;
        Ok(entities.unwrap_or_default())
    }

    pub async fn create(&self, entity: &T) -> Result<Option<T>, ApiError> {
        let response = self.submit(self.build_create(entity)?).await?;
        self.parse_create(response)
    }

    pub async fn update<K: Serialize>(&self, id: &K, entity: &T) -> Result<bool, ApiError> {
        let response = self.submit(self.build_update(id, entity)?).await?;
        self.parse_update(response)
    }

    pub async fn delete<K: Serialize>(&self, id: &K) -> Result<bool, ApiError> {
        let response = self.submit(self.build_delete(id)?).await?;
        self.parse_delete(response)
    }

    pub async fn get<K: Serialize>(&self, id: &K) -> Result<Option<T>, ApiError> {
        let response = self.submit(self.build_get(id)?).await?;
        self.parse_get(response)
    }

    pub async fn get_all(&self) -> Result<Vec<T>, ApiError> {
        let response = self.submit(self.build_get_all()).await?;
        self.parse_get_all(response)
    }

    async fn submit(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.executor.execute(|| request.clone(), &self.policy).await
    }
}

fn to_json<V: Serialize + ?Sized>(value: &V) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}
