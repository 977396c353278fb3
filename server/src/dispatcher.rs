//! Generic CRUD dispatcher.
//!
//! Routes for a resource `R` served from repository `S`:
//!
//! | Method | Path                | Body               | Success     |
//! |--------|---------------------|--------------------|-------------|
//! | GET    | `/api/{PATH}/id`    | id                 | 200 + DTO   |
//! | GET    | `/api/{PATH}`       | none               | 200 + DTOs  |
//! | POST   | `/api/{PATH}`       | DTO                | 200 + DTO   |
//! | PUT    | `/api/{PATH}`       | `{"Key","Value"}`  | 204         |
//! | DELETE | `/api/{PATH}`       | id                 | 204         |
//!
//! A write that finds its entity already gone is a 404. Any other failure,
//! including a panic inside a handler, is logged and answered with a generic
//! 500.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info};

use crate::repository::{EntityId, Repository, RepositoryError};
use crate::resource::Resource;

/// Body of every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "A problem happened while handling your request.";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DispatchError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // The row vanished between lookup and write.
            RepositoryError::Missing(_) => DispatchError::NotFound,
            other => DispatchError::Repository(other),
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            DispatchError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            DispatchError::NotFound => StatusCode::NOT_FOUND.into_response(),
            DispatchError::Repository(err) => {
                error!(error = %err, "repository call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}

/// Update body: the id to locate and the values to merge onto it.
#[derive(Deserialize)]
pub struct UpdateRequest<D> {
    #[serde(rename = "Key", alias = "key")]
    pub key: EntityId,
    #[serde(rename = "Value", alias = "value")]
    pub value: Option<D>,
}

pub struct DispatchState<R, S> {
    repository: Arc<S>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S> Clone for DispatchState<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            _resource: PhantomData,
        }
    }
}

/// Build the router serving resource `R` from `repository`.
pub fn router<R, S>(repository: Arc<S>) -> Router
where
    R: Resource,
    S: Repository<R::Entity> + 'static,
{
    let state = DispatchState::<R, S> {
        repository,
        _resource: PhantomData,
    };
    let collection = format!("/api/{}", R::PATH);
    let item = format!("{collection}/id");

    Router::new()
        .route(
            &collection,
            get(list::<R, S>)
                .post(create::<R, S>)
                .put(update::<R, S>)
                .delete(delete::<R, S>),
        )
        .route(&item, get(get_by_id::<R, S>))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!(panic = %detail, "handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
}

async fn get_by_id<R, S>(
    State(state): State<DispatchState<R, S>>,
    Json(id): Json<EntityId>,
) -> Result<Json<R::Dto>, DispatchError>
where
    R: Resource,
    S: Repository<R::Entity> + 'static,
{
    match state.repository.get_by_id(id).await? {
        Some(entity) => Ok(Json(R::to_dto(&entity))),
        None => {
            info!(resource = R::PATH, id, "entity with id {id} wasn't found");
            Err(DispatchError::NotFound)
        }
    }
}

async fn list<R, S>(State(state): State<DispatchState<R, S>>) -> Result<Json<Vec<R::Dto>>, DispatchError>
where
    R: Resource,
    S: Repository<R::Entity> + 'static,
{
    let entities = state.repository.get_all_with_refresh().await?;
    Ok(Json(entities.iter().map(R::to_dto).collect()))
}

async fn create<R, S>(
    State(state): State<DispatchState<R, S>>,
    Json(dto): Json<Option<R::Dto>>,
) -> Result<Json<R::Dto>, DispatchError>
where
    R: Resource,
    S: Repository<R::Entity> + 'static,
{
    let dto = dto.ok_or_else(|| DispatchError::BadRequest(String::new()))?;
    R::validate(&dto).map_err(DispatchError::BadRequest)?;

    let created = state.repository.insert_with_save(R::to_entity(dto)).await?;
    Ok(Json(R::to_dto(&created)))
}

async fn update<R, S>(
    State(state): State<DispatchState<R, S>>,
    Json(request): Json<UpdateRequest<R::Dto>>,
) -> Result<StatusCode, DispatchError>
where
    R: Resource,
    S: Repository<R::Entity> + 'static,
{
    let dto = request
        .value
        .ok_or_else(|| DispatchError::BadRequest(String::new()))?;
    R::validate(&dto).map_err(DispatchError::BadRequest)?;

    let mut entity = state
        .repository
        .get_by_id(request.key)
        .await?
        .ok_or(DispatchError::NotFound)?;
    R::merge(dto, &mut entity);
    state.repository.update_with_save(entity).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete<R, S>(
    State(state): State<DispatchState<R, S>>,
    Json(id): Json<EntityId>,
) -> Result<StatusCode, DispatchError>
where
    R: Resource,
    S: Repository<R::Entity> + 'static,
{
    let entity = state
        .repository
        .get_by_id(id)
        .await?
        .ok_or(DispatchError::NotFound)?;
    state.repository.delete_with_save(entity).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetDto;

    #[test]
    fn update_request_accepts_pascal_and_lower_case_keys() {
        let pascal: UpdateRequest<WidgetDto> =
            serde_json::from_str(r#"{"Key":3,"Value":{"name":"A"}}"#).unwrap();
        let lower: UpdateRequest<WidgetDto> =
            serde_json::from_str(r#"{"key":3,"value":{"name":"A"}}"#).unwrap();
        assert_eq!(pascal.key, 3);
        assert_eq!(lower.key, 3);
        assert_eq!(pascal.value, lower.value);
    }

    #[test]
    fn update_request_value_may_be_null_or_missing() {
        let null: UpdateRequest<WidgetDto> = serde_json::from_str(r#"{"Key":3,"Value":null}"#).unwrap();
        let missing: UpdateRequest<WidgetDto> = serde_json::from_str(r#"{"Key":3}"#).unwrap();
        assert!(null.value.is_none());
        assert!(missing.value.is_none());
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let err = DispatchError::from(RepositoryError::Missing(3));
        assert!(matches!(err, DispatchError::NotFound));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn panics_become_generic_500() {
        let response = panic_response(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn repository_failures_hide_details() {
        let response = DispatchError::Repository(RepositoryError::Storage("disk on fire".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
