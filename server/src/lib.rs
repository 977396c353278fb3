//! CRUD dispatcher serving the REST repository wire contract.
//!
//! # Design
//! The dispatcher is generic over a [`resource::Resource`] (entity/DTO
//! mapping and validation) and a [`repository::Repository`] (persistence).
//! [`app`] wires the demo `widgets` resource to an in-memory store.

pub mod dispatcher;
pub mod repository;
pub mod resource;
pub mod widget;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use repository::InMemoryRepository;
use widget::{Widget, WidgetResource};

pub use dispatcher::{router, DispatchError, INTERNAL_ERROR_MESSAGE};
pub use repository::{Entity, EntityId, Repository, RepositoryError};
pub use resource::Resource;
pub use widget::WidgetDto;

/// Router for `/api/widgets` backed by a fresh in-memory store.
pub fn app() -> Router {
    let store = Arc::new(InMemoryRepository::<Widget>::new());
    router::<WidgetResource, _>(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
