//! Entity ↔ DTO mapping for one served resource.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::repository::Entity;

/// Describes how one resource is exposed under `/api/{PATH}`.
///
/// Every mapping function is pure.
pub trait Resource: Send + Sync + 'static {
    type Entity: Entity;
    type Dto: Serialize + DeserializeOwned + Send + 'static;

    /// Path segment under `/api/`.
    const PATH: &'static str;

    fn to_dto(entity: &Self::Entity) -> Self::Dto;

    fn to_entity(dto: Self::Dto) -> Self::Entity;

    /// Copy the incoming values onto a stored entity. Server-owned fields,
    /// including the id, are kept.
    fn merge(dto: Self::Dto, entity: &mut Self::Entity);

    /// Reject a DTO before it reaches the repository. The message is sent
    /// back as the 400 body.
    fn validate(_dto: &Self::Dto) -> Result<(), String> {
        Ok(())
    }
}
