//! The `widgets` resource served by the binary.

use serde::{Deserialize, Serialize};

use crate::repository::{Entity, EntityId};
use crate::resource::Resource;

const MAX_NAME_LEN: usize = 100;

/// Stored form of a widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Widget {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    /// Bumped on every merge. Never exposed on the wire.
    pub revision: u32,
}

impl Entity for Widget {
    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// Wire form of a widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDto {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct WidgetResource;

impl Resource for WidgetResource {
    type Entity = Widget;
    type Dto = WidgetDto;

    const PATH: &'static str = "widgets";

    fn to_dto(entity: &Widget) -> WidgetDto {
        WidgetDto {
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
        }
    }

    fn to_entity(dto: WidgetDto) -> Widget {
        Widget {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            revision: 0,
        }
    }

    fn merge(dto: WidgetDto, entity: &mut Widget) {
        entity.name = dto.name;
        entity.description = dto.description;
        entity.revision = entity.revision.wrapping_add(1);
    }

    fn validate(dto: &WidgetDto) -> Result<(), String> {
        if dto.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if dto.name.chars().count() > MAX_NAME_LEN {
            return Err(format!("name must be at most {MAX_NAME_LEN} characters"));
        }
        Ok(())
    }
}
