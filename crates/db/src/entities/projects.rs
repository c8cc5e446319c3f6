//! `SeaORM` Entity for the projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Normalized phase code, or the raw input when unrecognized.
    pub status: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    /// Developed surface in square meters.
    pub surface: Option<Decimal>,
    pub units: Option<i32>,
    pub cover_image: Option<String>,
    pub started_at: Option<DateTimeWithTimeZone>,
    pub delivered_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_media::Entity")]
    ProjectMedia,
}

impl Related<super::project_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectMedia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
