//! `SeaORM` Entity for the properties table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub location: Option<String>,
    /// Asking price in FCFA.
    pub price: Option<Decimal>,
    /// Normalized status code, or the raw input when unrecognized.
    pub status: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Lot area in square meters.
    pub area: Option<Decimal>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub cover_image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::property_images::Entity")]
    PropertyImages,
    #[sea_orm(has_many = "super::co_ownerships::Entity")]
    CoOwnerships,
    #[sea_orm(has_many = "super::contact_leads::Entity")]
    ContactLeads,
    #[sea_orm(has_many = "super::deals::Entity")]
    Deals,
}

impl Related<super::property_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyImages.def()
    }
}

impl Related<super::co_ownerships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoOwnerships.def()
    }
}

impl Related<super::contact_leads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactLeads.def()
    }
}

impl Related<super::deals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
