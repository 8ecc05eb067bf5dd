//! Member entity - A participant of the household.
//!
//! Members are identified by their Discord user ID and are seeded from config.toml.
//! Settlement only reads them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Discord user ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Name shown in reports
    pub display_name: String,
    /// Optional avatar URL
    pub photo_url: Option<String>,
    /// When the member was first seeded
    pub created_at: DateTimeUtc,
}

/// `Member` is referenced by plain ids; no enforced relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
