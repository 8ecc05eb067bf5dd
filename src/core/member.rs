//! Member and category business logic.
//!
//! Both tables are seeded from config.toml on startup. Seeding is idempotent:
//! existing rows are updated in place and nothing is ever removed, so history
//! keeps pointing at valid members and categories.

use crate::{
    config::household::Config,
    entities::{Category, Member, category, member},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Lists all members ordered by display name.
pub async fn list_members(db: &DatabaseConnection) -> Result<Vec<member::Model>> {
    Member::find()
        .order_by_asc(member::Column::DisplayName)
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a member by Discord user id.
pub async fn get_member(db: &DatabaseConnection, user_id: &str) -> Result<Option<member::Model>> {
    Member::find_by_id(user_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts or updates the configured members and categories.
pub async fn seed_household(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let txn = db.begin().await?;

    for member_config in &config.members {
        match Member::find_by_id(member_config.id.clone()).one(&txn).await? {
            Some(existing) => {
                let mut active: member::ActiveModel = existing.into();
                active.display_name = Set(member_config.display_name.clone());
                active.photo_url = Set(member_config.photo_url.clone());
                active.update(&txn).await?;
            }
            None => {
                let model = member::ActiveModel {
                    id: Set(member_config.id.clone()),
                    display_name: Set(member_config.display_name.clone()),
                    photo_url: Set(member_config.photo_url.clone()),
                    created_at: Set(Utc::now()),
                };
                model.insert(&txn).await?;
            }
        }
    }

    for category_config in &config.categories {
        let name = category_config.name.trim();
        let existing = Category::find()
            .filter(category::Column::Name.eq(name))
            .one(&txn)
            .await?;
        match existing {
            Some(existing) => {
                let mut active: category::ActiveModel = existing.into();
                active.icon = Set(category_config.icon.clone());
                active.color = Set(category_config.color.clone());
                active.update(&txn).await?;
            }
            None => {
                let model = category::ActiveModel {
                    name: Set(name.to_string()),
                    icon: Set(category_config.icon.clone()),
                    color: Set(category_config.color.clone()),
                    ..Default::default()
                };
                model.insert(&txn).await?;
            }
        }
    }

    txn.commit().await?;

    info!(
        members = config.members.len(),
        categories = config.categories.len(),
        "Household seeded"
    );
    Ok(())
}
