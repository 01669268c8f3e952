use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::api::error::AppError;
use crate::entities::{menu_images, prelude::*};
use crate::models::MenuSection;
use crate::services::storage::ObjectStore;
use crate::utils::slug::slugify;

#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub inserted: u64,
    pub updated: u64,
}

/// Reconcile the object store's `{menu}/{category-slug}/` folders against
/// the persisted menu-image rows for one menu.
///
/// Folder contents are authoritative: unknown objects get a row, rows whose
/// URL turns up under another category's folder are moved to that category.
/// A folder that is missing or fails to list skips only its category; a
/// failed metadata write aborts the rest of the write phase (completed
/// writes stay).
pub async fn sync_menu(
    db: &DatabaseConnection,
    storage: &dyn ObjectStore,
    bucket: &str,
    menu: MenuSection,
) -> Result<SyncReport, AppError> {
    let categories = Categories::find()
        .filter(crate::entities::categories::Column::Menu.eq(menu.as_str()))
        .all(db)
        .await
        .map_err(|e| AppError::Persistence(format!("Failed to load categories: {e}")))?;

    // Collect `{menu}/{slug}/{file}` paths with their owning category.
    let mut found: Vec<(String, i32)> = Vec::new();
    for category in &categories {
        let slug = slugify(category.folder_name());
        if slug.is_empty() {
            continue;
        }
        let prefix = format!("{}/{}/", menu.as_str(), slug);

        let entries = match storage.list_folder(bucket, &prefix).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("📂 Skipping folder {prefix}: {e}");
                continue;
            }
        };

        for entry in entries {
            if entry.is_folder || entry.name.is_empty() {
                continue;
            }
            found.push((format!("{prefix}{}", entry.name), category.id));
        }
    }

    if found.is_empty() {
        info!("📂 No files found for menu '{menu}'");
        return Ok(SyncReport::default());
    }

    let items: Vec<(String, String, i32)> = found
        .into_iter()
        .map(|(path, category_id)| {
            let url = storage.public_url(bucket, &path);
            (path, url, category_id)
        })
        .collect();

    let urls: Vec<String> = items.iter().map(|(_, url, _)| url.clone()).collect();
    let existing = MenuImages::find()
        .filter(menu_images::Column::ImageUrl.is_in(urls))
        .all(db)
        .await
        .map_err(|e| AppError::Persistence(format!("Failed to load existing rows: {e}")))?;
    let existing_by_url: HashMap<&str, &menu_images::Model> = existing
        .iter()
        .map(|row| (row.image_url.as_str(), row))
        .collect();

    let mut to_insert = Vec::new();
    let mut updates_by_category: HashMap<i32, Vec<i32>> = HashMap::new();

    for (path, url, category_id) in &items {
        match existing_by_url.get(url.as_str()) {
            None => {
                let file_name = path.rsplit('/').next().unwrap_or_default();
                to_insert.push(menu_images::ActiveModel {
                    image_url: Set(url.clone()),
                    category_id: Set(*category_id),
                    alt_text: Set(Some(file_name.to_string())),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                });
            }
            Some(row) if row.category_id != *category_id => {
                updates_by_category
                    .entry(*category_id)
                    .or_default()
                    .push(row.id);
            }
            Some(_) => {}
        }
    }

    let mut report = SyncReport::default();

    if !to_insert.is_empty() {
        let count = to_insert.len() as u64;
        MenuImages::insert_many(to_insert)
            .exec(db)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to insert new rows: {e}")))?;
        report.inserted = count;
    }

    for (category_id, ids) in updates_by_category {
        let count = ids.len() as u64;
        MenuImages::update_many()
            .col_expr(menu_images::Column::CategoryId, Expr::value(category_id))
            .filter(menu_images::Column::Id.is_in(ids))
            .exec(db)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to update rows: {e}")))?;
        report.updated += count;
    }

    info!(
        "🔄 Synced menu '{menu}': {} inserted, {} updated",
        report.inserted, report.updated
    );

    Ok(report)
}
