// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::{Database, LIST_LIMIT};
use lanyard_model::{Category, RecordId, TenantId};
use rusqlite::{params, OptionalExtension};

pub fn insert(db: &Database, category: &Category) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(category)?;
    conn.execute(
        "INSERT INTO categories (id, tenant_id, category_type, doc) VALUES (?1, ?2, ?3, ?4)",
        params![
            category.id.as_str(),
            category.tenant_id.as_str(),
            category.category_type,
            doc
        ],
    )?;
    Ok(())
}

pub fn get(
    db: &Database,
    tenant: &TenantId,
    id: &RecordId,
) -> Result<Option<Category>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM categories WHERE id = ?1 AND tenant_id = ?2",
            params![id.as_str(), tenant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

/// Ordered by `display_order`, then name, so dropdowns render stably.
pub fn list(
    db: &Database,
    tenant: &TenantId,
    category_type: Option<&str>,
) -> Result<Vec<Category>, StoreError> {
    let conn = db.conn()?;
    let order = " ORDER BY CAST(json_extract(doc, '$.display_order') AS INTEGER),
                  json_extract(doc, '$.category_name')";
    let mut categories = Vec::new();
    match category_type {
        Some(kind) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT doc FROM categories WHERE tenant_id = ?1 AND category_type = ?2{order} LIMIT {LIST_LIMIT}"
            ))?;
            let rows = stmt.query_map(params![tenant.as_str(), kind], |row| {
                row.get::<_, String>(0)
            })?;
            for raw in rows {
                categories.push(serde_json::from_str(&raw?)?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT doc FROM categories WHERE tenant_id = ?1{order} LIMIT {LIST_LIMIT}"
            ))?;
            let rows = stmt.query_map(params![tenant.as_str()], |row| row.get::<_, String>(0))?;
            for raw in rows {
                categories.push(serde_json::from_str(&raw?)?);
            }
        }
    }
    Ok(categories)
}

pub fn update(db: &Database, category: &Category) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(category)?;
    let changed = conn.execute(
        "UPDATE categories SET category_type = ?1, doc = ?2 WHERE id = ?3 AND tenant_id = ?4",
        params![
            category.category_type,
            doc,
            category.id.as_str(),
            category.tenant_id.as_str()
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("category", category.id.as_str()));
    }
    Ok(())
}

pub fn delete(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<bool, StoreError> {
    let conn = db.conn()?;
    let deleted = conn.execute(
        "DELETE FROM categories WHERE id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
    )?;
    Ok(deleted > 0)
}
