// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::{Database, LIST_LIMIT};
use lanyard_model::{BadgeTemplate, RecordId, TenantId};
use rusqlite::{params, OptionalExtension};

pub fn insert(db: &Database, template: &BadgeTemplate) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(template)?;
    conn.execute(
        "INSERT INTO badge_templates (id, tenant_id, event_id, doc) VALUES (?1, ?2, ?3, ?4)",
        params![
            template.id.as_str(),
            template.tenant_id.as_str(),
            template.event_id.as_str(),
            doc
        ],
    )?;
    Ok(())
}

pub fn get(
    db: &Database,
    tenant: &TenantId,
    id: &RecordId,
) -> Result<Option<BadgeTemplate>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM badge_templates WHERE id = ?1 AND tenant_id = ?2",
            params![id.as_str(), tenant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn list(
    db: &Database,
    tenant: &TenantId,
    event_id: Option<&RecordId>,
) -> Result<Vec<BadgeTemplate>, StoreError> {
    let conn = db.conn()?;
    let mut templates = Vec::new();
    match event_id {
        Some(event) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT doc FROM badge_templates WHERE tenant_id = ?1 AND event_id = ?2
                 ORDER BY rowid LIMIT {LIST_LIMIT}"
            ))?;
            let rows = stmt.query_map(params![tenant.as_str(), event.as_str()], |row| {
                row.get::<_, String>(0)
            })?;
            for raw in rows {
                templates.push(serde_json::from_str(&raw?)?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT doc FROM badge_templates WHERE tenant_id = ?1 ORDER BY rowid LIMIT {LIST_LIMIT}"
            ))?;
            let rows = stmt.query_map(params![tenant.as_str()], |row| row.get::<_, String>(0))?;
            for raw in rows {
                templates.push(serde_json::from_str(&raw?)?);
            }
        }
    }
    Ok(templates)
}

/// The default template for an event, falling back to the first one saved.
pub fn default_for_event(
    db: &Database,
    tenant: &TenantId,
    event_id: &RecordId,
) -> Result<Option<BadgeTemplate>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM badge_templates WHERE tenant_id = ?1 AND event_id = ?2
             ORDER BY json_extract(doc, '$.is_default') DESC, rowid LIMIT 1",
            params![tenant.as_str(), event_id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn update(db: &Database, template: &BadgeTemplate) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(template)?;
    let changed = conn.execute(
        "UPDATE badge_templates SET event_id = ?1, doc = ?2 WHERE id = ?3 AND tenant_id = ?4",
        params![
            template.event_id.as_str(),
            doc,
            template.id.as_str(),
            template.tenant_id.as_str()
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("badge template", template.id.as_str()));
    }
    Ok(())
}

pub fn delete(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<bool, StoreError> {
    let conn = db.conn()?;
    let deleted = conn.execute(
        "DELETE FROM badge_templates WHERE id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
    )?;
    Ok(deleted > 0)
}
