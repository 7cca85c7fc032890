// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::{Database, LIST_LIMIT};
use lanyard_model::{Event, RecordId, TenantId};
use rusqlite::{params, OptionalExtension};

pub fn insert(db: &Database, event: &Event) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(event)?;
    conn.execute(
        "INSERT INTO events (id, tenant_id, doc) VALUES (?1, ?2, ?3)",
        params![event.id.as_str(), event.tenant_id.as_str(), doc],
    )?;
    Ok(())
}

pub fn get(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<Option<Event>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM events WHERE id = ?1 AND tenant_id = ?2",
            params![id.as_str(), tenant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn list(db: &Database, tenant: &TenantId) -> Result<Vec<Event>, StoreError> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare(
        "SELECT doc FROM events WHERE tenant_id = ?1
         ORDER BY json_extract(doc, '$.start_date') LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![tenant.as_str(), LIST_LIMIT as i64], |row| {
        row.get::<_, String>(0)
    })?;
    let mut events = Vec::new();
    for raw in rows {
        events.push(serde_json::from_str(&raw?)?);
    }
    Ok(events)
}

pub fn update(db: &Database, event: &Event) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(event)?;
    let changed = conn.execute(
        "UPDATE events SET doc = ?1 WHERE id = ?2 AND tenant_id = ?3",
        params![doc, event.id.as_str(), event.tenant_id.as_str()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("event", event.id.as_str()));
    }
    Ok(())
}

pub fn delete(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<bool, StoreError> {
    let conn = db.conn()?;
    let deleted = conn.execute(
        "DELETE FROM events WHERE id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
    )?;
    Ok(deleted > 0)
}

pub fn count_active(db: &Database, tenant: &TenantId) -> Result<i64, StoreError> {
    let conn = db.conn()?;
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM events
         WHERE tenant_id = ?1 AND json_extract(doc, '$.is_active') = 1",
        params![tenant.as_str()],
        |row| row.get(0),
    )?)
}
