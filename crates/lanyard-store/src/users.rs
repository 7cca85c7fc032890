// SPDX-License-Identifier: Apache-2.0

use crate::error::{StoreError, StoreErrorCode};
use crate::{Database, LIST_LIMIT};
use lanyard_model::{Email, RecordId, TenantId, User};
use rusqlite::{params, OptionalExtension};

pub fn insert(db: &Database, user: &User) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(user)?;
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO users (id, tenant_id, email, doc) VALUES (?1, ?2, ?3, ?4)",
        params![
            user.id.as_str(),
            user.tenant_id.as_str(),
            user.email.as_str(),
            doc
        ],
    )?;
    if inserted == 0 {
        return Err(StoreError::new(
            StoreErrorCode::Duplicate,
            format!("email {} already registered", user.email),
        ));
    }
    Ok(())
}

pub fn find_by_email(db: &Database, email: &Email) -> Result<Option<User>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM users WHERE email = ?1",
            params![email.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn get(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<Option<User>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM users WHERE id = ?1 AND tenant_id = ?2",
            params![id.as_str(), tenant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn list(db: &Database, tenant: &TenantId) -> Result<Vec<User>, StoreError> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare(
        "SELECT doc FROM users WHERE tenant_id = ?1 ORDER BY rowid LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![tenant.as_str(), LIST_LIMIT as i64], |row| {
        row.get::<_, String>(0)
    })?;
    let mut users = Vec::new();
    for raw in rows {
        users.push(serde_json::from_str(&raw?)?);
    }
    Ok(users)
}

/// Full-document replace. The email key column moves with the document so
/// the unique index keeps enforcing global uniqueness.
pub fn update(db: &Database, user: &User) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(user)?;
    let changed = conn.execute(
        "UPDATE users SET email = ?1, doc = ?2 WHERE id = ?3 AND tenant_id = ?4",
        params![
            user.email.as_str(),
            doc,
            user.id.as_str(),
            user.tenant_id.as_str()
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("user", user.id.as_str()));
    }
    Ok(())
}

pub fn delete(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<bool, StoreError> {
    let conn = db.conn()?;
    let deleted = conn.execute(
        "DELETE FROM users WHERE id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
    )?;
    Ok(deleted > 0)
}

pub fn email_taken(
    db: &Database,
    email: &Email,
    exclude_id: Option<&RecordId>,
) -> Result<bool, StoreError> {
    let conn = db.conn()?;
    let count: i64 = match exclude_id {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1 AND id != ?2",
            params![email.as_str(), id.as_str()],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params![email.as_str()],
            |row| row.get(0),
        )?,
    };
    Ok(count > 0)
}

pub fn count(db: &Database, tenant: &TenantId) -> Result<i64, StoreError> {
    let conn = db.conn()?;
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM users WHERE tenant_id = ?1",
        params![tenant.as_str()],
        |row| row.get(0),
    )?)
}

pub fn distinct_departments(db: &Database, tenant: &TenantId) -> Result<Vec<String>, StoreError> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare(
        "SELECT DISTINCT json_extract(doc, '$.department') FROM users
         WHERE tenant_id = ?1 AND json_extract(doc, '$.department') IS NOT NULL
         ORDER BY 1",
    )?;
    let rows = stmt.query_map(params![tenant.as_str()], |row| row.get::<_, String>(0))?;
    let mut departments = Vec::new();
    for raw in rows {
        let value = raw?;
        if !value.is_empty() {
            departments.push(value);
        }
    }
    Ok(departments)
}
