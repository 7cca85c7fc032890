// SPDX-License-Identifier: Apache-2.0

use crate::error::{StoreError, StoreErrorCode};
use crate::{Database, LIST_LIMIT};
use lanyard_model::{Company, RecordId, TenantId};
use rusqlite::{params, OptionalExtension};

pub fn insert(db: &Database, company: &Company) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(company)?;
    conn.execute(
        "INSERT INTO companies (id, tenant_id, doc) VALUES (?1, ?2, ?3)",
        params![company.id.as_str(), company.tenant_id.as_str(), doc],
    )?;
    Ok(())
}

pub fn get(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<Option<Company>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM companies WHERE id = ?1 AND tenant_id = ?2",
            params![id.as_str(), tenant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn list(db: &Database, tenant: &TenantId) -> Result<Vec<Company>, StoreError> {
    let conn = db.conn()?;
    let mut stmt =
        conn.prepare("SELECT doc FROM companies WHERE tenant_id = ?1 ORDER BY rowid LIMIT ?2")?;
    let rows = stmt.query_map(params![tenant.as_str(), LIST_LIMIT as i64], |row| {
        row.get::<_, String>(0)
    })?;
    let mut companies = Vec::new();
    for raw in rows {
        companies.push(serde_json::from_str(&raw?)?);
    }
    Ok(companies)
}

/// Replaces the document but preserves the stored `contacts_count`: the
/// counter belongs to the contact write paths, not to company PUTs.
pub fn update(db: &Database, company: &Company) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(company)?;
    let changed = conn.execute(
        "UPDATE companies
         SET doc = json_set(?1, '$.contacts_count',
                            COALESCE(json_extract(doc, '$.contacts_count'), 0))
         WHERE id = ?2 AND tenant_id = ?3",
        params![doc, company.id.as_str(), company.tenant_id.as_str()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("company", company.id.as_str()));
    }
    Ok(())
}

/// Refuses deletion while contacts still reference the company, mirroring
/// the application-level referential-integrity check of the original.
pub fn delete_checked(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let referencing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE company_id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
        |row| row.get(0),
    )?;
    if referencing > 0 {
        return Err(StoreError::new(
            StoreErrorCode::Conflict,
            format!("company has {referencing} associated contacts"),
        ));
    }
    let deleted = conn.execute(
        "DELETE FROM companies WHERE id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
    )?;
    if deleted == 0 {
        return Err(StoreError::not_found("company", id.as_str()));
    }
    Ok(())
}

pub fn count(db: &Database, tenant: &TenantId) -> Result<i64, StoreError> {
    let conn = db.conn()?;
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM companies WHERE tenant_id = ?1",
        params![tenant.as_str()],
        |row| row.get(0),
    )?)
}
