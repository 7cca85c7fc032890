// SPDX-License-Identifier: Apache-2.0

//! Contact CRUD plus the denormalized company counter. Every path that
//! mutates a contact's company reference runs the contact write and the
//! counter write inside one transaction, so the pair cannot drift under
//! partial failure.

use crate::error::{StoreError, StoreErrorCode};
use crate::{Database, LIST_LIMIT};
use lanyard_model::{Contact, RecordId, TenantId};
use rusqlite::{params, OptionalExtension, Transaction};

fn company_exists(tx: &Transaction<'_>, tenant: &TenantId, id: &RecordId) -> Result<bool, StoreError> {
    let count: i64 = tx.query_row(
        "SELECT COUNT(*) FROM companies WHERE id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn bump_counter(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    company: &RecordId,
    delta: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "UPDATE companies
         SET doc = json_set(doc, '$.contacts_count',
                            COALESCE(json_extract(doc, '$.contacts_count'), 0) + ?1)
         WHERE id = ?2 AND tenant_id = ?3",
        params![delta, company.as_str(), tenant.as_str()],
    )?;
    Ok(())
}

/// Inserts the contact and increments its company's counter. Fails with
/// `NotFound` (and writes nothing) when the referenced company is missing.
pub fn insert_counted(db: &Database, contact: &Contact) -> Result<(), StoreError> {
    let mut conn = db.conn()?;
    let tx = conn.transaction()?;
    if !company_exists(&tx, &contact.tenant_id, &contact.company_id)? {
        return Err(StoreError::not_found(
            "company",
            contact.company_id.as_str(),
        ));
    }
    let doc = serde_json::to_string(contact)?;
    tx.execute(
        "INSERT INTO contacts (id, tenant_id, company_id, event_id, doc)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            contact.id.as_str(),
            contact.tenant_id.as_str(),
            contact.company_id.as_str(),
            contact.event_id.as_ref().map(RecordId::as_str),
            doc
        ],
    )?;
    bump_counter(&tx, &contact.tenant_id, &contact.company_id, 1)?;
    tx.commit()?;
    Ok(())
}

pub fn get(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<Option<Contact>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM contacts WHERE id = ?1 AND tenant_id = ?2",
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
    company_id: Option<&RecordId>,
    event_id: Option<&RecordId>,
) -> Result<Vec<Contact>, StoreError> {
    let conn = db.conn()?;
    let mut sql = String::from("SELECT doc FROM contacts WHERE tenant_id = ?1");
    let mut args: Vec<&str> = vec![tenant.as_str()];
    if let Some(company) = company_id {
        sql.push_str(" AND company_id = ?2");
        args.push(company.as_str());
    }
    if let Some(event) = event_id {
        sql.push_str(&format!(" AND event_id = ?{}", args.len() + 1));
        args.push(event.as_str());
    }
    sql.push_str(&format!(" ORDER BY rowid LIMIT {LIST_LIMIT}"));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args), |row| {
        row.get::<_, String>(0)
    })?;
    let mut contacts = Vec::new();
    for raw in rows {
        contacts.push(serde_json::from_str(&raw?)?);
    }
    Ok(contacts)
}

/// Persists an already-patched contact. When `move_to` names a different
/// company, the old company's counter is decremented and the new one's
/// incremented in the same transaction; a missing target company fails with
/// `NotFound` and leaves both the contact and the counters untouched.
pub fn update_counted(
    db: &Database,
    contact: &mut Contact,
    move_to: Option<RecordId>,
) -> Result<(), StoreError> {
    let mut conn = db.conn()?;
    let tx = conn.transaction()?;
    if let Some(new_company) = move_to {
        if new_company != contact.company_id {
            if !company_exists(&tx, &contact.tenant_id, &new_company)? {
                return Err(StoreError::not_found("company", new_company.as_str()));
            }
            bump_counter(&tx, &contact.tenant_id, &contact.company_id, -1)?;
            bump_counter(&tx, &contact.tenant_id, &new_company, 1)?;
            contact.company_id = new_company;
        }
    }
    let doc = serde_json::to_string(&*contact)?;
    let changed = tx.execute(
        "UPDATE contacts SET company_id = ?1, event_id = ?2, doc = ?3
         WHERE id = ?4 AND tenant_id = ?5",
        params![
            contact.company_id.as_str(),
            contact.event_id.as_ref().map(RecordId::as_str),
            doc,
            contact.id.as_str(),
            contact.tenant_id.as_str()
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("contact", contact.id.as_str()));
    }
    tx.commit()?;
    Ok(())
}

/// Deletes the contact and decrements its company's counter atomically.
pub fn delete_counted(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<(), StoreError> {
    let mut conn = db.conn()?;
    let tx = conn.transaction()?;
    let doc: Option<String> = tx
        .query_row(
            "SELECT doc FROM contacts WHERE id = ?1 AND tenant_id = ?2",
            params![id.as_str(), tenant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    let Some(raw) = doc else {
        return Err(StoreError::not_found("contact", id.as_str()));
    };
    let contact: Contact = serde_json::from_str(&raw)?;
    bump_counter(&tx, tenant, &contact.company_id, -1)?;
    tx.execute(
        "DELETE FROM contacts WHERE id = ?1 AND tenant_id = ?2",
        params![id.as_str(), tenant.as_str()],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn count(db: &Database, tenant: &TenantId) -> Result<i64, StoreError> {
    let conn = db.conn()?;
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE tenant_id = ?1",
        params![tenant.as_str()],
        |row| row.get(0),
    )?)
}

/// The derived truth the denormalized counter must agree with.
pub fn count_by_company(
    db: &Database,
    tenant: &TenantId,
    company: &RecordId,
) -> Result<i64, StoreError> {
    let conn = db.conn()?;
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE company_id = ?1 AND tenant_id = ?2",
        params![company.as_str(), tenant.as_str()],
        |row| row.get(0),
    )?)
}

pub fn update_photo(
    db: &Database,
    tenant: &TenantId,
    id: &RecordId,
    photo_url: &str,
) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let changed = conn.execute(
        "UPDATE contacts SET doc = json_set(doc, '$.photo_url', ?1)
         WHERE id = ?2 AND tenant_id = ?3",
        params![photo_url, id.as_str(), tenant.as_str()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("contact", id.as_str()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_company_rolls_back_the_insert() {
        let db = Database::open_in_memory().expect("open");
        let tenant = TenantId::parse("t-1").expect("tenant");
        let contact: Contact = serde_json::from_str(
            r#"{
                "id": "c-1", "tenant_id": "t-1", "name": "Jane",
                "company_id": "co-missing",
                "created_at": "2026-01-05T10:00:00Z",
                "updated_at": "2026-01-05T10:00:00Z",
                "created_by": "u-1"
            }"#,
        )
        .expect("contact");
        let err = insert_counted(&db, &contact).expect_err("missing company");
        assert_eq!(err.code, StoreErrorCode::NotFound);
        assert_eq!(count(&db, &tenant).expect("count"), 0);
    }
}
