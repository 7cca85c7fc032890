// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::{Database, LIST_LIMIT};
use lanyard_model::{Order, PaymentTransaction, RecordId, TenantId};
use rusqlite::{params, OptionalExtension};

pub fn insert(db: &Database, order: &Order) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(order)?;
    conn.execute(
        "INSERT INTO orders (id, tenant_id, doc) VALUES (?1, ?2, ?3)",
        params![order.id.as_str(), order.tenant_id.as_str(), doc],
    )?;
    Ok(())
}

pub fn get(db: &Database, tenant: &TenantId, id: &RecordId) -> Result<Option<Order>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM orders WHERE id = ?1 AND tenant_id = ?2",
            params![id.as_str(), tenant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn list(db: &Database, tenant: &TenantId) -> Result<Vec<Order>, StoreError> {
    let conn = db.conn()?;
    let mut stmt =
        conn.prepare("SELECT doc FROM orders WHERE tenant_id = ?1 ORDER BY rowid LIMIT ?2")?;
    let rows = stmt.query_map(params![tenant.as_str(), LIST_LIMIT as i64], |row| {
        row.get::<_, String>(0)
    })?;
    let mut orders = Vec::new();
    for raw in rows {
        orders.push(serde_json::from_str(&raw?)?);
    }
    Ok(orders)
}

pub fn update(db: &Database, order: &Order) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(order)?;
    let changed = conn.execute(
        "UPDATE orders SET doc = ?1 WHERE id = ?2 AND tenant_id = ?3",
        params![doc, order.id.as_str(), order.tenant_id.as_str()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("order", order.id.as_str()));
    }
    Ok(())
}

pub fn insert_payment(db: &Database, payment: &PaymentTransaction) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(payment)?;
    conn.execute(
        "INSERT INTO payments (id, tenant_id, order_id, session_id, doc)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            payment.id.as_str(),
            payment.tenant_id.as_str(),
            payment.order_id.as_str(),
            payment.session_id,
            doc
        ],
    )?;
    Ok(())
}

/// Webhook correlation lookup; session ids are gateway-global, not
/// tenant-scoped.
pub fn payment_by_session(
    db: &Database,
    session_id: &str,
) -> Result<Option<PaymentTransaction>, StoreError> {
    let conn = db.conn()?;
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM payments WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
        .transpose()
}

pub fn update_payment(db: &Database, payment: &PaymentTransaction) -> Result<(), StoreError> {
    let conn = db.conn()?;
    let doc = serde_json::to_string(payment)?;
    let changed = conn.execute(
        "UPDATE payments SET doc = ?1 WHERE id = ?2",
        params![doc, payment.id.as_str()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("payment", payment.id.as_str()));
    }
    Ok(())
}
