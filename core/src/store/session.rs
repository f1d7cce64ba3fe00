use super::{parse_timestamp, SessionStore};
use crate::{
    dataset::ReturnDataset,
    decision::Decision,
    error::{DashboardError, DashboardResult},
    record::{Condition, ReturnRecord},
    types::SessionId,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub label:      String,
    pub item_count: usize,
    pub saved_at:   DateTime<Utc>,
}

impl SessionStore {
    /// Archive the dataset and its decisions. Returns the new session id.
    pub fn save_session(&self, label: &str, dataset: &ReturnDataset) -> DashboardResult<SessionId> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let saved_at = Utc::now().to_rfc3339();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO session (session_id, label, item_count, saved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![session_id, label, dataset.len() as i64, saved_at],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO session_item (
                    session_id, position, sku, product_name, condition,
                    refurbishment_cost, resale_value, days_in_process,
                    disposition, decision
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for (position, (record, decision)) in dataset.pairs().enumerate() {
                stmt.execute(params![
                    session_id,
                    position as i64,
                    record.sku,
                    record.product_name,
                    record.condition.label(),
                    record.refurbishment_cost,
                    record.resale_value,
                    record.days_in_process as i64,
                    record.disposition,
                    decision.map(|d| d.as_str()),
                ])?;
            }
        }
        tx.commit()?;

        log::info!("store: saved session {session_id} ({} items)", dataset.len());
        Ok(session_id)
    }

    /// Restore an archived dataset, records in their original order.
    pub fn load_session(&self, session_id: &str) -> DashboardResult<ReturnDataset> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM session WHERE session_id = ?1",
                params![session_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(DashboardError::SessionNotFound {
                session_id: session_id.to_string(),
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT sku, product_name, condition, refurbishment_cost, resale_value,
                    days_in_process, disposition, decision
             FROM session_item WHERE session_id = ?1
             ORDER BY position ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id], |row| {
                let record = ReturnRecord {
                    sku: row.get(0)?,
                    product_name: row.get(1)?,
                    condition: Condition::parse(&row.get::<_, String>(2)?),
                    refurbishment_cost: row.get(3)?,
                    resale_value: row.get(4)?,
                    days_in_process: row.get::<_, i64>(5)?.max(0) as u32,
                    disposition: row.get(6)?,
                };
                let decision = row
                    .get::<_, Option<String>>(7)?
                    .and_then(|d| Decision::parse(&d));
                Ok((record, decision))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let (records, decisions): (Vec<ReturnRecord>, Vec<Option<Decision>>) =
            rows.into_iter().unzip();
        let skus: Vec<String> = records.iter().map(|r| r.sku.clone()).collect();
        let mut dataset = ReturnDataset::from_records(records)?;
        for (sku, decision) in skus.iter().zip(decisions) {
            if decision.is_some() {
                dataset.set_decision(sku, decision)?;
            }
        }
        Ok(dataset)
    }

    /// All archived sessions, newest first.
    pub fn list_sessions(&self) -> DashboardResult<Vec<SessionInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, label, item_count, saved_at
             FROM session ORDER BY saved_at DESC, session_id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(session_id, label, item_count, saved_at)| {
                Ok(SessionInfo {
                    session_id,
                    label,
                    item_count: item_count.max(0) as usize,
                    saved_at: parse_timestamp(&saved_at)?,
                })
            })
            .collect()
    }

    pub fn delete_session(&self, session_id: &str) -> DashboardResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM session WHERE session_id = ?1",
            params![session_id],
        )?;
        if deleted == 0 {
            return Err(DashboardError::SessionNotFound {
                session_id: session_id.to_string(),
            });
        }
        Ok(())
    }
}
