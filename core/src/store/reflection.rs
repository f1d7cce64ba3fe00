use super::{parse_timestamp, SessionStore};
use crate::error::DashboardResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

const DEFAULT_KEY: &str = "return_dashboard_reflection";

/// Free-text learning reflection attached to the printed report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(default)]
    pub key_insights: String,
    #[serde(default)]
    pub challenges: String,
    #[serde(default)]
    pub strategies: String,
}

impl Reflection {
    pub fn is_empty(&self) -> bool {
        self.key_insights.trim().is_empty()
            && self.challenges.trim().is_empty()
            && self.strategies.trim().is_empty()
    }
}

impl SessionStore {
    /// Save (or overwrite) the reflection. Returns the save timestamp.
    pub fn save_reflection(&self, reflection: &Reflection) -> DashboardResult<DateTime<Utc>> {
        let now = Utc::now();
        let payload = serde_json::to_string(reflection)?;
        self.conn.execute(
            "INSERT INTO reflection (reflection_key, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(reflection_key) DO UPDATE SET
                payload = excluded.payload, updated_at = excluded.updated_at",
            params![DEFAULT_KEY, payload, now.to_rfc3339()],
        )?;
        Ok(now)
    }

    /// The saved reflection and when it was saved, if any.
    pub fn reflection(&self) -> DashboardResult<Option<(Reflection, DateTime<Utc>)>> {
        let row = self
            .conn
            .query_row(
                "SELECT payload, updated_at FROM reflection WHERE reflection_key = ?1",
                params![DEFAULT_KEY],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        match row {
            Some((payload, updated_at)) => Ok(Some((
                serde_json::from_str(&payload)?,
                parse_timestamp(&updated_at)?,
            ))),
            None => Ok(None),
        }
    }
}
