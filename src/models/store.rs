//! Record storage seam used by the donation workflow.
//!
//! The workflow only needs two operations from its storage: create a record
//! of a kind with a title and all of its fields in one write, and list all
//! records of a kind inside a creation-time window. `PgRecordStore` maps them
//! onto the `entities` / `entity_properties` tables.

use chrono::NaiveDateTime;
use rand::Rng;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::entity;

/// Inclusive creation-time bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl TimeBounds {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }
}

/// Handle returned by `RecordStore::create_with_fields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Created {
    pub id: i64,
    pub created_at: NaiveDateTime,
}

/// A stored record with its loosely typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub fields: HashMap<String, String>,
}

impl StoredRecord {
    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Create a record together with its fields. Either everything is stored
    /// or nothing is; readers never see a record without its fields.
    /// The store assigns id and creation time.
    async fn create_with_fields(
        &self,
        kind: &str,
        title: &str,
        fields: &[(&str, &str)],
    ) -> Result<Created, AppError>;

    /// Records of `kind` created within `bounds`, newest first.
    async fn query_by_kind(&self, kind: &str, bounds: TimeBounds) -> Result<Vec<StoredRecord>, AppError>;
}

/// PostgreSQL-backed store over the EAV tables.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Entity names must be unique per type; records carry no natural key.
fn record_name(kind: &str) -> String {
    let bytes: [u8; 8] = rand::rng().random();
    format!("{kind}_{}", hex::encode(bytes))
}

impl RecordStore for PgRecordStore {
    async fn create_with_fields(
        &self,
        kind: &str,
        title: &str,
        fields: &[(&str, &str)],
    ) -> Result<Created, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at) = entity::create(&mut *tx, kind, &record_name(kind), title).await?;
        for (key, value) in fields {
            entity::set_property(&mut *tx, id, key, value).await?;
        }

        // Dropping `tx` on an early return rolls everything back.
        tx.commit().await?;
        Ok(Created { id, created_at })
    }

    async fn query_by_kind(&self, kind: &str, bounds: TimeBounds) -> Result<Vec<StoredRecord>, AppError> {
        let entities = entity::find_by_type_between(&self.pool, kind, bounds.from, bounds.to).await?;
        let ids: Vec<i64> = entities.iter().map(|e| e.id).collect();
        let mut properties = entity::get_properties_for(&self.pool, &ids).await?;

        Ok(entities
            .into_iter()
            .map(|e| StoredRecord {
                fields: properties.remove(&e.id).unwrap_or_default(),
                id: e.id,
                title: e.label,
                created_at: e.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn open_bounds_contain_everything() {
        assert!(TimeBounds::default().contains(at(1, 0, 0, 0)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let b = TimeBounds { from: Some(at(1, 0, 0, 0)), to: Some(at(31, 23, 59, 59)) };
        assert!(b.contains(at(1, 0, 0, 0)));
        assert!(b.contains(at(31, 23, 59, 59)));
        assert!(!b.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap().and_hms_opt(23, 59, 59).unwrap()));
    }

    #[test]
    fn record_names_are_prefixed_and_distinct() {
        let a = record_name("donation");
        assert!(a.starts_with("donation_"));
        assert_eq!(a.len(), "donation_".len() + 16);
        assert_ne!(a, record_name("donation"));
    }

    #[test]
    fn missing_field_reads_as_empty() {
        let r = StoredRecord {
            id: 1,
            title: String::new(),
            created_at: at(2, 0, 0, 0),
            fields: HashMap::from([("city".to_string(), "Bielefeld".to_string())]),
        };
        assert_eq!(r.field("city"), "Bielefeld");
        assert_eq!(r.field("street"), "");
    }
}
