//! Shared test infrastructure for the donation workflow tests.
//!
//! # Test Store
//! - `MemoryStore` - in-process `RecordStore` with controllable creation
//!   times and an optional failing field write. A failed write stores nothing.
//! - `policy()` - office postal code 12345 with regions A, B and C.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use kleiderspende::errors::AppError;
use kleiderspende::models::donation::{DonationForm, DonationPolicy, OrgPostalCode};
use kleiderspende::models::store::{Created, RecordStore, StoredRecord, TimeBounds};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TOKEN: &str = "3f1c0d9a8b7e6f5a4c3b2a1908f7e6d5c4b3a29180f7e6d5c4b3a29180f7e6d5";
pub const ORG_POSTAL_CODE: &str = "12345";

pub fn policy() -> DonationPolicy {
    DonationPolicy::new(
        OrgPostalCode::parse(ORG_POSTAL_CODE).expect("valid postal code"),
        vec!["Region A".to_string(), "Region B".to_string(), "Region C".to_string()],
    )
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, min, s))
        .expect("valid timestamp")
}

pub fn office_form(clothing: &str, region: &str) -> DonationForm {
    DonationForm {
        handover_type: "office".to_string(),
        clothing_type: clothing.to_string(),
        crisis_region: region.to_string(),
        csrf_token: TOKEN.to_string(),
        ..Default::default()
    }
}

pub fn pickup_form(street: &str, postal_code: &str, city: &str) -> DonationForm {
    DonationForm {
        handover_type: "pickup".to_string(),
        clothing_type: "Jackets".to_string(),
        crisis_region: "Region B".to_string(),
        street: street.to_string(),
        postal_code: postal_code.to_string(),
        city: city.to_string(),
        csrf_token: TOKEN.to_string(),
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Default)]
struct State {
    next_id: i64,
    records: Vec<StoredRecord>,
    kinds: HashMap<i64, String>,
    /// Creation times handed out in order; wall clock once exhausted.
    clock: VecDeque<NaiveDateTime>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    /// Field key whose write fails.
    failing_field: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose writes of `key` fail.
    pub fn failing_on(key: &str) -> Self {
        Self { failing_field: Some(key.to_string()), ..Self::default() }
    }

    /// Queue creation timestamps for the next `create_with_fields` calls.
    pub fn with_clock(self, times: &[NaiveDateTime]) -> Self {
        self.state.lock().unwrap().clock.extend(times.iter().copied());
        self
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn get(&self, id: i64) -> Option<StoredRecord> {
        self.state.lock().unwrap().records.iter().find(|r| r.id == id).cloned()
    }

    /// Insert a raw record directly, bypassing the workflow.
    pub fn insert_raw(&self, kind: &str, created_at: NaiveDateTime, fields: &[(&str, &str)]) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.kinds.insert(id, kind.to_string());
        state.records.push(StoredRecord {
            id,
            title: format!("raw {id}"),
            created_at,
            fields: fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        id
    }
}

impl RecordStore for MemoryStore {
    async fn create_with_fields(
        &self,
        kind: &str,
        title: &str,
        fields: &[(&str, &str)],
    ) -> Result<Created, AppError> {
        if let Some(key) = &self.failing_field {
            if fields.iter().any(|(k, _)| *k == key.as_str()) {
                return Err(AppError::Persistence(format!("write of '{key}' refused")));
            }
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let created_at = state
            .clock
            .pop_front()
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        state.kinds.insert(id, kind.to_string());
        state.records.push(StoredRecord {
            id,
            title: title.to_string(),
            created_at,
            fields: fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        Ok(Created { id, created_at })
    }

    async fn query_by_kind(&self, kind: &str, bounds: TimeBounds) -> Result<Vec<StoredRecord>, AppError> {
        let state = self.state.lock().unwrap();
        let mut found: Vec<StoredRecord> = state
            .records
            .iter()
            .filter(|r| state.kinds.get(&r.id).map(String::as_str) == Some(kind))
            .filter(|r| bounds.contains(r.created_at))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }
}
