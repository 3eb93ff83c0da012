//! Process configuration, read once from the environment at start-up.
//!
//! A `.env` file is honoured via `dotenvy` before `from_env` runs.

use std::env;

use crate::models::donation::OrgPostalCode;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_CRISIS_REGIONS: &[&str] = &["Region A", "Region B", "Region C"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Raw SESSION_KEY value; validated when the cookie key is built.
    pub session_key: Option<String>,
    pub admin_password: String,
    /// Seed value for the office postal code setting.
    pub org_postal_code: OrgPostalCode,
    pub crisis_regions: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            log::warn!("No ADMIN_PASSWORD set, using the default admin password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        let org_postal_code = match env::var("ORG_POSTAL_CODE") {
            Ok(raw) => OrgPostalCode::parse(&raw)
                .ok_or_else(|| format!("ORG_POSTAL_CODE must be 5 digits, got '{raw}'"))?,
            Err(_) => OrgPostalCode::default(),
        };

        let crisis_regions = env::var("CRISIS_REGIONS")
            .map(|raw| parse_regions(&raw))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            session_key: env::var("SESSION_KEY").ok(),
            admin_password,
            org_postal_code,
            crisis_regions: if crisis_regions.is_empty() {
                default_regions()
            } else {
                crisis_regions
            },
        })
    }
}

pub fn default_regions() -> Vec<String> {
    DEFAULT_CRISIS_REGIONS.iter().map(|r| r.to_string()).collect()
}

/// Split a comma-separated region list, dropping blanks and duplicates.
pub fn parse_regions(raw: &str) -> Vec<String> {
    let mut regions: Vec<String> = Vec::new();
    for region in raw.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        if !regions.iter().any(|r| r == region) {
            regions.push(region.to_string());
        }
    }
    regions
}
