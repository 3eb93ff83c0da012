use sqlx::PgPool;

use crate::models::donation::OrgPostalCode;
use crate::models::entity;

/// Setting name of the office postal code used for the pickup radius.
pub const ORG_POSTAL_CODE: &str = "org.postal_code";

/// Get a single setting's value by name, returning a default if not found.
pub async fn get_value(pool: &PgPool, name: &str, default: &str) -> String {
    let value: Result<Option<String>, sqlx::Error> = sqlx::query_scalar(
        "SELECT p.value \
         FROM entities e \
         JOIN entity_properties p ON e.id = p.entity_id AND p.key = 'value' \
         WHERE e.entity_type = 'setting' AND e.name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await;

    match value {
        Ok(Some(v)) => v,
        Ok(None) => default.to_string(),
        Err(e) => {
            log::warn!("Failed to read setting '{name}': {e}");
            default.to_string()
        }
    }
}

/// Store a setting's value, creating the setting entity on first write.
pub async fn set_value(pool: &PgPool, name: &str, label: &str, value: &str) -> Result<(), sqlx::Error> {
    let id = match entity::find_by_type_and_name(pool, "setting", name).await? {
        Some(existing) => existing.id,
        None => entity::create(pool, "setting", name, label).await?.0,
    };
    entity::set_property(pool, id, "value", value).await?;
    sqlx::query("UPDATE entities SET updated_at = LOCALTIMESTAMP(0) WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// The office postal code; malformed stored values fall back to the default.
pub async fn org_postal_code(pool: &PgPool) -> OrgPostalCode {
    let fallback = OrgPostalCode::default();
    let raw = get_value(pool, ORG_POSTAL_CODE, fallback.as_str()).await;
    OrgPostalCode::parse(&raw).unwrap_or_else(|| {
        log::warn!("Stored office postal code '{raw}' is malformed, using {fallback}");
        fallback
    })
}

pub async fn set_org_postal_code(pool: &PgPool, code: &OrgPostalCode) -> Result<(), sqlx::Error> {
    set_value(pool, ORG_POSTAL_CODE, "Office postal code", code.as_str()).await
}
