use chrono::NaiveDateTime;
use sqlx::{PgExecutor, PgPool};
use std::collections::HashMap;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Entity {
    pub id: i64,
    pub entity_type: String,
    pub name: String,
    pub label: String,
    pub created_at: NaiveDateTime,
}

/// Create a new entity, returning its id and the creation timestamp the
/// database assigned. Runs on a pool or inside a transaction.
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    entity_type: &str,
    name: &str,
    label: &str,
) -> Result<(i64, NaiveDateTime), sqlx::Error> {
    sqlx::query_as::<_, (i64, NaiveDateTime)>(
        "INSERT INTO entities (entity_type, name, label) VALUES ($1, $2, $3) \
         RETURNING id, created_at",
    )
    .bind(entity_type)
    .bind(name)
    .bind(label)
    .fetch_one(executor)
    .await
}

/// Find a single entity by type and name.
pub async fn find_by_type_and_name(
    pool: &PgPool,
    entity_type: &str,
    name: &str,
) -> Result<Option<Entity>, sqlx::Error> {
    sqlx::query_as::<_, Entity>(
        "SELECT id, entity_type, name, label, created_at \
         FROM entities WHERE entity_type = $1 AND name = $2",
    )
    .bind(entity_type)
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Entities of one type created inside the optional bounds, newest first.
pub async fn find_by_type_between(
    pool: &PgPool,
    entity_type: &str,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> Result<Vec<Entity>, sqlx::Error> {
    sqlx::query_as::<_, Entity>(
        "SELECT id, entity_type, name, label, created_at \
         FROM entities \
         WHERE entity_type = $1 \
           AND ($2::timestamp IS NULL OR created_at >= $2) \
           AND ($3::timestamp IS NULL OR created_at <= $3) \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(entity_type)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

// --- Property helpers ---

/// Load the properties of many entities in one round trip, keyed by entity id.
pub async fn get_properties_for(
    pool: &PgPool,
    entity_ids: &[i64],
) -> Result<HashMap<i64, HashMap<String, String>>, sqlx::Error> {
    let rows: Vec<(i64, String, String)> = sqlx::query_as(
        "SELECT entity_id, key, value FROM entity_properties WHERE entity_id = ANY($1)",
    )
    .bind(entity_ids)
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<i64, HashMap<String, String>> = HashMap::new();
    for (entity_id, key, value) in rows {
        map.entry(entity_id).or_default().insert(key, value);
    }
    Ok(map)
}

/// Set a property (upsert).
pub async fn set_property<'e>(
    executor: impl PgExecutor<'e>,
    entity_id: i64,
    key: &str,
    value: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO entity_properties (entity_id, key, value) VALUES ($1, $2, $3) \
         ON CONFLICT (entity_id, key) DO UPDATE SET value = EXCLUDED.value",
    )
    .bind(entity_id)
    .bind(key)
    .bind(value)
    .execute(executor)
    .await?;
    Ok(())
}
