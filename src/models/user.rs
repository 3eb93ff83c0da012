use sqlx::PgPool;

use crate::models::entity;

/// Permission codes granted to the seeded administrator.
pub const ADMIN_PERMISSIONS: &[&str] = &["donations.list", "donations.export", "settings.manage"];

/// Internal user struct for authentication, including the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    /// Comma-separated permission codes.
    pub permissions: String,
}

/// Find user by username for authentication.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT e.id, e.name AS username, \
                COALESCE(p_pw.value, '') AS password, \
                COALESCE(p_perm.value, '') AS permissions \
         FROM entities e \
         LEFT JOIN entity_properties p_pw ON e.id = p_pw.entity_id AND p_pw.key = 'password' \
         LEFT JOIN entity_properties p_perm ON e.id = p_perm.entity_id AND p_perm.key = 'permissions' \
         WHERE e.entity_type = 'user' AND e.name = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Create a user with an already hashed password. Returns the new id.
pub async fn create(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    permissions: &[&str],
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let (id, _) = entity::create(&mut *tx, "user", username, username).await?;
    entity::set_property(&mut *tx, id, "password", password_hash).await?;
    entity::set_property(&mut *tx, id, "permissions", &permissions.join(",")).await?;
    tx.commit().await?;
    Ok(id)
}
