use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{entity, setting, user};

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Seed the admin account and the office postal code when missing. Idempotent.
pub async fn seed(pool: &PgPool, config: &AppConfig) -> Result<(), AppError> {
    if user::find_by_username(pool, "admin").await?.is_none() {
        let hash = password::hash_password(&config.admin_password)?;
        let id = user::create(pool, "admin", &hash, user::ADMIN_PERMISSIONS).await?;
        log::info!("Created admin user (id {id})");
    }

    if entity::find_by_type_and_name(pool, "setting", setting::ORG_POSTAL_CODE)
        .await?
        .is_none()
    {
        setting::set_org_postal_code(pool, &config.org_postal_code).await?;
        log::info!("Office postal code initialised to {}", config.org_postal_code);
    }

    Ok(())
}
