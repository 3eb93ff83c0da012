use sqlx::PgPool;

use crate::config::AppConfig;
use crate::models::donation::DonationPolicy;
use crate::models::setting;

pub mod admin_donation_handlers;
pub mod auth_handlers;
pub mod donation_handlers;
pub mod settings_handlers;

/// Current donation rules: stored office postal code plus configured regions.
pub async fn donation_policy(pool: &PgPool, config: &AppConfig) -> DonationPolicy {
    DonationPolicy::new(setting::org_postal_code(pool).await, config.crisis_regions.clone())
}
