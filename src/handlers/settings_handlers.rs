use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{get_username, require_permission};
use crate::errors::{AppError, render};
use crate::models::donation::OrgPostalCode;
use crate::models::setting;
use crate::templates_structs::{PageContext, SettingsTemplate};

#[derive(Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub org_postal_code: String,
    pub csrf_token: String,
}

pub async fn form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "settings.manage")?;

    let ctx = PageContext::build(&session);
    let org_postal_code = setting::org_postal_code(&pool).await.to_string();
    render(SettingsTemplate { ctx, org_postal_code, errors: vec![] })
}

pub async fn save(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<SettingsForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "settings.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let Some(code) = OrgPostalCode::parse(&form.org_postal_code) else {
        let ctx = PageContext::build(&session);
        return render(SettingsTemplate {
            ctx,
            org_postal_code: form.org_postal_code.trim().to_string(),
            errors: vec!["The office postal code must be exactly 5 digits.".to_string()],
        });
    };

    setting::set_org_postal_code(&pool, &code).await?;
    log::info!(
        "Office postal code set to {code} by {}",
        get_username(&session).unwrap_or_default()
    );

    let _ = session.insert("flash", "Settings saved successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/admin/settings"))
        .finish())
}
