use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::middleware::RETURN_TO_KEY;
use crate::auth::session::get_user_id;
use crate::auth::{csrf, password, rate_limit::RateLimiter};
use crate::errors::{AppError, render};
use crate::models::user;
use crate::templates_structs::{LoginTemplate, PageContext};

const LANDING: &str = "/admin/donations";

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location.to_string()))
        .finish()
}

/// Only local admin paths are accepted as post-login targets.
fn return_target(session: &Session) -> String {
    let target = session.get::<String>(RETURN_TO_KEY).unwrap_or(None);
    session.remove(RETURN_TO_KEY);
    target
        .filter(|t| t.starts_with("/admin/") && !t.starts_with("//"))
        .unwrap_or_else(|| LANDING.to_string())
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(see_other(LANDING));
    }

    let ctx = PageContext::build(&session);
    render(LoginTemplate { ctx, error: None })
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE any database access
    let ip = req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        let ctx = PageContext::build(&session);
        return render(LoginTemplate {
            ctx,
            error: Some("Too many failed login attempts. Please try again later.".to_string()),
        });
    }

    let found = user::find_by_username(&pool, form.username.trim()).await?;

    match found {
        Some(u) if password::verify_password(&form.password, &u.password) => {
            limiter.clear(ip);
            let target = return_target(&session);
            session.renew();
            session
                .insert("user_id", u.id)
                .and_then(|_| session.insert("username", &u.username))
                .and_then(|_| session.insert("permissions", &u.permissions))
                .map_err(|e| AppError::Session(e.to_string()))?;
            log::info!("User '{}' logged in", u.username);
            Ok(see_other(&target))
        }
        _ => {
            limiter.record_failure(ip);
            log::warn!("Failed login for '{}' from {ip}", form.username.trim());
            let ctx = PageContext::build(&session);
            render(LoginTemplate {
                ctx,
                error: Some("Invalid username or password".to_string()),
            })
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(see_other("/login"))
}
