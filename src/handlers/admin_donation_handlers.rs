use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::auth::session::{require_login, require_permission};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::donation::report::{export_filename, report_rows};
use crate::models::donation::{
    DateRange, DonationPolicy, DonationRecord, ReportQuery, export_csv, list_records,
};
use crate::models::store::PgRecordStore;
use crate::templates_structs::{DonationListTemplate, PageContext};
use super::donation_policy;

/// GET /admin/donations: admin table, or the CSV export when `export` is set.
pub async fn list(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let range = DateRange::parse(&query.from, &query.to);

    if query.export.is_some() {
        return export(&pool, &config, &session, &range).await;
    }

    require_login(&session)?;
    require_permission(&session, "donations.list")?;

    let policy = donation_policy(&pool, &config).await;
    let store = PgRecordStore::new(pool.get_ref().clone());
    let records = list_records(&store, &range).await?;

    let from = range.from_param();
    let to = range.to_param();
    let export_url = format!("/admin/donations?export=1&from={from}&to={to}");

    let ctx = PageContext::build(&session);
    render(DonationListTemplate {
        ctx,
        rows: report_rows(&records, &policy),
        from,
        to,
        export_url,
    })
}

/// CSV of the filtered donations. Nothing is written without the export permission.
async fn export(
    pool: &PgPool,
    config: &AppConfig,
    session: &Session,
    range: &DateRange,
) -> Result<HttpResponse, AppError> {
    require_permission(session, "donations.export")?;

    let policy = donation_policy(pool, config).await;
    let store = PgRecordStore::new(pool.clone());
    let records = list_records(&store, range).await?;

    Ok(csv_response(&records, &policy, chrono::Local::now().naive_local()))
}

/// CSV attachment named after the day of `now`.
pub fn csv_response(records: &[DonationRecord], policy: &DonationPolicy, now: NaiveDateTime) -> HttpResponse {
    let filename = export_filename(now);
    log::info!("Exported {} donation(s) to {filename}", records.len());

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{filename}\"")))
        .body(export_csv(records, policy))
}
