use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::donation::{DonationForm, DonationPolicy, RegistrationOutcome, submit as register};
use crate::models::store::PgRecordStore;
use crate::templates_structs::{DonationConfirmationTemplate, DonationFormTemplate, PageContext};
use super::donation_policy;

pub const SAVE_FAILED: &str = "Your donation could not be saved. Please try again.";

/// GET /donate: empty registration form.
pub async fn form(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let policy = donation_policy(&pool, &config).await;
    let ctx = PageContext::build(&session);
    render(DonationFormTemplate::empty(ctx, &policy))
}

/// POST /donate: validate, store and confirm, or show the form again.
pub async fn submit(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<DonationForm>,
) -> Result<HttpResponse, AppError> {
    let policy = donation_policy(&pool, &config).await;
    let store = PgRecordStore::new(pool.get_ref().clone());
    let issued = csrf::issued_token(&session);

    let outcome = register(&store, &policy, &form, issued.as_deref()).await;
    let ctx = PageContext::build(&session);
    outcome_page(ctx, &policy, &form, outcome)
}

/// Page shown for a submission outcome.
///
/// A rejected token gets an empty form with no message. A storage failure
/// shows the submitted values again with a generic message.
pub fn outcome_page(
    ctx: PageContext,
    policy: &DonationPolicy,
    submitted: &DonationForm,
    outcome: Result<RegistrationOutcome, AppError>,
) -> Result<HttpResponse, AppError> {
    match outcome {
        Ok(RegistrationOutcome::Rejected) => render(DonationFormTemplate::empty(ctx, policy)),
        Ok(RegistrationOutcome::Invalid { form, errors }) => {
            render(DonationFormTemplate::with_validation_errors(ctx, policy, form, &errors))
        }
        Ok(RegistrationOutcome::Confirmed(record)) => {
            render(DonationConfirmationTemplate::new(ctx, policy, &record))
        }
        Err(e) => {
            log::error!("Donation could not be stored: {e}");
            render(DonationFormTemplate::new(
                ctx,
                policy,
                submitted.trimmed(),
                vec![SAVE_FAILED.to_string()],
            ))
        }
    }
}
