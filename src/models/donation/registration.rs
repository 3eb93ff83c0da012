use crate::auth::csrf;
use crate::errors::AppError;
use crate::models::store::RecordStore;

use super::types::{DonationForm, DonationPolicy, DonationRecord, KIND, NewDonation};
use super::validate::{ValidationError, validate};

/// Result of one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Anti-forgery token missing or wrong; show an empty form, say nothing.
    Rejected,
    /// Show the form again with the submitted values and every error.
    Invalid {
        form: DonationForm,
        errors: Vec<ValidationError>,
    },
    /// Stored; show the summary.
    Confirmed(DonationRecord),
}

/// Validate a submission and store it when every rule passes.
///
/// `issued_token` is the anti-forgery token handed out with the form.
/// A storage failure leaves nothing behind and is returned as
/// `AppError::Persistence`.
pub async fn submit<S: RecordStore>(
    store: &S,
    policy: &DonationPolicy,
    form: &DonationForm,
    issued_token: Option<&str>,
) -> Result<RegistrationOutcome, AppError> {
    if !csrf::tokens_match(issued_token, form.csrf_token.trim()) {
        log::warn!("Donation submission with invalid anti-forgery token dropped");
        return Ok(RegistrationOutcome::Rejected);
    }

    let form = form.trimmed();
    match validate(&form, policy) {
        Ok(new) => persist(store, new).await.map(RegistrationOutcome::Confirmed),
        Err(errors) => Ok(RegistrationOutcome::Invalid { form, errors }),
    }
}

/// Store the record and its fields as one unit.
pub async fn persist<S: RecordStore>(store: &S, new: NewDonation) -> Result<DonationRecord, AppError> {
    let title = new.title();
    let created = store
        .create_with_fields(KIND, &title, &new.fields())
        .await
        .map_err(|e| {
            log::error!("Storing donation '{title}' failed: {e}");
            AppError::Persistence(format!("donation '{title}' was not stored"))
        })?;

    log::info!("Registered donation {} ({title})", created.id);
    Ok(DonationRecord::from_new(created.id, created.created_at, new))
}
