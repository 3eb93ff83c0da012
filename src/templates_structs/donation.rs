use askama::Template;

use crate::models::donation::{
    ClothingType, DonationForm, DonationPolicy, DonationRecord, HandoverType, ReportRow,
    ValidationError, display,
};
use super::PageContext;

/// One radio button or select option.
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "donate/form.html")]
pub struct DonationFormTemplate {
    pub ctx: PageContext,
    pub form: DonationForm,
    pub errors: Vec<String>,
    pub handover_options: Vec<ChoiceOption>,
    pub clothing_options: Vec<ChoiceOption>,
    pub region_options: Vec<ChoiceOption>,
    pub show_address: bool,
}

impl DonationFormTemplate {
    /// Initial form with drop-off preselected.
    pub fn empty(ctx: PageContext, policy: &DonationPolicy) -> Self {
        let form = DonationForm {
            handover_type: HandoverType::Office.as_str().to_string(),
            ..Default::default()
        };
        Self::new(ctx, policy, form, vec![])
    }

    /// Form pre-filled with `form`. Only a submitted, known handover type is
    /// preselected.
    pub fn new(ctx: PageContext, policy: &DonationPolicy, form: DonationForm, errors: Vec<String>) -> Self {
        let chosen = HandoverType::parse(&form.handover_type);
        let handover_options = HandoverType::ALL
            .into_iter()
            .map(|h| ChoiceOption {
                value: h.as_str().to_string(),
                label: h.label().to_string(),
                selected: chosen == Some(h),
            })
            .collect();
        let clothing_options = ClothingType::ALL
            .into_iter()
            .map(|c| ChoiceOption {
                value: c.label().to_string(),
                label: c.label().to_string(),
                selected: form.clothing_type == c.label(),
            })
            .collect();
        let region_options = policy
            .crisis_regions
            .iter()
            .map(|r| ChoiceOption {
                value: r.clone(),
                label: r.clone(),
                selected: &form.crisis_region == r,
            })
            .collect();

        Self {
            ctx,
            form,
            errors,
            handover_options,
            clothing_options,
            region_options,
            show_address: chosen == Some(HandoverType::Pickup),
        }
    }

    pub fn with_validation_errors(
        ctx: PageContext,
        policy: &DonationPolicy,
        form: DonationForm,
        errors: &[ValidationError],
    ) -> Self {
        let messages = errors.iter().map(ToString::to_string).collect();
        Self::new(ctx, policy, form, messages)
    }
}

#[derive(Template)]
#[template(path = "donate/confirmation.html")]
pub struct DonationConfirmationTemplate {
    pub ctx: PageContext,
    pub handover: String,
    pub clothing_type: String,
    pub crisis_region: String,
    pub registered_at: String,
    pub location: String,
}

impl DonationConfirmationTemplate {
    pub fn new(ctx: PageContext, policy: &DonationPolicy, record: &DonationRecord) -> Self {
        Self {
            ctx,
            handover: display::handover_label(record).to_string(),
            clothing_type: record.clothing_type.label().to_string(),
            crisis_region: record.crisis_region.clone(),
            registered_at: display::confirmation_time(record.created_at),
            location: display::location_text(record, &policy.org_postal_code),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/donations.html")]
pub struct DonationListTemplate {
    pub ctx: PageContext,
    pub rows: Vec<ReportRow>,
    pub from: String,
    pub to: String,
    pub export_url: String,
}
