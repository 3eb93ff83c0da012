//! Display columns derived from a donation, shared by the confirmation page,
//! the admin table and the CSV export.

use chrono::NaiveDateTime;

use super::types::{DonationRecord, Handover, OrgPostalCode};

pub fn handover_label(record: &DonationRecord) -> &'static str {
    record.handover.handover_type().label()
}

/// Pickup address, or the office reference for drop-offs.
pub fn location_text(record: &DonationRecord, org_postal_code: &OrgPostalCode) -> String {
    match &record.handover {
        Handover::Pickup(a) => format!("{}, {} {}", a.street, a.postal_code, a.city),
        Handover::Office => format!("Office (postal code {org_postal_code})"),
    }
}

/// `dd.mm.YYYY, HH:MM`, as shown on the confirmation page.
pub fn confirmation_time(at: NaiveDateTime) -> String {
    at.format("%d.%m.%Y, %H:%M").to_string()
}

/// `YYYY-MM-DD HH:MM`, as used in the admin table and the CSV export.
pub fn list_time(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
