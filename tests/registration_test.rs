//! Registration workflow tests. Covers the full submit path against an
//! in-memory record store:
//! - Drop-off and pickup submissions that are stored and confirmed
//! - Rule violations that re-render the form with all errors
//! - Anti-forgery rejections that store nothing and say nothing
//! - Nothing stored when a field write fails

mod common;

use kleiderspende::errors::AppError;
use kleiderspende::models::donation::display::{handover_label, location_text};
use kleiderspende::models::donation::{
    ClothingType, DonationForm, DonationRecord, Handover, KIND, RegistrationOutcome, ValidationError,
    submit,
};
use kleiderspende::models::store::{RecordStore, TimeBounds};
use common::*;

async fn confirmed(store: &MemoryStore, form: &DonationForm) -> DonationRecord {
    match submit(store, &policy(), form, Some(TOKEN)).await.expect("submit failed") {
        RegistrationOutcome::Confirmed(record) => record,
        other => panic!("expected confirmation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_office_donation_is_confirmed_and_stored() {
    let store = MemoryStore::new();

    let record = confirmed(&store, &office_form("Shoes", "Region A")).await;

    assert_eq!(record.handover, Handover::Office);
    assert_eq!(record.clothing_type, ClothingType::Shoes);
    assert_eq!(record.crisis_region, "Region A");
    assert_eq!(handover_label(&record), "Drop-off at office");
    assert_eq!(
        location_text(&record, &policy().org_postal_code),
        "Office (postal code 12345)"
    );

    let stored = store.get(record.id).expect("record stored");
    assert_eq!(stored.title, "Drop-off – Shoes – Region A");
    assert_eq!(stored.field("handover_type"), "office");
    assert_eq!(stored.field("clothing_type"), "Shoes");
    assert_eq!(stored.field("crisis_region"), "Region A");
    assert!(!stored.fields.contains_key("street"));
    assert!(!stored.fields.contains_key("postal_code"));
    assert!(!stored.fields.contains_key("city"));
}

#[tokio::test]
async fn test_office_donation_ignores_address_fields() {
    let store = MemoryStore::new();
    let mut form = office_form("Pants", "Region C");
    form.street = "Ignored Rd 9".to_string();
    form.postal_code = "99999".to_string();
    form.city = "Far Away".to_string();

    let record = confirmed(&store, &form).await;

    assert_eq!(record.handover, Handover::Office);
    let stored = store.get(record.id).unwrap();
    assert_eq!(stored.field("postal_code"), "");
}

#[tokio::test]
async fn test_pickup_inside_radius_stores_address() {
    let store = MemoryStore::new();

    let record = confirmed(&store, &pickup_form("Main St 1", "12001", "Hometown")).await;

    assert_eq!(handover_label(&record), "Pickup");
    assert_eq!(
        location_text(&record, &policy().org_postal_code),
        "Main St 1, 12001 Hometown"
    );
    let stored = store.get(record.id).unwrap();
    assert_eq!(stored.title, "Pickup – Jackets – Region B");
    assert_eq!(stored.field("street"), "Main St 1");
    assert_eq!(stored.field("postal_code"), "12001");
    assert_eq!(stored.field("city"), "Hometown");
}

#[tokio::test]
async fn test_pickup_outside_radius_is_rejected_with_values_kept() {
    let store = MemoryStore::new();
    let form = pickup_form("Main St 1", "99999", "Nowhere");

    let outcome = submit(&store, &policy(), &form, Some(TOKEN)).await.unwrap();

    match outcome {
        RegistrationOutcome::Invalid { form, errors } => {
            assert_eq!(errors, vec![ValidationError::OutsideServiceRadius]);
            assert_eq!(form.street, "Main St 1");
            assert_eq!(form.postal_code, "99999");
            assert_eq!(form.city, "Nowhere");
        }
        other => panic!("expected errors, got {other:?}"),
    }
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_outside_radius_reported_regardless_of_other_errors() {
    let store = MemoryStore::new();
    let mut form = pickup_form("", "98765", "");
    form.crisis_region = "Region Z".to_string();

    let outcome = submit(&store, &policy(), &form, Some(TOKEN)).await.unwrap();

    let RegistrationOutcome::Invalid { errors, .. } = outcome else {
        panic!("expected errors");
    };
    assert_eq!(
        errors,
        vec![
            ValidationError::MissingPickupAddress,
            ValidationError::OutsideServiceRadius,
            ValidationError::InvalidCrisisRegion,
        ]
    );
}

#[tokio::test]
async fn test_malformed_postal_code_is_not_judged_by_prefix() {
    let store = MemoryStore::new();

    // "12" matches the office prefix, "99" does not; neither may yield a radius verdict.
    for code in ["12x45", "1234", "99a", "123456"] {
        let outcome = submit(&store, &policy(), &pickup_form("Main St 1", code, "Town"), Some(TOKEN))
            .await
            .unwrap();
        let RegistrationOutcome::Invalid { errors, .. } = outcome else {
            panic!("expected errors for {code}");
        };
        assert!(errors.contains(&ValidationError::InvalidPostalCode), "{code}");
        assert!(!errors.contains(&ValidationError::OutsideServiceRadius), "{code}");
    }
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_values_are_trimmed_before_validation() {
    let store = MemoryStore::new();
    let mut form = office_form("  Sweaters ", " Region B ");
    form.handover_type = " office".to_string();

    let record = confirmed(&store, &form).await;

    assert_eq!(record.clothing_type, ClothingType::Sweaters);
    assert_eq!(record.crisis_region, "Region B");
}

#[tokio::test]
async fn test_wrong_token_is_silently_rejected() {
    let store = MemoryStore::new();
    let mut form = office_form("Shoes", "Region A");
    form.csrf_token = "forged".to_string();

    let outcome = submit(&store, &policy(), &form, Some(TOKEN)).await.unwrap();

    assert_eq!(outcome, RegistrationOutcome::Rejected);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_missing_issued_token_is_rejected() {
    let store = MemoryStore::new();
    let form = DonationForm::default();

    let outcome = submit(&store, &policy(), &form, None).await.unwrap();

    assert_eq!(outcome, RegistrationOutcome::Rejected);
}

#[tokio::test]
async fn test_confirmation_uses_store_timestamp() {
    let stamp = at(2024, 1, 15, 10, 30, 12);
    let store = MemoryStore::new().with_clock(&[stamp]);

    let record = confirmed(&store, &office_form("Hats/Scarves", "Region C")).await;

    assert_eq!(record.created_at, stamp);
    assert_eq!(store.get(record.id).unwrap().created_at, stamp);
}

#[tokio::test]
async fn test_failed_field_write_stores_nothing() {
    let store = MemoryStore::failing_on("city");

    let result = submit(&store, &policy(), &pickup_form("Main St 1", "12001", "Hometown"), Some(TOKEN)).await;

    assert!(matches!(result, Err(AppError::Persistence(_))));
    assert_eq!(store.len(), 0);
    let left = store.query_by_kind(KIND, TimeBounds::default()).await.unwrap();
    assert!(left.is_empty());
}

#[tokio::test]
async fn test_failed_write_leaves_earlier_records_alone() {
    let store = MemoryStore::failing_on("street");
    let office = confirmed(&store, &office_form("Shoes", "Region A")).await;

    let result = submit(&store, &policy(), &pickup_form("Main St 1", "12001", "Hometown"), Some(TOKEN)).await;

    assert!(result.is_err());
    let left = store.query_by_kind(KIND, TimeBounds::default()).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, office.id);
    assert_eq!(left[0].fields.len(), 3);
}

#[tokio::test]
async fn test_duplicate_submissions_are_both_stored() {
    let store = MemoryStore::new();
    let form = office_form("Kids' clothing", "Region A");

    let first = confirmed(&store, &form).await;
    let second = confirmed(&store, &form).await;

    assert_ne!(first.id, second.id);
    assert_eq!(store.len(), 2);
}
