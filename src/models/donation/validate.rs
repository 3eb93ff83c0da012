use std::fmt;

use super::types::{
    ClothingType, DonationForm, DonationPolicy, Handover, HandoverType, NewDonation, PickupAddress,
    is_postal_code,
};

/// A user-facing rule violation. All violations of a submission are reported together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequired,
    InvalidHandoverType,
    MissingPickupAddress,
    InvalidPostalCode,
    OutsideServiceRadius,
    InvalidClothingType,
    InvalidCrisisRegion,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ValidationError::MissingRequired => "Please fill in all required fields.",
            ValidationError::InvalidHandoverType => "Please choose a valid handover type.",
            ValidationError::MissingPickupAddress => {
                "For pickup, please supply street, postal code and city."
            }
            ValidationError::InvalidPostalCode => "Please enter a valid 5-digit postal code.",
            ValidationError::OutsideServiceRadius => {
                "The pickup address is outside the service radius."
            }
            ValidationError::InvalidClothingType => "Please choose a valid clothing type.",
            ValidationError::InvalidCrisisRegion => "Please choose a valid crisis region.",
        };
        f.write_str(msg)
    }
}

/// Check a submission against every rule and build the donation if none fail.
///
/// Expects an already trimmed form. Address fields are only looked at for pickups.
pub fn validate(form: &DonationForm, policy: &DonationPolicy) -> Result<NewDonation, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if form.handover_type.is_empty() || form.clothing_type.is_empty() || form.crisis_region.is_empty() {
        errors.push(ValidationError::MissingRequired);
    }

    let handover_type = HandoverType::parse(&form.handover_type);
    if handover_type.is_none() && !form.handover_type.is_empty() {
        errors.push(ValidationError::InvalidHandoverType);
    }

    if handover_type == Some(HandoverType::Pickup) {
        errors.extend(check_pickup_address(form, policy));
    }

    let clothing_type = ClothingType::parse(&form.clothing_type);
    if clothing_type.is_none() && !form.clothing_type.is_empty() {
        errors.push(ValidationError::InvalidClothingType);
    }

    if !form.crisis_region.is_empty() && !policy.is_region(&form.crisis_region) {
        errors.push(ValidationError::InvalidCrisisRegion);
    }

    match (handover_type, clothing_type) {
        (Some(handover_type), Some(clothing_type)) if errors.is_empty() => {
            let handover = match handover_type {
                HandoverType::Office => Handover::Office,
                HandoverType::Pickup => Handover::Pickup(PickupAddress {
                    street: form.street.clone(),
                    postal_code: form.postal_code.clone(),
                    city: form.city.clone(),
                }),
            };
            Ok(NewDonation {
                handover,
                clothing_type,
                crisis_region: form.crisis_region.clone(),
            })
        }
        _ => Err(errors),
    }
}

fn check_pickup_address(form: &DonationForm, policy: &DonationPolicy) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if form.street.is_empty() || form.postal_code.is_empty() || form.city.is_empty() {
        errors.push(ValidationError::MissingPickupAddress);
    }

    if !form.postal_code.is_empty() {
        if !is_postal_code(&form.postal_code) {
            errors.push(ValidationError::InvalidPostalCode);
        } else if !policy.org_postal_code.covers(&form.postal_code) {
            errors.push(ValidationError::OutsideServiceRadius);
        }
    }

    errors
}
