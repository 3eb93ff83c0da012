use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fmt;

use crate::models::store::StoredRecord;

/// Record kind under which donations are stored.
pub const KIND: &str = "donation";

// Field keys of a stored donation.
pub const FIELD_HANDOVER: &str = "handover_type";
pub const FIELD_CLOTHING: &str = "clothing_type";
pub const FIELD_REGION: &str = "crisis_region";
pub const FIELD_STREET: &str = "street";
pub const FIELD_POSTAL_CODE: &str = "postal_code";
pub const FIELD_CITY: &str = "city";

const DEFAULT_ORG_POSTAL_CODE: &str = "12345";

/// How the clothes reach the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoverType {
    /// Donor brings the clothes to the office.
    Office,
    /// Organization collects at the donor's address.
    Pickup,
}

impl HandoverType {
    pub const ALL: [HandoverType; 2] = [HandoverType::Office, HandoverType::Pickup];

    /// Parse the submitted form value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "office" => Some(HandoverType::Office),
            "pickup" => Some(HandoverType::Pickup),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandoverType::Office => "office",
            HandoverType::Pickup => "pickup",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HandoverType::Office => "Drop-off at office",
            HandoverType::Pickup => "Pickup",
        }
    }

    /// Short form used in record titles.
    fn title_word(self) -> &'static str {
        match self {
            HandoverType::Office => "Drop-off",
            HandoverType::Pickup => "Pickup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClothingType {
    Jackets,
    Pants,
    KidsClothing,
    Shoes,
    Sweaters,
    HatsScarves,
}

impl ClothingType {
    pub const ALL: [ClothingType; 6] = [
        ClothingType::Jackets,
        ClothingType::Pants,
        ClothingType::KidsClothing,
        ClothingType::Shoes,
        ClothingType::Sweaters,
        ClothingType::HatsScarves,
    ];

    /// The select option text, which is also the submitted and stored value.
    pub fn label(self) -> &'static str {
        match self {
            ClothingType::Jackets => "Jackets",
            ClothingType::Pants => "Pants",
            ClothingType::KidsClothing => "Kids' clothing",
            ClothingType::Shoes => "Shoes",
            ClothingType::Sweaters => "Sweaters",
            ClothingType::HatsScarves => "Hats/Scarves",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for ClothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True for exactly five ASCII digits.
pub fn is_postal_code(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

/// The office postal code that anchors the pickup radius.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgPostalCode(String);

impl OrgPostalCode {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        is_postal_code(value).then(|| OrgPostalCode(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First two digits; pickups must share them.
    pub fn region_prefix(&self) -> &str {
        self.0.get(..2).unwrap_or("")
    }

    /// Whether a well-formed donor postal code lies inside the service radius.
    pub fn covers(&self, postal_code: &str) -> bool {
        is_postal_code(postal_code) && postal_code.get(..2) == Some(self.region_prefix())
    }
}

impl Default for OrgPostalCode {
    fn default() -> Self {
        OrgPostalCode(DEFAULT_ORG_POSTAL_CODE.to_string())
    }
}

impl fmt::Display for OrgPostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settings the donation rules depend on, passed in explicitly per request.
#[derive(Debug, Clone)]
pub struct DonationPolicy {
    pub org_postal_code: OrgPostalCode,
    pub crisis_regions: Vec<String>,
}

impl DonationPolicy {
    pub fn new(org_postal_code: OrgPostalCode, crisis_regions: Vec<String>) -> Self {
        Self { org_postal_code, crisis_regions }
    }

    pub fn is_region(&self, region: &str) -> bool {
        self.crisis_regions.iter().any(|r| r == region)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupAddress {
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

/// Handover mode; an address exists only for pickups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handover {
    Office,
    Pickup(PickupAddress),
}

impl Handover {
    pub fn handover_type(&self) -> HandoverType {
        match self {
            Handover::Office => HandoverType::Office,
            Handover::Pickup(_) => HandoverType::Pickup,
        }
    }

    pub fn address(&self) -> Option<&PickupAddress> {
        match self {
            Handover::Office => None,
            Handover::Pickup(address) => Some(address),
        }
    }
}

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub handover: Handover,
    pub clothing_type: ClothingType,
    pub crisis_region: String,
}

impl NewDonation {
    /// e.g. "Pickup – Jackets – Region B"
    pub fn title(&self) -> String {
        format!(
            "{} – {} – {}",
            self.handover.handover_type().title_word(),
            self.clothing_type,
            self.crisis_region
        )
    }

    /// Field writes that make up the stored record, in write order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            (FIELD_HANDOVER, self.handover.handover_type().as_str()),
            (FIELD_CLOTHING, self.clothing_type.label()),
            (FIELD_REGION, self.crisis_region.as_str()),
        ];
        if let Some(address) = self.handover.address() {
            fields.push((FIELD_STREET, address.street.as_str()));
            fields.push((FIELD_POSTAL_CODE, address.postal_code.as_str()));
            fields.push((FIELD_CITY, address.city.as_str()));
        }
        fields
    }
}

/// A stored donation. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRecord {
    pub id: i64,
    pub title: String,
    pub handover: Handover,
    pub clothing_type: ClothingType,
    pub crisis_region: String,
    pub created_at: NaiveDateTime,
}

impl DonationRecord {
    pub fn from_new(id: i64, created_at: NaiveDateTime, new: NewDonation) -> Self {
        let title = new.title();
        Self {
            id,
            title,
            handover: new.handover,
            clothing_type: new.clothing_type,
            crisis_region: new.crisis_region,
            created_at,
        }
    }

    /// Decode a stored record; `None` if its fields do not form a donation.
    /// A pickup needs street, city and a 5-digit postal code.
    pub fn from_stored(stored: &StoredRecord) -> Option<Self> {
        let handover = match HandoverType::parse(stored.field(FIELD_HANDOVER))? {
            HandoverType::Office => Handover::Office,
            HandoverType::Pickup => {
                let street = stored.field(FIELD_STREET);
                let postal_code = stored.field(FIELD_POSTAL_CODE);
                let city = stored.field(FIELD_CITY);
                if street.is_empty() || city.is_empty() || !is_postal_code(postal_code) {
                    return None;
                }
                Handover::Pickup(PickupAddress {
                    street: street.to_string(),
                    postal_code: postal_code.to_string(),
                    city: city.to_string(),
                })
            }
        };
        Some(Self {
            id: stored.id,
            title: stored.title.clone(),
            handover,
            clothing_type: ClothingType::parse(stored.field(FIELD_CLOTHING))?,
            crisis_region: stored.field(FIELD_REGION).to_string(),
            created_at: stored.created_at,
        })
    }
}

/// Raw form submission as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DonationForm {
    pub handover_type: String,
    pub clothing_type: String,
    pub crisis_region: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub csrf_token: String,
}

impl DonationForm {
    /// Copy with surrounding whitespace removed from every value.
    pub fn trimmed(&self) -> Self {
        Self {
            handover_type: self.handover_type.trim().to_string(),
            clothing_type: self.clothing_type.trim().to_string(),
            crisis_region: self.crisis_region.trim().to_string(),
            street: self.street.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            city: self.city.trim().to_string(),
            csrf_token: self.csrf_token.trim().to_string(),
        }
    }
}
