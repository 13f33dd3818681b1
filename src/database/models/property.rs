use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_blank, ValidationErrors};

pub const MAX_IMAGES: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

/// Rental rates. Serialized as JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub nightly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub weekly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monthly: Option<Decimal>,
}

impl Rates {
    fn values(&self) -> impl Iterator<Item = (&'static str, Decimal)> + '_ {
        [("nightly", self.nightly), ("weekly", self.weekly), ("monthly", self.monthly)]
            .into_iter()
            .filter_map(|(name, rate)| rate.map(|r| (name, r)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub property_type: String,
    pub description: Option<String>,
    pub location: Location,
    pub beds: i32,
    pub baths: i32,
    pub square_feet: i32,
    pub amenities: Vec<String>,
    pub rates: Rates,
    pub seller_info: SellerInfo,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn matches(&self, search: &PropertySearch) -> bool {
        if let Some(kind) = search.property_type() {
            if !self.property_type.to_lowercase().contains(&kind.to_lowercase()) {
                return false;
            }
        }

        let Some(needle) = search.location() else {
            return true;
        };
        let needle = needle.to_lowercase();
        [
            Some(self.name.as_str()),
            self.description.as_deref(),
            Some(self.location.street.as_str()),
            Some(self.location.city.as_str()),
            Some(self.location.state.as_str()),
            Some(self.location.zipcode.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Body of a property create or full update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyInput {
    pub name: String,
    pub property_type: String,
    pub description: Option<String>,
    pub location: Location,
    pub beds: i32,
    pub baths: i32,
    pub square_feet: i32,
    pub amenities: Vec<String>,
    pub rates: Rates,
    pub seller_info: SellerInfo,
    pub images: Vec<String>,
    pub is_featured: bool,
}

impl PropertyInput {
    /// Trim text fields and drop blank amenities and images.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.property_type = self.property_type.trim().to_string();
        self.description = non_blank(self.description);
        self.amenities = self
            .amenities
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        self.images = self
            .images
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.push("name is required");
        }
        if self.property_type.trim().is_empty() {
            errors.push("propertyType is required");
        }
        if self.location.city.trim().is_empty() {
            errors.push("location.city is required");
        }
        if self.location.state.trim().is_empty() {
            errors.push("location.state is required");
        }
        for (field, value) in [("beds", self.beds), ("baths", self.baths), ("squareFeet", self.square_feet)] {
            if value < 0 {
                errors.push(format!("{} must not be negative", field));
            }
        }

        let mut any_rate = false;
        for (name, rate) in self.rates.values() {
            any_rate = true;
            if rate.is_sign_negative() {
                errors.push(format!("rates.{} must not be negative", name));
            }
        }
        if !any_rate {
            errors.push("at least one rate is required");
        }

        if self.images.len() > MAX_IMAGES {
            errors.push(format!("at most {} images are allowed", MAX_IMAGES));
        }

        errors.into_result()
    }
}

/// Free-text search over listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearch {
    pub location: Option<String>,
    pub property_type: Option<String>,
}

impl PropertySearch {
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    /// `None` when absent or `All`.
    pub fn property_type(&self) -> Option<&str> {
        self.property_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn cottage() -> Property {
        let now = Utc::now();
        Property {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            name: "Lakeside Cottage".into(),
            property_type: "Cottage".into(),
            description: Some("Quiet retreat near the water".into()),
            location: Location {
                street: "12 Shore Rd".into(),
                city: "Burlington".into(),
                state: "VT".into(),
                zipcode: "05401".into(),
            },
            beds: 2,
            baths: 1,
            square_feet: 900,
            amenities: vec!["Wifi".into()],
            rates: Rates { nightly: Some(dec(150)), ..Rates::default() },
            seller_info: SellerInfo::default(),
            images: vec![],
            is_featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn search_matches_location_fields_case_insensitively() {
        let property = cottage();
        let search = PropertySearch { location: Some("burlington".into()), property_type: None };
        assert!(property.matches(&search));

        let search = PropertySearch { location: Some("Boston".into()), property_type: None };
        assert!(!property.matches(&search));
    }

    #[test]
    fn property_type_all_matches_everything() {
        let property = cottage();
        let search = PropertySearch { location: None, property_type: Some("All".into()) };
        assert!(property.matches(&search));

        let search = PropertySearch { location: None, property_type: Some("Apartment".into()) };
        assert!(!property.matches(&search));
    }

    #[test]
    fn input_requires_a_rate_and_caps_images() {
        let input = PropertyInput {
            name: "Loft".into(),
            property_type: "Apartment".into(),
            location: Location { city: "Austin".into(), state: "TX".into(), ..Location::default() },
            images: (0..5).map(|i| format!("https://img.example.com/{}.jpg", i)).collect(),
            ..PropertyInput::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.messages().iter().any(|m| m == "at least one rate is required"));
        assert!(errors.messages().iter().any(|m| m.starts_with("at most 4 images")));
    }

    #[test]
    fn negative_rates_are_rejected() {
        let input = PropertyInput {
            name: "Loft".into(),
            property_type: "Apartment".into(),
            location: Location { city: "Austin".into(), state: "TX".into(), ..Location::default() },
            rates: Rates { monthly: Some(dec(-10)), ..Rates::default() },
            ..PropertyInput::default()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.messages(), ["rates.monthly must not be negative".to_string()]);
    }

    #[test]
    fn rates_serialize_as_numbers() {
        let rates = Rates { weekly: Some(dec(700)), ..Rates::default() };
        let json = serde_json::to_value(&rates).unwrap();
        assert_eq!(json["weekly"], serde_json::json!(700.0));
        assert!(json["nightly"].is_null());
    }
}
