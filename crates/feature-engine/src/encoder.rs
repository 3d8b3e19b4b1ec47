//! Categorical Label Encoding
//!
//! Each categorical form field accepts a closed set of labels. Labels map to
//! the integer codes used when the classifier was trained; anything outside
//! the set is rejected.

use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Passenger gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Every accepted value, in code order
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// Form label
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }

    /// Training code
    pub fn code(&self) -> u8 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }
}

impl FromStr for Gender {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Female" => Ok(Gender::Female),
            "Male" => Ok(Gender::Male),
            other => Err(FeatureError::InvalidCategory {
                field: "gender",
                label: other.to_string(),
            }),
        }
    }
}

/// Customer loyalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerType {
    Loyal,
    Disloyal,
}

impl CustomerType {
    /// Every accepted value, in code order
    pub const ALL: [CustomerType; 2] = [CustomerType::Loyal, CustomerType::Disloyal];

    /// Form label
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Loyal => "Loyal Customer",
            CustomerType::Disloyal => "Disloyal Customer",
        }
    }

    /// Training code. Disloyal is 1, matching the fitted artifacts.
    pub fn code(&self) -> u8 {
        match self {
            CustomerType::Loyal => 0,
            CustomerType::Disloyal => 1,
        }
    }
}

impl FromStr for CustomerType {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Loyal Customer" => Ok(CustomerType::Loyal),
            "Disloyal Customer" => Ok(CustomerType::Disloyal),
            other => Err(FeatureError::InvalidCategory {
                field: "customer_type",
                label: other.to_string(),
            }),
        }
    }
}

/// Purpose of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelType {
    Business,
    Personal,
}

impl TravelType {
    /// Every accepted value, in code order
    pub const ALL: [TravelType; 2] = [TravelType::Business, TravelType::Personal];

    /// Form label
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelType::Business => "Business travel",
            TravelType::Personal => "Personal Travel",
        }
    }

    /// Training code. Personal is 1, matching the fitted artifacts.
    pub fn code(&self) -> u8 {
        match self {
            TravelType::Business => 0,
            TravelType::Personal => 1,
        }
    }
}

impl FromStr for TravelType {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Business travel" => Ok(TravelType::Business),
            "Personal Travel" => Ok(TravelType::Personal),
            other => Err(FeatureError::InvalidCategory {
                field: "travel_type",
                label: other.to_string(),
            }),
        }
    }
}

/// Cabin class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelClass {
    Eco,
    EcoPlus,
    Business,
}

impl TravelClass {
    /// Every accepted value, in code order
    pub const ALL: [TravelClass; 3] = [TravelClass::Eco, TravelClass::EcoPlus, TravelClass::Business];

    /// Form label
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Eco => "Eco",
            TravelClass::EcoPlus => "Eco Plus",
            TravelClass::Business => "Business",
        }
    }

    /// Training code
    pub fn code(&self) -> u8 {
        match self {
            TravelClass::Eco => 0,
            TravelClass::EcoPlus => 1,
            TravelClass::Business => 2,
        }
    }
}

impl FromStr for TravelClass {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Eco" => Ok(TravelClass::Eco),
            "Eco Plus" => Ok(TravelClass::EcoPlus),
            "Business" => Ok(TravelClass::Business),
            other => Err(FeatureError::InvalidCategory {
                field: "travel_class",
                label: other.to_string(),
            }),
        }
    }
}

/// Label-to-code lookup for the four categorical fields
pub struct CategoryEncoder;

impl CategoryEncoder {
    pub fn encode_gender(label: &str) -> Result<u8, FeatureError> {
        label.parse::<Gender>().map(|g| g.code())
    }

    pub fn encode_customer_type(label: &str) -> Result<u8, FeatureError> {
        label.parse::<CustomerType>().map(|c| c.code())
    }

    pub fn encode_travel_type(label: &str) -> Result<u8, FeatureError> {
        label.parse::<TravelType>().map(|t| t.code())
    }

    pub fn encode_travel_class(label: &str) -> Result<u8, FeatureError> {
        label.parse::<TravelClass>().map(|c| c.code())
    }

    /// Accepted labels per field, for rendering select inputs
    pub fn closed_sets() -> [(&'static str, Vec<&'static str>); 4] {
        [
            ("gender", Gender::ALL.iter().map(Gender::as_str).collect()),
            ("customer_type", CustomerType::ALL.iter().map(CustomerType::as_str).collect()),
            ("travel_type", TravelType::ALL.iter().map(TravelType::as_str).collect()),
            ("travel_class", TravelClass::ALL.iter().map(TravelClass::as_str).collect()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_documented_codes() {
        assert_eq!(CategoryEncoder::encode_gender("Female"), Ok(0));
        assert_eq!(CategoryEncoder::encode_gender("Male"), Ok(1));
        assert_eq!(CategoryEncoder::encode_customer_type("Loyal Customer"), Ok(0));
        assert_eq!(CategoryEncoder::encode_customer_type("Disloyal Customer"), Ok(1));
        assert_eq!(CategoryEncoder::encode_travel_type("Business travel"), Ok(0));
        assert_eq!(CategoryEncoder::encode_travel_type("Personal Travel"), Ok(1));
        assert_eq!(CategoryEncoder::encode_travel_class("Eco"), Ok(0));
        assert_eq!(CategoryEncoder::encode_travel_class("Eco Plus"), Ok(1));
        assert_eq!(CategoryEncoder::encode_travel_class("Business"), Ok(2));
    }

    #[test]
    fn test_unknown_class_rejected() {
        let err = CategoryEncoder::encode_travel_class("First").unwrap_err();
        assert_eq!(
            err,
            FeatureError::InvalidCategory {
                field: "travel_class",
                label: "First".to_string(),
            }
        );
    }

    #[test]
    fn test_matching_is_exact() {
        assert!(CategoryEncoder::encode_gender("female").is_err());
        assert!(CategoryEncoder::encode_gender(" Male").is_err());
        assert!(CategoryEncoder::encode_travel_type("Business Travel").is_err());
        assert!(CategoryEncoder::encode_customer_type("").is_err());
    }

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for class in TravelClass::ALL {
            assert_eq!(class.as_str().parse::<TravelClass>(), Ok(class));
        }
        for customer in CustomerType::ALL {
            assert_eq!(customer.as_str().parse::<CustomerType>(), Ok(customer));
        }
    }

    #[test]
    fn test_closed_sets_in_code_order() {
        let sets = CategoryEncoder::closed_sets();
        assert_eq!(sets[3].0, "travel_class");
        assert_eq!(sets[3].1, vec!["Eco", "Eco Plus", "Business"]);
        assert_eq!(sets[1].1, vec!["Loyal Customer", "Disloyal Customer"]);
    }

    proptest! {
        #[test]
        fn prop_labels_outside_set_rejected(label in "\\PC{0,20}") {
            prop_assume!(!["Eco", "Eco Plus", "Business"].contains(&label.as_str()));
            let rejected = matches!(
                CategoryEncoder::encode_travel_class(&label),
                Err(FeatureError::InvalidCategory { field: "travel_class", .. })
            );
            prop_assert!(rejected);
        }
    }
}
