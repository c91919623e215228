use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Household
// =============================================================================

/// Household composition collected by the emergency-kit form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Household {
    pub adults: u32,
    pub children: u32,
    pub pets: u32,
}

impl Household {
    /// Largest count accepted for any single household field.
    pub const MAX_PER_FIELD: u32 = 20;

    pub fn new(adults: u32, children: u32, pets: u32) -> Self {
        Self {
            adults,
            children,
            pets,
        }
    }

    /// Number of people (adults and children) in the household.
    pub fn people(&self) -> u32 {
        self.adults + self.children
    }

    /// First field outside `0..=MAX_PER_FIELD`, as `(field, value)`.
    pub fn out_of_range_field(&self) -> Option<(&'static str, u32)> {
        [
            ("adults", self.adults),
            ("children", self.children),
            ("pets", self.pets),
        ]
        .into_iter()
        .find(|(_, value)| *value > Self::MAX_PER_FIELD)
    }
}

impl fmt::Display for Household {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} adults, {} children, {} pets",
            self.adults, self.children, self.pets
        )
    }
}

// =============================================================================
// Address
// =============================================================================

/// Free-text location entered by the user. Never blank, stored trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse user input into an address. Returns `None` for blank input.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Reference records
// =============================================================================

/// An emergency shelter listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    pub name: String,
    pub address: String,
    /// Distance from the service area reference point, in miles.
    pub distance_miles: f64,
    /// Capacity in people.
    pub capacity: u32,
    pub services: Vec<String>,
    pub phone: String,
    pub lat: f64,
    pub lon: f64,
}

/// A phone contact shown alongside general guidance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
    pub description: String,
}
