//! Static reference data the assistant answers from.
//!
//! The built-in fixture covers a single service area. A host may replace it
//! with a TOML file of the same shape.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PrepwiseError, Result};
use crate::types::{EmergencyContact, Shelter};

/// Everything the response generator draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    /// The one location alerts and shelters are known for.
    pub service_area: String,
    pub search_radius_miles: u32,
    pub fema: FemaGuide,
    pub shelters: Vec<Shelter>,
    pub go_bag: GoBagLists,
    pub contacts: Vec<EmergencyContact>,
}

/// FEMA Individual Assistance reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FemaGuide {
    pub eligibility: Vec<String>,
    pub process: Vec<String>,
    pub assistance_types: Vec<String>,
    pub max_award_usd: u32,
    pub deadline_days: u32,
    pub phone: String,
    pub website: String,
}

/// Go-bag item lists by household role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoBagLists {
    pub base: Vec<String>,
    pub per_adult: Vec<String>,
    pub per_child: Vec<String>,
    pub per_pet: Vec<String>,
    pub image_url: String,
}

impl KnowledgeBase {
    /// Load a knowledge base from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let kb: KnowledgeBase = toml::from_str(&content)
            .map_err(|e| PrepwiseError::KnowledgeBase(e.to_string()))?;
        kb.validate()?;
        info!(
            shelters = kb.shelters.len(),
            "Knowledge base loaded from {}",
            path.display()
        );
        Ok(kb)
    }

    /// Reject data the generator cannot produce a meaningful answer from.
    pub fn validate(&self) -> Result<()> {
        if self.shelters.is_empty() {
            return Err(PrepwiseError::KnowledgeBase(
                "at least one shelter is required".to_string(),
            ));
        }
        if self.go_bag.base.is_empty() {
            return Err(PrepwiseError::KnowledgeBase(
                "go-bag base list cannot be empty".to_string(),
            ));
        }
        if let Some(s) = self
            .shelters
            .iter()
            .find(|s| !s.distance_miles.is_finite() || s.distance_miles < 0.0)
        {
            return Err(PrepwiseError::KnowledgeBase(format!(
                "shelter '{}' has invalid distance {}",
                s.name, s.distance_miles
            )));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            service_area: "Sunnyvale, CA".to_string(),
            search_radius_miles: 50,
            fema: FemaGuide::default(),
            shelters: vec![
                Shelter {
                    name: "Sunnyvale Community Center".to_string(),
                    address: "550 E Remington Dr".to_string(),
                    distance_miles: 1.2,
                    capacity: 500,
                    services: strings(&["Food", "water", "medical"]),
                    phone: "(408) 730-7350".to_string(),
                    lat: 37.3688,
                    lon: -122.0363,
                },
                Shelter {
                    name: "Fremont High School Gymnasium".to_string(),
                    address: "765 W Fremont Ave".to_string(),
                    distance_miles: 2.1,
                    capacity: 800,
                    services: strings(&["Food", "water", "medical", "pet-friendly"]),
                    phone: "(408) 522-8200".to_string(),
                    lat: 37.3541,
                    lon: -122.0443,
                },
                Shelter {
                    name: "Red Cross Emergency Shelter".to_string(),
                    address: "2731 N First St, San Jose".to_string(),
                    distance_miles: 5.3,
                    capacity: 1200,
                    services: strings(&["Food", "water", "medical", "mental health"]),
                    phone: "(408) 577-1000".to_string(),
                    lat: 37.3894,
                    lon: -121.9439,
                },
            ],
            go_bag: GoBagLists::default(),
            contacts: vec![
                EmergencyContact {
                    name: "Emergency".to_string(),
                    number: "911".to_string(),
                    description: "Police, fire, medical".to_string(),
                },
                EmergencyContact {
                    name: "FEMA".to_string(),
                    number: "1-800-621-3362".to_string(),
                    description: "Disaster assistance".to_string(),
                },
                EmergencyContact {
                    name: "Red Cross".to_string(),
                    number: "1-800-733-2767".to_string(),
                    description: "Disaster relief".to_string(),
                },
                EmergencyContact {
                    name: "211".to_string(),
                    number: "Dial 211".to_string(),
                    description: "Community resources".to_string(),
                },
            ],
        }
    }
}

impl Default for FemaGuide {
    fn default() -> Self {
        Self {
            eligibility: strings(&[
                "Disaster must be federally declared",
                "Property is your primary residence",
                "Losses not fully covered by insurance",
                "Valid U.S. citizenship or residency",
            ]),
            process: strings(&[
                "Register online at DisasterAssistance.gov or call 1-800-621-FEMA",
                "Provide damage details and insurance information",
                "FEMA inspector assesses damage within 10 days",
                "Decision made and funds distributed",
            ]),
            assistance_types: strings(&[
                "Home repairs and replacements",
                "Temporary housing",
                "Medical and dental expenses",
                "Personal property replacement",
            ]),
            max_award_usd: 38_000,
            deadline_days: 60,
            phone: "1-800-621-FEMA (3362)".to_string(),
            website: "https://www.disasterassistance.gov".to_string(),
        }
    }
}

impl Default for GoBagLists {
    fn default() -> Self {
        Self {
            base: strings(&[
                "Water (1 gallon per person per day for 3 days)",
                "Non-perishable food (3-day supply)",
                "Battery-powered or hand-crank radio",
                "Flashlight and extra batteries",
                "First aid kit",
                "Medications (7-day supply)",
                "Copies of important documents",
                "Cash and credit cards",
                "Emergency contact list",
                "Phone charger and backup battery",
            ]),
            per_adult: strings(&[
                "Personal medications",
                "Eyeglasses or contacts",
                "Hygiene items",
                "Change of clothes",
                "Sturdy shoes",
            ]),
            per_child: strings(&[
                "Diapers and wipes",
                "Formula and bottles",
                "Comfort items",
                "Snacks",
                "Extra clothing",
            ]),
            per_pet: strings(&[
                "Pet food (3-day supply)",
                "Water bowls",
                "Leash and collar with ID",
                "Pet medications",
                "Carrier or crate",
                "Recent photo",
            ]),
            image_url: "https://images.unsplash.com/photo-1622260614927-2c7ec90445f0?w=800&q=80"
                .to_string(),
        }
    }
}
