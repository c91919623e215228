//! Response generation for classified queries.
//!
//! Builds structured answers from the knowledge base and, for the kit and
//! shelter topics, from the slot values collected so far. When a required
//! slot is missing the answer is a prompt carrying a [`SlotRequest`] instead.

use std::sync::Arc;

use prepwise_core::{Address, GoBagLists, Household, KnowledgeBase};
use serde::{Deserialize, Serialize};

use crate::content::{Content, Item, Section, Tone};
use crate::slots::SlotTracker;
use crate::types::{
    Answer, DisasterKind, MarkerTier, ReasoningStep, ShelterMap, ShelterPin, SlotRequest,
    ToolUse, Topic,
};

// =============================================================================
// Kit checklist
// =============================================================================

/// Who a group of go-bag items is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitRole {
    Everyone,
    Adult,
    Child,
    Pet,
}

/// Items for one role, with how many members of that role there are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitSection {
    pub role: KitRole,
    pub count: u32,
    pub items: Vec<String>,
}

/// A go-bag checklist sized for one household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitChecklist {
    pub household: Household,
    pub total_items: usize,
    /// Base section first, then only roles with a non-zero count.
    pub sections: Vec<KitSection>,
}

impl KitChecklist {
    pub fn build(lists: &GoBagLists, household: &Household) -> Self {
        let total_items = lists.base.len()
            + household.adults as usize * lists.per_adult.len()
            + household.children as usize * lists.per_child.len()
            + household.pets as usize * lists.per_pet.len();

        let mut sections = vec![KitSection {
            role: KitRole::Everyone,
            count: household.people(),
            items: lists.base.clone(),
        }];
        let per_role = [
            (KitRole::Adult, household.adults, &lists.per_adult),
            (KitRole::Child, household.children, &lists.per_child),
            (KitRole::Pet, household.pets, &lists.per_pet),
        ];
        for (role, count, items) in per_role {
            if count > 0 {
                sections.push(KitSection {
                    role,
                    count,
                    items: items.clone(),
                });
            }
        }

        Self {
            household: *household,
            total_items,
            sections,
        }
    }

    pub fn section(&self, role: KitRole) -> Option<&KitSection> {
        self.sections.iter().find(|s| s.role == role)
    }
}

// =============================================================================
// ResponseGenerator
// =============================================================================

/// Generates answers for every topic from a shared knowledge base.
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    knowledge: Arc<KnowledgeBase>,
}

impl ResponseGenerator {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Produce the answer for `topic`.
    ///
    /// Kit and shelter answers are only computed when their slot is present;
    /// otherwise the matching slot request prompt is returned.
    pub fn generate(&self, topic: Topic, query: &str, slots: &SlotTracker) -> Answer {
        let mut reasoning = vec![ReasoningStep::new(
            "Query Analysis",
            format!("Analyzing: '{}'", query),
        )];
        let mut tools_used = Vec::new();
        let mut map = None;
        let mut kit = None;
        let mut slot_request = SlotRequest::None;

        let content = match topic {
            Topic::FemaAssistance => {
                reasoning.push(ReasoningStep::new("Tool Selection", "Accessing FEMA database"));
                tools_used.push(ToolUse::new("FEMA Assistance Database", "Eligibility and process"));
                self.compose_fema()
            }
            Topic::ShelterLookup => match slots.address() {
                Some(address) => {
                    reasoning.push(ReasoningStep::new(
                        "Tool Selection",
                        format!(
                            "Searching {}-mile radius",
                            self.knowledge.search_radius_miles
                        ),
                    ));
                    tools_used.push(ToolUse::new(
                        "Emergency Shelter Database",
                        format!("Near {}", address),
                    ));
                    let (content, shelter_map) = self.compose_shelters(address);
                    map = Some(shelter_map);
                    content
                }
                None => {
                    slot_request = SlotRequest::Address;
                    self.address_prompt()
                }
            },
            Topic::EmergencyKit => match slots.household() {
                Some(household) => {
                    reasoning.push(ReasoningStep::new(
                        "Personalization",
                        "Generating custom checklist",
                    ));
                    tools_used.push(ToolUse::new(
                        "Emergency Kit Generator",
                        format!("Household: {}", household),
                    ));
                    let (content, checklist) = self.compose_kit(household);
                    kit = Some(checklist);
                    content
                }
                None => {
                    slot_request = SlotRequest::Household;
                    self.household_prompt()
                }
            },
            Topic::FamilyPlanning => {
                reasoning.push(ReasoningStep::new("Tool Selection", "Loading planning templates"));
                tools_used.push(ToolUse::new("Emergency Planning Database", "Family plans"));
                compose_planning()
            }
            Topic::AlertStatus => {
                reasoning.push(ReasoningStep::new("Tool Selection", "Checking alert systems"));
                tools_used.push(ToolUse::new("Emergency Alert System", "Current status"));
                self.compose_alerts()
            }
            Topic::DisasterGuide(kind) => compose_disaster(kind),
            Topic::Fallback => self.compose_fallback(),
        };

        Answer {
            topic,
            content,
            slot_request,
            map,
            kit,
            reasoning,
            tools_used,
        }
    }

    /// FEMA eligibility, process, award cap and deadline.
    pub fn compose_fema(&self) -> Content {
        let fema = &self.knowledge.fema;
        Content::new("FEMA Individual Assistance")
            .subtitle("Financial help for disaster-affected homeowners and renters")
            .section(Section::new("Eligibility Requirements", Tone::Info).bullets(&fema.eligibility))
            .section(Section::new("How to Apply", Tone::Success).steps(&fema.process))
            .section(
                Section::new(
                    format!("Available Assistance (Up to {})", format_usd(fema.max_award_usd)),
                    Tone::Success,
                )
                .bullets(&fema.assistance_types),
            )
            .section(Section::new("Important", Tone::Warning).bullets(&[
                format!("Apply within {} days", fema.deadline_days),
                "Document all damage".to_string(),
                "Keep receipts".to_string(),
            ]))
            .section(
                Section::new("Contact", Tone::Info)
                    .item(Item::field("Phone", &fema.phone))
                    .item(Item::link("DisasterAssistance.gov", &fema.website)),
            )
    }

    /// Every known shelter, nearest first, plus the map directive.
    ///
    /// The listing is the fixture for the service area; the address is
    /// echoed back but not geocoded.
    pub fn compose_shelters(&self, address: &Address) -> (Content, ShelterMap) {
        let kb = &self.knowledge;
        let shelter_map = self.shelter_map();

        let mut content = Content::new("Emergency Shelters Found").section(
            Section::new("Search", Tone::Success)
                .item(Item::field("Your Location", address.as_str()))
                .item(Item::field(
                    "Search Radius",
                    format!("{} miles", kb.search_radius_miles),
                ))
                .item(Item::field(
                    "Coverage",
                    format!("Listings for {} (address not geocoded)", kb.service_area),
                )),
        );

        for (idx, pin) in shelter_map.pins.iter().enumerate() {
            let s = &pin.shelter;
            content = content.section(
                Section::new(format!("{}. {}", idx + 1, s.name), Tone::Info)
                    .item(Item::field("Address", &s.address))
                    .item(Item::field("Distance", format_miles(s.distance_miles)))
                    .item(Item::field("Phone", &s.phone))
                    .item(Item::field("Capacity", format!("{} people", s.capacity)))
                    .item(Item::field("Services", s.services.join(", "))),
            );
        }

        let content = content
            .section(Section::new("What to Bring to Shelter", Tone::Warning).bullets(&[
                "Photo ID",
                "Medications",
                "Bedding",
                "Toiletries",
                "Phone charger",
                "Cash",
            ]))
            .section(
                Section::new("Resources", Tone::Info)
                    .item(Item::text("Call 211 for real-time availability"))
                    .item(Item::link(
                        "redcross.org/shelter",
                        "https://www.redcross.org/get-help/disaster-relief-and-recovery-services/find-an-open-shelter.html",
                    )),
            );

        (content, shelter_map)
    }

    /// Shelters sorted by distance with their marker tiers, centered on
    /// the mean of their coordinates.
    pub fn shelter_map(&self) -> ShelterMap {
        let mut shelters = self.knowledge.shelters.clone();
        shelters.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));

        let n = shelters.len().max(1) as f64;
        let center_lat = shelters.iter().map(|s| s.lat).sum::<f64>() / n;
        let center_lon = shelters.iter().map(|s| s.lon).sum::<f64>() / n;

        let pins = shelters
            .into_iter()
            .map(|shelter| ShelterPin {
                tier: MarkerTier::for_distance(shelter.distance_miles),
                shelter,
            })
            .collect();

        ShelterMap {
            center_lat,
            center_lon,
            pins,
        }
    }

    /// Personalized go-bag checklist, as content and as data. Roles with a
    /// zero count are omitted.
    pub fn compose_kit(&self, household: &Household) -> (Content, KitChecklist) {
        let go_bag = &self.knowledge.go_bag;
        let checklist = KitChecklist::build(go_bag, household);

        let mut content = Content::new("Your Personalized Emergency Kit")
            .section(
                Section::new("Household", Tone::Success)
                    .item(Item::field("Household", household.to_string()))
                    .item(Item::field(
                        "Total Items",
                        format!("{} items", checklist.total_items),
                    )),
            )
            .section(
                Section::new("Example Go-Bag", Tone::Info).item(Item::image(
                    &go_bag.image_url,
                    "Example of a well-organized emergency go-bag",
                )),
            );

        for section in &checklist.sections {
            content = content.section(match section.role {
                KitRole::Everyone => {
                    Section::new("Base Essentials (Everyone)", Tone::Info).steps(&section.items)
                }
                KitRole::Adult => Section::new(format!("For {} Adult(s)", section.count), Tone::Success)
                    .bullets(&section.items),
                KitRole::Child => Section::new(format!("For {} Child(ren)", section.count), Tone::Success)
                    .bullets(&section.items),
                KitRole::Pet => Section::new(format!("For {} Pet(s)", section.count), Tone::Success)
                    .bullets(&section.items),
            });
        }

        let content = content
            .section(Section::new("Pro Tips", Tone::Warning).bullets(&[
                "Store near exit",
                "Check every 6 months",
                "Keep lightweight",
                "Use waterproof containers",
            ]))
            .section(
                Section::new("Resources", Tone::Info)
                    .item(Item::link("Download Checklist", "https://www.ready.gov/kit")),
            );
        (content, checklist)
    }

    /// Static alert status for the single supported location.
    pub fn compose_alerts(&self) -> Content {
        Content::new("Emergency Alert Status")
            .section(
                Section::new("Current Status", Tone::Success)
                    .item(Item::field("Location", &self.knowledge.service_area))
                    .item(Item::field("Status", "No Active Alerts"))
                    .item(Item::field("Risk Level", "Low")),
            )
            .section(
                Section::new("Sign Up for Alerts", Tone::Info)
                    .item(Item::field(
                        "Wireless Emergency Alerts (WEA)",
                        "Automatic on all phones",
                    ))
                    .item(Item::link("Local System", "https://alertscc.org"))
                    .item(Item::link("NOAA Weather Radio", "https://www.weather.gov"))
                    .item(Item::field("FEMA App", "Download for notifications")),
            )
            .section(Section::new("What to Do During Alert", Tone::Info).steps(&[
                "Follow official instructions immediately",
                "Check on neighbors",
                "Have go-bag ready",
                "Monitor official channels",
            ]))
    }

    pub fn compose_fallback(&self) -> Content {
        let contacts = self.knowledge.contacts.iter().map(|c| {
            Item::field(
                c.name.as_str(),
                format!("{} ({})", c.number, c.description),
            )
        });

        Content::new("How Can I Help?")
            .subtitle("Choose a service from the menu or ask me about emergency preparedness topics.")
            .section(Section::new("I can help with", Tone::Info).bullets(&[
                "FEMA assistance and how to apply",
                "Finding emergency shelters",
                "Building a personalized emergency kit",
                "Family emergency planning",
                "Current alerts",
                "Earthquake, fire and flood guides",
            ]))
            .section(Section::new("Emergency Contacts", Tone::Warning).items(contacts))
    }

    fn address_prompt(&self) -> Content {
        Content::new("Find Emergency Shelters")
            .subtitle(format!(
                "Locate safe havens within {} miles of your location",
                self.knowledge.search_radius_miles
            ))
            .section(Section::new("Your Location", Tone::Info).item(Item::text(
                "Enter your address or ZIP code below to see all available emergency shelters on an interactive map.",
            )))
    }

    fn household_prompt(&self) -> Content {
        Content::new("Build Your Emergency Kit")
            .subtitle("Personalized checklist for your household")
            .section(
                Section::new("Emergency Go-Bag", Tone::Info).item(Item::image(
                    &self.knowledge.go_bag.image_url,
                    "A well-stocked emergency go-bag ready for any situation",
                )),
            )
            .section(Section::new("Tell us about your household", Tone::Info).item(Item::text(
                "Enter the number of adults, children, and pets below to get a customized emergency kit checklist.",
            )))
    }
}

// =============================================================================
// Static content
// =============================================================================

fn compose_planning() -> Content {
    Content::new("Family Emergency Plan")
        .subtitle("Create a comprehensive communication and response strategy")
        .section(Section::new("Communication Plan", Tone::Info).bullets(&[
            "Designate out-of-state contact person",
            "Share contact list with all family members",
            "Establish text messaging protocols",
            "Document everyone's work/school info",
        ]))
        .section(
            Section::new("Meeting Locations", Tone::Success)
                .item(Item::field(
                    "Primary",
                    "Near home (neighbor's house, nearby landmark)",
                ))
                .item(Item::field(
                    "Secondary",
                    "Outside neighborhood (library, community center)",
                )),
        )
        .section(
            Section::new("Practice Drills", Tone::Success)
                .item(Item::field("Home evacuation", "Quarterly"))
                .item(Item::field("Earthquake drill", "Twice yearly"))
                .item(Item::field("Fire escape", "Monthly review")),
        )
        .section(Section::new("Important Documents", Tone::Warning).bullets(&[
            "Insurance",
            "Medical records",
            "IDs",
            "Financial documents",
            "Property deeds",
        ]))
        .section(
            Section::new("Resources", Tone::Info)
                .item(Item::link("Ready.gov/plan", "https://www.ready.gov/plan")),
        )
}

const EARTHQUAKE_ACTIONS: &[&str] = &[
    "Get under sturdy furniture",
    "Stay away from windows",
    "If outdoors, move to open area",
];

const FIRE_ACTIONS: &[&str] = &[
    "Exit immediately",
    "Crawl under smoke",
    "Feel doors before opening",
    "Never use elevators",
];

const FLOOD_ACTIONS: &[&str] = &[
    "Never drive through water",
    "6 inches of moving water can knock you down",
    "12 inches can move a car",
    "Avoid floodwaters",
];

/// Headline and actions for the immediate-action block of each disaster kind.
fn immediate_actions(kind: DisasterKind) -> (&'static str, &'static [&'static str]) {
    match kind {
        DisasterKind::Earthquake => ("Drop, Cover, Hold On", EARTHQUAKE_ACTIONS),
        DisasterKind::Fire => ("Get Out, Stay Out", FIRE_ACTIONS),
        DisasterKind::Flood => ("Move to Higher Ground", FLOOD_ACTIONS),
    }
}

fn compose_disaster(kind: DisasterKind) -> Content {
    let (headline, actions) = immediate_actions(kind);
    Content::new(format!("{} Preparedness", kind.title()))
        .subtitle("Essential safety information")
        .section(
            Section::new("Immediate Actions", Tone::Warning)
                .item(Item::text(headline))
                .bullets(actions),
        )
        .section(Section::new("Before Disaster", Tone::Info).bullets(&[
            "Secure furniture and appliances",
            "Know utility shut-offs",
            "Maintain emergency supplies",
            "Practice safety drills",
        ]))
        .section(Section::new("After the Disaster", Tone::Info).bullets(&[
            "Check for injuries",
            "Inspect for damage",
            "Avoid hazard areas",
            "Document losses",
            "Contact FEMA if needed",
        ]))
        .section(Section::new("Learn More", Tone::Info).item(Item::link(
            format!("Ready.gov/{}", kind.as_str()),
            format!("https://www.ready.gov/{}", kind.as_str()),
        )))
}

// =============================================================================
// Helpers
// =============================================================================

/// `38000` -> `$38,000`.
fn format_usd(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${}", out)
}

fn format_miles(miles: f64) -> String {
    format!("{:.1} miles", miles)
}

// =============================================================================
// Tests
// =============================================================================
