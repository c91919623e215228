//! Shared types for the dialogue engine.

use std::fmt;
use std::str::FromStr;

use prepwise_core::Shelter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::Content;
use crate::error::ChatError;
use crate::response::KitChecklist;

// =============================================================================
// Topics
// =============================================================================

/// Which immediate-action guide a disaster query gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisasterKind {
    #[default]
    Earthquake,
    Fire,
    Flood,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 3] = [
        DisasterKind::Earthquake,
        DisasterKind::Fire,
        DisasterKind::Flood,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Fire => "fire",
            DisasterKind::Flood => "flood",
        }
    }

    /// Capitalized name for headings.
    pub fn title(&self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "Earthquake",
            DisasterKind::Fire => "Fire",
            DisasterKind::Flood => "Flood",
        }
    }
}

/// Topic family without the disaster sub-kind. Used by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    FemaAssistance,
    ShelterLookup,
    EmergencyKit,
    FamilyPlanning,
    AlertStatus,
    DisasterGuide,
    Fallback,
}

impl TopicKind {
    pub const ALL: [TopicKind; 7] = [
        TopicKind::FemaAssistance,
        TopicKind::ShelterLookup,
        TopicKind::EmergencyKit,
        TopicKind::FamilyPlanning,
        TopicKind::AlertStatus,
        TopicKind::DisasterGuide,
        TopicKind::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKind::FemaAssistance => "fema_assistance",
            TopicKind::ShelterLookup => "shelter_lookup",
            TopicKind::EmergencyKit => "emergency_kit",
            TopicKind::FamilyPlanning => "family_planning",
            TopicKind::AlertStatus => "alert_status",
            TopicKind::DisasterGuide => "disaster_guide",
            TopicKind::Fallback => "fallback",
        }
    }
}

/// The classified category of one user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    FemaAssistance,
    ShelterLookup,
    EmergencyKit,
    FamilyPlanning,
    AlertStatus,
    DisasterGuide(DisasterKind),
    Fallback,
}

impl Topic {
    pub fn kind(&self) -> TopicKind {
        match self {
            Topic::FemaAssistance => TopicKind::FemaAssistance,
            Topic::ShelterLookup => TopicKind::ShelterLookup,
            Topic::EmergencyKit => TopicKind::EmergencyKit,
            Topic::FamilyPlanning => TopicKind::FamilyPlanning,
            Topic::AlertStatus => TopicKind::AlertStatus,
            Topic::DisasterGuide(_) => TopicKind::DisasterGuide,
            Topic::Fallback => TopicKind::Fallback,
        }
    }

    /// Build a topic from its family; disaster guides take the given kind.
    pub fn from_kind(kind: TopicKind, disaster: DisasterKind) -> Self {
        match kind {
            TopicKind::FemaAssistance => Topic::FemaAssistance,
            TopicKind::ShelterLookup => Topic::ShelterLookup,
            TopicKind::EmergencyKit => Topic::EmergencyKit,
            TopicKind::FamilyPlanning => Topic::FamilyPlanning,
            TopicKind::AlertStatus => Topic::AlertStatus,
            TopicKind::DisasterGuide => Topic::DisasterGuide(disaster),
            TopicKind::Fallback => Topic::Fallback,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::DisasterGuide(kind) => write!(f, "disaster_guide:{}", kind.as_str()),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

impl FromStr for Topic {
    type Err = ChatError;

    /// Parse `fema_assistance`, `disaster_guide`, `disaster_guide:flood`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let (family, sub) = match name.split_once(':') {
            Some((family, sub)) => (family, Some(sub)),
            None => (name.as_str(), None),
        };

        let kind = TopicKind::ALL
            .into_iter()
            .find(|k| k.as_str() == family)
            .ok_or_else(|| ChatError::UnknownTopic(s.to_string()))?;

        let disaster = match (kind, sub) {
            (_, None) => DisasterKind::default(),
            (TopicKind::DisasterGuide, Some(sub)) => DisasterKind::ALL
                .into_iter()
                .find(|d| d.as_str() == sub)
                .ok_or_else(|| ChatError::UnknownTopic(s.to_string()))?,
            (_, Some(_)) => return Err(ChatError::UnknownTopic(s.to_string())),
        };

        Ok(Topic::from_kind(kind, disaster))
    }
}

// =============================================================================
// Slot requests and map directives
// =============================================================================

/// Which form the front end should show next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRequest {
    #[default]
    None,
    Household,
    Address,
}

impl SlotRequest {
    pub fn is_pending(&self) -> bool {
        !matches!(self, SlotRequest::None)
    }
}

/// Highlight level of a shelter marker, by distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerTier {
    /// Under 2 miles.
    Near,
    /// From 2 up to (not including) 4 miles.
    Mid,
    /// 4 miles and beyond.
    Far,
}

impl MarkerTier {
    pub fn for_distance(miles: f64) -> Self {
        if miles < 2.0 {
            MarkerTier::Near
        } else if miles < 4.0 {
            MarkerTier::Mid
        } else {
            MarkerTier::Far
        }
    }
}

/// One shelter to plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterPin {
    pub shelter: Shelter,
    pub tier: MarkerTier,
}

/// Instructs the front end to render a shelter map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterMap {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Sorted nearest first.
    pub pins: Vec<ShelterPin>,
}

// =============================================================================
// Agent trace
// =============================================================================

/// One step of the assistant's visible reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step: String,
    pub thought: String,
}

impl ReasoningStep {
    pub fn new(step: impl Into<String>, thought: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            thought: thought.into(),
        }
    }
}

/// A knowledge source consulted while answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUse {
    pub tool: String,
    pub query: String,
}

impl ToolUse {
    pub fn new(tool: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            query: query.into(),
        }
    }
}

// =============================================================================
// Answers and turns
// =============================================================================

/// Output of the response generator for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub topic: Topic,
    pub content: Content,
    pub slot_request: SlotRequest,
    pub map: Option<ShelterMap>,
    /// The sized checklist behind a personalized kit answer.
    pub kit: Option<KitChecklist>,
    pub reasoning: Vec<ReasoningStep>,
    pub tools_used: Vec<ToolUse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// What a turn says: the user's raw text or the assistant's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnBody {
    Query { text: String },
    Answer { content: Content },
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub role: Role,
    pub body: TurnBody,
    /// Epoch seconds.
    pub timestamp: i64,
    pub topic: Option<Topic>,
    pub slot_request: SlotRequest,
    pub map: Option<ShelterMap>,
    pub kit: Option<KitChecklist>,
    pub reasoning: Vec<ReasoningStep>,
    pub tools_used: Vec<ToolUse>,
}

impl Turn {
    pub fn user(text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            body: TurnBody::Query { text: text.into() },
            timestamp,
            topic: None,
            slot_request: SlotRequest::None,
            map: None,
            kit: None,
            reasoning: Vec::new(),
            tools_used: Vec::new(),
        }
    }

    pub fn assistant(answer: Answer, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            body: TurnBody::Answer {
                content: answer.content,
            },
            timestamp,
            topic: Some(answer.topic),
            slot_request: answer.slot_request,
            map: answer.map,
            kit: answer.kit,
            reasoning: answer.reasoning,
            tools_used: answer.tools_used,
        }
    }

    /// The user's query text, for user turns.
    pub fn query_text(&self) -> Option<&str> {
        match self.body {
            TurnBody::Query { ref text } => Some(text),
            TurnBody::Answer { .. } => None,
        }
    }

    /// The structured content, for assistant turns.
    pub fn content(&self) -> Option<&Content> {
        match self.body {
            TurnBody::Answer { ref content } => Some(content),
            TurnBody::Query { .. } => None,
        }
    }

    /// Whether the front end should draw a shelter map under this turn.
    pub fn render_map(&self) -> bool {
        self.map.is_some()
    }
}
