//! Rule-based dialogue engine for PrepWise.
//!
//! Classifies emergency-preparedness questions into topics, tracks the
//! household and address slots a conversation collects, and composes
//! structured answers from the knowledge base.

pub mod classifier;
pub mod content;
pub mod error;
pub mod log;
pub mod orchestrator;
pub mod response;
pub mod slots;
pub mod types;

pub use classifier::IntentClassifier;
pub use content::{Content, Item, Section, Tone};
pub use error::ChatError;
pub use log::ConversationLog;
pub use orchestrator::{canned_query, QuickAction, Session, TurnState, QUICK_ACTIONS};
pub use response::{KitChecklist, KitRole, KitSection, ResponseGenerator};
pub use slots::SlotTracker;
pub use types::{
    Answer, DisasterKind, MarkerTier, ReasoningStep, Role, ShelterMap, ShelterPin, SlotRequest,
    ToolUse, Topic, TopicKind, Turn, TurnBody,
};
