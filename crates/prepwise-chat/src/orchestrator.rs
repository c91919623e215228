//! Session orchestrator: one conversation's turn state machine.
//!
//! A turn is accepted with [`Session::submit_query`] (or one of the slot
//! form submissions) and answered by [`Session::resolve`]. Between the two the
//! session is busy and refuses new input.

use std::sync::Arc;

use chrono::Local;
use prepwise_core::config::ChatConfig;
use prepwise_core::{Address, Household, KnowledgeBase};
use uuid::Uuid;

use crate::classifier::IntentClassifier;
use crate::error::ChatError;
use crate::log::ConversationLog;
use crate::response::ResponseGenerator;
use crate::slots::SlotTracker;
use crate::types::{DisasterKind, SlotRequest, Topic, Turn};

// =============================================================================
// Quick actions
// =============================================================================

/// A menu shortcut that submits a canned query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub description: &'static str,
    pub query: &'static str,
}

/// The service menu, in display order.
pub static QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "FEMA Assistance",
        description: "Financial aid and applications",
        query: "How do I apply for FEMA assistance?",
    },
    QuickAction {
        label: "Emergency Kits",
        description: "Personalized go-bag checklists",
        query: "Help me build an emergency kit",
    },
    QuickAction {
        label: "Shelter Locations",
        description: "Find nearby safe havens",
        query: "Find emergency shelters near me",
    },
    QuickAction {
        label: "Emergency Planning",
        description: "Family communication plans",
        query: "Help me create an emergency plan",
    },
    QuickAction {
        label: "Alert System",
        description: "Current warnings and notifications",
        query: "What are the current emergency alerts?",
    },
    QuickAction {
        label: "Disaster Guides",
        description: "Earthquake, fire, flood safety",
        query: "What should I do in an earthquake?",
    },
];

/// A query that classifies back to `topic`.
pub fn canned_query(topic: Topic) -> &'static str {
    match topic {
        Topic::FemaAssistance => QUICK_ACTIONS[0].query,
        Topic::EmergencyKit => QUICK_ACTIONS[1].query,
        Topic::ShelterLookup => QUICK_ACTIONS[2].query,
        Topic::FamilyPlanning => QUICK_ACTIONS[3].query,
        Topic::AlertStatus => QUICK_ACTIONS[4].query,
        Topic::DisasterGuide(DisasterKind::Earthquake) => QUICK_ACTIONS[5].query,
        Topic::DisasterGuide(DisasterKind::Fire) => "What should I do in a fire?",
        Topic::DisasterGuide(DisasterKind::Flood) => "What should I do in a flood?",
        Topic::Fallback => "What can you help me with?",
    }
}

// =============================================================================
// Session
// =============================================================================

/// Whether a turn is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnState {
    #[default]
    Idle,
    Thinking,
}

/// One conversation: its slots, its log and its turn state.
///
/// Sessions share nothing but the read-only knowledge base; a host serving
/// several users creates one per conversation.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: i64,
    state: TurnState,
    slots: SlotTracker,
    log: ConversationLog,
    classifier: IntentClassifier,
    generator: ResponseGenerator,
    config: ChatConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ChatConfig::default(), Arc::new(KnowledgeBase::default()))
    }
}

impl Session {
    pub fn new(config: ChatConfig, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now().timestamp(),
            state: TurnState::Idle,
            slots: SlotTracker::new(),
            log: ConversationLog::new(),
            classifier: IntentClassifier::new(),
            generator: ResponseGenerator::new(knowledge),
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// True while a submitted query awaits [`Session::resolve`].
    pub fn busy(&self) -> bool {
        self.state == TurnState::Thinking
    }

    pub fn slots(&self) -> &SlotTracker {
        &self.slots
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn history(&self) -> &[Turn] {
        self.log.turns()
    }

    /// Which form the front end should show next.
    pub fn pending_slot_request(&self) -> SlotRequest {
        self.log.pending_slot_request()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        self.generator.knowledge()
    }

    // -----------------------------------------------------------------
    // Turn lifecycle
    // -----------------------------------------------------------------

    /// Accept a user query: `Idle -> Thinking`, appending the user turn.
    pub fn submit_query(&mut self, text: &str) -> Result<(), ChatError> {
        self.check_accepting()?;
        self.check_query(text)?;
        self.begin_turn(text);
        Ok(())
    }

    /// Answer the pending query: `Thinking -> Idle`, appending and returning
    /// the assistant turn.
    pub fn resolve(&mut self) -> Result<Turn, ChatError> {
        if !self.busy() {
            return Err(ChatError::NotThinking);
        }
        let query = self
            .log
            .last_query()
            .ok_or(ChatError::NotThinking)?
            .to_string();

        let topic = self.classifier.classify(&query);
        let answer = self.generator.generate(topic, &query, &self.slots);
        tracing::debug!(
            session = %self.id,
            %topic,
            slot_request = ?answer.slot_request,
            "Resolved query"
        );

        let turn = self
            .log
            .push(Turn::assistant(answer, Local::now().timestamp()))
            .clone();
        self.state = TurnState::Idle;
        Ok(turn)
    }

    /// Submit and resolve in one call.
    pub fn ask(&mut self, text: &str) -> Result<Turn, ChatError> {
        self.submit_query(text)?;
        self.resolve()
    }

    /// Run the canned query for a topic given by name, e.g. `shelter_lookup`
    /// or `disaster_guide:fire`.
    pub fn ask_topic(&mut self, name: &str) -> Result<Turn, ChatError> {
        let topic: Topic = name.parse()?;
        self.ask(canned_query(topic))
    }

    // -----------------------------------------------------------------
    // Slot forms
    // -----------------------------------------------------------------

    /// Store the household form and submit the matching kit query.
    ///
    /// Nothing changes if any count is outside `0..=20`.
    pub fn submit_household(
        &mut self,
        adults: u32,
        children: u32,
        pets: u32,
    ) -> Result<(), ChatError> {
        self.check_accepting()?;
        let household = Household::new(adults, children, pets);
        let query = format!(
            "Create kit for {} adults, {} children, {} pets",
            household.adults, household.children, household.pets
        );
        self.check_query(&query)?;
        self.slots.set_household(household)?;
        self.begin_turn(&query);
        Ok(())
    }

    /// Store the address form and submit the matching shelter query.
    pub fn submit_address(&mut self, text: &str) -> Result<(), ChatError> {
        self.check_accepting()?;
        let address = Address::parse(text).ok_or(ChatError::EmptyAddress)?;
        let query = format!("Find shelters near {}", address);
        self.check_query(&query)?;
        self.slots.set_address(address);
        self.begin_turn(&query);
        Ok(())
    }

    /// Drop the log and both slots and return to idle.
    pub fn reset_session(&mut self) {
        self.log.clear();
        self.slots.reset();
        self.state = TurnState::Idle;
        tracing::info!(session = %self.id, "Session reset");
    }

    // -- Private helpers --

    fn check_accepting(&self) -> Result<(), ChatError> {
        if self.busy() {
            return Err(ChatError::AlreadyThinking);
        }
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }
        Ok(())
    }

    fn check_query(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyQuery);
        }
        if text.chars().count() > self.config.max_query_chars {
            return Err(ChatError::QueryTooLong(self.config.max_query_chars));
        }
        Ok(())
    }

    fn begin_turn(&mut self, text: &str) {
        self.log.push(Turn::user(text, Local::now().timestamp()));
        self.state = TurnState::Thinking;
        tracing::debug!(session = %self.id, turns = self.log.len(), "Query accepted");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarkerTier, Role};

    fn session() -> Session {
        Session::default()
    }

    // ---- Construction ----

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let s = session();
        assert_eq!(s.state(), TurnState::Idle);
        assert!(!s.busy());
        assert!(s.history().is_empty());
        assert!(s.slots().household().is_none());
        assert_ne!(s.id(), Uuid::nil());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = session();
        let b = session();
        a.submit_household(1, 0, 0).unwrap();
        a.resolve().unwrap();
        assert_ne!(a.id(), b.id());
        assert!(b.slots().household().is_none());
        assert!(b.history().is_empty());
    }

    // ---- State machine ----

    #[test]
    fn test_submit_moves_to_thinking() {
        let mut s = session();
        s.submit_query("hello").unwrap();
        assert!(s.busy());
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].role, Role::User);
    }

    #[test]
    fn test_double_submit_fails_already_thinking() {
        let mut s = session();
        s.submit_query("hello").unwrap();
        let err = s.submit_query("again").unwrap_err();
        assert!(matches!(err, ChatError::AlreadyThinking));
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_resolve_when_idle_fails_not_thinking() {
        let mut s = session();
        assert!(matches!(s.resolve().unwrap_err(), ChatError::NotThinking));
    }

    #[test]
    fn test_resolve_returns_to_idle() {
        let mut s = session();
        s.submit_query("hello").unwrap();
        let turn = s.resolve().unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.topic, Some(Topic::Fallback));
        assert!(!s.busy());
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.history()[1], turn);
    }

    #[test]
    fn test_resolve_twice_fails() {
        let mut s = session();
        s.submit_query("hello").unwrap();
        s.resolve().unwrap();
        assert!(matches!(s.resolve().unwrap_err(), ChatError::NotThinking));
    }

    #[test]
    fn test_forms_rejected_while_thinking() {
        let mut s = session();
        s.submit_query("kit").unwrap();
        assert!(matches!(
            s.submit_household(1, 0, 0).unwrap_err(),
            ChatError::AlreadyThinking
        ));
        assert!(matches!(
            s.submit_address("94086").unwrap_err(),
            ChatError::AlreadyThinking
        ));
        assert!(s.slots().household().is_none());
        assert!(s.slots().address().is_none());
    }

    // ---- Query validation ----

    #[test]
    fn test_empty_query_rejected() {
        let mut s = session();
        assert!(matches!(s.submit_query("").unwrap_err(), ChatError::EmptyQuery));
        assert!(matches!(s.submit_query("   ").unwrap_err(), ChatError::EmptyQuery));
        assert!(!s.busy());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_query_too_long_rejected() {
        let mut s = session();
        let long = "a".repeat(2001);
        assert!(matches!(
            s.submit_query(&long).unwrap_err(),
            ChatError::QueryTooLong(2000)
        ));
        assert!(s.submit_query(&"a".repeat(2000)).is_ok());
    }

    #[test]
    fn test_disabled_session_rejects_input() {
        let config = ChatConfig {
            enabled: false,
            ..ChatConfig::default()
        };
        let mut s = Session::new(config, Arc::new(KnowledgeBase::default()));
        assert!(matches!(s.submit_query("hello").unwrap_err(), ChatError::Disabled));
        assert!(matches!(
            s.submit_household(1, 0, 0).unwrap_err(),
            ChatError::Disabled
        ));
        assert!(s.slots().household().is_none());
    }

    // ---- Slot forms ----

    #[test]
    fn test_kit_flow() {
        let mut s = session();
        let prompt = s.ask("Help me build an emergency kit").unwrap();
        assert_eq!(prompt.slot_request, SlotRequest::Household);
        assert_eq!(s.pending_slot_request(), SlotRequest::Household);

        s.submit_household(2, 0, 1).unwrap();
        assert_eq!(
            s.history().last().unwrap().query_text(),
            Some("Create kit for 2 adults, 0 children, 1 pets")
        );
        let answer = s.resolve().unwrap();
        assert_eq!(answer.topic, Some(Topic::EmergencyKit));
        assert_eq!(answer.slot_request, SlotRequest::None);
        assert_eq!(s.pending_slot_request(), SlotRequest::None);
        assert!(answer.content().unwrap().plain_text().contains("26 items"));
    }

    #[test]
    fn test_invalid_household_leaves_state_unchanged() {
        let mut s = session();
        s.ask("kit").unwrap();
        let before = s.history().len();
        let err = s.submit_household(2, 0, 21).unwrap_err();
        assert!(matches!(err, ChatError::InvalidSlotValue { field: "pets", .. }));
        assert!(!s.busy());
        assert_eq!(s.history().len(), before);
        assert!(s.slots().household().is_none());
        assert_eq!(s.pending_slot_request(), SlotRequest::Household);
    }

    #[test]
    fn test_household_overwritten_by_later_submission() {
        let mut s = session();
        s.submit_household(2, 2, 2).unwrap();
        s.resolve().unwrap();
        s.submit_household(1, 0, 0).unwrap();
        s.resolve().unwrap();
        assert_eq!(s.slots().household(), Some(&Household::new(1, 0, 0)));
    }

    #[test]
    fn test_shelter_flow() {
        let mut s = session();
        let prompt = s.ask("Find emergency shelters near me").unwrap();
        assert_eq!(prompt.slot_request, SlotRequest::Address);
        assert!(!prompt.render_map());

        s.submit_address("  123 Main St, Sunnyvale, CA 94086 ").unwrap();
        let answer = s.resolve().unwrap();
        assert_eq!(answer.topic, Some(Topic::ShelterLookup));
        assert!(answer.render_map());
        let map = answer.map.unwrap();
        assert_eq!(map.pins.len(), 3);
        assert_eq!(map.pins[0].tier, MarkerTier::Near);
        assert_eq!(
            s.slots().address().unwrap().as_str(),
            "123 Main St, Sunnyvale, CA 94086"
        );
    }

    #[test]
    fn test_blank_address_rejected() {
        let mut s = session();
        assert!(matches!(
            s.submit_address(" \t ").unwrap_err(),
            ChatError::EmptyAddress
        ));
        assert!(!s.busy());
        assert!(s.slots().address().is_none());
    }

    #[test]
    fn test_slots_persist_across_topics() {
        let mut s = session();
        s.submit_address("94086").unwrap();
        s.resolve().unwrap();
        s.ask("What are the current emergency alerts?").unwrap();
        let again = s.ask("show me the evacuation shelters").unwrap();
        assert_eq!(again.slot_request, SlotRequest::None);
        assert!(again.render_map());
    }

    // ---- Reset ----

    #[test]
    fn test_reset_clears_log_and_slots() {
        let mut s = session();
        s.submit_household(2, 0, 1).unwrap();
        s.resolve().unwrap();
        s.submit_address("94086").unwrap();
        s.resolve().unwrap();

        s.reset_session();
        assert!(s.history().is_empty());
        assert!(s.slots().household().is_none());
        assert!(s.slots().address().is_none());

        let kit = s.ask("emergency kit").unwrap();
        assert_eq!(kit.slot_request, SlotRequest::Household);
        let shelter = s.ask("shelter").unwrap();
        assert_eq!(shelter.slot_request, SlotRequest::Address);
    }

    #[test]
    fn test_reset_while_thinking_returns_to_idle() {
        let mut s = session();
        s.submit_query("hello").unwrap();
        s.reset_session();
        assert!(!s.busy());
        assert!(s.submit_query("hello again").is_ok());
    }

    // ---- Topics by name ----

    #[test]
    fn test_canned_queries_classify_to_their_topic() {
        let classifier = IntentClassifier::new();
        let topics = [
            Topic::FemaAssistance,
            Topic::ShelterLookup,
            Topic::EmergencyKit,
            Topic::FamilyPlanning,
            Topic::AlertStatus,
            Topic::DisasterGuide(DisasterKind::Earthquake),
            Topic::DisasterGuide(DisasterKind::Fire),
            Topic::DisasterGuide(DisasterKind::Flood),
            Topic::Fallback,
        ];
        for topic in topics {
            assert_eq!(classifier.classify(canned_query(topic)), topic);
        }
    }

    #[test]
    fn test_quick_actions_cover_menu() {
        assert_eq!(QUICK_ACTIONS.len(), 6);
        let classifier = IntentClassifier::new();
        for action in QUICK_ACTIONS {
            assert_ne!(classifier.classify(action.query), Topic::Fallback);
        }
    }

    #[test]
    fn test_ask_topic() {
        let mut s = session();
        let turn = s.ask_topic("disaster_guide:flood").unwrap();
        assert_eq!(turn.topic, Some(Topic::DisasterGuide(DisasterKind::Flood)));
    }

    #[test]
    fn test_ask_unknown_topic() {
        let mut s = session();
        let err = s.ask_topic("weather").unwrap_err();
        assert!(matches!(err, ChatError::UnknownTopic(_)));
        assert!(s.history().is_empty());
        assert!(!s.busy());
    }
}
