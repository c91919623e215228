//! End-to-end conversation tests for the dialogue engine.
//!
//! Each test drives a fresh `Session` through the public API only, the same
//! way a front end would: submit, resolve, read the turn, show a form.

use std::sync::Arc;

use prepwise_chat::{
    ChatError, DisasterKind, Item, MarkerTier, Role, Session, SlotRequest, Topic, TurnState,
    QUICK_ACTIONS,
};
use prepwise_core::config::ChatConfig;
use prepwise_core::{KnowledgeBase, Shelter};

// =============================================================================
// Helpers
// =============================================================================

fn session() -> Session {
    Session::default()
}

fn session_with(knowledge: KnowledgeBase) -> Session {
    Session::new(ChatConfig::default(), Arc::new(knowledge))
}

fn headings(turn: &prepwise_chat::Turn) -> Vec<String> {
    turn.content()
        .map(|c| c.sections.iter().map(|s| s.heading.clone()).collect())
        .unwrap_or_default()
}

// =============================================================================
// Classification priority
// =============================================================================

#[test]
fn test_fema_keywords_win_over_everything() {
    let mut s = session();
    for q in [
        "find shelters near funding office",
        "apply for an emergency kit grant",
        "financial plan after the flood",
        "assistance with alert signup",
        "FEMA earthquake help",
    ] {
        let turn = s.ask(q).unwrap();
        assert_eq!(turn.topic, Some(Topic::FemaAssistance), "{q}");
    }
}

#[test]
fn test_flood_question_gets_flood_guide() {
    let mut s = session();
    let turn = s.ask("what should I do in a flood").unwrap();
    assert_eq!(turn.topic, Some(Topic::DisasterGuide(DisasterKind::Flood)));
    let content = turn.content().unwrap();
    let block = content.find_section("Immediate Actions").unwrap();
    assert_eq!(block.items[0], Item::text("Move to Higher Ground"));
}

#[test]
fn test_unmatched_query_gets_help_menu() {
    let mut s = session();
    let turn = s.ask("good morning").unwrap();
    assert_eq!(turn.topic, Some(Topic::Fallback));
    assert_eq!(turn.slot_request, SlotRequest::None);
    assert!(turn.tools_used.is_empty());
}

// =============================================================================
// Slot filling
// =============================================================================

#[test]
fn test_kit_asks_for_household_then_builds_checklist() {
    let mut s = session();

    let prompt = s.ask("what goes in a go bag").unwrap();
    assert_eq!(prompt.slot_request, SlotRequest::Household);
    assert!(!headings(&prompt).iter().any(|h| h.starts_with("Base Essentials")));

    s.submit_household(2, 0, 1).unwrap();
    let kit = s.resolve().unwrap();
    let h = headings(&kit);
    assert!(h.contains(&"Base Essentials (Everyone)".to_string()));
    assert!(h.contains(&"For 2 Adult(s)".to_string()));
    assert!(h.contains(&"For 1 Pet(s)".to_string()));
    assert!(!h.iter().any(|s| s.contains("Child")));

    let summary = kit.content().unwrap().find_section("Household").unwrap();
    assert!(summary.items.contains(&Item::field("Total Items", "26 items")));

    let checklist = kit.kit.as_ref().unwrap();
    assert_eq!(checklist.total_items, 26);
    assert!(prompt.kit.is_none());
}

#[test]
fn test_shelter_asks_for_address_then_maps_fixture() {
    let mut s = session();

    let prompt = s.ask("where is the nearest shelter").unwrap();
    assert_eq!(prompt.slot_request, SlotRequest::Address);
    assert!(prompt.map.is_none());

    s.submit_address("94086").unwrap();
    let found = s.resolve().unwrap();
    let map = found.map.as_ref().unwrap();
    assert_eq!(map.pins.len(), 3);

    let near = map
        .pins
        .iter()
        .find(|p| p.shelter.distance_miles == 1.2)
        .unwrap();
    let far = map
        .pins
        .iter()
        .find(|p| p.shelter.distance_miles == 5.3)
        .unwrap();
    assert_eq!(near.tier, MarkerTier::Near);
    assert_eq!(far.tier, MarkerTier::Far);
}

#[test]
fn test_slots_reused_for_later_questions() {
    let mut s = session();
    s.submit_household(1, 1, 0).unwrap();
    s.resolve().unwrap();

    let again = s.ask("what should I pack").unwrap();
    assert_eq!(again.slot_request, SlotRequest::None);
    assert!(headings(&again).contains(&"For 1 Child(ren)".to_string()));
}

#[test]
fn test_invalid_household_is_rejected_without_side_effects() {
    let mut s = session();
    s.ask("emergency kit").unwrap();
    let before = s.history().to_vec();

    for (a, c, p, field) in [(21, 0, 0, "adults"), (0, 21, 0, "children"), (0, 0, 99, "pets")] {
        let err = s.submit_household(a, c, p).unwrap_err();
        assert!(
            matches!(err, ChatError::InvalidSlotValue { field: f, max: 20, .. } if f == field),
            "{err}"
        );
    }
    assert_eq!(s.history(), before.as_slice());
    assert_eq!(s.state(), TurnState::Idle);
    assert_eq!(s.pending_slot_request(), SlotRequest::Household);
}

#[test]
fn test_household_bounds_accepted() {
    let mut s = session();
    s.submit_household(20, 20, 20).unwrap();
    let turn = s.resolve().unwrap();
    let total = 10 + 20 * 5 + 20 * 5 + 20 * 6;
    let summary = turn.content().unwrap().find_section("Household").unwrap();
    assert!(summary
        .items
        .contains(&Item::field("Total Items", format!("{} items", total))));
}

// =============================================================================
// Turn state machine
// =============================================================================

#[test]
fn test_second_submit_without_resolve_fails() {
    let mut s = session();
    s.submit_query("Help me create an emergency plan").unwrap();
    assert!(s.busy());
    assert!(matches!(
        s.submit_query("What are the current emergency alerts?"),
        Err(ChatError::AlreadyThinking)
    ));

    let turn = s.resolve().unwrap();
    assert_eq!(turn.topic, Some(Topic::FamilyPlanning));
    assert_eq!(s.history().len(), 2);
}

#[test]
fn test_history_alternates_user_and_assistant() {
    let mut s = session();
    for action in QUICK_ACTIONS {
        s.ask(action.query).unwrap();
    }
    let roles: Vec<Role> = s.history().iter().map(|t| t.role).collect();
    assert_eq!(roles.len(), QUICK_ACTIONS.len() * 2);
    for pair in roles.chunks(2) {
        assert_eq!(pair, [Role::User, Role::Assistant]);
    }
    for window in s.history().windows(2) {
        assert!(window[0].timestamp <= window[1].timestamp);
    }
}

#[test]
fn test_every_answer_carries_query_analysis() {
    let mut s = session();
    let turn = s.ask("How do I apply for FEMA assistance?").unwrap();
    assert_eq!(turn.reasoning[0].step, "Query Analysis");
    assert_eq!(
        turn.reasoning[0].thought,
        "Analyzing: 'How do I apply for FEMA assistance?'"
    );
    assert_eq!(turn.tools_used[0].tool, "FEMA Assistance Database");
}

// =============================================================================
// Reset
// =============================================================================

#[test]
fn test_reset_makes_slots_ask_again() {
    let mut s = session();
    s.submit_household(2, 0, 1).unwrap();
    s.resolve().unwrap();
    s.submit_address("123 Main St").unwrap();
    s.resolve().unwrap();

    s.reset_session();
    assert!(s.history().is_empty());

    assert_eq!(
        s.ask("emergency kit").unwrap().slot_request,
        SlotRequest::Household
    );
    assert_eq!(
        s.ask("evacuation shelter").unwrap().slot_request,
        SlotRequest::Address
    );
}

// =============================================================================
// Knowledge base and config
// =============================================================================

#[test]
fn test_custom_knowledge_base_is_used() {
    let mut kb = KnowledgeBase::default();
    kb.service_area = "Springfield, IL".to_string();
    kb.shelters = vec![Shelter {
        name: "Springfield Armory".to_string(),
        address: "1 Armory Way".to_string(),
        distance_miles: 4.0,
        capacity: 50,
        services: vec!["Cots".to_string()],
        phone: "(217) 555-0100".to_string(),
        lat: 39.8,
        lon: -89.6,
    }];

    let mut s = session_with(kb);
    let alerts = s.ask("any alerts?").unwrap();
    let status = alerts.content().unwrap().find_section("Current Status").unwrap();
    assert!(status.items.contains(&Item::field("Location", "Springfield, IL")));

    s.submit_address("62701").unwrap();
    let found = s.resolve().unwrap();
    let map = found.map.unwrap();
    assert_eq!(map.pins.len(), 1);
    assert_eq!(map.pins[0].tier, MarkerTier::Far);
    assert_eq!(map.center_lat, 39.8);
}

#[test]
fn test_query_limit_comes_from_config() {
    let config = ChatConfig {
        max_query_chars: 10,
        ..ChatConfig::default()
    };
    let mut s = Session::new(config, Arc::new(KnowledgeBase::default()));
    assert!(matches!(
        s.submit_query("this query is too long"),
        Err(ChatError::QueryTooLong(10))
    ));
    // The synthesized kit query is subject to the same limit.
    assert!(matches!(
        s.submit_household(1, 0, 0),
        Err(ChatError::QueryTooLong(10))
    ));
    assert!(s.slots().household().is_none());
}

#[test]
fn test_ask_topic_by_name() {
    let mut s = session();
    let turn = s.ask_topic("alert_status").unwrap();
    assert_eq!(turn.topic, Some(Topic::AlertStatus));
    assert!(matches!(
        s.ask_topic("tornado_guide"),
        Err(ChatError::UnknownTopic(_))
    ));
}

#[test]
fn test_session_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Session>();
}
