//! Keyword-based intent classifier.
//!
//! Maps a raw query to a [`Topic`] by case-insensitive substring containment.
//! Rules are tried in the order of [`TOPIC_RULES`]; the first rule with any
//! keyword contained in the query wins.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{DisasterKind, Topic, TopicKind};

// =============================================================================
// Rule table
// =============================================================================

/// Ordered `(topic, keywords)` rules. Earlier rules take priority, so a query
/// mentioning both "funding" and "shelter" is a FEMA question.
pub static TOPIC_RULES: &[(TopicKind, &[&str])] = &[
    (
        TopicKind::FemaAssistance,
        &["fema", "funding", "financial", "assistance", "apply"],
    ),
    (TopicKind::ShelterLookup, &["shelter", "evacuation"]),
    (
        TopicKind::EmergencyKit,
        &["go bag", "go-bag", "emergency kit", "prepare", "pack", "kit"],
    ),
    (TopicKind::FamilyPlanning, &["plan", "planning", "communication"]),
    (TopicKind::AlertStatus, &["alert", "warning", "notification"]),
    (
        TopicKind::DisasterGuide,
        &["earthquake", "fire", "flood", "disaster"],
    ),
];

/// Sub-kind words for disaster guides, checked in this order.
static DISASTER_KEYWORDS: &[(&str, DisasterKind)] = &[
    ("earthquake", DisasterKind::Earthquake),
    ("fire", DisasterKind::Fire),
    ("flood", DisasterKind::Flood),
];

// =============================================================================
// Compiled rules (compiled once, reused across calls)
// =============================================================================

/// One rule with its keywords compiled into a single alternation.
pub struct CompiledRule {
    pub kind: TopicKind,
    pub keywords: &'static [&'static str],
    matcher: Regex,
}

impl CompiledRule {
    pub fn is_match(&self, query: &str) -> bool {
        self.matcher.is_match(query)
    }
}

fn keyword_regex(keywords: &[&str]) -> Regex {
    let alts: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
    Regex::new(&format!("(?i)(?:{})", alts.join("|"))).expect("Invalid keyword regex")
}

static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    TOPIC_RULES
        .iter()
        .map(|(kind, keywords)| CompiledRule {
            kind: *kind,
            keywords: *keywords,
            matcher: keyword_regex(keywords),
        })
        .collect()
});

static DISASTER_PATTERNS: LazyLock<Vec<(Regex, DisasterKind)>> = LazyLock::new(|| {
    DISASTER_KEYWORDS
        .iter()
        .map(|(word, kind)| (keyword_regex(&[*word]), *kind))
        .collect()
});

// =============================================================================
// IntentClassifier
// =============================================================================

/// Rule-based topic classifier. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &'static [CompiledRule] {
        COMPILED_RULES.as_slice()
    }

    /// Classify a raw query. Unmatched queries are [`Topic::Fallback`].
    pub fn classify(&self, query: &str) -> Topic {
        let kind = self
            .rules()
            .iter()
            .find(|rule| rule.is_match(query))
            .map(|rule| rule.kind)
            .unwrap_or(TopicKind::Fallback);

        let topic = Topic::from_kind(kind, self.disaster_kind(query));
        debug!(%topic, "Classified query");
        topic
    }

    /// First disaster kind (in table order) named in the query, else earthquake.
    pub fn disaster_kind(&self, query: &str) -> DisasterKind {
        DISASTER_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(query))
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
