//! Structured answer content.
//!
//! Answers are built from titled sections of typed items so that any front
//! end (terminal, web, GUI) can lay them out. Nothing here produces markup.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Emphasis a front end may give a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Info,
    Success,
    Warning,
}

/// A single piece of section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Text { text: String },
    Bullet { text: String },
    Step { number: usize, text: String },
    Field { key: String, value: String },
    Link { label: String, url: String },
    Image { url: String, caption: String },
}

impl Item {
    pub fn text(text: impl Into<String>) -> Self {
        Item::Text { text: text.into() }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Item::Bullet { text: text.into() }
    }

    pub fn step(number: usize, text: impl Into<String>) -> Self {
        Item::Step {
            number,
            text: text.into(),
        }
    }

    pub fn field(key: impl Into<String>, value: impl Into<String>) -> Self {
        Item::Field {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Item::Link {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn image(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Item::Image {
            url: url.into(),
            caption: caption.into(),
        }
    }
}

/// A headed group of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub tone: Tone,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(heading: impl Into<String>, tone: Tone) -> Self {
        Self {
            heading: heading.into(),
            tone,
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    /// Bullets for every string in `texts`.
    pub fn bullets<S: AsRef<str>>(self, texts: &[S]) -> Self {
        self.items(texts.iter().map(|t| Item::bullet(t.as_ref())))
    }

    /// Numbered steps (from 1) for every string in `texts`.
    pub fn steps<S: AsRef<str>>(self, texts: &[S]) -> Self {
        self.items(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| Item::step(i + 1, t.as_ref())),
        )
    }
}

/// The body of an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
}

impl Content {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            sections: Vec::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Look up a section by exact heading.
    pub fn find_section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Flatten to readable plain text, one item per line.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if let Some(ref subtitle) = self.subtitle {
            let _ = writeln!(out, "{}", subtitle);
        }
        for section in &self.sections {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", section.heading);
            for item in &section.items {
                let _ = match item {
                    Item::Text { text } => writeln!(out, "{}", text),
                    Item::Bullet { text } => writeln!(out, "- {}", text),
                    Item::Step { number, text } => writeln!(out, "{}. {}", number, text),
                    Item::Field { key, value } => writeln!(out, "{}: {}", key, value),
                    Item::Link { label, url } => writeln!(out, "{}: {}", label, url),
                    Item::Image { url, caption } => writeln!(out, "[{}] {}", caption, url),
                };
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Content {
        Content::new("Family Emergency Plan")
            .subtitle("Stay connected")
            .section(
                Section::new("Communication Plan", Tone::Info)
                    .bullets(&["Designate a contact", "Share the list"]),
            )
            .section(Section::new("How to Apply", Tone::Success).steps(&["Register", "Wait"]))
    }

    #[test]
    fn test_steps_are_numbered_from_one() {
        let content = sample();
        let section = content.find_section("How to Apply").unwrap();
        assert_eq!(section.items[0], Item::step(1, "Register"));
        assert_eq!(section.items[1], Item::step(2, "Wait"));
    }

    #[test]
    fn test_find_section_missing() {
        assert!(sample().find_section("Pets").is_none());
    }

    #[test]
    fn test_plain_text_layout() {
        let text = sample().plain_text();
        assert!(text.starts_with("Family Emergency Plan\nStay connected\n"));
        assert!(text.contains("\nCommunication Plan\n- Designate a contact\n"));
        assert!(text.contains("1. Register\n2. Wait\n"));
    }

    #[test]
    fn test_plain_text_has_no_markup() {
        let text = sample()
            .section(Section::new("Links", Tone::Warning).item(Item::link("Ready", "https://ready.gov")))
            .plain_text();
        assert!(!text.contains('<'));
        assert!(text.contains("Ready: https://ready.gov"));
    }

    #[test]
    fn test_item_serializes_with_kind_tag() {
        let json = serde_json::to_value(Item::field("Capacity", "500 people")).unwrap();
        assert_eq!(json["kind"], "field");
        assert_eq!(json["key"], "Capacity");
    }

    #[test]
    fn test_tone_default_is_info() {
        assert_eq!(Tone::default(), Tone::Info);
    }
}
