//! Plain-text rendering of assistant turns for the terminal.

use std::fmt::Write as _;

use prepwise_chat::{
    Content, Item, MarkerTier, QuickAction, Section, ShelterMap, Tone, Turn,
};

/// Options that change what is shown under each answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub show_reasoning: bool,
}

/// Render an assistant turn: content, shelter map and, optionally, the trace.
pub fn render_turn(turn: &Turn, opts: RenderOptions) -> String {
    let mut out = String::new();
    if let Some(content) = turn.content() {
        out.push_str(&render_content(content));
    }
    if let Some(ref map) = turn.map {
        out.push('\n');
        out.push_str(&render_map(map));
    }
    if opts.show_reasoning && !turn.reasoning.is_empty() {
        out.push_str("\nReasoning\n");
        for step in &turn.reasoning {
            let _ = writeln!(out, "  {}: {}", step.step, step.thought);
        }
        for tool in &turn.tools_used {
            let _ = writeln!(out, "  [tool] {} ({})", tool.tool, tool.query);
        }
    }
    out
}

pub fn render_content(content: &Content) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", content.title);
    let _ = writeln!(out, "{}", "=".repeat(content.title.chars().count()));
    if let Some(ref subtitle) = content.subtitle {
        let _ = writeln!(out, "{}", subtitle);
    }
    for section in &content.sections {
        out.push('\n');
        render_section(&mut out, section);
    }
    out
}

fn render_section(out: &mut String, section: &Section) {
    let marker = match section.tone {
        Tone::Info => "",
        Tone::Success => "[ok] ",
        Tone::Warning => "[!] ",
    };
    let _ = writeln!(out, "{}{}", marker, section.heading);
    for item in &section.items {
        let _ = match item {
            Item::Text { text } => writeln!(out, "  {}", text),
            Item::Bullet { text } => writeln!(out, "  - {}", text),
            Item::Step { number, text } => writeln!(out, "  {:>2}. {}", number, text),
            Item::Field { key, value } => writeln!(out, "  {}: {}", key, value),
            Item::Link { label, url } => writeln!(out, "  {} <{}>", label, url),
            Item::Image { url, caption } => writeln!(out, "  [image] {} <{}>", caption, url),
        };
    }
}

/// Text stand-in for the shelter map: center plus one line per marker.
pub fn render_map(map: &ShelterMap) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Map (center {:.4}, {:.4})",
        map.center_lat, map.center_lon
    );
    for pin in &map.pins {
        let _ = writeln!(
            out,
            "  ({}) {} - {:.1} mi [{:.4}, {:.4}]",
            tier_label(pin.tier),
            pin.shelter.name,
            pin.shelter.distance_miles,
            pin.shelter.lat,
            pin.shelter.lon
        );
    }
    out
}

fn tier_label(tier: MarkerTier) -> &'static str {
    match tier {
        MarkerTier::Near => "near",
        MarkerTier::Mid => "mid",
        MarkerTier::Far => "far",
    }
}

/// Numbered quick-action menu.
pub fn render_menu(actions: &[QuickAction]) -> String {
    let mut out = String::from("Services\n");
    for (idx, action) in actions.iter().enumerate() {
        let _ = writeln!(out, "  /{} {:<20} {}", idx + 1, action.label, action.description);
    }
    out
}

pub const HELP: &str = "\
Type a question, or one of:
  /menu           list services
  /<n>            run service <n> from the menu
  /topic <name>   ask about a topic by name, e.g. /topic disaster_guide:fire
  /reset          start a new conversation
  /quit           exit
";
