//! Known pseudo-classes and pseudo-elements

use stylint_css::selector::ModifierKind;
use stylint_css::{Block, Event, EventKind, Selector};

use super::Rule;
use crate::reporter::Reporter;

/// Allowed after `:`
const SINGLE: u32 = 1;
/// Allowed after `::`
const DOUBLE: u32 = 2;
/// Only as a function
const FUNC: u32 = 4;
/// Both as a function and bare
const FUNC_TOO: u32 = 8;
const WEBKIT: u32 = 0x10;
const MOZ: u32 = 0x20;
const DEPRECATED: u32 = 0xDEAD_0000;

const DEFINITIONS: &[(&str, u32)] = &[
    // elements
    ("after", SINGLE | DOUBLE),
    ("backdrop", DOUBLE),
    ("before", SINGLE | DOUBLE),
    ("cue", DOUBLE),
    ("cue-region", DOUBLE),
    ("file-selector-button", DOUBLE),
    ("first-letter", SINGLE | DOUBLE),
    ("first-line", SINGLE | DOUBLE),
    ("grammar-error", DOUBLE),
    ("highlight", DOUBLE | FUNC),
    ("marker", DOUBLE),
    ("part", DOUBLE | FUNC),
    ("placeholder", DOUBLE | MOZ),
    ("selection", DOUBLE | MOZ),
    ("slotted", DOUBLE | FUNC),
    ("spelling-error", DOUBLE),
    ("target-text", DOUBLE),
    // classes
    ("active", SINGLE),
    ("any-link", SINGLE | MOZ | WEBKIT),
    ("autofill", SINGLE | WEBKIT),
    ("blank", SINGLE),
    ("checked", SINGLE),
    ("current", SINGLE | FUNC_TOO),
    ("default", SINGLE),
    ("defined", SINGLE),
    ("dir", SINGLE | FUNC),
    ("disabled", SINGLE),
    ("drop", SINGLE),
    ("empty", SINGLE),
    ("enabled", SINGLE),
    ("first", SINGLE),
    ("first-child", SINGLE),
    ("first-of-type", SINGLE),
    ("focus", SINGLE),
    ("focus-visible", SINGLE),
    ("focus-within", SINGLE),
    ("fullscreen", SINGLE),
    ("future", SINGLE),
    ("has", SINGLE | FUNC),
    ("host", SINGLE | FUNC_TOO),
    ("host-context", SINGLE | FUNC),
    ("hover", SINGLE),
    ("in-range", SINGLE),
    ("indeterminate", SINGLE),
    ("invalid", SINGLE),
    ("is", SINGLE | FUNC),
    ("lang", SINGLE | FUNC),
    ("last-child", SINGLE),
    ("last-of-type", SINGLE),
    ("left", SINGLE),
    ("link", SINGLE),
    ("local-link", SINGLE),
    ("not", SINGLE | FUNC),
    ("nth-child", SINGLE | FUNC),
    ("nth-col", SINGLE | FUNC),
    ("nth-last-child", SINGLE | FUNC),
    ("nth-last-col", SINGLE | FUNC),
    ("nth-last-of-type", SINGLE | FUNC),
    ("nth-of-type", SINGLE | FUNC),
    ("only-child", SINGLE),
    ("only-of-type", SINGLE),
    ("optional", SINGLE),
    ("out-of-range", SINGLE),
    ("past", SINGLE),
    ("paused", SINGLE),
    ("picture-in-picture", SINGLE),
    ("placeholder-shown", SINGLE),
    ("playing", SINGLE),
    ("read-only", SINGLE),
    ("read-write", SINGLE),
    ("required", SINGLE),
    ("right", SINGLE),
    ("root", SINGLE),
    ("scope", SINGLE),
    ("state", SINGLE | FUNC),
    ("target", SINGLE),
    ("target-within", SINGLE),
    ("user-invalid", SINGLE),
    ("valid", SINGLE),
    ("visited", SINGLE),
    ("where", SINGLE | FUNC),
    ("xr-overlay", SINGLE),
    // states of ::-webkit-scrollbar parts
    ("corner-present", SINGLE),
    ("decrement", SINGLE),
    ("double-button", SINGLE),
    ("end", SINGLE),
    ("horizontal", SINGLE),
    ("increment", SINGLE),
    ("no-button", SINGLE),
    ("single-button", SINGLE),
    ("start", SINGLE),
    ("vertical", SINGLE),
    ("window-inactive", SINGLE | MOZ),
];

/// Usable only with a vendor prefix
const PREFIXED: &[(&str, u32)] = &[
    ("any", SINGLE | FUNC | MOZ | WEBKIT),
    ("calendar-picker-indicator", DOUBLE | WEBKIT),
    ("clear-button", DOUBLE | WEBKIT),
    ("color-swatch", DOUBLE | WEBKIT),
    ("color-swatch-wrapper", DOUBLE | WEBKIT),
    ("date-and-time-value", DOUBLE | WEBKIT),
    ("datetime-edit", DOUBLE | WEBKIT),
    ("datetime-edit-ampm-field", DOUBLE | WEBKIT),
    ("datetime-edit-day-field", DOUBLE | WEBKIT),
    ("datetime-edit-fields-wrapper", DOUBLE | WEBKIT),
    ("datetime-edit-hour-field", DOUBLE | WEBKIT),
    ("datetime-edit-millisecond-field", DOUBLE | WEBKIT),
    ("datetime-edit-minute-field", DOUBLE | WEBKIT),
    ("datetime-edit-month-field", DOUBLE | WEBKIT),
    ("datetime-edit-second-field", DOUBLE | WEBKIT),
    ("datetime-edit-text", DOUBLE | WEBKIT),
    ("datetime-edit-week-field", DOUBLE | WEBKIT),
    ("datetime-edit-year-field", DOUBLE | WEBKIT),
    ("details-marker", DOUBLE | WEBKIT | DEPRECATED),
    ("drag", SINGLE | WEBKIT),
    ("drag-over", SINGLE | MOZ),
    ("file-upload-button", DOUBLE | WEBKIT),
    ("focus-inner", DOUBLE | MOZ),
    ("focusring", SINGLE | MOZ),
    ("full-page-media", SINGLE | WEBKIT),
    ("full-screen", SINGLE | MOZ | WEBKIT),
    ("full-screen-ancestor", SINGLE | MOZ | WEBKIT),
    ("inner-spin-button", DOUBLE | WEBKIT),
    ("input-placeholder", SINGLE | DOUBLE | WEBKIT | MOZ),
    ("loading", SINGLE | MOZ),
    ("media-controls", DOUBLE | WEBKIT),
    ("media-controls-current-time-display", DOUBLE | WEBKIT),
    ("media-controls-enclosure", DOUBLE | WEBKIT),
    ("media-controls-fullscreen-button", DOUBLE | WEBKIT),
    ("media-controls-mute-button", DOUBLE | WEBKIT),
    ("media-controls-overlay-enclosure", DOUBLE | WEBKIT),
    ("media-controls-overlay-play-button", DOUBLE | WEBKIT),
    ("media-controls-panel", DOUBLE | WEBKIT),
    ("media-controls-play-button", DOUBLE | WEBKIT),
    ("media-controls-time-remaining-display", DOUBLE | WEBKIT),
    ("media-controls-timeline", DOUBLE | WEBKIT),
    ("media-controls-timeline-container", DOUBLE | WEBKIT),
    ("media-controls-toggle-closed-captions-button", DOUBLE | WEBKIT),
    ("media-controls-volume-slider", DOUBLE | WEBKIT),
    ("media-slider-container", DOUBLE | WEBKIT),
    ("media-slider-thumb", DOUBLE | WEBKIT),
    ("media-text-track-container", DOUBLE | WEBKIT),
    ("media-text-track-display", DOUBLE | WEBKIT),
    ("media-text-track-region", DOUBLE | WEBKIT),
    ("media-text-track-region-container", DOUBLE | WEBKIT),
    ("meter-bar", DOUBLE | WEBKIT),
    ("meter-even-less-good-value", DOUBLE | WEBKIT),
    ("meter-inner-element", DOUBLE | WEBKIT),
    ("meter-optimum-value", DOUBLE | WEBKIT),
    ("meter-suboptimum-value", DOUBLE | WEBKIT),
    ("outer-spin-button", DOUBLE | WEBKIT),
    ("progress-bar", DOUBLE | WEBKIT),
    ("progress-inner-element", DOUBLE | WEBKIT),
    ("progress-value", DOUBLE | WEBKIT),
    ("resizer", DOUBLE | WEBKIT),
    ("scrollbar", DOUBLE | WEBKIT),
    ("scrollbar-button", DOUBLE | WEBKIT),
    ("scrollbar-corner", DOUBLE | WEBKIT),
    ("scrollbar-thumb", DOUBLE | WEBKIT),
    ("scrollbar-track", DOUBLE | WEBKIT),
    ("scrollbar-track-piece", DOUBLE | WEBKIT),
    ("search-cancel-button", DOUBLE | WEBKIT),
    ("search-decoration", DOUBLE | WEBKIT),
    ("slider-container", DOUBLE | WEBKIT),
    ("slider-runnable-track", DOUBLE | WEBKIT),
    ("slider-thumb", DOUBLE | WEBKIT),
    ("textfield-decoration-container", DOUBLE | WEBKIT),
];

fn lookup(table: &[(&str, u32)], name: &str) -> Option<u32> {
    table.iter().find(|(n, _)| *n == name).map(|(_, flags)| *flags)
}

/// `::-webkit-scrollbar(` split up
struct PseudoText<'t> {
    colons: usize,
    prefix: Option<&'t str>,
    name: &'t str,
    paren: bool,
    /// Length of the head, through the `(` if any
    len: usize,
}

/// Split a lower-cased pseudo selector into its head parts
fn split(text: &str) -> Option<PseudoText<'_>> {
    let rest = text.trim_start_matches(':');
    let colons = text.len() - rest.len();
    if colons == 0 {
        return None;
    }
    let mut prefix = None;
    let mut body = rest;
    if let Some(after) = rest.strip_prefix('-') {
        let word = after.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(after.len());
        if word > 0 && after[word..].starts_with('-') {
            prefix = Some(&after[..word]);
            body = &after[word + 1..];
        }
    }
    let name_len = body.find('(').unwrap_or(body.len());
    if name_len == 0 {
        return None;
    }
    let paren = name_len < body.len();
    let len = text.len() - body.len() + name_len + usize::from(paren);
    Some(PseudoText { colons, prefix, name: &body[..name_len], paren, len })
}

/// What is wrong with a pseudo, in the order it gets reported
fn problems(pseudo: &PseudoText<'_>, head: &str) -> Vec<String> {
    let prefixed = lookup(PREFIXED, pseudo.name);
    let Some(def) = lookup(DEFINITIONS, pseudo.name).or(prefixed) else {
        return vec!["Unknown pseudo".to_string()];
    };
    let mut found = Vec::new();
    if pseudo.colons > 1 {
        if def & DOUBLE == 0 {
            found.push("Must use : in".to_string());
        }
    } else if def & SINGLE == 0 && head != ":-moz-placeholder" {
        found.push("Must use :: in".to_string());
    }
    if pseudo.paren {
        if def & (FUNC | FUNC_TOO) == 0 {
            found.push("Unexpected ( in".to_string());
        }
    } else if def & FUNC != 0 {
        found.push("Must use ( after".to_string());
    }
    match pseudo.prefix {
        Some(prefix) => {
            let allowed = match prefix {
                "webkit" => def & WEBKIT != 0,
                "moz" => def & MOZ != 0,
                _ => def & (WEBKIT | MOZ) != 0,
            };
            if !allowed {
                found.push("Unexpected prefix in".to_string());
            }
        }
        None if prefixed.is_some() => {
            let which = match (def & WEBKIT != 0, def & MOZ != 0) {
                (true, true) => "-webkit- or -moz-",
                (true, false) => "-webkit-",
                _ => "-moz-",
            };
            found.push(format!("Must use {} prefix in", which));
        }
        None => {}
    }
    if def & DEPRECATED == DEPRECATED {
        found.push("Deprecated".to_string());
    }
    found
}

#[derive(Default)]
pub struct KnownPseudos;

impl KnownPseudos {
    fn check(&self, sel: &Selector, reporter: &mut Reporter<'_>) {
        for compound in sel.compounds() {
            for m in &compound.modifiers {
                let ModifierKind::Pseudo(pseudo) = &m.kind else {
                    continue;
                };
                let lower = m.text.to_ascii_lowercase();
                match split(&lower) {
                    Some(parts) => {
                        let head = &m.text[..parts.len];
                        for problem in problems(&parts, &lower[..parts.len]) {
                            reporter.report(format!("{} {}", problem, head), m.loc, self.id());
                        }
                    }
                    None => reporter.report(format!("Unknown pseudo {}", m.text), m.loc, self.id()),
                }
                for arg in pseudo.selectors() {
                    self.check(arg, reporter);
                }
            }
        }
    }
}

impl Rule for KnownPseudos {
    fn id(&self) -> &'static str {
        "known-pseudos"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match &event.kind {
            EventKind::Start(Block::Rule { selectors }) => {
                for sel in selectors {
                    self.check(sel, reporter);
                }
            }
            EventKind::SupportsSelector { selector } => self.check(selector, reporter),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_split() {
        let p = split("::-webkit-input-placeholder").unwrap();
        assert_eq!((p.colons, p.prefix, p.name, p.paren), (2, Some("webkit"), "input-placeholder", false));
        let p = split(":not(.a)").unwrap();
        assert_eq!((p.name, p.paren, p.len), ("not", true, 5));
        let p = split(":-foo").unwrap();
        assert_eq!((p.prefix, p.name), (None, "-foo"));
    }

    #[test]
    fn test_known_and_unknown() {
        assert!(lint("known-pseudos", "a:hover, a::before, a:before, p:nth-child(2n), :is(a, b){}").is_empty());
        assert_eq!(texts(&lint("known-pseudos", "a:hovr{}")), ["Unknown pseudo :hovr"]);
        assert_eq!(texts(&lint("known-pseudos", "a:not(:foo){}")), ["Unknown pseudo :foo"]);
    }

    #[test]
    fn test_colons() {
        assert_eq!(texts(&lint("known-pseudos", "a::hover{}")), ["Must use : in ::hover"]);
        assert_eq!(texts(&lint("known-pseudos", "li:marker{}")), ["Must use :: in :marker"]);
        assert!(lint("known-pseudos", "input:-moz-placeholder{}").is_empty());
    }

    #[test]
    fn test_functions() {
        assert_eq!(texts(&lint("known-pseudos", "p:dir{}")), ["Must use ( after :dir"]);
        assert!(lint("known-pseudos", ":host, :host(.x){}").is_empty());
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(
            texts(&lint("known-pseudos", "::-moz-scrollbar{}")),
            ["Unexpected prefix in ::-moz-scrollbar"]
        );
        assert_eq!(
            texts(&lint("known-pseudos", "::scrollbar{}")),
            ["Must use -webkit- prefix in ::scrollbar"]
        );
        assert_eq!(
            texts(&lint("known-pseudos", "summary::-webkit-details-marker{}")),
            ["Deprecated ::-webkit-details-marker"]
        );
    }

    #[test]
    fn test_supports_selector() {
        let msgs = lint("known-pseudos", "@supports selector(:hovr) { a{color:red} }");
        assert_eq!(texts(&msgs), ["Unknown pseudo :hovr"]);
    }
}
