//! Rules counting things across the whole sheet

use stylint_css::{Block, Event, EventKind};

use super::{prop_name, rule_event, Rule, RuleEvent};
use crate::reporter::Reporter;

#[derive(Default)]
pub struct Floats {
    count: usize,
}

impl Rule for Floats {
    fn id(&self) -> &'static str {
        "floats"
    }

    fn on_event(&mut self, event: &Event, _reporter: &mut Reporter<'_>) {
        if let Some(RuleEvent::Property(decl, _)) = rule_event(event) {
            if prop_name(&decl.property) == "float" && !decl.value.text.trim().eq_ignore_ascii_case("none") {
                self.count += 1;
            }
        }
    }

    fn finish(&mut self, reporter: &mut Reporter<'_>) {
        reporter.stat("floats", self.count);
        if self.count >= 10 {
            reporter.rollup_warn(
                format!(
                    "Too many floats ({}), you're probably using them for layout. \
                     Consider using a grid system instead.",
                    self.count
                ),
                self.id(),
            );
        }
    }
}

#[derive(Default)]
pub struct FontFaces {
    count: usize,
}

impl Rule for FontFaces {
    fn id(&self) -> &'static str {
        "font-faces"
    }

    fn on_event(&mut self, event: &Event, _reporter: &mut Reporter<'_>) {
        if let EventKind::Start(Block::FontFace) = event.kind {
            self.count += 1;
        }
    }

    fn finish(&mut self, reporter: &mut Reporter<'_>) {
        if self.count > 5 {
            reporter.rollup_warn(format!("Too many @font-face declarations ({}).", self.count), self.id());
        }
    }
}

#[derive(Default)]
pub struct FontSizes {
    count: usize,
}

impl Rule for FontSizes {
    fn id(&self) -> &'static str {
        "font-sizes"
    }

    fn on_event(&mut self, event: &Event, _reporter: &mut Reporter<'_>) {
        if let Some(RuleEvent::Property(decl, _)) = rule_event(event) {
            if prop_name(&decl.property) == "font-size" {
                self.count += 1;
            }
        }
    }

    fn finish(&mut self, reporter: &mut Reporter<'_>) {
        reporter.stat("font-sizes", self.count);
        if self.count >= 10 {
            reporter.rollup_warn(
                format!("Too many font-size declarations ({}), abstraction needed.", self.count),
                self.id(),
            );
        }
    }
}

#[derive(Default)]
pub struct Important {
    count: usize,
}

impl Rule for Important {
    fn id(&self) -> &'static str {
        "important"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        if let Some(RuleEvent::Property(decl, _)) = rule_event(event) {
            if decl.important {
                self.count += 1;
                reporter.report("Use of !important", decl.property.loc, self.id());
            }
        }
    }

    fn finish(&mut self, reporter: &mut Reporter<'_>) {
        reporter.stat("important", self.count);
        if self.count >= 10 {
            reporter.rollup_warn(
                format!(
                    "Too many !important declarations ({}), \
                     try to use less than 10 to avoid specificity issues.",
                    self.count
                ),
                self.id(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_floats() {
        let css = "a{float:left}".repeat(10) + "b{float:none}";
        let msgs = lint("floats", &css);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].rollup);
        assert!(msgs[0].message.starts_with("Too many floats (10)"));
        assert!(lint("floats", &"a{float:left}".repeat(9)).is_empty());
    }

    #[test]
    fn test_font_faces() {
        let css = "@font-face{font-family:x;src:url(x.woff)}".repeat(6);
        assert_eq!(texts(&lint("font-faces", &css)), ["Too many @font-face declarations (6)."]);
        assert!(lint("font-faces", &"@font-face{font-family:x}".repeat(5)).is_empty());
    }

    #[test]
    fn test_font_sizes() {
        let css = "a{font-size:10px}".repeat(10);
        assert_eq!(
            texts(&lint("font-sizes", &css)),
            ["Too many font-size declarations (10), abstraction needed."]
        );
    }

    #[test]
    fn test_important() {
        let msgs = lint("important", "a{color:red!important;width:1px}");
        assert_eq!(texts(&msgs), ["Use of !important"]);
        assert_eq!((msgs[0].line, msgs[0].col), (1, 3));
        let msgs = lint("important", &"a{color:red !important}".repeat(10));
        assert_eq!(msgs.len(), 11);
        assert!(msgs[10].rollup);
    }
}
