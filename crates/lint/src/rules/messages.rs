//! Rules passing on what the parser found and at-rule checks

use stylint_css::{Block, Event, EventKind};

use super::Rule;
use crate::reporter::Reporter;

/// Syntax errors, always reported as errors
#[derive(Default)]
pub struct Errors;

impl Rule for Errors {
    fn id(&self) -> &'static str {
        "errors"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        if let EventKind::Error { message, .. } = &event.kind {
            reporter.error(message.clone(), event.loc, self.id());
        }
    }
}

#[derive(Default)]
pub struct Warnings;

impl Rule for Warnings {
    fn id(&self) -> &'static str {
        "warnings"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        if let EventKind::Warning { message } = &event.kind {
            reporter.report(message.clone(), event.loc, self.id());
        }
    }
}

#[derive(Default)]
pub struct Import;

impl Rule for Import {
    fn id(&self) -> &'static str {
        "import"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        if let EventKind::Import { .. } = event.kind {
            reporter.report("@import prevents parallel downloads, use <link> instead.", event.loc, self.id());
        }
    }
}

/// `@import` and friends inside any `@-moz-document` but the first one only
/// work when that section is the first one matching the page
#[derive(Default)]
pub struct GlobalsInDocument {
    depth: usize,
    /// Documents already closed
    closed: usize,
}

impl Rule for GlobalsInDocument {
    fn id(&self) -> &'static str {
        "globals-in-document"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        let at = match &event.kind {
            EventKind::Start(Block::Document { .. }) => {
                self.depth += 1;
                return;
            }
            EventKind::End { block: Block::Document { .. }, .. } => {
                self.depth = self.depth.saturating_sub(1);
                self.closed += 1;
                return;
            }
            EventKind::Import { .. } => "import",
            EventKind::Charset { .. } => "charset",
            EventKind::Namespace { .. } => "namespace",
            _ => return,
        };
        if self.depth > 0 && self.closed > 0 {
            reporter.report(
                format!(
                    "A nested @{} is valid only if this @-moz-document section \
                     is the first one matched for any given URL.",
                    at
                ),
                event.loc,
                self.id(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::reporter::MessageKind;
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_errors() {
        let msgs = lint("errors", "a{color:red;;b c;color:blue}");
        assert_eq!(texts(&msgs), ["Expected \"{\" but found \";\"."]);
        assert_eq!(msgs[0].kind, MessageKind::Error);
    }

    #[test]
    fn test_warnings() {
        let msgs = lint("warnings", "a{color:#12}");
        assert_eq!(texts(&msgs), ["Expected a hex color but found \"#12\"."]);
        assert_eq!(msgs[0].kind, MessageKind::Warning);
    }

    #[test]
    fn test_import() {
        let msgs = lint("import", "@import url(a.css);\na{}");
        assert_eq!(texts(&msgs), ["@import prevents parallel downloads, use <link> instead."]);
        assert_eq!(msgs[0].line, 1);
    }

    #[test]
    fn test_globals_in_document() {
        let css = "@-moz-document domain(a.com) { @import 'a.css'; }\n\
                   @-moz-document domain(b.com) { @import 'b.css'; }";
        let msgs = lint("globals-in-document", css);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].line, 2);
        assert!(msgs[0].message.starts_with("A nested @import"));
    }
}
