//! Descriptors of at-rules
//!
//! Inside `@font-face`, `@page` and friends only some properties are valid,
//! and a few descriptors exist nowhere else.

use super::{properties, Spec};

/// Descriptor table of one at-rule
#[derive(Debug)]
pub struct Scope {
    pub name: &'static str,
    /// Every regular property is allowed as well
    pub all: bool,
    /// Regular properties allowed as descriptors
    pub picks: &'static [&'static str],
    own: &'static [(&'static str, Spec<'static>)],
}

impl Scope {
    /// A descriptor defined by this scope alone
    pub fn own(&self, name: &str) -> Option<Spec<'static>> {
        self.own.iter().find(|(k, _)| *k == name).map(|(_, spec)| *spec)
    }

    /// Own descriptors, then the picked regular properties
    pub fn get(&self, name: &str) -> Option<Spec<'static>> {
        self.own(name).or_else(|| {
            if self.picks.contains(&name) {
                properties::lookup(name)
            } else {
                None
            }
        })
    }
}

pub static SCOPES: &[Scope] = &[
    Scope {
        name: "counter-style",
        all: false,
        picks: &[],
        own: &[
            ("additive-symbols", Spec::Grammar("<pad>#")),
            ("fallback", Spec::Grammar("<ident-not-none>")),
            ("negative", Spec::Grammar("<prefix>{1,2}")),
            ("pad", Spec::Grammar("<int0+> && <prefix>")),
            ("prefix", Spec::Grammar("<string> | <image> | <custom-ident>")),
            ("range", Spec::Grammar("[ [ <int> | infinite ]{2} ]# | auto")),
            (
                "speak-as",
                Spec::Grammar("auto | bullets | numbers | words | spell-out | <ident-not-none>"),
            ),
            ("suffix", Spec::Grammar("<prefix>")),
            ("symbols", Spec::Grammar("<prefix>+")),
            (
                "system",
                Spec::Grammar(
                    "cyclic | numeric | alphabetic | symbolic | additive | [fixed <int>?] | \
                     [ extends <ident-not-none> ]",
                ),
            ),
        ],
    },
    Scope {
        name: "font-face",
        all: false,
        picks: &[
            "font-family",
            "font-size",
            "font-variant",
            "font-variation-settings",
            "unicode-range",
        ],
        own: &[
            ("ascent-override", Spec::Grammar("[ normal | <pct0+> ]{1,2}")),
            ("descent-override", Spec::Grammar("[ normal | <pct0+> ]{1,2}")),
            ("font-display", Spec::Grammar("auto | block | swap | fallback | optional")),
            ("font-stretch", Spec::Grammar("auto | <font-stretch>{1,2}")),
            ("font-style", Spec::Grammar("auto | normal | italic | oblique <angle>{0,2}")),
            ("font-weight", Spec::Grammar("auto | [ normal | bold | <num1-1000> ]{1,2}")),
            ("line-gap-override", Spec::Grammar("[ normal | <pct0+> ]{1,2}")),
            ("size-adjust", Spec::Grammar("<pct0+>")),
            (
                "src",
                Spec::Grammar("[ url() [ format( <string># ) ]? | local( <family-name> ) ]#"),
            ),
        ],
    },
    Scope {
        name: "font-palette-values",
        all: false,
        picks: &["font-family"],
        own: &[
            ("base-palette", Spec::Grammar("light | dark | <int0+>")),
            ("override-colors", Spec::Grammar("[ <int0+> <color> ]#")),
        ],
    },
    Scope {
        name: "media",
        all: true,
        picks: &[],
        own: &[
            ("any-hover", Spec::Grammar("none | hover")),
            ("any-pointer", Spec::Grammar("none | coarse | fine")),
            ("color", Spec::Grammar("<int>")),
            ("color-gamut", Spec::Grammar("srgb | p3 | rec2020")),
            ("color-index", Spec::Grammar("<int>")),
            ("grid", Spec::Grammar("<int0-1>")),
            ("hover", Spec::Grammar("none | hover")),
            ("monochrome", Spec::Grammar("<int>")),
            ("overflow-block", Spec::Grammar("none | scroll | paged")),
            ("overflow-inline", Spec::Grammar("none | scroll")),
            ("pointer", Spec::Grammar("none | coarse | fine")),
            ("resolution", Spec::Grammar("<resolution> | infinite")),
            ("scan", Spec::Grammar("interlace | progressive")),
            ("update", Spec::Grammar("none | slow | fast")),
            ("device-aspect-ratio", Spec::Grammar("<ratio>")),
            ("device-height", Spec::Grammar("<len>")),
            ("device-width", Spec::Grammar("<len>")),
        ],
    },
    Scope {
        name: "page",
        all: true,
        picks: &[],
        own: &[
            ("bleed", Spec::Grammar("auto | <len>")),
            ("marks", Spec::Grammar("none | [ crop || cross ]")),
            (
                "size",
                Spec::Grammar(
                    "<len>{1,2} | auto | [ [ A3 | A4 | A5 | B4 | B5 | JIS-B4 | JIS-B5 | \
                     ledger | legal | letter ] || [ portrait | landscape ] ]",
                ),
            ),
        ],
    },
    Scope {
        name: "property",
        all: false,
        picks: &[],
        own: &[
            ("inherits", Spec::Grammar("true | false")),
            ("initial-value", Spec::Known),
            ("syntax", Spec::Grammar("<string>")),
        ],
    },
];

/// Descriptor table of the at-rule `name` (without `@`)
pub fn scope(name: &str) -> Option<&'static Scope> {
    SCOPES.iter().find(|s| s.name == name)
}

#[cfg(test)]
pub(crate) fn grammars() -> impl Iterator<Item = &'static str> {
    SCOPES.iter().flat_map(|s| {
        s.own.iter().filter_map(|(_, spec)| match spec {
            Spec::Grammar(text) => Some(*text),
            Spec::Known => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_lookup() {
        let ff = scope("font-face").unwrap();
        assert!(!ff.all);
        assert_eq!(ff.get("font-display"), Some(Spec::Grammar("auto | block | swap | fallback | optional")));
        assert_eq!(ff.get("font-family"), properties::lookup("font-family"));
        assert_eq!(ff.get("color"), None);
        assert!(scope("media").unwrap().all);
        assert!(scope("keyframes").is_none());
    }

    #[test]
    fn test_own_shadows_property() {
        let ff = scope("font-face").unwrap();
        assert_ne!(ff.get("font-weight"), properties::lookup("font-weight"));
        assert_eq!(scope("property").unwrap().get("initial-value"), Some(Spec::Known));
    }
}
