//! Keyword buckets
//!
//! A bucket answers "is this word one of these keywords" by first looking at
//! the (first character, length) pair, so most misses cost a single map probe.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use smallvec::SmallVec;

/// Case-insensitive keyword set keyed by first char and length
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    slots: BTreeMap<(char, usize), SmallVec<[Box<str>; 2]>>,
}

impl Bucket {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bucket = Self::default();
        bucket.extend(words);
        bucket
    }

    /// Add words; a word wrapped in double quotes is stored without them
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref();
            let word = match word.strip_prefix('"').and_then(|w| w.strip_suffix('"')) {
                Some(inner) => inner,
                None => word,
            };
            let low = word.to_lowercase();
            let Some(first) = low.chars().next() else {
                continue;
            };
            let slot = self.slots.entry((first, low.chars().count())).or_default();
            if !slot.iter().any(|w| **w == *low) {
                slot.push(low.into_boxed_str());
            }
        }
    }

    /// Membership test for an already lower-cased word
    pub fn has(&self, low: &str) -> bool {
        let Some(first) = low.chars().next() else {
            return false;
        };
        match self.slots.get(&(first, low.chars().count())) {
            Some(slot) => slot.iter().any(|w| **w == *low),
            None => false,
        }
    }

    /// Membership test for arbitrary-case text
    pub fn has_text(&self, text: &str) -> bool {
        if text.bytes().any(|b| b.is_ascii_uppercase()) || !text.is_ascii() {
            self.has(&text.to_lowercase())
        } else {
            self.has(text)
        }
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All words, ordered by first char then length
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.slots.values().flat_map(|s| s.iter().map(|w| &**w))
    }

    pub fn join(&self, sep: &str) -> String {
        self.words().collect::<Vec<_>>().join(sep)
    }
}

macro_rules! bucket {
    ($name:ident, [$($word:expr),* $(,)?]) => {
        pub static $name: LazyLock<Bucket> = LazyLock::new(|| Bucket::new([$($word),*]));
    };
}

// "]" only improves the error message for `[attr=x ]`
bucket!(ATTR_IS, ["i", "s", "]"]);
bucket!(AND, ["and"]);
bucket!(AND_OR, ["and", "or"]);
bucket!(AUTO, ["auto"]);
bucket!(AUTO_NONE, ["auto", "none"]);
bucket!(EVEN_ODD, ["even", "odd"]);
bucket!(FROM_TO, ["from", "to"]);
bucket!(IMPORTANT, ["important"]);
bucket!(LAYER, ["layer"]);
bucket!(N, ["n"]);
bucket!(NONE, ["none"]);
bucket!(NOT, ["not"]);
bucket!(NOT_ONLY, ["not", "only"]);
bucket!(OF, ["of"]);
bucket!(OR, ["or"]);
bucket!(TO, ["to"]);
bucket!(ALPHA, ["alpha"]);
bucket!(GLOBAL_KEYWORDS, ["initial", "inherit", "revert", "unset"]);

pub static MARGIN_SYMS: LazyLock<Bucket> = LazyLock::new(|| {
    let mut words = Vec::new();
    for side in ["bottom", "top"] {
        words.push(format!("{}-center", side));
        for corner in ["left", "right"] {
            words.push(format!("{}-{}-corner", side, corner));
            words.push(format!("{}-{}", side, corner));
        }
    }
    for side in ["left", "right"] {
        for pos in ["bottom", "middle", "top"] {
            words.push(format!("{}-{}", side, pos));
        }
    }
    Bucket::new(words)
});

/// Named colors, including the CSS2 and CSS4 system colors
pub static COLORS: LazyLock<Bucket> = LazyLock::new(|| Bucket::new(NAMED_COLORS.split(',')));

const NAMED_COLORS: &str = "currentColor,transparent,\
aliceblue,antiquewhite,aqua,aquamarine,azure,\
beige,bisque,black,blanchedalmond,blue,blueviolet,brown,burlywood,\
cadetblue,chartreuse,chocolate,coral,cornflowerblue,cornsilk,crimson,cyan,\
darkblue,darkcyan,darkgoldenrod,darkgray,darkgrey,darkgreen,darkkhaki,\
darkmagenta,darkolivegreen,darkorange,darkorchid,darkred,darksalmon,\
darkseagreen,darkslateblue,darkslategray,darkslategrey,darkturquoise,\
darkviolet,deeppink,deepskyblue,dimgray,dimgrey,dodgerblue,\
firebrick,floralwhite,forestgreen,fuchsia,\
gainsboro,ghostwhite,gold,goldenrod,gray,grey,green,greenyellow,\
honeydew,hotpink,indianred,indigo,ivory,khaki,\
lavender,lavenderblush,lawngreen,lemonchiffon,lightblue,lightcoral,lightcyan,\
lightgoldenrodyellow,lightgray,lightgrey,lightgreen,lightpink,lightsalmon,lightseagreen,\
lightskyblue,lightslategray,lightslategrey,lightsteelblue,lightyellow,lime,limegreen,linen,\
magenta,maroon,mediumaquamarine,mediumblue,mediumorchid,mediumpurple,mediumseagreen,\
mediumslateblue,mediumspringgreen,mediumturquoise,mediumvioletred,\
midnightblue,mintcream,mistyrose,moccasin,navajowhite,navy,\
oldlace,olive,olivedrab,orange,orangered,orchid,\
palegoldenrod,palegreen,paleturquoise,palevioletred,\
papayawhip,peachpuff,peru,pink,plum,powderblue,purple,\
rebeccapurple,red,rosybrown,royalblue,\
saddlebrown,salmon,sandybrown,seagreen,seashell,sienna,silver,\
skyblue,slateblue,slategray,slategrey,snow,springgreen,steelblue,\
tan,teal,thistle,tomato,turquoise,violet,wheat,white,whitesmoke,yellow,yellowgreen,\
ActiveBorder,ActiveCaption,ActiveText,AppWorkspace,\
Background,ButtonBorder,ButtonFace,ButtonHighlight,ButtonShadow,ButtonText,\
Canvas,CanvasText,CaptionText,Field,FieldText,GrayText,Highlight,HighlightText,\
InactiveBorder,InactiveCaption,InactiveCaptionText,InfoBackground,InfoText,\
LinkText,Mark,MarkText,Menu,MenuText,Scrollbar,ThreeDDarkShadow,ThreeDFace,ThreeDHighlight,\
ThreeDLightShadow,ThreeDShadow,VisitedText,Window,WindowFrame,WindowText";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_case_insensitive() {
        let b = Bucket::new(["Auto", "none"]);
        assert!(b.has("auto"));
        assert!(b.has_text("NONE"));
        assert!(!b.has("nonf"));
        assert!(!b.has(""));
    }

    #[test]
    fn test_quoted_words() {
        let b = Bucket::new(["\"[\"", "x"]);
        assert!(b.has("["));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_join_order() {
        let b = Bucket::new(["to", "from", "fr"]);
        assert_eq!(b.join(", "), "fr, from, to");
    }

    #[test]
    fn test_named_buckets() {
        assert!(COLORS.has_text("RebeccaPurple"));
        assert!(COLORS.has("canvastext"));
        assert!(MARGIN_SYMS.has("top-left-corner"));
        assert!(MARGIN_SYMS.has("right-middle"));
        assert_eq!(MARGIN_SYMS.len(), 16);
        assert!(GLOBAL_KEYWORDS.has("revert"));
    }
}
