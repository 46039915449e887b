//! Function families
//!
//! `<fn:color>`, `<fn:filter>`, `<fn:basicShape>` and `<fn:transform>` accept
//! any function of their family, each checked against its own argument grammar.

type Family = &'static [(&'static str, &'static str)];

const HSL: &str = "<hue> , <pct>#{2} [ , <num-pct0+> ]? | \
     [ <hue> | none ] <num-pct-none>{2} <alpha>? | \
     from <color> [ <hue> | <rel-hsl> ] <rel-hsl-num-pct>{2} [ / <rel-hsl-num-pct> ]?";
const LAB: &str = "<num-pct-none>{3} <alpha>? | \
     from <color> <rel-lab-num-pct>{3} [ / <rel-lab-num-pct> ]?";
const LCH: &str = "<num-pct-none>{2} [ <hue> | none ] <alpha>? | \
     from <color> <rel-lch-num-pct>{2} [ <hue> | <rel-lch> ] [ / <rel-lch-num-pct> ]?";
const RGB: &str = "[ <num>#{3} | <pct>#{3} ] [ , <num-pct0+> ]? | \
     <num-pct-none>{3} <alpha>? | \
     from <color> <rel-rgb-num-pct>{3} [ / <rel-rgb-num-pct> ]?";

const COLOR: Family = &[
    (
        "color-mix",
        "in [ srgb | srgb-linear | lab | oklab | xyz | xyz-d50 | xyz-d65 \
         | [ hsl | hwb | lch | oklch ] [ [ shorter | longer | increasing | decreasing ] hue ]? \
         ] , [ <color> && <pct0-100>? ]#{2}",
    ),
    (
        "color",
        "from <color> [ \
         <custom-prop> [ <num-pct-none> <custom-ident> ]# | \
         <rgb-xyz> [ <num-pct-none> | r | g | b | x | y | z ]{3} \
         ] [ / <num-pct-none> | r | g | b | x | y | z ]? | \
         [ <rgb-xyz> <num-pct-none>{3} | <custom-prop> <num-pct-none># ] <alpha>?",
    ),
    ("hsl", HSL),
    (
        "hwb",
        "[ <hue> | none ] <num-pct-none>{2} <alpha>? | \
         from <color> [ <hue> | <rel-hwb> ] <rel-hwb-num-pct>{2} [ / <rel-hwb-num-pct> ]?",
    ),
    ("lab", LAB),
    ("lch", LCH),
    ("light-dark", "<color>#{2}"),
    ("rgb", RGB),
    ("hsla", HSL),
    ("rgba", RGB),
    ("oklab", LAB),
    ("oklch", LCH),
];

const FILTER: Family = &[
    ("blur", "<len>?"),
    ("brightness", "<num-pct>?"),
    ("contrast", "<num-pct>?"),
    ("drop-shadow", "[ <len>{2,3} && <color>? ]?"),
    ("grayscale", "<num-pct>?"),
    ("hue-rotate", "<angle-or-0>?"),
    ("invert", "<num-pct>?"),
    ("opacity", "<num-pct>?"),
    ("saturate", "<num-pct>?"),
    ("sepia", "<num-pct>?"),
];

const BASIC_SHAPE: Family = &[
    ("circle", "<shape-radius> [ at <position> ]?"),
    ("ellipse", "[ <shape-radius>{2} ]? [ at <position> ]?"),
    ("inset", "<inset-arg>"),
    ("path", "[ <fill-rule> , ]? <string>"),
    ("polygon", "[ <fill-rule> , ]? [ <len-pct> <len-pct> ]#"),
    ("rect", "<rect-arg>"),
    ("xywh", "<xywh-arg>"),
];

const TRANSFORM: Family = &[
    ("matrix", "<num>#{6}"),
    ("matrix3d", "<num>#{16}"),
    ("perspective", "<len0+> | none"),
    ("rotate", "<angle-or-0> | none"),
    ("rotate3d", "<num>#{3} , <angle-or-0>"),
    ("rotateX", "<angle-or-0>"),
    ("rotateY", "<angle-or-0>"),
    ("rotateZ", "<angle-or-0>"),
    ("scale", "[ <num-pct> ]#{1,2} | none"),
    ("scale3d", "<num-pct>#{3}"),
    ("scaleX", "<num-pct>"),
    ("scaleY", "<num-pct>"),
    ("scaleZ", "<num-pct>"),
    ("skew", "<angle-or-0> [ , <angle-or-0> ]?"),
    ("skewX", "<angle-or-0>"),
    ("skewY", "<angle-or-0>"),
    ("translate", "<len-pct>#{1,2} | none"),
    ("translate3d", "<len-pct>#{2} , <len>"),
    ("translateX", "<len-pct>"),
    ("translateY", "<len-pct>"),
    ("translateZ", "<len>"),
];

const FAMILIES: &[(&str, Family)] = &[
    ("color", COLOR),
    ("filter", FILTER),
    ("basicShape", BASIC_SHAPE),
    ("transform", TRANSFORM),
];

fn members(family: &str) -> Family {
    FAMILIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(family))
        .map_or(&[], |(_, f)| *f)
}

/// Canonical name of a function family
pub fn family(name: &str) -> Option<&'static str> {
    FAMILIES.iter().map(|(n, _)| *n).find(|n| n.eq_ignore_ascii_case(name))
}

/// Argument grammar of function `name` within `family`
pub fn lookup(family: &str, name: &str) -> Option<&'static str> {
    members(family)
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, body)| *body)
}

pub fn names(family: &str) -> impl Iterator<Item = &'static str> {
    members(family).iter().map(|(n, _)| *n)
}

#[cfg(test)]
pub(crate) fn grammars() -> impl Iterator<Item = &'static str> {
    FAMILIES.iter().flat_map(|(_, f)| f.iter().map(|(_, body)| *body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_names() {
        assert_eq!(family("basicshape"), Some("basicShape"));
        assert_eq!(family("COLOR"), Some("color"));
        assert_eq!(family("gradient"), None);
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(lookup("transform", "rotatex"), Some("<angle-or-0>"));
        assert_eq!(lookup("color", "rgba"), lookup("color", "rgb"));
        assert_eq!(lookup("color", "oklch"), lookup("color", "lch"));
        assert_eq!(lookup("filter", "rotate"), None);
    }

    #[test]
    fn test_names_keep_spelling() {
        assert!(names("transform").any(|n| n == "translateX"));
        assert_eq!(names("nope").count(), 0);
    }
}
