//! Color value classification.

/// What kind of color a value holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKind {
    /// `#rgb` or `#rrggbb`. The alpha forms `#rgba` / `#rrggbbaa` are not
    /// matched.
    Hex,
    /// One of the CSS named colors, e.g. `steelblue`.
    Named,
    /// `rgb()`, `rgba()`, `hsl()` or `hsla()` with some arguments.
    Functional,
    /// Keywords (`none`, `inherit`, `currentColor`, ...), paint server
    /// references (`url(#g)`) and anything else.
    NotAColor,
}

impl ColorKind {
    pub fn is_color(self) -> bool {
        self != ColorKind::NotAColor
    }
}

/// Classify a paint value. Never fails.
pub fn classify(value: &str) -> ColorKind {
    let value = value.trim();

    if is_hex_color(value) {
        ColorKind::Hex
    } else if is_functional_color(value) {
        ColorKind::Functional
    } else if is_named_color(value) {
        ColorKind::Named
    } else {
        ColorKind::NotAColor
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn is_functional_color(value: &str) -> bool {
    let Some((name, rest)) = value.split_once('(') else {
        return false;
    };
    let Some(args) = rest.strip_suffix(')') else {
        return false;
    };

    ["rgb", "rgba", "hsl", "hsla"]
        .iter()
        .any(|f| name.eq_ignore_ascii_case(f))
        && !args.trim().is_empty()
}

fn is_named_color(value: &str) -> bool {
    // Longest name is "lightgoldenrodyellow"
    if value.is_empty() || value.len() > 20 {
        return false;
    }
    let lower = value.to_ascii_lowercase();
    NAMED_COLORS.binary_search(&lower.as_str()).is_ok()
}

/// CSS named colors, sorted for binary search. `transparent` and
/// `currentcolor` are keywords, not colors.
static NAMED_COLORS: &[&str] = &[
    "aliceblue",
    "antiquewhite",
    "aqua",
    "aquamarine",
    "azure",
    "beige",
    "bisque",
    "black",
    "blanchedalmond",
    "blue",
    "blueviolet",
    "brown",
    "burlywood",
    "cadetblue",
    "chartreuse",
    "chocolate",
    "coral",
    "cornflowerblue",
    "cornsilk",
    "crimson",
    "cyan",
    "darkblue",
    "darkcyan",
    "darkgoldenrod",
    "darkgray",
    "darkgreen",
    "darkgrey",
    "darkkhaki",
    "darkmagenta",
    "darkolivegreen",
    "darkorange",
    "darkorchid",
    "darkred",
    "darksalmon",
    "darkseagreen",
    "darkslateblue",
    "darkslategray",
    "darkslategrey",
    "darkturquoise",
    "darkviolet",
    "deeppink",
    "deepskyblue",
    "dimgray",
    "dimgrey",
    "dodgerblue",
    "firebrick",
    "floralwhite",
    "forestgreen",
    "fuchsia",
    "gainsboro",
    "ghostwhite",
    "gold",
    "goldenrod",
    "gray",
    "green",
    "greenyellow",
    "grey",
    "honeydew",
    "hotpink",
    "indianred",
    "indigo",
    "ivory",
    "khaki",
    "lavender",
    "lavenderblush",
    "lawngreen",
    "lemonchiffon",
    "lightblue",
    "lightcoral",
    "lightcyan",
    "lightgoldenrodyellow",
    "lightgray",
    "lightgreen",
    "lightgrey",
    "lightpink",
    "lightsalmon",
    "lightseagreen",
    "lightskyblue",
    "lightslategray",
    "lightslategrey",
    "lightsteelblue",
    "lightyellow",
    "lime",
    "limegreen",
    "linen",
    "magenta",
    "maroon",
    "mediumaquamarine",
    "mediumblue",
    "mediumorchid",
    "mediumpurple",
    "mediumseagreen",
    "mediumslateblue",
    "mediumspringgreen",
    "mediumturquoise",
    "mediumvioletred",
    "midnightblue",
    "mintcream",
    "mistyrose",
    "moccasin",
    "navajowhite",
    "navy",
    "oldlace",
    "olive",
    "olivedrab",
    "orange",
    "orangered",
    "orchid",
    "palegoldenrod",
    "palegreen",
    "paleturquoise",
    "palevioletred",
    "papayawhip",
    "peachpuff",
    "peru",
    "pink",
    "plum",
    "powderblue",
    "purple",
    "rebeccapurple",
    "red",
    "rosybrown",
    "royalblue",
    "saddlebrown",
    "salmon",
    "sandybrown",
    "seagreen",
    "seashell",
    "sienna",
    "silver",
    "skyblue",
    "slateblue",
    "slategray",
    "slategrey",
    "snow",
    "springgreen",
    "steelblue",
    "tan",
    "teal",
    "thistle",
    "tomato",
    "turquoise",
    "violet",
    "wheat",
    "white",
    "whitesmoke",
    "yellow",
    "yellowgreen",
];
