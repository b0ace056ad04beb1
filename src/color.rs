//! CSS text colours.
//!
//! A counter's text colour is either a plain CSS colour, applied as `color`,
//! or a CSS image (gradient, `url(...)`), painted through the glyphs with a
//! `background-clip: text` overlay. [`TextColor::classify`] tells them
//! apart; [`Rgba`] parses the colour syntaxes.
//!
//! # Examples
//!
//! ```
//! use rolling_counter::color::{Rgba, TextColor};
//!
//! assert_eq!(Rgba::parse("#f00"), Some(Rgba::RED));
//! assert!(matches!(TextColor::classify("rebeccapurple"), TextColor::Color(_)));
//! assert!(matches!(
//!     TextColor::classify("linear-gradient(90deg, red, blue)"),
//!     TextColor::Image(_)
//! ));
//! ```

use std::fmt;

/// RGBA color with f32 components in range [0.0, 1.0].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from u8 RGB components.
    #[must_use]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Create a color from u8 RGBA components.
    #[must_use]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Self::from_rgb_u8(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::from_rgba_u8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::from_rgb_u8(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::from_rgba_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Create a color from HSL values: hue in degrees, saturation and
    /// lightness in [0, 1].
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn from_hsl(h: f32, s: f32, l: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s <= 0.0 {
            return Self::new(l, l, l, a);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f32| {
            let t = t.rem_euclid(1.0);
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        };
        Self::new(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0), a)
    }

    /// Parse any supported CSS colour: hex, `rgb()`/`rgba()`,
    /// `hsl()`/`hsla()`, or a named colour.
    #[must_use]
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim();
        if css.starts_with('#') {
            return Self::from_hex(css);
        }
        let lower = css.to_ascii_lowercase();
        if let Some((name, args)) = function_args(&lower) {
            return match name {
                "rgb" | "rgba" => parse_rgb(&args),
                "hsl" | "hsla" => parse_hsl(&args),
                _ => None,
            };
        }
        if lower == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, hex)| {
                let [_, r, g, b] = hex.to_be_bytes();
                Self::from_rgb_u8(r, g, b)
            })
    }

    /// Convert to u8 RGBA components.
    #[must_use]
    pub fn to_rgba_u8(self) -> (u8, u8, u8, u8) {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a))
    }
}

impl fmt::Display for Rgba {
    #[allow(clippy::many_single_char_names)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.to_rgba_u8();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Split `name(a, b, c)` into its name and arguments. Commas, whitespace
/// and the `/` alpha separator all delimit arguments.
fn function_args(css: &str) -> Option<(&str, Vec<&str>)> {
    let open = css.find('(')?;
    let inner = css[open + 1..].strip_suffix(')')?;
    let args = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    Some((css[..open].trim(), args))
}

/// A number or percentage; percentages scale to `percent_of`.
fn component(arg: &str, percent_of: f32) -> Option<f32> {
    match arg.strip_suffix('%') {
        Some(p) => p.parse::<f32>().ok().map(|v| v / 100.0 * percent_of),
        None => arg.parse::<f32>().ok(),
    }
    .filter(|v| v.is_finite())
}

fn alpha(args: &[&str]) -> Option<f32> {
    match args.get(3) {
        Some(a) => component(a, 1.0).map(|v| v.clamp(0.0, 1.0)),
        None => Some(1.0),
    }
}

fn parse_rgb(args: &[&str]) -> Option<Rgba> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let channel = |i: usize| component(args[i], 255.0).map(|v| v.clamp(0.0, 255.0) / 255.0);
    Some(Rgba::new(channel(0)?, channel(1)?, channel(2)?, alpha(args)?))
}

fn parse_hsl(args: &[&str]) -> Option<Rgba> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let hue = args[0].strip_suffix("deg").unwrap_or(args[0]).parse::<f32>().ok()?;
    let s = component(args[1], 1.0)?;
    let l = component(args[2], 1.0)?;
    Some(Rgba::from_hsl(hue, s, l, alpha(args)?))
}

/// Values of the `color` property that are not colours themselves.
const COLOR_KEYWORDS: [&str; 7] = [
    "currentcolor",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
    "transparent",
];

/// CSS `<image>` functions.
const IMAGE_FUNCTIONS: [&str; 11] = [
    "url",
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
    "repeating-conic-gradient",
    "image",
    "image-set",
    "cross-fade",
    "element",
];

/// How a text colour is painted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextColor {
    /// Valid for the CSS `color` property.
    Color(String),
    /// Valid for `background-image`, painted through the glyphs.
    Image(String),
    /// Neither; styling degrades to nothing.
    Unsupported(String),
}

impl TextColor {
    #[must_use]
    pub fn classify(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if COLOR_KEYWORDS.contains(&lower.as_str()) || Rgba::parse(trimmed).is_some() {
            return Self::Color(trimmed.to_string());
        }
        let is_image = function_args(&lower).is_some_and(|(name, _)| {
            let name = name.strip_prefix("-webkit-").unwrap_or(name);
            IMAGE_FUNCTIONS.contains(&name)
        });
        if is_image {
            Self::Image(trimmed.to_string())
        } else {
            Self::Unsupported(trimmed.to_string())
        }
    }
}

/// CSS named colours as `0x00RRGGBB`.
const NAMED_COLORS: [(&str, u32); 148] = [
    ("aliceblue", 0xf0f8ff), ("antiquewhite", 0xfaebd7), ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4), ("azure", 0xf0ffff), ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4), ("black", 0x000000), ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff), ("blueviolet", 0x8a2be2), ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887), ("cadetblue", 0x5f9ea0), ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e), ("coral", 0xff7f50), ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc), ("crimson", 0xdc143c), ("cyan", 0x00ffff),
    ("darkblue", 0x00008b), ("darkcyan", 0x008b8b), ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9), ("darkgreen", 0x006400), ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b), ("darkmagenta", 0x8b008b), ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00), ("darkorchid", 0x9932cc), ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a), ("darkseagreen", 0x8fbc8f), ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f), ("darkslategrey", 0x2f4f4f), ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3), ("deeppink", 0xff1493), ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969), ("dimgrey", 0x696969), ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222), ("floralwhite", 0xfffaf0), ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff), ("gainsboro", 0xdcdcdc), ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700), ("goldenrod", 0xdaa520), ("gray", 0x808080),
    ("green", 0x008000), ("greenyellow", 0xadff2f), ("grey", 0x808080),
    ("honeydew", 0xf0fff0), ("hotpink", 0xff69b4), ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082), ("ivory", 0xfffff0), ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa), ("lavenderblush", 0xfff0f5), ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd), ("lightblue", 0xadd8e6), ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff), ("lightgoldenrodyellow", 0xfafad2), ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90), ("lightgrey", 0xd3d3d3), ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a), ("lightseagreen", 0x20b2aa), ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899), ("lightslategrey", 0x778899), ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0), ("lime", 0x00ff00), ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6), ("magenta", 0xff00ff), ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa), ("mediumblue", 0x0000cd), ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db), ("mediumseagreen", 0x3cb371), ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a), ("mediumturquoise", 0x48d1cc), ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970), ("mintcream", 0xf5fffa), ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5), ("navajowhite", 0xffdead), ("navy", 0x000080),
    ("oldlace", 0xfdf5e6), ("olive", 0x808000), ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500), ("orangered", 0xff4500), ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa), ("palegreen", 0x98fb98), ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093), ("papayawhip", 0xffefd5), ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f), ("pink", 0xffc0cb), ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6), ("purple", 0x800080), ("rebeccapurple", 0x663399),
    ("red", 0xff0000), ("rosybrown", 0xbc8f8f), ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513), ("salmon", 0xfa8072), ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57), ("seashell", 0xfff5ee), ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0), ("skyblue", 0x87ceeb), ("slateblue", 0x6a5acd),
    ("slategray", 0x708090), ("slategrey", 0x708090), ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f), ("steelblue", 0x4682b4), ("tan", 0xd2b48c),
    ("teal", 0x008080), ("thistle", 0xd8bfd8), ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0), ("violet", 0xee82ee), ("wheat", 0xf5deb3),
    ("white", 0xffffff), ("whitesmoke", 0xf5f5f5), ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Hex display round-trips through parsing.
        #[test]
        fn hex_roundtrip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>()) {
            let color = Rgba::from_rgba_u8(r, g, b, a);
            let parsed = Rgba::parse(&color.to_string()).unwrap();
            prop_assert_eq!(parsed.to_rgba_u8(), (r, g, b, a));
        }

        /// Classification never panics and keeps the trimmed input.
        #[test]
        fn classify_total(s in "\\PC{0,24}") {
            let kept = match TextColor::classify(&s) {
                TextColor::Color(v) | TextColor::Image(v) | TextColor::Unsupported(v) => v,
            };
            prop_assert_eq!(kept, s.trim());
        }
    }
}
