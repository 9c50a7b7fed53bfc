use imglabel_domain::{lblerr, to_lbl, LblError, LblResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::{fmt::Display, str::FromStr};

/// Unmultiplied RGBA color as the host hands it over in CSS notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub rgba: [u8; 4],
}

impl Color {
    pub const DEFAULT_BOX: Color = Color::rgb(255, 0, 0);
    pub const DEFAULT_POINT: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color { rgba: [0, 0, 0, 0] };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color {
            rgba: [r, g, b, 255],
        }
    }
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color {
            rgba: [r, g, b, a],
        }
    }
    pub fn alpha(&self) -> u8 {
        self.rgba[3]
    }
    pub fn is_transparent(&self) -> bool {
        self.alpha() == 0
    }
}

const NAMED_COLORS: [(&str, Color); 12] = [
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("gray", Color::rgb(128, 128, 128)),
];

lazy_static! {
    static ref RE_RGB: Regex = Regex::new(
        r"^rgba?\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$"
    )
    .expect("rgb regex broken");
}

fn parse_hex(hex: &str) -> LblResult<Color> {
    let err = || lblerr!("could not parse '#{}' as hex color", hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err());
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..(i + 1)], 16).map_err(to_lbl);
    let byte = |i: usize| u8::from_str_radix(&hex[i..(i + 2)], 16).map_err(to_lbl);
    match hex.len() {
        // #rgb expands each digit, e.g., #f00 is #ff0000
        3 => Ok(Color::rgb(
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
        )),
        6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => Err(err()),
    }
}

fn parse_rgb(s: &str) -> LblResult<Color> {
    let caps = RE_RGB
        .captures(s)
        .ok_or_else(|| lblerr!("could not parse '{}' as rgb color", s))?;
    let channel = |i: usize| -> LblResult<u8> {
        caps.get(i)
            .ok_or_else(|| lblerr!("missing channel {} in '{}'", i, s))?
            .as_str()
            .parse::<u8>()
            .map_err(|_| lblerr!("channel {} of '{}' exceeds 255", i, s))
    };
    let alpha = match caps.get(4) {
        Some(a) => {
            let a = a.as_str().parse::<f64>().map_err(to_lbl)?;
            if !(0.0..=1.0).contains(&a) {
                return Err(lblerr!("alpha of '{}' needs to be in [0, 1]", s));
            }
            (a * 255.0).round() as u8
        }
        None => 255,
    };
    Ok(Color::rgba(channel(1)?, channel(2)?, channel(3)?, alpha))
}

impl FromStr for Color {
    type Err = LblError;
    fn from_str(s: &str) -> LblResult<Self> {
        let s = s.trim().to_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            parse_hex(hex)
        } else if s.starts_with("rgb") {
            parse_rgb(&s)
        } else if s == "transparent" || s.is_empty() {
            // an empty fill means no fill
            Ok(Color::TRANSPARENT)
        } else {
            NAMED_COLORS
                .iter()
                .find(|(name, _)| *name == s)
                .map(|(_, c)| *c)
                .ok_or_else(|| lblerr!("unknown color '{}'", s))
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.rgba;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[test]
fn test_parse_hex() {
    assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
    assert_eq!("#F00".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(
        "#00ff0080".parse::<Color>().unwrap(),
        Color::rgba(0, 255, 0, 128)
    );
    assert!("#ff00".parse::<Color>().is_err());
    assert!("#gg0000".parse::<Color>().is_err());
}

#[test]
fn test_parse_rgb_and_names() {
    assert_eq!(
        "rgb(1, 2, 3)".parse::<Color>().unwrap(),
        Color::rgb(1, 2, 3)
    );
    assert_eq!(
        "rgba(1,2,3,0.5)".parse::<Color>().unwrap(),
        Color::rgba(1, 2, 3, 128)
    );
    assert!("rgb(256, 2, 3)".parse::<Color>().is_err());
    // only ascii digits are channels
    let err = "rgb(\u{0661}, 2, 3)".parse::<Color>().unwrap_err();
    assert!(err.msg().contains("could not parse"), "{}", err.msg());
    assert!("rgba(1, 2, 3, 1.5)".parse::<Color>().is_err());
    assert_eq!(" Blue ".parse::<Color>().unwrap(), Color::rgb(0, 0, 255));
    assert!("".parse::<Color>().unwrap().is_transparent());
    assert!("blurple".parse::<Color>().is_err());
}

#[test]
fn test_display() {
    assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
    assert_eq!(Color::rgba(0, 0, 0, 1).to_string(), "#00000001");
    let c = Color::rgba(12, 34, 56, 78);
    assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
}
