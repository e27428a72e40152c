//! Per-role colors.
//!
//! Every [`Logger`](crate::Logger) carries a [`ColorRegistry`] holding one
//! [`ColorDefinition`] for each [`Role`]. A definition renders both ways a
//! line can be colored: an ANSI foreground wrapper for terminals and a
//! `rgb(r, g, b)` string for CSS-style `%c` directives.

use crate::console::ColorLevel;
use crate::error::ColorError;
use nu_ansi_term::{Color, Style};
use std::fmt;
use std::str::FromStr;

/// The six colorable parts of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The timestamp in front of every line.
    Prefix,
    Log,
    Info,
    Debug,
    Warn,
    Error,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Prefix,
        Role::Log,
        Role::Info,
        Role::Debug,
        Role::Warn,
        Role::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Prefix => "prefix",
            Role::Log => "log",
            Role::Info => "info",
            Role::Debug => "debug",
            Role::Warn => "warn",
            Role::Error => "error",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Built-in color of this role for a freshly constructed logger.
    pub fn default_rgb(self) -> Rgb {
        match self {
            Role::Prefix => Rgb::new(128, 128, 128), // grey
            Role::Log => Rgb::new(144, 238, 144),    // lightgreen
            Role::Info => Rgb::new(128, 128, 128),
            Role::Debug => Rgb::new(128, 128, 128),
            Role::Warn => Rgb::new(255, 255, 224), // lightyellow
            Role::Error => Rgb::new(255, 0, 0),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ColorError::InvalidRole {
                role: s.to_string(),
            })
    }
}

/// One of the three RGB channels, named in channel errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::R => "r",
            Channel::G => "g",
            Channel::B => "b",
        })
    }
}

/// A validated 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Validates untyped channel values, reporting the first bad one in
    /// r, g, b order.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Result<Self, ColorError> {
        Ok(Self {
            r: check_channel(Channel::R, r)?,
            g: check_channel(Channel::G, g)?,
            b: check_channel(Channel::B, b)?,
        })
    }
}

fn check_channel(channel: Channel, value: f64) -> Result<u8, ColorError> {
    if value.is_finite() && value.fract() == 0.0 && (0.0..=255.0).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ColorError::InvalidChannel { channel, value })
    }
}

/// Basic palette in escape order: `30..=37` then `90..=97`.
const BASIC: [Color; 16] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Purple,
    Color::Cyan,
    Color::White,
    Color::DarkGray,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightPurple,
    Color::LightCyan,
    Color::LightGray,
];

/// Nearest entry of the xterm 256 color palette.
fn rgb_to_ansi256(rgb: Rgb) -> u8 {
    let (r, g, b) = (rgb.r as f64, rgb.g as f64, rgb.b as f64);
    if rgb.r == rgb.g && rgb.g == rgb.b {
        return match rgb.r {
            0..=7 => 16,
            249..=255 => 231,
            _ => ((r - 8.0) / 247.0 * 24.0).round() as u8 + 232,
        };
    }
    let cube = |v: f64| (v / 255.0 * 5.0).round() as u8;
    16 + 36 * cube(r) + 6 * cube(g) + cube(b)
}

/// Folds a 256 palette entry onto the 16 basic colors.
fn ansi256_to_basic(code: u8) -> Color {
    if code < 16 {
        return BASIC[code as usize];
    }
    let (r, g, b) = if code >= 232 {
        let grey = ((code - 232) as f64 * 10.0 + 8.0) / 255.0;
        (grey, grey, grey)
    } else {
        let cube = code - 16;
        let rem = cube % 36;
        (
            (cube / 36) as f64 / 5.0,
            (rem / 6) as f64 / 5.0,
            (rem % 6) as f64 / 5.0,
        )
    };
    let value = r.max(g).max(b) * 2.0;
    if value == 0.0 {
        return Color::Black;
    }
    let index = ((b.round() as usize) << 2) | ((g.round() as usize) << 1) | r.round() as usize;
    if value == 2.0 {
        BASIC[index + 8]
    } else {
        BASIC[index]
    }
}

/// A resolved color usable in both rendering modes.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorDefinition {
    rgb: Rgb,
    css: String,
}

impl ColorDefinition {
    pub fn new(rgb: Rgb) -> Self {
        Self {
            rgb,
            css: format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
        }
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// The `rgb(r, g, b)` form used in CSS directives.
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Foreground color at the given terminal depth, `None` without color.
    pub fn ansi_color(&self, level: ColorLevel) -> Option<Color> {
        let rgb = self.rgb;
        match level {
            ColorLevel::None => None,
            ColorLevel::Basic => Some(ansi256_to_basic(rgb_to_ansi256(rgb))),
            ColorLevel::Ansi256 => Some(Color::Fixed(rgb_to_ansi256(rgb))),
            ColorLevel::TrueColor => Some(Color::Rgb(rgb.r, rgb.g, rgb.b)),
        }
    }

    /// Wraps `text` in the ANSI escapes for this foreground color, reduced
    /// to what a terminal at `level` can show.
    pub fn paint(&self, text: &str, level: ColorLevel) -> String {
        match self.ansi_color(level) {
            Some(color) => Style::new().fg(color).paint(text).to_string(),
            None => text.to_string(),
        }
    }
}

/// Fully populated role → color table.
///
/// There is no way to leave a role unset: the table is created with every
/// default and each update swaps exactly one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRegistry {
    entries: [ColorDefinition; 6],
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self {
            entries: Role::ALL.map(|role| ColorDefinition::new(role.default_rgb())),
        }
    }
}

impl ColorRegistry {
    pub fn get(&self, role: Role) -> &ColorDefinition {
        &self.entries[role.index()]
    }

    /// Replaces the color of `role` with an already validated value.
    pub fn set(&mut self, role: Role, rgb: Rgb) {
        self.entries[role.index()] = ColorDefinition::new(rgb);
    }

    /// Replaces a role color from untyped input.
    ///
    /// `role` must be one of `prefix`, `log`, `info`, `debug`, `warn` or
    /// `error`. Each channel must be a finite integer in `0..=255`. Nothing
    /// is changed when validation fails.
    pub fn set_color(&mut self, role: &str, r: f64, g: f64, b: f64) -> Result<(), ColorError> {
        let role: Role = role.parse()?;
        let rgb = Rgb::from_channels(r, g, b)?;
        self.set(role, rgb);
        tracing::debug!("color of {} set to {}", role, self.get(role).css());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_role() {
        let colors = ColorRegistry::default();
        assert_eq!(colors.get(Role::Prefix).css(), "rgb(128, 128, 128)");
        assert_eq!(colors.get(Role::Log).css(), "rgb(144, 238, 144)");
        assert_eq!(colors.get(Role::Info).css(), "rgb(128, 128, 128)");
        assert_eq!(colors.get(Role::Debug).css(), "rgb(128, 128, 128)");
        assert_eq!(colors.get(Role::Warn).css(), "rgb(255, 255, 224)");
        assert_eq!(colors.get(Role::Error).css(), "rgb(255, 0, 0)");
    }

    #[test]
    fn test_role_parsing() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("Warn".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_paint_wraps_text_in_truecolor_escape() {
        let red = ColorDefinition::new(Rgb::new(255, 0, 0));
        assert_eq!(
            red.paint("boom", ColorLevel::TrueColor),
            "\x1b[38;2;255;0;0mboom\x1b[0m"
        );
    }

    #[test]
    fn test_paint_downsamples_to_terminal_depth() {
        let red = ColorDefinition::new(Rgb::new(255, 0, 0));
        assert_eq!(
            red.paint("boom", ColorLevel::Ansi256),
            "\x1b[38;5;196mboom\x1b[0m"
        );
        assert_eq!(red.paint("boom", ColorLevel::Basic), "\x1b[91mboom\x1b[0m");
        assert_eq!(red.paint("boom", ColorLevel::None), "boom");
    }

    #[test]
    fn test_palette_reduction() {
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 255, 255)), 231);
        assert_eq!(rgb_to_ansi256(Rgb::new(128, 128, 128)), 244);
        assert_eq!(rgb_to_ansi256(Rgb::new(144, 238, 144)), 157);

        assert_eq!(ansi256_to_basic(9), Color::LightRed);
        assert_eq!(ansi256_to_basic(16), Color::Black);
        assert_eq!(ansi256_to_basic(244), Color::White);
        assert_eq!(ansi256_to_basic(157), Color::LightGray);
    }

    #[test]
    fn test_channel_validation() {
        assert_eq!(Rgb::from_channels(0.0, 255.0, 17.0), Ok(Rgb::new(0, 255, 17)));
        assert!(Rgb::from_channels(-1.0, 0.0, 0.0).is_err());
        assert!(Rgb::from_channels(0.0, 255.5, 0.0).is_err());
        assert!(Rgb::from_channels(0.0, 0.0, f64::NAN).is_err());
        assert!(Rgb::from_channels(f64::INFINITY, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_failed_update_leaves_registry_untouched() {
        let mut colors = ColorRegistry::default();
        let before = colors.clone();
        assert!(colors.set_color("warn", 1.0, 2.0, 300.0).is_err());
        assert!(colors.set_color("nope", 1.0, 2.0, 3.0).is_err());
        assert_eq!(colors, before);
    }

    #[test]
    fn test_update_touches_only_one_role() {
        let mut colors = ColorRegistry::default();
        colors.set_color("info", 1.0, 2.0, 3.0).unwrap();
        assert_eq!(colors.get(Role::Info).css(), "rgb(1, 2, 3)");
        assert_eq!(colors.get(Role::Debug).css(), "rgb(128, 128, 128)");
    }
}
