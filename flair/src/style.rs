//! Cosmetic output formatting
//!
//! Everything here runs after composition and truncation, and none of it changes what was dropped:
//! a border or padding may make the output wider or taller than `max_width`.

use std::fmt::{self, Display};
use std::iter;
use std::str::FromStr;

use itertools::Itertools as _;
use serde::Deserialize;
use thiserror::Error;

use crate::str_ext::StrExt as _;

/// Width used when [`Options::max_width`] is unset or 0.
pub const DEFAULT_MAX_WIDTH: usize = 80;

/// Render configuration
///
/// Deserializes from the same camelCase object shape a JSON options file uses, with every field
/// optional:
///
/// ```
/// # use flair::style::{Color, Options};
/// let options: Options = serde_json::from_str(r#"{"color": "cyan", "maxWidth": 40}"#).unwrap();
/// assert_eq!(options, Options::default().color(Color::Cyan).max_width(40));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Foreground color
    pub color: Option<Color>,
    /// Bold text (ANSI only)
    pub bold: bool,
    /// Wrap the output in a box
    pub border: bool,
    /// Blank lines above and below
    pub padding: usize,
    /// Maximum line width in `char`s; `None` and 0 both mean [`DEFAULT_MAX_WIDTH`]
    pub max_width: Option<usize>,
}

impl Options {
    /// Sets the color.
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets bold.
    #[must_use]
    pub const fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the border.
    #[must_use]
    pub const fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Sets the padding.
    #[must_use]
    pub const fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the maximum width.
    #[must_use]
    pub const fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// The maximum width after applying the default.
    #[must_use]
    pub fn effective_max_width(&self) -> usize {
        self.max_width
            .filter(|&width| width > 0)
            .unwrap_or(DEFAULT_MAX_WIDTH)
    }
}

/// The color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Every color, in ANSI order.
    pub const ALL: [Self; 7] = [
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// The lowercase name, also used as the CSS color.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }

    const fn ansi(self) -> console::Color {
        match self {
            Self::Red => console::Color::Red,
            Self::Green => console::Color::Green,
            Self::Yellow => console::Color::Yellow,
            Self::Blue => console::Color::Blue,
            Self::Magenta => console::Color::Magenta,
            Self::Cyan => console::Color::Cyan,
            Self::White => console::Color::White,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

/// A color name outside the palette
#[derive(Debug, Error, PartialEq, Eq)]
#[error(r#"unknown color "{0}""#)]
pub struct UnknownColor(pub String);

/// Wraps `text` in a box, padding every line to the widest one.
#[must_use]
pub fn apply_border(text: &str) -> String {
    let width = text.split('\n').map(|line| line.width()).max().unwrap_or(0);
    let rule = "─".repeat(width + 2);
    let body = text.split('\n').map(|line| {
        let fill = " ".repeat(width - line.width());
        format!("│ {line}{fill} │")
    });
    iter::once(format!("┌{rule}┐"))
        .chain(body)
        .chain(iter::once(format!("└{rule}┘")))
        .join("\n")
}

/// Adds `padding` blank lines above and below `text`.
#[must_use]
pub fn apply_padding(text: &str, padding: usize) -> String {
    let pad = "\n".repeat(padding);
    format!("{pad}{text}{pad}")
}

/// Wraps `text` in ANSI escapes for `color` and `bold`, or returns it unchanged if neither is set.
///
/// The color escape comes before the bold one.
#[must_use]
pub fn apply_ansi(text: &str, color: Option<Color>, bold: bool) -> String {
    if color.is_none() && !bold {
        return text.to_owned();
    }
    let mut style = console::Style::new().force_styling(true);
    if let Some(color) = color {
        style = style.fg(color.ansi());
    }
    if bold {
        style = style.bold();
    }
    style.apply_to(text).to_string()
}

/// Formats for a terminal: border, then padding, then ANSI color and weight.
#[must_use]
pub fn format_terminal(text: &str, options: &Options) -> String {
    let mut text = text.to_owned();
    if options.border {
        text = apply_border(&text);
    }
    if options.padding > 0 {
        text = apply_padding(&text, options.padding);
    }
    apply_ansi(&text, options.color, options.bold)
}

/// Formats for a browser console: border and padding, plus a `%c` directive and its CSS when any
/// style is set.
#[must_use]
pub fn format_css(text: &str, options: &Options) -> (String, Option<String>) {
    let mut declarations = Vec::new();
    if let Some(color) = options.color {
        declarations.push(format!("color: {color}"));
    }
    if options.bold {
        declarations.push("font-weight: bold".to_owned());
    }
    let mut text = text.to_owned();
    if options.border {
        text = apply_border(&text);
    }
    if options.padding > 0 {
        text = apply_padding(&text, options.padding);
    }
    if declarations.is_empty() {
        (text, None)
    } else {
        (format!("%c{text}"), Some(declarations.join("; ")))
    }
}
