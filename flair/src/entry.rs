//! Mode dispatch and the truncation notice

use std::str::FromStr;
use std::sync::Arc;

use log::warn;
use thiserror::Error;

use crate::font::FontTable;
use crate::registry::{FontRegistry, RegistryError};
use crate::render::Renderer;
use crate::style::{self, Options};
use crate::truncate::truncate;

/// The font used when art mode does not name one.
pub const DEFAULT_FONT: &str = "standard";

/// What to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Block-glyph art in the named font, or [`DEFAULT_FONT`]
    Art {
        /// Font name; validated when the font is resolved
        font: Option<String>,
    },
    /// The text itself, cut to width
    PlainText,
}

impl Mode {
    /// Art mode in a specific font.
    #[must_use]
    pub fn art(font: impl Into<String>) -> Self {
        Self::Art {
            font: Some(font.into()),
        }
    }
}

/// The tag of a [`Mode`], for parsing from user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// `"art"`, or the older `"flair"`
    Art,
    /// `"plain-text"`, or the older `"text"`
    PlainText,
}

impl FromStr for ModeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "art" | "flair" => Ok(Self::Art),
            "plain-text" | "text" => Ok(Self::PlainText),
            other => Err(Error::UnknownMode(other.to_owned())),
        }
    }
}

/// The result of a render: final text plus whether anything was dropped to fit the width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The text, before styling
    pub output: String,
    /// True if characters were dropped or a line was cut
    pub truncated: bool,
}

impl Rendered {
    /// Hands the output to the terminal formatter.
    #[must_use]
    pub fn styled(&self, options: &Options) -> String {
        style::format_terminal(&self.output, options)
    }
}

/// Renders text in either mode, resolving fonts through an owned [`FontRegistry`]
///
/// ```
/// # use flair::{Flair, Mode};
/// # use flair::font::FontTable;
/// # use flair::style::Options;
/// let flair = Flair::default();
/// let font = FontTable::new(1, [('H', vec!["H"]), ('i', vec!["i"])]).unwrap();
/// flair.register_font("custom", font).unwrap();
/// let rendered = flair.render("Hi", &Mode::art("custom"), &Options::default()).unwrap();
/// assert_eq!(rendered.output, "Hi");
/// assert!(!rendered.truncated);
/// ```
#[derive(Debug, Default)]
pub struct Flair {
    registry: FontRegistry,
}

impl Flair {
    /// Creates a renderer around an existing registry.
    #[must_use]
    pub const fn new(registry: FontRegistry) -> Self {
        Self { registry }
    }

    /// The registry fonts are resolved through.
    #[must_use]
    pub const fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// Registers a custom font; see [`FontRegistry::register`].
    ///
    /// # Errors
    /// Fails if `name` is not a safe font name.
    pub fn register_font(&self, name: &str, font: FontTable) -> Result<(), Error> {
        Ok(self.registry.register(name, font)?)
    }

    /// Renders `text` in the given mode.
    ///
    /// Truncation is not an error: it is reported through [`Rendered::truncated`] and logged as a
    /// warning.
    ///
    /// # Errors
    /// In art mode, fails if the font cannot be resolved.
    pub fn render(&self, text: &str, mode: &Mode, options: &Options) -> Result<Rendered, Error> {
        match mode {
            Mode::Art { font } => self.render_art(text, font.as_deref(), options),
            Mode::PlainText => Ok(Self::render_text(text, options)),
        }
    }

    /// Composes `text` in `font` (or [`DEFAULT_FONT`]), dropping whole glyphs that would pass
    /// the maximum width.
    ///
    /// # Errors
    /// Fails if the font cannot be resolved.
    pub fn render_art(
        &self,
        text: &str,
        font: Option<&str>,
        options: &Options,
    ) -> Result<Rendered, Error> {
        let font: Arc<FontTable> = self.registry.resolve(font.unwrap_or(DEFAULT_FONT))?;
        let max_width = options.effective_max_width();
        let composed = Renderer::new(&font).max_width(max_width).render(text);
        let rendered = Rendered {
            output: composed.canvas.to_string(),
            truncated: composed.truncated,
        };
        report(&rendered, max_width);
        Ok(rendered)
    }

    /// Cuts every line of `text` to the maximum width, marking cuts with an ellipsis.
    #[must_use]
    pub fn render_text(text: &str, options: &Options) -> Rendered {
        let max_width = options.effective_max_width();
        let rendered = truncate(text, max_width);
        report(&rendered, max_width);
        rendered
    }
}

fn report(rendered: &Rendered, max_width: usize) {
    if let Some(notice) = truncation_notice(rendered, max_width) {
        warn!("{notice}");
    }
}

fn truncation_notice(rendered: &Rendered, max_width: usize) -> Option<String> {
    rendered.truncated.then(|| {
        format!("output truncated to fit {max_width} columns; set max_width to change the limit")
    })
}

/// An error from [`Flair`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A font could not be resolved or registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A mode other than `"art"` or `"plain-text"` was requested.
    #[error(r#"unknown mode "{0}", use "art" or "plain-text""#)]
    UnknownMode(String),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Error, Flair, Mode, ModeKind, truncation_notice};
    use crate::font::tests::mock_font;
    use crate::font::{FontName, FontTable, NameError};
    use crate::registry::{Empty, FontRegistry, RegistryError};
    use crate::style::Options;
    use crate::truncate::ELLIPSIS;

    fn with_mock() -> Flair {
        let flair = Flair::new(FontRegistry::new(Empty));
        flair.register_font("mock", mock_font()).unwrap();
        flair
    }

    #[test]
    fn single_glyph() {
        let rendered = with_mock()
            .render("H", &Mode::art("mock"), &Options::default())
            .unwrap();
        assert_eq!(rendered.output, "H H\nHHH\nH H");
        assert!(!rendered.truncated);
    }

    #[test]
    fn art_respects_max_width() {
        let rendered = with_mock()
            .render("HHH", &Mode::art("mock"), &Options::default().max_width(7))
            .unwrap();
        assert_eq!(rendered.output, "H HH H\nHHHHHH\nH HH H");
        assert!(rendered.truncated);
    }

    #[test]
    fn art_defaults_to_eighty_columns() {
        let rendered = with_mock()
            .render(&"H".repeat(30), &Mode::art("mock"), &Options::default())
            .unwrap();
        assert!(rendered.output.split('\n').all(|row| row.len() == 78));
        assert!(rendered.truncated);
    }

    #[test]
    fn plain_text_defaults_to_eighty_columns() {
        let rendered = Flair::render_text(&"a".repeat(100), &Options::default());
        assert_eq!(rendered.output.chars().count(), 80);
        assert!(rendered.output.ends_with(ELLIPSIS));
        assert!(rendered.truncated);
    }

    #[test]
    fn truncation_is_noticed_in_both_modes() {
        let flair = with_mock();
        let narrow = Options::default().max_width(7);
        let art = flair.render("HHH", &Mode::art("mock"), &narrow).unwrap();
        let notice = truncation_notice(&art, narrow.effective_max_width()).unwrap();
        assert!(notice.contains("7 columns"));

        let text = Flair::render_text(&"a".repeat(100), &Options::default());
        let notice = truncation_notice(&text, Options::default().effective_max_width()).unwrap();
        assert!(notice.contains("80 columns"));

        let fits = flair.render("H", &Mode::art("mock"), &narrow).unwrap();
        assert_eq!(truncation_notice(&fits, 7), None);
        let fits = Flair::render_text("hello", &Options::default());
        assert_eq!(truncation_notice(&fits, 80), None);
    }

    #[test]
    fn plain_text_never_touches_fonts() {
        let flair = Flair::new(FontRegistry::new(Empty));
        let rendered = flair
            .render("hello", &Mode::PlainText, &Options::default())
            .unwrap();
        assert_eq!(rendered.output, "hello");
        assert!(!rendered.truncated);
    }

    #[test]
    fn registered_json_font() {
        let flair = Flair::new(FontRegistry::new(Empty));
        flair
            .registry()
            .register_json(
                "custom",
                &json!({"height": 1, "chars": {"H": ["H"], "i": ["i"], " ": [" "]}}),
            )
            .unwrap();
        let rendered = flair
            .render("Hi", &Mode::art("custom"), &Options::default())
            .unwrap();
        assert_eq!(rendered.output, "Hi");
        assert!(!rendered.truncated);
    }

    #[test]
    fn font_errors_surface() {
        let flair = Flair::new(FontRegistry::new(Empty));
        assert_eq!(
            flair.render("x", &Mode::art("../index"), &Options::default()),
            Err(Error::Registry(RegistryError::InvalidName(NameError(
                "../index".to_owned()
            ))))
        );
        assert_eq!(
            flair.render("x", &Mode::Art { font: None }, &Options::default()),
            Err(Error::Registry(RegistryError::UnknownFont(
                FontName::new("standard").unwrap()
            )))
        );
        assert!(matches!(
            flair.register_font("-bad", FontTable::new(1, [('a', vec!["a"])]).unwrap()),
            Err(Error::Registry(RegistryError::InvalidName(_)))
        ));
    }

    #[test]
    fn modes_parse() {
        assert_eq!("art".parse::<ModeKind>(), Ok(ModeKind::Art));
        assert_eq!("flair".parse::<ModeKind>(), Ok(ModeKind::Art));
        assert_eq!("plain-text".parse::<ModeKind>(), Ok(ModeKind::PlainText));
        assert_eq!("text".parse::<ModeKind>(), Ok(ModeKind::PlainText));
        let error = "invalid".parse::<ModeKind>().unwrap_err();
        assert_eq!(error, Error::UnknownMode("invalid".to_owned()));
        assert_eq!(error.to_string(), r#"unknown mode "invalid", use "art" or "plain-text""#);
    }

    #[test]
    fn styled_output() {
        let rendered = Flair::render_text("hello", &Options::default());
        let styled = rendered.styled(&Options::default().border(true));
        assert!(styled.starts_with('┌'));
        assert!(styled.contains("│ hello │"));
    }

    #[cfg(feature = "fonts")]
    #[test]
    fn built_in_art() {
        let flair = Flair::default();
        let rendered = flair
            .render("Hi", &Mode::Art { font: None }, &Options::default())
            .unwrap();
        assert_eq!(rendered.output.split('\n').count(), 5);
        assert!(!rendered.truncated);

        let rendered = flair
            .render(
                "This Is A Really Long String Of Text",
                &Mode::art("ansi-regular"),
                &Options::default(),
            )
            .unwrap();
        assert!(rendered.output.split('\n').all(|row| row.chars().count() <= 80));
        assert!(rendered.truncated);
        assert!(flair.registry().is_cached("ansi-regular"));
    }
}
