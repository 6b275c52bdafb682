//! Glyph composition
//!
//! The [`Renderer`] lays out one glyph per input character, side by side, and never splits a
//! glyph: if a maximum width is set, composition stops before the first glyph that would not fit.
use std::fmt::{self, Display};

use itertools::Itertools as _;

use crate::font::{FontTable, Glyph};

/// The main type for composing glyphs
///
/// ```
/// # use flair::font::FontTable;
/// # use flair::render::Renderer;
/// let font = FontTable::new(3, [('H', vec!["H H", "HHH", "H H"])]).unwrap();
/// let composed = Renderer::new(&font).max_width(7).render("HHH");
/// assert_eq!(composed.canvas.to_string(), "H HH H\nHHHHHH\nH HH H");
/// assert!(composed.truncated);
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'font, W> {
    font: &'font FontTable,
    width: W,
}

impl<W: WidthConfig> Renderer<'_, W> {
    /// Composes the given string, one glyph per `char`.
    ///
    /// Characters without a glyph are drawn with the font's fallback glyph. Newlines are not
    /// special: they have no glyph and fall back like any other character.
    pub fn render(self, string: &str) -> W::Output {
        let (canvas, truncated) = self.compose(string);
        W::finish(canvas, truncated)
    }

    fn compose(&self, string: &str) -> (Canvas, bool) {
        let mut canvas = Canvas::new(self.font.height().get());
        for c in string.chars() {
            let glyph = self.font.glyph(c);
            if self
                .width
                .as_option()
                .is_some_and(|max_width| canvas.width + glyph.width() > max_width)
            {
                return (canvas, true);
            }
            canvas.append(glyph);
        }
        (canvas, false)
    }
}

impl<'font> Renderer<'font, Unbounded> {
    /// Creates a new renderer with no maximum width.
    pub const fn new(font: &'font FontTable) -> Self {
        Self {
            font,
            width: Unbounded,
        }
    }

    /// Sets a maximum width (in `char`s) for the output. This changes the output type to
    /// [`Composed`], since characters past the width are dropped and the caller needs to know.
    pub const fn max_width(self, width: usize) -> Renderer<'font, Bounded> {
        Renderer {
            font: self.font,
            width: Bounded(width),
        }
    }
}

impl FontTable {
    /// Composes a string with no maximum width.
    #[must_use]
    pub fn render(&self, string: &str) -> String {
        Renderer::new(self).render(string).to_string()
    }
}

/// The rows produced by one composition
///
/// Always has exactly as many rows as the font is tall. Displays as the rows joined with `'\n'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    rows: Vec<String>,
    width: usize,
}

impl Canvas {
    fn new(height: usize) -> Self {
        Self {
            rows: vec![String::new(); height],
            width: 0,
        }
    }

    fn append(&mut self, glyph: &Glyph) {
        for (row, glyph_row) in self.rows.iter_mut().zip(glyph.rows()) {
            row.push_str(glyph_row);
        }
        self.width += glyph.width();
    }

    /// The rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// The width of the first row, in `char`s.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
}

impl Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows.iter().format("\n"))
    }
}

/// A canvas composed under a maximum width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    /// The glyphs that fit
    pub canvas: Canvas,
    /// True if at least one character was dropped
    pub truncated: bool,
}

/// Trait for setting the width in a type-safe manner
pub trait WidthConfig: Sized {
    /// What [`Renderer::render`] returns.
    type Output;

    /// Wraps up a finished composition.
    fn finish(canvas: Canvas, truncated: bool) -> Self::Output;
    /// `Some(width)` on [`Bounded`], `None` on [`Unbounded`].
    fn as_option(&self) -> Option<usize>;
}

/// Statically denotes that the output width is unbounded
#[derive(Debug, Clone, Copy)]
pub struct Unbounded;

impl WidthConfig for Unbounded {
    type Output = Canvas;

    fn finish(canvas: Canvas, truncated: bool) -> Canvas {
        debug_assert!(!truncated, "unbounded composition dropped characters");
        canvas
    }

    fn as_option(&self) -> Option<usize> {
        None
    }
}

/// Statically denotes that the output width is bounded
#[derive(Debug, Clone, Copy)]
pub struct Bounded(usize);

impl WidthConfig for Bounded {
    type Output = Composed;

    fn finish(canvas: Canvas, truncated: bool) -> Composed {
        Composed { canvas, truncated }
    }

    fn as_option(&self) -> Option<usize> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Renderer;
    use crate::font::tests::mock_font;
    use crate::font::FontTable;

    #[test]
    fn single_character() {
        assert_eq!(mock_font().render("H"), "H H\nHHH\nH H");
    }

    #[test]
    fn side_by_side() {
        assert_eq!(mock_font().render("Hi"), "H H . \nHHH i \nH H i ");
    }

    #[test]
    fn unknown_falls_back_to_space() {
        assert_eq!(mock_font().render("H?"), "H H   \nHHH   \nH H   ");
    }

    #[test]
    fn unknown_without_space_is_blank() {
        let font = FontTable::new(2, [('x', vec!["x", "x"])]).unwrap();
        assert_eq!(font.render("x?x"), "xx\nxx");
    }

    #[test]
    fn empty_input() {
        let font = mock_font();
        let composed = Renderer::new(&font).max_width(80).render("");
        assert_eq!(composed.canvas.rows(), ["", "", ""]);
        assert_eq!(composed.canvas.to_string(), "\n\n");
        assert!(!composed.truncated);
    }

    #[test]
    fn drops_glyphs_that_would_overflow() {
        let font = mock_font();
        let composed = Renderer::new(&font).max_width(7).render("HHH");
        assert_eq!(composed.canvas.to_string(), "H HH H\nHHHHHH\nH HH H");
        assert_eq!(composed.canvas.width(), 6);
        assert!(composed.truncated);
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let font = mock_font();
        let composed = Renderer::new(&font).max_width(6).render("HH");
        assert_eq!(composed.canvas.width(), 6);
        assert!(!composed.truncated);
    }

    #[test]
    fn first_glyph_too_wide() {
        let font = mock_font();
        for width in [0, 2] {
            let composed = Renderer::new(&font).max_width(width).render("Hi");
            assert_eq!(composed.canvas.to_string(), "\n\n");
            assert!(composed.truncated);
        }
    }

    #[test]
    fn stops_at_first_overflow() {
        let font = FontTable::new(1, [('w', vec!["www"]), ('n', vec!["n"])]).unwrap();
        let composed = Renderer::new(&font).max_width(4).render("nwn");
        assert_eq!(composed.canvas.to_string(), "n");
        assert!(composed.truncated);
    }

    proptest! {
        #[test]
        fn height_is_preserved(s in "[ -~]{0,40}") {
            let font = mock_font();
            prop_assert_eq!(Renderer::new(&font).render(&s).rows().len(), 3);
        }

        #[test]
        fn rows_fit_the_width(s in "[Hi ?]{0,40}", width in 0usize..60) {
            let font = mock_font();
            let composed = Renderer::new(&font).max_width(width).render(&s);
            for row in composed.canvas.rows() {
                prop_assert!(row.chars().count() <= width);
            }
        }

        #[test]
        fn composition_is_deterministic(s in "[Hi ?]{0,20}", width in 0usize..60) {
            let font = mock_font();
            let first = Renderer::new(&font).max_width(width).render(&s);
            let second = Renderer::new(&font).max_width(width).render(&s);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn missing_glyphs_match_space(c in any::<char>().prop_filter("covered", |c| !"Hi ".contains(*c))) {
            let font = mock_font();
            prop_assert_eq!(font.render(&c.to_string()), font.render(" "));
        }
    }
}
