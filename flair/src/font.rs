//! Font tables
//!
//! A [`FontTable`] is a fixed-height set of glyphs keyed by character. Tables are immutable once
//! built; the [`registry`](crate::registry) hands them out behind an [`Arc`](std::sync::Arc).

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::num::NonZero;

use itertools::Itertools as _;
use log::warn;
use serde_json::Value;
use thiserror::Error;

use crate::str_ext::StrExt as _;

/// A validated font name
///
/// Names are lowercase ASCII letters, digits and hyphens, and must not start with a hyphen. This
/// keeps user-controlled names from ever looking like a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontName(String);

impl FontName {
    /// Validates `name`.
    ///
    /// # Errors
    /// Returns [`NameError`] if `name` is empty or does not match `[a-z0-9][a-z0-9-]*`.
    pub fn new(name: &str) -> Result<Self, NameError> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if valid_start && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
            Ok(Self(name.to_owned()))
        } else {
            Err(NameError(name.to_owned()))
        }
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The rows of one character in a [`FontTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    rows: Vec<String>,
    width: usize,
}

impl Glyph {
    fn new(rows: Vec<String>) -> Self {
        let width = rows.first().map_or(0, |row| row.width());
        Self { rows, width }
    }

    fn blank(height: NonZero<usize>) -> Self {
        Self::new(vec![String::new(); height.get()])
    }

    /// The rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// The width of the first row, in `char`s. All rows are expected to share it.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
}

/// A fixed-height glyph table
#[derive(Debug, Clone)]
pub struct FontTable {
    height: NonZero<usize>,
    glyphs: HashMap<char, Glyph>,
    fallback: Glyph,
}

impl FontTable {
    /// Builds a table from `(character, rows)` pairs.
    ///
    /// If a character appears more than once, the last one wins. Rows of unequal width are
    /// accepted with a warning, since only the first row is used to measure a glyph.
    ///
    /// # Errors
    /// Returns [`FontDataError`] if `height` is zero, there are no glyphs, or some glyph does not
    /// have exactly `height` rows.
    pub fn new<R: Into<String>>(
        height: usize,
        glyphs: impl IntoIterator<Item = (char, Vec<R>)>,
    ) -> Result<Self, FontDataError> {
        let height = NonZero::new(height).ok_or(FontDataError::ZeroHeight)?;
        let mut table = HashMap::new();
        for (c, rows) in glyphs {
            let rows: Vec<String> = rows.into_iter().map(Into::into).collect();
            if rows.len() != height.get() {
                return Err(FontDataError::RowCount {
                    character: c,
                    expected: height.get(),
                    found: rows.len(),
                });
            }
            if !rows.iter().map(|row| row.width()).all_equal() {
                warn!("glyph '{c}' has rows of unequal width; measuring by its first row");
            }
            drop(table.insert(c, Glyph::new(rows)));
        }
        // The blank fallback and every canvas allocate `height` rows, so some glyph must have
        // already supplied that many.
        if table.is_empty() {
            return Err(FontDataError::NoGlyphs);
        }
        Ok(Self::assemble(height, table))
    }

    fn assemble(height: NonZero<usize>, glyphs: HashMap<char, Glyph>) -> Self {
        let fallback = glyphs
            .get(&' ')
            .cloned()
            .unwrap_or_else(|| Glyph::blank(height));
        Self {
            height,
            glyphs,
            fallback,
        }
    }

    /// Builds a table from a JSON value shaped like
    /// `{"height": 3, "chars": {"H": ["H H", "HHH", "H H"]}}`.
    ///
    /// # Errors
    /// Returns [`FontDataError`] naming the first field that is missing or has the wrong shape,
    /// or any error from [`FontTable::new`].
    pub fn from_json(value: &Value) -> Result<Self, FontDataError> {
        let object = value.as_object().ok_or(FontDataError::NotAnObject)?;
        let height = object
            .get("height")
            .ok_or(FontDataError::MissingField("height"))?
            .as_u64()
            .ok_or(FontDataError::InvalidField("height"))?;
        let height = usize::try_from(height).map_err(|_| FontDataError::InvalidField("height"))?;
        let chars = object
            .get("chars")
            .ok_or(FontDataError::MissingField("chars"))?
            .as_object()
            .ok_or(FontDataError::InvalidField("chars"))?;
        let glyphs = chars
            .iter()
            .map(|(key, rows)| {
                let Ok(c) = key.chars().exactly_one() else {
                    return Err(FontDataError::GlyphKey(key.clone()));
                };
                let rows = rows
                    .as_array()
                    .and_then(|rows| {
                        rows.iter()
                            .map(|row| row.as_str().map(str::to_owned))
                            .collect::<Option<Vec<_>>>()
                    })
                    .ok_or(FontDataError::GlyphRows(c))?;
                Ok((c, rows))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(height, glyphs)
    }

    /// Number of rows in every glyph.
    #[must_use]
    pub const fn height(&self) -> NonZero<usize> {
        self.height
    }

    /// The glyph for `c`, or the fallback glyph if `c` is not covered.
    ///
    /// The fallback is the space glyph, or a zero-width blank glyph if the table has no space.
    #[must_use]
    pub fn glyph(&self, c: char) -> &Glyph {
        self.glyphs.get(&c).unwrap_or(&self.fallback)
    }

    /// Returns true if `c` has its own glyph.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    /// The width of the widest glyph.
    #[must_use]
    pub fn max_width(&self) -> usize {
        self.glyphs.values().map(Glyph::width).max().unwrap_or(0)
    }

    /// Number of covered characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Returns true if no character is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(feature = "fonts")]
impl From<&flair_fonts::FontData> for FontTable {
    fn from(data: &flair_fonts::FontData) -> Self {
        debug_assert!(data.height > 0, "built-in font with zero height");
        let height = NonZero::new(data.height).unwrap_or(NonZero::<usize>::MIN);
        let glyphs: HashMap<char, Glyph> = data
            .glyphs
            .iter()
            .map(|&(c, rows)| {
                debug_assert_eq!(rows.len(), data.height, "built-in glyph '{c}' row count");
                let rows = rows.iter().map(|&row| row.to_owned()).collect();
                (c, Glyph::new(rows))
            })
            .collect();
        Self::assemble(height, glyphs)
    }
}

/// A font name that does not match the safe identifier pattern
#[derive(Debug, Error, PartialEq, Eq)]
#[error(r#"invalid font name "{0}": use lowercase letters, digits and hyphens"#)]
pub struct NameError(pub String);

/// Font data that does not have the shape of a [`FontTable`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontDataError {
    /// The value is not a JSON object.
    #[error("font data must be an object")]
    NotAnObject,
    /// A required field is absent.
    #[error("font data is missing `{0}`")]
    MissingField(&'static str),
    /// A required field has the wrong type.
    #[error("font data has an invalid `{0}`")]
    InvalidField(&'static str),
    /// The height is 0.
    #[error("`height` must be positive")]
    ZeroHeight,
    /// `chars` is empty.
    #[error("`chars` must have at least one glyph")]
    NoGlyphs,
    /// A key of `chars` is not exactly one character.
    #[error(r#"`chars` key "{0}" is not a single character"#)]
    GlyphKey(String),
    /// A glyph is not a list of strings.
    #[error("glyph '{0}' must be a list of strings")]
    GlyphRows(char),
    /// A glyph has the wrong number of rows.
    #[error("glyph '{character}' has {found} rows, expected {expected}")]
    RowCount {
        /// The character of the glyph
        character: char,
        /// The height of the font
        expected: usize,
        /// The number of rows of the glyph
        found: usize,
    },
}
