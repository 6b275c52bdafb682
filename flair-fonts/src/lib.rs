//! Collection of built-in glyph tables to be used by the [`flair`](https://crates.io/crates/flair)
//! crate.
//!
//! The tables are plain static data. Turning one into a usable font (validation, fallback glyph,
//! caching) is left to `flair`, so nothing here is materialized until it is asked for by name.

mod ansi_regular;
mod mini;
mod standard;

/// A compiled glyph table
///
/// Every entry of `glyphs` has exactly `height` rows, and all rows of one glyph have the same
/// number of `char`s.
#[derive(Debug)]
pub struct FontData {
    /// Number of rows in every glyph
    pub height: usize,
    /// Rows for each covered character
    pub glyphs: &'static [(char, &'static [&'static str])],
}

macro_rules! fonts {
    ($($name:ident => $font_name:literal, $module:ident,)*) => {

        /// Included fonts
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum FontFile {
            $(
                #[doc = concat!("Font `", $font_name, "`")]
                $name,
            )*
        }

        impl FontFile {
            /// An array containing all the variants
            pub const ALL: [Self; const{0 $(+ {_ = $font_name; 1} )*}] = [$(Self::$name),*];

            /// The glyph table of a font
            #[must_use]
            pub const fn data(&self) -> &'static FontData {
                match self {
                    $(Self::$name => &$module::FONT,)*
                }
            }

            /// The name the font is looked up by
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$name => $font_name,)*
                }
            }

            /// Match a font name to an included font
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($font_name => Some(Self::$name),)*
                    _ => None,
                }
            }

        }

    };
}

fonts! {
    AnsiRegular => "ansi-regular", ansi_regular,
    Mini => "mini", mini,
    Standard => "standard", standard,
}
