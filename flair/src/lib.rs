//! A crate for rendering short strings as block-glyph ASCII art, or as width-bounded plain text,
//! with optional color, weight, border and padding.
//!
//! # Features
//!
//! - Side-by-side glyph composition from fixed-height font tables
//!   ([`Renderer`](crate::render::Renderer))
//! - A maximum width in both modes: art drops whole glyphs that would not fit, plain text cuts
//!   lines and marks them with an ellipsis ([`truncate`](crate::truncate::truncate))
//! - A font registry that loads built-in fonts on first use and accepts custom fonts under safe
//!   names ([`FontRegistry`](crate::registry::FontRegistry))
//! - ANSI and browser-console formatting ([`style`])
//!
//! # Example
//!
//! ```
//! # use flair::{Flair, Mode};
//! # use flair::style::Options;
//! let flair = Flair::default();
//! let rendered = flair.render("Hi!", &Mode::art("standard"), &Options::default()).unwrap();
//! let expected = concat!(
//!     "#   # ### # ", "\n",
//!     "#   #  #  # ", "\n",
//!     "#####  #  # ", "\n",
//!     "#   #  #    ", "\n",
//!     "#   # ### # ",
//! );
//! assert_eq!(rendered.output, expected);
//! assert!(!rendered.truncated);
//! ```
//!
//! ## Feature flags
//!
//! - `fonts` (default): adds the built-in fonts of the
//!   [`flair-fonts`](https://crates.io/crates/flair-fonts) package (via a dependency), which the
//!   default [`FontRegistry`](crate::registry::FontRegistry) resolves by name

mod entry;
pub mod font;
pub mod registry;
pub mod render;
mod str_ext;
pub mod style;
pub mod truncate;

pub use entry::{DEFAULT_FONT, Error, Flair, Mode, ModeKind, Rendered};
