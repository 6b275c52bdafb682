//! Font lookup and caching
//!
//! A [`FontRegistry`] resolves a [`FontName`] to a [`FontTable`] at most once per name (modulo
//! racing misses, see below) and keeps it for as long as the registry lives. Tables come either
//! from a [`FontSource`], acquired lazily on first use, or from [`FontRegistry::register`].
//!
//! Acquisition runs without holding the cache lock. Two threads missing on the same name may both
//! acquire it; the later insert wins, and since sources are expected to return equal tables for
//! equal names, readers cannot tell. A registered table always shadows the source.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;

use crate::font::{FontDataError, FontName, FontTable, NameError};

/// Where fonts that were never registered come from
pub trait FontSource: Send + Sync {
    /// Produces the table for `name`, or `None` if this source has no such font.
    fn acquire(&self, name: &FontName) -> Option<FontTable>;

    /// The names this source can acquire.
    fn names(&self) -> Vec<String>;
}

/// The fonts compiled into [`flair_fonts`]
///
/// Catalog entries are plain static data until acquired; acquiring one validates it and builds
/// its lookup table.
#[cfg(feature = "fonts")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltIn;

#[cfg(feature = "fonts")]
impl FontSource for BuiltIn {
    fn acquire(&self, name: &FontName) -> Option<FontTable> {
        let file = flair_fonts::FontFile::from_name(name.as_str())?;
        debug!("materializing built-in font {name}");
        Some(FontTable::from(file.data()))
    }

    fn names(&self) -> Vec<String> {
        flair_fonts::FontFile::ALL
            .iter()
            .map(|file| file.name().to_owned())
            .collect()
    }
}

/// A source with no fonts at all
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl FontSource for Empty {
    fn acquire(&self, _name: &FontName) -> Option<FontTable> {
        None
    }

    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A cache of resolved fonts in front of a [`FontSource`]
pub struct FontRegistry {
    cache: RwLock<HashMap<FontName, Arc<FontTable>>>,
    source: Box<dyn FontSource>,
}

impl FontRegistry {
    /// Creates an empty registry backed by `source`.
    pub fn new(source: impl FontSource + 'static) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            source: Box::new(source),
        }
    }

    /// Looks up a font, acquiring it from the source on first use.
    ///
    /// The name is validated before the cache or the source sees it.
    ///
    /// # Errors
    /// [`RegistryError::InvalidName`] for a name outside the safe pattern,
    /// [`RegistryError::UnknownFont`] if the font was never registered and the source does not
    /// have it.
    pub fn resolve(&self, name: &str) -> Result<Arc<FontTable>, RegistryError> {
        let name = FontName::new(name)?;
        if let Some(font) = self.cache.read().get(&name) {
            return Ok(Arc::clone(font));
        }
        let font = Arc::new(
            self.source
                .acquire(&name)
                .ok_or_else(|| RegistryError::UnknownFont(name.clone()))?,
        );
        drop(self.cache.write().insert(name, Arc::clone(&font)));
        Ok(font)
    }

    /// Registers `font` under `name`, replacing whatever was cached under that name.
    ///
    /// # Errors
    /// [`RegistryError::InvalidName`] for a name outside the safe pattern.
    pub fn register(&self, name: &str, font: FontTable) -> Result<(), RegistryError> {
        self.insert(FontName::new(name)?, font);
        Ok(())
    }

    /// Validates a JSON font table and registers it; see [`FontTable::from_json`].
    ///
    /// # Errors
    /// [`RegistryError::InvalidName`] is checked first, then [`RegistryError::InvalidData`].
    pub fn register_json(&self, name: &str, font: &Value) -> Result<(), RegistryError> {
        let name = FontName::new(name)?;
        self.insert(name, FontTable::from_json(font)?);
        Ok(())
    }

    fn insert(&self, name: FontName, font: FontTable) {
        debug!("registering font {name}");
        if self.cache.write().insert(name.clone(), Arc::new(font)).is_some() {
            debug!("font {name} replaced an earlier entry");
        }
    }

    /// Returns true if `name` is already resolved or registered.
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        FontName::new(name).is_ok_and(|name| self.cache.read().contains_key(&name))
    }

    /// Every name that [`resolve`](Self::resolve) can currently succeed with, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names = self.source.names();
        names.extend(self.cache.read().keys().map(|name| name.as_str().to_owned()));
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(feature = "fonts")]
impl Default for FontRegistry {
    fn default() -> Self {
        Self::new(BuiltIn)
    }
}

#[cfg(not(feature = "fonts"))]
impl Default for FontRegistry {
    fn default() -> Self {
        Self::new(Empty)
    }
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached: Vec<_> = self.cache.read().keys().cloned().collect();
        f.debug_struct("FontRegistry")
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

/// An error resolving or registering a font
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name does not match the safe identifier pattern.
    #[error(transparent)]
    InvalidName(#[from] NameError),
    /// The font data does not have the shape of a font table.
    #[error(transparent)]
    InvalidData(#[from] FontDataError),
    /// The name is well-formed but nothing by that name exists.
    #[error(r#"unknown font "{0}""#)]
    UnknownFont(FontName),
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::{Empty, FontRegistry, FontSource, RegistryError};
    use crate::font::tests::mock_font;
    use crate::font::{FontDataError, FontName, FontTable, NameError};

    #[derive(Default)]
    struct Counting {
        loads: Arc<AtomicUsize>,
    }

    impl FontSource for Counting {
        fn acquire(&self, name: &FontName) -> Option<FontTable> {
            let _ = self.loads.fetch_add(1, Ordering::SeqCst);
            (name.as_str() == "standard").then(mock_font)
        }

        fn names(&self) -> Vec<String> {
            vec!["standard".to_owned()]
        }
    }

    fn counting() -> (FontRegistry, Arc<AtomicUsize>) {
        let source = Counting::default();
        let loads = Arc::clone(&source.loads);
        (FontRegistry::new(source), loads)
    }

    #[test]
    fn resolves_once() {
        let (registry, loads) = counting();
        assert!(!registry.is_cached("standard"));
        let first = registry.resolve("standard").unwrap();
        let second = registry.resolve("standard").unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.is_cached("standard"));
    }

    #[test]
    fn unsafe_names_never_reach_the_source() {
        let (registry, loads) = counting();
        for name in ["../../etc/passwd", "../index", "-bad"] {
            assert_eq!(
                registry.resolve(name).unwrap_err(),
                RegistryError::InvalidName(NameError(name.to_owned()))
            );
            assert_eq!(
                registry.register(name, mock_font()).unwrap_err(),
                RegistryError::InvalidName(NameError(name.to_owned()))
            );
        }
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_font() {
        let (registry, loads) = counting();
        let error = registry.resolve("nope").unwrap_err();
        assert_eq!(
            error,
            RegistryError::UnknownFont(FontName::new("nope").unwrap())
        );
        assert_eq!(error.to_string(), r#"unknown font "nope""#);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(!registry.is_cached("nope"));
    }

    #[test]
    fn registered_fonts_shadow_the_source() {
        let (registry, loads) = counting();
        let custom = FontTable::new(1, [('x', vec!["x"])]).unwrap();
        registry.register("standard", custom).unwrap();
        let font = registry.resolve("standard").unwrap();
        assert_eq!(font.height().get(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn last_registration_wins() {
        let registry = FontRegistry::new(Empty);
        registry
            .register("custom", FontTable::new(1, [('a', vec!["a"])]).unwrap())
            .unwrap();
        registry
            .register("custom", FontTable::new(2, [('a', vec!["a", "a"])]).unwrap())
            .unwrap();
        assert_eq!(registry.resolve("custom").unwrap().height().get(), 2);
    }

    #[test]
    fn register_json_checks_name_then_shape() {
        let registry = FontRegistry::new(Empty);
        assert_eq!(
            registry.register_json("../x", &json!(null)).unwrap_err(),
            RegistryError::InvalidName(NameError("../x".to_owned()))
        );
        assert_eq!(
            registry.register_json("custom", &json!({"chars": {}})).unwrap_err(),
            RegistryError::InvalidData(FontDataError::MissingField("height"))
        );
        registry
            .register_json("custom", &json!({"height": 1, "chars": {"a": ["a"]}}))
            .unwrap();
        assert!(registry.is_cached("custom"));
    }

    #[test]
    fn register_json_rejects_huge_empty_font() {
        let registry = FontRegistry::new(Empty);
        assert_eq!(
            registry
                .register_json("big", &json!({"height": 1_u64 << 40, "chars": {}}))
                .unwrap_err(),
            RegistryError::InvalidData(FontDataError::NoGlyphs)
        );
        assert!(!registry.is_cached("big"));
    }

    #[test]
    fn names_merge_source_and_cache() {
        let (registry, _) = counting();
        registry.register("custom", mock_font()).unwrap();
        assert_eq!(registry.names(), ["custom", "standard"]);
    }

    #[test]
    fn concurrent_misses_agree() {
        let (registry, loads) = counting();
        let shared = &registry;
        let fonts: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || shared.resolve("standard").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(fonts.iter().all(|font| font.height().get() == 3));
        let loads = loads.load(Ordering::SeqCst);
        assert!((1..=4).contains(&loads));
        assert!(registry.resolve("standard").is_ok());
        assert_eq!(registry.names(), ["standard"]);
    }

    #[cfg(feature = "fonts")]
    #[test]
    fn built_in_fonts_materialize() {
        let registry = FontRegistry::default();
        for file in flair_fonts::FontFile::ALL {
            let font = registry.resolve(file.name()).unwrap();
            assert_eq!(font.height().get(), file.data().height);
            assert!(font.contains('A') && font.contains(' '));
        }
        assert_eq!(registry.names(), ["ansi-regular", "mini", "standard"]);
    }
}
