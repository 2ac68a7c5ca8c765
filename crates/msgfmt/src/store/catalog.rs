//! In-memory template catalog with file loading and hot reload.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bon::Builder;
use icu_locale_core::LanguageIdentifier;
use tracing::debug;

use super::error::{LoadError, TemplateError};
use super::{Template, TemplateStore};
use crate::parser::{ParseError, parse_catalog};

type Bundle = HashMap<String, String>;

/// Per-language message bundles.
///
/// Lookups fall back from a specific language to less specific ones
/// (`ja-JP` to `ja`) and finally to the root bundle (`und`). Loading a
/// language replaces its bundle. Reads and reloads may run concurrently.
///
/// # Example
///
/// ```
/// use icu_locale_core::langid;
/// use msgfmt::store::{Catalog, TemplateStore};
///
/// let catalog = Catalog::new();
/// catalog.load_bundle_str(&langid!("ja"), "greeting = こんにちは、{name}").unwrap();
///
/// let template = catalog.lookup("greeting", &langid!("ja-JP")).unwrap();
/// assert_eq!(template.text, "こんにちは、{name}");
/// assert_eq!(template.language, langid!("ja"));
/// ```
#[derive(Debug, Builder)]
pub struct Catalog {
    /// Fall back to less specific languages on lookup.
    #[builder(default = true)]
    fallback: bool,

    /// Bundles keyed by language.
    #[builder(skip)]
    bundles: RwLock<HashMap<LanguageIdentifier, Bundle>>,

    /// File paths for hot-reload support.
    /// Only populated for file-loaded bundles, not string-loaded.
    #[builder(skip)]
    loaded_paths: RwLock<HashMap<LanguageIdentifier, PathBuf>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builder().build()
    }
}

impl Catalog {
    /// Create an empty catalog with language fallback enabled.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Bundle Loading
    // =========================================================================

    /// Load a bundle from a file, replacing any bundle for `language`.
    ///
    /// The path is stored for later [`Catalog::reload_bundle`] calls.
    /// Returns the number of distinct message codes loaded.
    pub fn load_bundle(
        &self,
        language: &LanguageIdentifier,
        path: impl AsRef<Path>,
    ) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let count = self.load_internal(language, &content, Some(path))?;
        self.write_paths()
            .insert(language.clone(), path.to_path_buf());
        Ok(count)
    }

    /// Load a bundle from a string, replacing any bundle for `language`.
    ///
    /// Bundles loaded this way cannot be reloaded.
    pub fn load_bundle_str(
        &self,
        language: &LanguageIdentifier,
        content: &str,
    ) -> Result<usize, LoadError> {
        let count = self.load_internal(language, content, None)?;
        self.write_paths().remove(language);
        Ok(count)
    }

    /// Re-read a bundle from the file it was loaded from.
    pub fn reload_bundle(&self, language: &LanguageIdentifier) -> Result<usize, LoadError> {
        let path = self
            .read_paths()
            .get(language)
            .cloned()
            .ok_or_else(|| LoadError::NoPathForReload {
                language: language.to_string(),
            })?;
        self.load_bundle(language, path)
    }

    /// Add or replace a single template.
    pub fn insert(
        &self,
        language: &LanguageIdentifier,
        code: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.write_bundles()
            .entry(language.clone())
            .or_default()
            .insert(code.into(), text.into());
    }

    fn load_internal(
        &self,
        language: &LanguageIdentifier,
        content: &str,
        path: Option<&Path>,
    ) -> Result<usize, LoadError> {
        let entries = parse_catalog(content).map_err(|e| {
            let default_path = PathBuf::from(format!("<{language}>"));
            let path_buf = path.map(Path::to_path_buf).unwrap_or(default_path);

            match e {
                ParseError::Syntax {
                    line,
                    column,
                    message,
                } => LoadError::Parse {
                    path: path_buf,
                    line,
                    column,
                    message,
                },
                ParseError::MissingSeparator { key, line } => LoadError::Parse {
                    path: path_buf,
                    line,
                    column: key.chars().count() + 1,
                    message: format!("expected '=' or ':' after '{key}'"),
                },
            }
        })?;

        // Later entries replace earlier ones with the same code.
        let bundle: Bundle = entries
            .into_iter()
            .map(|entry| (entry.code, entry.text))
            .collect();
        let count = bundle.len();
        debug!(language = %language, count, path = ?path, "loaded bundle");

        self.write_bundles().insert(language.clone(), bundle);
        Ok(count)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Raw text for `code` in exactly `language`, without fallback.
    pub fn get(&self, language: &LanguageIdentifier, code: &str) -> Option<String> {
        self.read_bundles()
            .get(language)
            .and_then(|bundle| bundle.get(code))
            .cloned()
    }

    /// Returns true if `language` has a template for `code`.
    pub fn contains(&self, language: &LanguageIdentifier, code: &str) -> bool {
        self.get(language, code).is_some()
    }

    /// Message codes in `language`, sorted.
    pub fn codes(&self, language: &LanguageIdentifier) -> Vec<String> {
        let mut codes: Vec<String> = self
            .read_bundles()
            .get(language)
            .map(|bundle| bundle.keys().cloned().collect())
            .unwrap_or_default();
        codes.sort();
        codes
    }

    /// Loaded languages, sorted by their string form.
    pub fn languages(&self) -> Vec<LanguageIdentifier> {
        let mut languages: Vec<LanguageIdentifier> =
            self.read_bundles().keys().cloned().collect();
        languages.sort_by_cached_key(LanguageIdentifier::to_string);
        languages
    }

    fn read_bundles(&self) -> RwLockReadGuard<'_, HashMap<LanguageIdentifier, Bundle>> {
        self.bundles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_bundles(&self) -> RwLockWriteGuard<'_, HashMap<LanguageIdentifier, Bundle>> {
        self.bundles.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_paths(&self) -> RwLockReadGuard<'_, HashMap<LanguageIdentifier, PathBuf>> {
        self.loaded_paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_paths(&self) -> RwLockWriteGuard<'_, HashMap<LanguageIdentifier, PathBuf>> {
        self.loaded_paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl TemplateStore for Catalog {
    fn lookup(
        &self,
        code: &str,
        language: &LanguageIdentifier,
    ) -> Result<Template, TemplateError> {
        let candidates = if self.fallback {
            fallback_chain(language)
        } else {
            vec![language.clone()]
        };

        let bundles = self.read_bundles();
        candidates
            .into_iter()
            .find_map(|candidate| {
                let text = bundles.get(&candidate)?.get(code)?.clone();
                Some(Template {
                    code: code.to_string(),
                    language: candidate,
                    text,
                })
            })
            .ok_or_else(|| TemplateError::NotFound {
                code: code.to_string(),
                language: language.to_string(),
            })
    }
}

/// Languages to try for `language`, most specific first.
///
/// Trailing subtags are stripped one at a time, ending with the root
/// language (`und`).
///
/// ```
/// use icu_locale_core::langid;
/// use msgfmt::store::fallback_chain;
///
/// assert_eq!(
///     fallback_chain(&langid!("zh-Hant-TW")),
///     vec![langid!("zh-Hant-TW"), langid!("zh-Hant"), langid!("zh"), langid!("und")],
/// );
/// ```
pub fn fallback_chain(language: &LanguageIdentifier) -> Vec<LanguageIdentifier> {
    let root = LanguageIdentifier::UNKNOWN;
    let text = language.to_string();
    let mut subtags: Vec<&str> = text.split('-').collect();
    let mut chain = Vec::with_capacity(subtags.len() + 1);

    while !subtags.is_empty() {
        let candidate = subtags.join("-").parse::<LanguageIdentifier>().ok();
        if let Some(candidate) = candidate.filter(|c| !chain.contains(c)) {
            chain.push(candidate);
        }
        subtags.pop();
    }
    if !chain.contains(&root) {
        chain.push(root);
    }
    chain
}
