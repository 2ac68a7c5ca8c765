//! Template storage.
//!
//! The builder fetches raw template text through the [`TemplateStore`]
//! trait. [`Catalog`] is the shipped implementation: per-language bundles
//! parsed from properties-style files, with subtag fallback.

mod catalog;
mod error;

use std::sync::Arc;

use icu_locale_core::LanguageIdentifier;

pub use catalog::{Catalog, fallback_chain};
pub use error::{LoadError, TemplateError};

/// A raw, locale-specific message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Message code the template was found under.
    pub code: String,
    /// Language of the bundle that supplied the template.
    pub language: LanguageIdentifier,
    /// Template text before substitution.
    pub text: String,
}

/// Source of raw templates, keyed by message code and language.
///
/// Implementations must tolerate concurrent lookups.
pub trait TemplateStore: Send + Sync {
    /// Find the template for `code` in `language`.
    ///
    /// Implementations may fall back to a less specific language.
    fn lookup(&self, code: &str, language: &LanguageIdentifier)
    -> Result<Template, TemplateError>;
}

impl<T: TemplateStore + ?Sized> TemplateStore for Arc<T> {
    fn lookup(
        &self,
        code: &str,
        language: &LanguageIdentifier,
    ) -> Result<Template, TemplateError> {
        self.as_ref().lookup(code, language)
    }
}
