//! Fluent message construction on top of a template store.

use std::sync::Arc;

use bon::Builder;
use icu_locale_core::LanguageIdentifier;
use thiserror::Error;
use tracing::debug;

use crate::expression::ExpressionError;
use crate::formatter::{format_annotation, format_types};
use crate::interpolator::{InterpolationOptions, Interpolator};
use crate::store::{TemplateError, TemplateStore};
use crate::types::{EnumValue, Parameter, TypeName, Value};

/// An error from a builder's terminal call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    /// The message code has no template.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An expression placeholder failed to parse or evaluate.
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

/// Entry point for building messages from stored templates.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use icu_locale_core::langid;
/// use msgfmt::MessageFormatter;
/// use msgfmt::store::Catalog;
///
/// let catalog = Catalog::new();
/// catalog
///     .load_bundle_str(&langid!("en"), "range = {value} must be between {min} and {max}")
///     .unwrap();
///
/// let formatter = MessageFormatter::builder()
///     .store(Arc::new(catalog))
///     .language(langid!("en"))
///     .build();
///
/// let text = formatter
///     .create("range")
///     .param("value", 12)
///     .param("min", 1)
///     .param("max", 10)
///     .format()
///     .unwrap();
/// assert_eq!(text, "12 must be between 1 and 10");
/// ```
#[derive(Clone, Builder)]
pub struct MessageFormatter {
    /// Where templates come from.
    store: Arc<dyn TemplateStore>,

    /// The interpolation engine.
    #[builder(default)]
    interpolator: Interpolator,

    /// Language used when a builder does not choose one.
    #[builder(default = LanguageIdentifier::UNKNOWN)]
    language: LanguageIdentifier,
}

impl MessageFormatter {
    /// Create a formatter over `store` with the default interpolator.
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        MessageFormatter::builder().store(store).build()
    }

    /// Start building the message `code`.
    pub fn create(&self, code: impl Into<String>) -> MessageBuilder<'_> {
        MessageBuilder {
            formatter: self,
            code: code.into(),
            language: self.language.clone(),
            parameters: Vec::new(),
        }
    }

    /// The default language.
    pub fn language(&self) -> &LanguageIdentifier {
        &self.language
    }

    /// The template store.
    pub fn store(&self) -> &dyn TemplateStore {
        self.store.as_ref()
    }

    /// The interpolation engine.
    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }
}

/// Accumulates parameters for one message, then formats it.
///
/// Adding a parameter whose name is already bound replaces the earlier one.
#[derive(Clone)]
pub struct MessageBuilder<'a> {
    formatter: &'a MessageFormatter,
    code: String,
    language: LanguageIdentifier,
    parameters: Vec<Parameter>,
}

impl MessageBuilder<'_> {
    /// Bind `name` to a value.
    #[must_use]
    pub fn param(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameter(Parameter::new(name, value))
    }

    /// Bind `name` to a sequence built from several values.
    #[must_use]
    pub fn param_values<V: Into<Value>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.param(name, Value::List(values))
    }

    /// Bind `name` to one or more type descriptors, displayed as their
    /// qualified names.
    #[must_use]
    pub fn param_with_types(
        self,
        name: impl Into<String>,
        types: impl IntoIterator<Item = TypeName>,
    ) -> Self {
        let types: Vec<TypeName> = types.into_iter().collect();
        let text = format_types(&types);
        self.parameter(Parameter::with_text(name, Value::Types(types), text))
    }

    /// Bind `name` to an enumerated value, displayed as `Type#Member`.
    #[must_use]
    pub fn param_with_enum(self, name: impl Into<String>, member: EnumValue) -> Self {
        let text = member.to_string();
        self.parameter(Parameter::with_text(name, member, text))
    }

    /// Bind `name` to annotation metadata, displayed as `@Type`.
    #[must_use]
    pub fn param_with_annotation(self, name: impl Into<String>, annotation: TypeName) -> Self {
        let text = format_annotation(&annotation);
        self.parameter(Parameter::with_text(
            name,
            Value::Annotation(annotation),
            text,
        ))
    }

    /// Bind `name` to a value with fixed display text.
    ///
    /// `{name}` shows `text`; expressions still see `value`.
    #[must_use]
    pub fn param_with_text(
        self,
        name: impl Into<String>,
        value: impl Into<Value>,
        text: impl Into<String>,
    ) -> Self {
        self.parameter(Parameter::with_text(name, value, text))
    }

    /// Bind a prepared parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.retain(|p| p.name != parameter.name);
        self.parameters.push(parameter);
        self
    }

    /// Look up the template in `language` instead of the formatter's default.
    #[must_use]
    pub fn language(mut self, language: LanguageIdentifier) -> Self {
        self.language = language;
        self
    }

    /// The bound parameter named `name`.
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Format with a single substitution pass.
    pub fn format(self) -> Result<String, MessageError> {
        self.format_with(InterpolationOptions::single_pass())
    }

    /// Format recursively with the interpolator's configured depth.
    pub fn format_recursively(self) -> Result<String, MessageError> {
        let depth = self.formatter.interpolator.options().max_depth;
        self.format_recursively_with_depth(depth)
    }

    /// Format recursively with up to `max_depth` re-runs.
    pub fn format_recursively_with_depth(self, max_depth: usize) -> Result<String, MessageError> {
        self.format_with(InterpolationOptions::with_depth(max_depth))
    }

    /// Format with explicit options.
    pub fn format_with(self, options: InterpolationOptions) -> Result<String, MessageError> {
        let store = self.formatter.store.as_ref();
        let template = store.lookup(&self.code, &self.language)?;
        debug!(
            code = %self.code,
            language = %template.language,
            recursive = options.recursive,
            "formatting message"
        );

        let language = &self.language;
        let lookup = |name: &str| store.lookup(name, language).ok().map(|t| t.text);
        let text = self.formatter.interpolator.interpolate_with(
            &template.text,
            self.parameters,
            options,
            Some(&lookup),
        )?;
        Ok(text)
    }
}
