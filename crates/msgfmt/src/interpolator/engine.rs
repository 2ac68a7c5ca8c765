//! Placeholder substitution and bounded recursive resolution.

use std::collections::HashMap;
use std::sync::Arc;

use bon::Builder;
use tracing::{debug, trace};

use super::context::InterpolationContext;
use super::options::InterpolationOptions;
use crate::expression::{ExpressionError, ExpressionEvaluator, StandardEvaluator};
use crate::formatter::{DefaultFormatter, ValueFormatter};
use crate::parser::{Segment, contains_placeholder, parse_template, unescape};
use crate::types::{Parameter, Value};

/// Resolves placeholder names that are not bound as parameters during
/// recursive interpolation.
///
/// A hit becomes a new parameter of the running interpolation and is
/// substituted as raw template text.
pub trait MessageLookup {
    /// Look up the template text for `name`.
    fn lookup_message(&self, name: &str) -> Option<String>;
}

impl<F> MessageLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup_message(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// How a pass writes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassMode {
    /// Escapes become their characters. Used for single-pass formatting.
    Final,
    /// Escapes are kept so that a later pass still sees them as escapes.
    Template,
}

/// The interpolation engine.
///
/// Holds the expression evaluator and the value formatter. Both are shared
/// handles, so cloning an interpolator is cheap and clones may be used from
/// several threads at once.
///
/// # Example
///
/// ```
/// use msgfmt::{params, InterpolationOptions, Interpolator};
///
/// let interpolator = Interpolator::new();
/// let text = interpolator
///     .interpolate("{a} + {b} = {#a + #b}", &params! { "a" => 1, "b" => 2 })
///     .unwrap();
/// assert_eq!(text, "1 + 2 = 3");
///
/// let interpolator = Interpolator::builder()
///     .options(InterpolationOptions::with_depth(3))
///     .build();
/// let text = interpolator
///     .interpolate("{a}", &params! { "a" => "{b}", "b" => "done" })
///     .unwrap();
/// assert_eq!(text, "done");
/// ```
#[derive(Clone, Builder)]
pub struct Interpolator {
    /// Evaluates `{#...}` placeholders.
    #[builder(default = default_evaluator())]
    evaluator: Arc<dyn ExpressionEvaluator>,

    /// Formats values for `{name}` placeholders and expression results.
    #[builder(default = default_formatter())]
    formatter: Arc<dyn ValueFormatter>,

    /// Options used by [`Interpolator::interpolate`].
    #[builder(default)]
    options: InterpolationOptions,
}

fn default_evaluator() -> Arc<dyn ExpressionEvaluator> {
    Arc::new(StandardEvaluator::new())
}

fn default_formatter() -> Arc<dyn ValueFormatter> {
    Arc::new(DefaultFormatter)
}

impl Default for Interpolator {
    fn default() -> Self {
        Interpolator::builder().build()
    }
}

impl Interpolator {
    /// Create an interpolator with the standard evaluator and default
    /// formatter, running a single pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// The expression evaluator.
    pub fn evaluator(&self) -> &dyn ExpressionEvaluator {
        self.evaluator.as_ref()
    }

    /// The value formatter.
    pub fn formatter(&self) -> &dyn ValueFormatter {
        self.formatter.as_ref()
    }

    /// The configured default options.
    pub fn options(&self) -> InterpolationOptions {
        self.options
    }

    /// Interpolate `template` with plain values and the configured options.
    pub fn interpolate(
        &self,
        template: &str,
        values: &HashMap<String, Value>,
    ) -> Result<String, ExpressionError> {
        let mut ctx = InterpolationContext::from_values(values, self.options.max_depth);
        self.run(template, &mut ctx, self.options.recursive, None)
    }

    /// Interpolate `template` with explicit parameters, options, and an
    /// optional lookup for unbound names. The lookup is only consulted when
    /// `options.recursive` is set.
    pub fn interpolate_with(
        &self,
        template: &str,
        parameters: impl IntoIterator<Item = Parameter>,
        options: InterpolationOptions,
        lookup: Option<&dyn MessageLookup>,
    ) -> Result<String, ExpressionError> {
        let mut ctx = InterpolationContext::new(parameters, options.max_depth);
        self.run(template, &mut ctx, options.recursive, lookup)
    }

    /// Interpolate `template` against an existing context.
    ///
    /// Parameters found through `lookup` are added to `ctx`, so the caller
    /// can inspect them afterwards.
    pub fn run(
        &self,
        template: &str,
        ctx: &mut InterpolationContext,
        recursive: bool,
        lookup: Option<&dyn MessageLookup>,
    ) -> Result<String, ExpressionError> {
        if recursive {
            self.resolve_recursively(template, ctx, lookup)
        } else {
            self.pass(template, PassMode::Final, ctx, None)
        }
    }

    /// Re-run the pass until a fixed point, a repeated string, or depth
    /// exhaustion. Escapes are resolved once at the end.
    fn resolve_recursively(
        &self,
        template: &str,
        ctx: &mut InterpolationContext,
        lookup: Option<&dyn MessageLookup>,
    ) -> Result<String, ExpressionError> {
        let mut current = template.to_string();
        let mut pass = 0usize;

        loop {
            pass += 1;
            let next = self.pass(&current, PassMode::Template, ctx, lookup)?;
            debug!(pass, depth_remaining = ctx.depth_remaining(), "interpolation pass");

            if next == current {
                break;
            }
            current = next;

            if !contains_placeholder(&current) {
                break;
            }
            if !ctx.visit(&current) {
                debug!(pass, text = %current, "intermediate string repeated, stopping");
                break;
            }
            if !ctx.consume_depth() {
                debug!(pass, text = %current, "maximum depth reached");
                break;
            }
        }

        Ok(unescape(&current))
    }

    /// Run one left-to-right substitution pass over `text`.
    fn pass(
        &self,
        text: &str,
        mode: PassMode,
        ctx: &mut InterpolationContext,
        lookup: Option<&dyn MessageLookup>,
    ) -> Result<String, ExpressionError> {
        let parsed = parse_template(text);
        let mut output = String::with_capacity(text.len());

        for segment in &parsed.segments {
            match segment {
                Segment::Literal(s) => output.push_str(s),
                Segment::Escape(c) => match mode {
                    PassMode::Final => output.push(*c),
                    PassMode::Template => segment.write_source(&mut output),
                },
                Segment::Placeholder(name) => match self.resolve_name(name, ctx, lookup) {
                    Some(Substitution::Message(text)) => {
                        trace!(placeholder = %name, text = %text, "substituted message");
                        output.push_str(&text);
                    }
                    Some(Substitution::Value(value)) => {
                        trace!(placeholder = %name, value = %value, "substituted");
                        push_value(&mut output, &value, mode);
                    }
                    None => segment.write_source(&mut output),
                },
                Segment::Expression(body) => {
                    let value = self.evaluator.evaluate(body, &ctx.variables())?;
                    let value = self.formatter.format(&value);
                    trace!(expression = %body, value = %value, "evaluated");
                    push_value(&mut output, &value, mode);
                }
            }
        }

        Ok(output)
    }

    /// Display text for a plain placeholder, or `None` to leave it as is.
    fn resolve_name(
        &self,
        name: &str,
        ctx: &mut InterpolationContext,
        lookup: Option<&dyn MessageLookup>,
    ) -> Option<Substitution> {
        if let Some(param) = ctx.get_param(name) {
            if let Some(text) = param.value.as_str().filter(|_| ctx.is_message(name)) {
                return Some(Substitution::Message(text.to_string()));
            }
            return Some(Substitution::Value(match &param.precomputed {
                Some(text) => text.clone(),
                None => self.formatter.format(&param.value),
            }));
        }

        let text = lookup?.lookup_message(name)?;
        debug!(name, "resolved placeholder through message lookup");
        ctx.insert_message(name, text.clone());
        Some(Substitution::Message(text))
    }
}

/// Text produced for a plain placeholder.
enum Substitution {
    /// Template source from a message lookup. Its escapes are kept.
    Message(String),
    /// Display text of a parameter value.
    Value(String),
}

/// Write substituted data. Between recursive passes backslashes are doubled
/// so the final unescape gives back the value unchanged.
fn push_value(output: &mut String, value: &str, mode: PassMode) {
    match mode {
        PassMode::Final => output.push_str(value),
        PassMode::Template => {
            for c in value.chars() {
                if c == '\\' {
                    output.push('\\');
                }
                output.push(c);
            }
        }
    }
}
