//! Message interpolation.
//!
//! This module substitutes `{name}` and `{#expression}` placeholders in
//! template text. Recursive resolution re-runs the substitution on its own
//! output as a bounded loop, stopping at a fixed point, when a string
//! repeats, or when the depth budget is spent.

mod context;
mod engine;
mod options;

pub use context::InterpolationContext;
pub use engine::{Interpolator, MessageLookup};
pub use options::{DEFAULT_MAX_DEPTH, InterpolationOptions};
