use bon::Builder;
use serde::{Deserialize, Serialize};

/// Default number of recursive re-runs after the first pass.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Options controlling one interpolation call.
///
/// ```
/// use msgfmt::InterpolationOptions;
///
/// let options = InterpolationOptions::builder().recursive(true).build();
/// assert_eq!(options.max_depth, 2);
///
/// let options: InterpolationOptions = serde_json::from_str(r#"{"recursive": true}"#).unwrap();
/// assert!(options.recursive);
/// assert_eq!(options.max_depth, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct InterpolationOptions {
    /// Re-run substitution on the output until it stops changing.
    #[builder(default)]
    pub recursive: bool,

    /// Maximum number of re-runs after the first pass.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InterpolationOptions {
    /// A single substitution pass.
    pub fn single_pass() -> Self {
        Self::default()
    }

    /// Recursive resolution with up to `max_depth` re-runs.
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            recursive: true,
            max_depth,
        }
    }
}
