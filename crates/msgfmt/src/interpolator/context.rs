//! Per-call interpolation state.

use std::collections::{HashMap, HashSet};

use const_fnv1a_hash::fnv1a_hash_str_64;

use crate::expression::Variables;
use crate::types::{Parameter, Value};

/// State carried through one top-level interpolation call.
///
/// The context tracks:
/// - Parameters bound for this call, including ones discovered through
///   transitive lookup, and which names came from lookup
/// - The remaining number of recursive re-runs
/// - Hashes of intermediate strings for cycle detection
///
/// A context is created fresh per call and never shared.
#[derive(Debug, Clone, Default)]
pub struct InterpolationContext {
    parameters: HashMap<String, Parameter>,
    messages: HashSet<String>,
    depth_remaining: usize,
    visited: HashSet<u64>,
}

impl InterpolationContext {
    /// Create a context from parameters.
    ///
    /// When two parameters share a name, the later one wins.
    pub fn new(parameters: impl IntoIterator<Item = Parameter>, max_depth: usize) -> Self {
        Self {
            parameters: parameters
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
            messages: HashSet::new(),
            depth_remaining: max_depth,
            visited: HashSet::new(),
        }
    }

    /// Create a context from plain values.
    pub fn from_values(values: &HashMap<String, Value>, max_depth: usize) -> Self {
        Self::new(
            values
                .iter()
                .map(|(name, value)| Parameter::new(name.clone(), value.clone())),
            max_depth,
        )
    }

    /// Get a parameter by name.
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Returns true if a parameter with this name is bound.
    pub fn has_param(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Bind a parameter unless one with the same name already exists.
    ///
    /// Returns true if the parameter was added.
    pub fn insert_if_absent(&mut self, parameter: Parameter) -> bool {
        if self.parameters.contains_key(&parameter.name) {
            return false;
        }
        self.parameters.insert(parameter.name.clone(), parameter);
        true
    }

    /// Bind the text of a looked-up message under `name`, unless a
    /// parameter with that name already exists.
    ///
    /// Its text is template source, not data: escapes in it stay escapes.
    pub fn insert_message(&mut self, name: &str, text: impl Into<String>) -> bool {
        let text: String = text.into();
        let added = self.insert_if_absent(Parameter::new(name, text));
        if added {
            self.messages.insert(name.to_string());
        }
        added
    }

    /// Returns true if `name` was bound by [`Self::insert_message`].
    pub fn is_message(&self, name: &str) -> bool {
        self.messages.contains(name)
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.parameters.len()
    }

    /// Raw values of all parameters, for expression evaluation.
    pub fn variables(&self) -> Variables {
        self.parameters
            .iter()
            .map(|(name, p)| (name.clone(), p.value.clone()))
            .collect()
    }

    /// Remaining recursive re-runs.
    pub fn depth_remaining(&self) -> usize {
        self.depth_remaining
    }

    /// Use up one re-run. Returns false when none remain.
    pub fn consume_depth(&mut self) -> bool {
        match self.depth_remaining.checked_sub(1) {
            Some(rest) => {
                self.depth_remaining = rest;
                true
            }
            None => false,
        }
    }

    /// Record an intermediate string. Returns false if it was seen before.
    pub fn visit(&mut self, text: &str) -> bool {
        self.visited.insert(fnv1a_hash_str_64(text))
    }

    /// Number of distinct intermediate strings recorded.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
