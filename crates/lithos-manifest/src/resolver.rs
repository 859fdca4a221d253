// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_envsubst::{Template, VariableMap, MAX_NESTING_DEPTH};

use crate::overrides::Overrides;

/// Merged view of document defaults and caller overrides.
///
/// Resolution happens in two passes. Discovery records each placeholder's
/// raw default, where nested placeholders appear as `${NAME}` text, and its
/// default expression, where they keep their own defaults. Lookup then
/// expands the expression through the merged map, so a nested name picks up
/// its override first and its inline default otherwise.
#[derive(Debug, Clone)]
pub struct Resolver {
    variables: VariableMap,
    expressions: VariableMap,
    overrides: Overrides,
}

impl Resolver {
    /// Starts from the discovered defaults and lets every override replace
    /// or add an entry.
    pub fn new(defaults: VariableMap, overrides: &Overrides) -> Self {
        let expressions = defaults.clone();
        let mut variables = defaults;
        for (key, value) in overrides.iter() {
            variables.insert(key.to_string(), Some(value.to_string()));
        }
        Self {
            variables,
            expressions,
            overrides: overrides.clone(),
        }
    }

    /// Expands document defaults from `expressions` instead of the flat
    /// defaults. Names missing from `expressions` keep their flat default.
    pub fn with_default_expressions(mut self, expressions: VariableMap) -> Self {
        self.expressions.extend(expressions);
        self
    }

    /// The merged variable map.
    pub fn variable_map(&self) -> &VariableMap {
        &self.variables
    }

    pub fn into_variable_map(self) -> VariableMap {
        self.variables
    }

    /// Resolves `name` to its final value.
    ///
    /// Override values are returned verbatim. Values that came from a
    /// document default are expanded, resolving any `${NAME}` they contain
    /// through this same resolver. Names without a value, defaults that
    /// refer back to themselves and chains deeper than
    /// [`MAX_NESTING_DEPTH`] resolve to `None`.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let mut visiting = Vec::new();
        self.resolve(name, &mut visiting)
    }

    fn resolve(&self, name: &str, visiting: &mut Vec<String>) -> Option<String> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value.to_string());
        }
        let raw = self.expressions.get(name)?.as_ref()?;
        if visiting.len() >= MAX_NESTING_DEPTH || visiting.iter().any(|seen| seen == name) {
            return None;
        }

        // Defaults that do not parse as templates are used as literal text.
        let Ok(template) = Template::parse_str(name, raw) else {
            return Some(raw.clone());
        };

        visiting.push(name.to_string());
        let expanded = template.substitute(|child| self.resolve(child, visiting));
        visiting.pop();
        Some(expanded)
    }
}
