// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Variable discovery: the name to raw-default map of a parsed template.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::ast::{Ast, Block, Node, PlaceholderNode};

/// Name to optional value mapping; `None` marks a variable that was declared
/// without a default.
pub type VariableMap = BTreeMap<String, Option<String>>;

/// Placeholders discovered in a template together with their raw defaults.
///
/// Only placeholders at the top level of the document are recorded. A
/// placeholder nested in another placeholder's default is kept as `${NAME}`
/// text inside that default, so its own default is looked up later through
/// whatever map the caller resolves names against. The first declaration of
/// a name wins; later ones are ignored even if their defaults differ.
///
/// Alongside the flattened default, the canonical default expression is kept
/// so that nested defaults (`${A:-${B:-b}}`) survive resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableDefaults {
    entries: BTreeMap<String, String>,
    expressions: BTreeMap<String, String>,
}

impl VariableDefaults {
    /// Walks the AST and records every top-level placeholder.
    pub fn collect(ast: &Ast) -> Self {
        let mut defaults = Self::default();
        defaults.walk_block(&ast.root);
        defaults
    }

    fn walk_block(&mut self, block: &Block) {
        for node in &block.nodes {
            match node {
                Node::Placeholder(placeholder) => self.record(placeholder),
                Node::Text(_) => {}
            }
        }
    }

    fn record(&mut self, placeholder: &PlaceholderNode) {
        if let Entry::Vacant(slot) = self.entries.entry(placeholder.name.clone()) {
            slot.insert(raw_default(placeholder));
            let expression = placeholder
                .default
                .as_ref()
                .map(|default| default.to_template_text())
                .unwrap_or_default();
            self.expressions.insert(placeholder.name.clone(), expression);
        }
    }

    /// Raw default for `name`; an empty string means "declared, no default".
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discovered names in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterates `(name, raw_default)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, default)| (name.as_str(), default.as_str()))
    }

    /// Converts to a [`VariableMap`], mapping empty defaults to `None`.
    pub fn to_variable_map(&self) -> VariableMap {
        to_map(&self.entries)
    }

    /// Like [`VariableDefaults::to_variable_map`], but each value is the
    /// canonical default expression, which parses back into the same default
    /// block including the defaults of nested placeholders.
    pub fn to_expression_map(&self) -> VariableMap {
        to_map(&self.expressions)
    }
}

fn to_map(entries: &BTreeMap<String, String>) -> VariableMap {
    entries
        .iter()
        .map(|(name, default)| {
            let value = if default.is_empty() {
                None
            } else {
                Some(default.clone())
            };
            (name.clone(), value)
        })
        .collect()
}

/// Flattens a placeholder default into text, re-serializing nested
/// placeholders as bare `${NAME}` references.
fn raw_default(placeholder: &PlaceholderNode) -> String {
    let Some(default) = &placeholder.default else {
        return String::new();
    };
    let mut out = String::new();
    for node in &default.block.nodes {
        match node {
            Node::Text(text) => out.push_str(&text.text),
            Node::Placeholder(child) => {
                out.push_str("${");
                out.push_str(&child.name);
                out.push('}');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_template;

    fn collect(source: &str) -> VariableDefaults {
        VariableDefaults::collect(&parse_template("test", source).unwrap())
    }

    #[test]
    fn bare_placeholder_has_no_default() {
        let defaults = collect("${A}");
        assert_eq!(defaults.get("A"), Some(""));
        assert_eq!(defaults.to_variable_map().get("A"), Some(&None));
    }

    #[test]
    fn default_is_recorded() {
        let defaults = collect("${A:-x}");
        assert_eq!(
            defaults.to_variable_map().get("A"),
            Some(&Some("x".to_string()))
        );
    }

    #[test]
    fn nested_placeholders_are_reserialized_without_their_defaults() {
        let defaults = collect("${A:-http://${HOST:-localhost}:${PORT}/}");
        assert_eq!(defaults.get("A"), Some("http://${HOST}:${PORT}/"));
        assert!(!defaults.contains("HOST"));
        assert!(!defaults.contains("PORT"));
    }

    #[test]
    fn expression_map_keeps_nested_defaults() {
        let defaults =
            collect("${URL:-http://${HOST:-localhost}:8080} ${URL:-other} ${A:-x\\}y} ${B}");
        let expressions = defaults.to_expression_map();
        assert_eq!(
            expressions["URL"].as_deref(),
            Some("http://${HOST:-localhost}:8080")
        );
        assert_eq!(expressions["A"].as_deref(), Some("x}y"));
        assert_eq!(expressions["B"], None);
    }

    #[test]
    fn first_declaration_wins() {
        // Redeclaring a name with another default is silently ignored.
        let defaults = collect("${A:-first} ${A:-second} ${A}");
        assert_eq!(defaults.get("A"), Some("first"));

        let defaults = collect("${A} ${A:-second}");
        assert_eq!(defaults.get("A"), Some(""));
    }

    #[test]
    fn names_are_sorted() {
        let defaults = collect("${ZED} ${alpha} ${Mid:-m}");
        assert_eq!(defaults.names(), vec!["Mid", "ZED", "alpha"]);
        assert_eq!(defaults.len(), 3);
    }

    #[test]
    fn plain_text_has_no_variables() {
        assert!(collect("kind: ConfigMap\n").is_empty());
    }
}
