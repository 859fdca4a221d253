// SPDX-License-Identifier: Apache-2.0 OR MIT
use crate::ast::{Block, Node, PlaceholderNode};

/// Evaluation state for a single substitution pass.
///
/// The lookup returns `None` when a name is unknown. Unknown names fall back
/// to the placeholder's own default expression, and to the empty string when
/// there is none. Nested placeholders inside defaults go through the same
/// lookup.
pub struct EvalContext<F>
where
    F: FnMut(&str) -> Option<String>,
{
    lookup: F,
    misses: usize,
}

impl<F> EvalContext<F>
where
    F: FnMut(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup, misses: 0 }
    }

    /// Number of lookups that returned `None` so far.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn render_block(&mut self, block: &Block, output: &mut String) {
        for node in &block.nodes {
            match node {
                Node::Text(text) => output.push_str(&text.text),
                Node::Placeholder(placeholder) => self.render_placeholder(placeholder, output),
            }
        }
    }

    fn render_placeholder(&mut self, node: &PlaceholderNode, output: &mut String) {
        let value = (self.lookup)(&node.name);
        if value.is_none() {
            self.misses += 1;
        }

        match (&node.default, value) {
            (None, value) => output.push_str(&value.unwrap_or_default()),
            (Some(default), Some(value))
                if !(value.is_empty() && default.operator.treats_empty_as_unset()) =>
            {
                output.push_str(&value);
            }
            (Some(default), _) => self.render_block(&default.block, output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_template;
    use std::collections::HashMap;

    fn render(source: &str, vars: &[(&str, &str)]) -> String {
        let ast = parse_template("test", source).unwrap();
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut ctx = EvalContext::new(|name: &str| vars.get(name).cloned());
        let mut out = String::new();
        ctx.render_block(&ast.root, &mut out);
        out
    }

    #[test]
    fn substitutes_known_values_and_keeps_text() {
        assert_eq!(render("a=${A};", &[("A", "1")]), "a=1;");
    }

    #[test]
    fn unknown_without_default_is_empty() {
        assert_eq!(render("[${A}]", &[]), "[]");
    }

    #[test]
    fn colon_dash_falls_back_on_empty_value() {
        assert_eq!(render("${A:-d}", &[("A", "")]), "d");
        assert_eq!(render("${A:=d}", &[("A", "")]), "d");
    }

    #[test]
    fn dash_keeps_empty_value() {
        assert_eq!(render("[${A-d}]", &[("A", "")]), "[]");
        assert_eq!(render("[${A=d}]", &[("A", "")]), "[]");
        assert_eq!(render("[${A-d}]", &[]), "[d]");
    }

    #[test]
    fn nested_defaults_resolve_through_lookup() {
        assert_eq!(render("${A:-x${B:-y}z}", &[]), "xyz");
        assert_eq!(render("${A:-x${B:-y}z}", &[("B", "b")]), "xbz");
        assert_eq!(render("${A:-x${B:-y}z}", &[("A", "a")]), "a");
    }

    #[test]
    fn counts_misses() {
        let ast = parse_template("test", "${A} ${B:-b} ${C}").unwrap();
        let mut ctx = EvalContext::new(|name: &str| (name == "C").then(|| "c".to_string()));
        let mut out = String::new();
        ctx.render_block(&ast.root, &mut out);
        assert_eq!(out, " b c");
        assert_eq!(ctx.misses(), 2);
    }
}
