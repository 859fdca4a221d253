// SPDX-License-Identifier: Apache-2.0 OR MIT
use std::collections::BTreeSet;

use crate::ast::{Ast, Block, DefaultOperator, Node, PlaceholderNode, Span};

pub fn analyze_template(ast: &Ast) -> TemplateAnalysis {
    let mut analyzer = Analyzer::default();
    analyzer.walk_block(&ast.root, 0);
    analyzer.finish()
}

/// Structural report over every placeholder occurrence, nested ones included.
#[derive(Debug, Clone)]
pub struct TemplateAnalysis {
    pub version: &'static str,
    pub placeholders: Vec<PlaceholderUsage>,
    /// Distinct names referenced anywhere, sorted.
    pub referenced: Vec<String>,
    /// Names whose only appearances are inside another placeholder's default.
    pub nested_only: Vec<String>,
    pub max_depth: usize,
}

#[derive(Debug, Clone)]
pub struct PlaceholderUsage {
    pub name: String,
    pub span: Span,
    pub operator: Option<DefaultOperator>,
    /// 0 for top-level placeholders, 1 inside a default, and so on.
    pub depth: usize,
}

#[derive(Default)]
struct Analyzer {
    placeholders: Vec<PlaceholderUsage>,
    top_level: BTreeSet<String>,
    referenced: BTreeSet<String>,
    max_depth: usize,
}

impl Analyzer {
    fn finish(self) -> TemplateAnalysis {
        let nested_only = self
            .referenced
            .iter()
            .filter(|name| !self.top_level.contains(*name))
            .cloned()
            .collect();
        TemplateAnalysis {
            version: env!("CARGO_PKG_VERSION"),
            placeholders: self.placeholders,
            referenced: self.referenced.into_iter().collect(),
            nested_only,
            max_depth: self.max_depth,
        }
    }

    fn walk_block(&mut self, block: &Block, depth: usize) {
        for node in &block.nodes {
            match node {
                Node::Placeholder(placeholder) => self.visit_placeholder(placeholder, depth),
                Node::Text(_) => {}
            }
        }
    }

    fn visit_placeholder(&mut self, node: &PlaceholderNode, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        if depth == 0 {
            self.top_level.insert(node.name.clone());
        }
        self.referenced.insert(node.name.clone());
        self.placeholders.push(PlaceholderUsage {
            name: node.name.clone(),
            span: node.span,
            operator: node.default.as_ref().map(|default| default.operator),
            depth,
        });
        if let Some(default) = &node.default {
            self.walk_block(&default.block, depth + 1);
        }
    }
}
