#![forbid(unsafe_code)]
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Parser and evaluator for shell-style `${NAME}` / `${NAME:-default}`
//! placeholders.
//!
//! The engine is pure: it discovers placeholders and their defaults, and it
//! substitutes them through a caller-supplied lookup. Deciding where values
//! come from and which variables are required lives in `lithos-manifest`.

pub mod analyze;
pub mod ast;
mod error;
pub mod lexer;
mod normalize;
mod parser;
mod runtime;
pub mod telemetry;
mod variables;

pub use analyze::{analyze_template, PlaceholderUsage, TemplateAnalysis};
pub use ast::{Ast, Block, DefaultExpr, DefaultOperator, Node, PlaceholderNode, Span, TextNode};
pub use error::Error;
pub use lexer::{Token, TokenKind, MAX_NESTING_DEPTH};
pub use normalize::normalize_legacy;
pub use runtime::EvalContext;
pub use variables::{VariableDefaults, VariableMap};

use std::fmt;
use std::time::Instant;

/// Parsed template with associated AST, discovered variables and original
/// source.
#[derive(Clone)]
pub struct Template {
    name: String,
    source: String,
    ast: Ast,
    variables: VariableDefaults,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("variables", &self.variables)
            .finish()
    }
}

impl Template {
    /// Parses canonical (strict dialect) source.
    pub fn parse_str(name: &str, source: &str) -> Result<Self, Error> {
        let started = Instant::now();
        let result = parser::parse_template(name, source);
        telemetry::record_parse(name, source.len(), started.elapsed(), result.is_ok());
        let ast = result?;
        let variables = VariableDefaults::collect(&ast);
        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
            ast,
            variables,
        })
    }

    /// Normalizes the legacy whitespace-tolerant dialect, then parses.
    ///
    /// [`Template::source`] returns the normalized text.
    pub fn parse_legacy(name: &str, source: &str) -> Result<Self, Error> {
        let normalized = normalize_legacy(source);
        Self::parse_str(name, &normalized)
    }

    /// Returns the template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source the AST was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns a reference to the parsed AST.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Returns the discovered top-level variables and their raw defaults.
    pub fn variables(&self) -> &VariableDefaults {
        &self.variables
    }

    /// Returns the discovered variable names in sorted order.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.names()
    }

    /// Runs structural analysis over every placeholder occurrence.
    pub fn analyze(&self) -> TemplateAnalysis {
        analyze::analyze_template(&self.ast)
    }

    /// Substitutes every placeholder using `lookup`.
    ///
    /// Literal text is copied verbatim. A name the lookup does not know falls
    /// back to its default expression, or to the empty string. Callers that
    /// must not leave empty holes check required variables first.
    pub fn substitute<F>(&self, lookup: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        let started = Instant::now();
        let mut ctx = EvalContext::new(lookup);
        let mut output = String::with_capacity(self.source.len());
        ctx.render_block(&self.ast.root, &mut output);
        telemetry::record_substitute(
            &self.name,
            self.source.len(),
            started.elapsed(),
            ctx.misses(),
        );
        output
    }

    /// Returns a canonical string representation of the parsed template.
    ///
    /// Parsing the result yields an equivalent AST.
    pub fn to_template_string(&self) -> String {
        let mut out = String::new();
        ast::write_top_level_block(&mut out, &self.ast.root);
        out
    }
}
