// SPDX-License-Identifier: Apache-2.0 OR MIT
use smallvec::SmallVec;

/// Byte offsets into the original template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Root AST structure for a parsed template.
#[derive(Debug, Clone)]
pub struct Ast {
    pub name: String,
    pub root: Block,
}

impl Ast {
    pub fn new(name: impl Into<String>, root: Block) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }
}

/// A sequential run of literal text and placeholders.
///
/// Most blocks (placeholder defaults in particular) hold one or two nodes, so
/// the storage stays inline until it grows past that.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub nodes: SmallVec<[Node; 2]>,
}

impl Block {
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Node types recognised by the parser.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Node {
    Text(TextNode),
    Placeholder(PlaceholderNode),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Text(node) => node.span,
            Node::Placeholder(node) => node.span,
        }
    }
}

/// Raw text literal, already unescaped.
#[derive(Debug, Clone)]
pub struct TextNode {
    pub span: Span,
    pub text: String,
}

impl TextNode {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }
}

/// A `${NAME}` reference, optionally carrying a default expression.
#[derive(Debug, Clone)]
pub struct PlaceholderNode {
    pub span: Span,
    pub name: String,
    pub default: Option<DefaultExpr>,
}

impl PlaceholderNode {
    pub fn new(span: Span, name: impl Into<String>, default: Option<DefaultExpr>) -> Self {
        Self {
            span,
            name: name.into(),
            default,
        }
    }

    /// Re-serializes the placeholder in canonical form.
    pub fn to_template_fragment(&self) -> String {
        let mut out = String::from("${");
        out.push_str(&self.name);
        if let Some(default) = &self.default {
            out.push_str(default.operator.as_str());
            write_default_block(&mut out, &default.block);
        }
        out.push('}');
        out
    }
}

/// Operator joining a placeholder name to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultOperator {
    /// `:-` falls back when the variable is unset or empty.
    UnsetOrEmpty,
    /// `-` falls back only when the variable is unset.
    Unset,
    /// `:=`, accepted as a synonym of `:-`.
    AssignUnsetOrEmpty,
    /// `=`, accepted as a synonym of `-`.
    AssignUnset,
}

impl DefaultOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultOperator::UnsetOrEmpty => ":-",
            DefaultOperator::Unset => "-",
            DefaultOperator::AssignUnsetOrEmpty => ":=",
            DefaultOperator::AssignUnset => "=",
        }
    }

    /// Whether an empty value triggers the default just like a missing one.
    pub fn treats_empty_as_unset(&self) -> bool {
        matches!(
            self,
            DefaultOperator::UnsetOrEmpty | DefaultOperator::AssignUnsetOrEmpty
        )
    }
}

/// Default expression of a placeholder: literal text and nested placeholders.
#[derive(Debug, Clone)]
pub struct DefaultExpr {
    pub operator: DefaultOperator,
    pub block: Box<Block>,
}

impl DefaultExpr {
    pub fn new(operator: DefaultOperator, block: Block) -> Self {
        Self {
            operator,
            block: Box::new(block),
        }
    }

    /// The default as standalone template source: parsing it yields the
    /// same block, nested placeholders included with their own defaults.
    pub fn to_template_text(&self) -> String {
        let mut out = String::new();
        write_top_level_block(&mut out, &self.block);
        out
    }
}

fn write_default_block(out: &mut String, block: &Block) {
    for node in &block.nodes {
        match node {
            Node::Text(text) => {
                for ch in text.text.chars() {
                    if matches!(ch, '}' | '\\' | '$') {
                        out.push('\\');
                    }
                    out.push(ch);
                }
            }
            Node::Placeholder(placeholder) => out.push_str(&placeholder.to_template_fragment()),
        }
    }
}

/// Writes `block` as top-level source, where `}` and `\\` are plain text and
/// only `$$` escapes.
pub(crate) fn write_top_level_block(out: &mut String, block: &Block) {
    let nodes = &block.nodes;
    for (idx, node) in nodes.iter().enumerate() {
        match node {
            Node::Text(text) => {
                let followed_by_placeholder = idx + 1 < nodes.len();
                write_top_level_text(out, &text.text, followed_by_placeholder);
            }
            Node::Placeholder(placeholder) => out.push_str(&placeholder.to_template_fragment()),
        }
    }
}

/// Doubles any `$` that would otherwise be read back as the start of a
/// placeholder or an escape.
fn write_top_level_text(out: &mut String, text: &str, followed_by_placeholder: bool) {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == '$' {
            let needs_escape = match chars.peek() {
                Some('{' | '$') => true,
                Some(_) => false,
                None => followed_by_placeholder,
            };
            if needs_escape {
                out.push('$');
            }
        }
    }
}
