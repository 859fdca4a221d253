// SPDX-License-Identifier: Apache-2.0 OR MIT
use crate::ast::{Ast, Block, DefaultExpr, Node, PlaceholderNode, Span, TextNode};
use crate::error::Error;
use crate::lexer;
use crate::lexer::{Token, TokenKind};

/// Primary entry point for parsing canonical template sources.
///
/// The lexer already balances `${` against `}`, so the parser is a small
/// recursive descent over the token stream: a block is a run of text and
/// placeholders, and a placeholder's default is itself a block terminated by
/// the matching close token.
pub fn parse_template(name: &str, source: &str) -> Result<Ast, Error> {
    let tokens = lexer::lex(source)?;
    let mut parser = Parser::new(&tokens);
    let root = parser.parse_block(false)?;
    if let Some(token) = parser.peek() {
        return Err(Error::parse_with_span("unexpected '}'", token.span));
    }
    Ok(Ast::new(name, root))
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn parse_block(&mut self, nested: bool) -> Result<Block, Error> {
        let mut block = Block::default();
        while let Some(token) = self.peek() {
            match &token.kind {
                TokenKind::Text(text) => {
                    self.pos += 1;
                    block.push(Node::Text(TextNode::new(token.span, text.clone())));
                }
                TokenKind::Open => {
                    let placeholder = self.parse_placeholder()?;
                    block.push(Node::Placeholder(placeholder));
                }
                TokenKind::Close if nested => break,
                other => {
                    return Err(Error::parse_with_span(
                        format!("unexpected token {other:?}"),
                        token.span,
                    ));
                }
            }
        }
        Ok(block)
    }

    fn parse_placeholder(&mut self) -> Result<PlaceholderNode, Error> {
        let open = self
            .advance()
            .ok_or_else(|| Error::parse("expected '${'", None))?;

        let name = match self.advance() {
            Some(Token {
                kind: TokenKind::Name(name),
                ..
            }) => name.clone(),
            Some(token) => {
                return Err(Error::parse_with_span(
                    "bad substitution: missing variable name",
                    token.span,
                ));
            }
            None => {
                return Err(Error::parse_with_span(
                    "unterminated placeholder",
                    open.span,
                ));
            }
        };

        let default = match self.peek() {
            Some(Token {
                kind: TokenKind::Operator(operator),
                ..
            }) => {
                self.pos += 1;
                let block = self.parse_block(true)?;
                Some(DefaultExpr::new(*operator, block))
            }
            _ => None,
        };

        match self.advance() {
            Some(Token {
                kind: TokenKind::Close,
                span,
            }) => Ok(PlaceholderNode::new(
                Span::new(open.span.start, span.end),
                name,
                default,
            )),
            Some(token) => Err(Error::parse_with_span(
                "bad substitution: expected '}'",
                token.span,
            )),
            None => Err(Error::parse_with_span(
                "unterminated placeholder",
                open.span,
            )),
        }
    }
}
