// SPDX-License-Identifier: Apache-2.0 OR MIT
use std::str::Chars;

use crate::ast::{DefaultOperator, Span};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Literal text with escapes already applied.
    Text(String),
    /// `${`
    Open,
    Name(String),
    Operator(DefaultOperator),
    /// `}` closing the innermost open placeholder.
    Close,
}

/// Deepest placeholder nesting the lexer accepts.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Splits canonical source into tokens.
///
/// The lexer tracks how many placeholders are open so that `}` and `\` are
/// only special inside a placeholder, while `$$` is only an escape at the top
/// level. The token stream it returns is always balanced and never nests
/// deeper than [`MAX_NESTING_DEPTH`].
pub fn lex(input: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    chars: Chars<'a>,
    pos: usize,
    peeked: Option<char>,
    tokens: Vec<Token>,
    text: String,
    text_start: usize,
    opens: Vec<usize>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            pos: 0,
            peeked: None,
            tokens: Vec::new(),
            text: String::new(),
            text_start: 0,
            opens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, Error> {
        loop {
            let start = self.pos;
            let Some(chr) = self.bump_char() else {
                break;
            };

            match chr {
                '$' => match self.peek_char() {
                    Some('{') => {
                        self.bump_char();
                        if self.opens.len() >= MAX_NESTING_DEPTH {
                            return Err(Error::parse_with_span(
                                "placeholder nesting too deep",
                                self.span_from(start),
                            ));
                        }
                        self.flush_text(start);
                        self.tokens.push(Token {
                            kind: TokenKind::Open,
                            span: self.span_from(start),
                        });
                        self.opens.push(start);
                        self.lex_head(start)?;
                    }
                    Some('$') if self.opens.is_empty() => {
                        self.bump_char();
                        self.push_text(start, '$');
                    }
                    _ => self.push_text(start, '$'),
                },
                '}' if !self.opens.is_empty() => {
                    self.flush_text(start);
                    self.tokens.push(Token {
                        kind: TokenKind::Close,
                        span: self.span_from(start),
                    });
                    self.opens.pop();
                }
                '\\' if !self.opens.is_empty() => match self.bump_char() {
                    Some(escaped) => self.push_text(start, escaped),
                    None => {
                        return Err(Error::parse_with_span(
                            "unterminated escape sequence",
                            self.span_from(start),
                        ));
                    }
                },
                other => self.push_text(start, other),
            }
        }

        if let Some(open) = self.opens.first() {
            return Err(Error::parse_with_span(
                "unterminated placeholder",
                Span::new(*open, self.pos),
            ));
        }

        self.flush_text(self.pos);
        Ok(self.tokens)
    }

    /// Reads the variable name and optional default operator following `${`.
    fn lex_head(&mut self, open: usize) -> Result<(), Error> {
        let name_start = self.pos;
        let mut name = String::new();
        if self.peek_char() == Some('$') {
            self.bump_char();
            name.push('$');
        }
        while let Some(ch) = self.peek_char() {
            if !is_name_char(ch) {
                break;
            }
            self.bump_char();
            name.push(ch);
        }

        if name.is_empty() || name == "$" {
            return Err(Error::parse_with_span(
                "bad substitution: missing variable name",
                Span::new(open, self.pos),
            ));
        }
        self.tokens.push(Token {
            kind: TokenKind::Name(name),
            span: self.span_from(name_start),
        });

        let op_start = self.pos;
        let operator = match self.peek_char() {
            // `}` is handled by the main loop; end of input is reported as
            // an unterminated placeholder there as well.
            Some('}') | None => return Ok(()),
            Some(':') => {
                self.bump_char();
                match self.peek_char() {
                    Some('-') => DefaultOperator::UnsetOrEmpty,
                    Some('=') => DefaultOperator::AssignUnsetOrEmpty,
                    _ => {
                        return Err(Error::parse_with_span(
                            "bad substitution: expected '-' or '=' after ':'",
                            self.span_from(op_start),
                        ));
                    }
                }
            }
            Some('-') => DefaultOperator::Unset,
            Some('=') => DefaultOperator::AssignUnset,
            Some(other) => {
                return Err(Error::parse_with_span(
                    format!("bad substitution: unexpected character '{other}' after variable name"),
                    Span::new(op_start, op_start + other.len_utf8()),
                ));
            }
        };
        self.bump_char();
        self.tokens.push(Token {
            kind: TokenKind::Operator(operator),
            span: self.span_from(op_start),
        });
        Ok(())
    }

    fn push_text(&mut self, start: usize, ch: char) {
        if self.text.is_empty() {
            self.text_start = start;
        }
        self.text.push(ch);
    }

    fn flush_text(&mut self, end: usize) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        self.tokens.push(Token {
            kind: TokenKind::Text(text),
            span: Span::new(self.text_start, end),
        });
    }

    fn bump_char(&mut self) -> Option<char> {
        if let Some(peek) = self.peeked.take() {
            self.pos += peek.len_utf8();
            Some(peek)
        } else {
            let ch = self.chars.next()?;
            self.pos += ch.len_utf8();
            Some(ch)
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.pos)
    }
}

/// Characters allowed in a placeholder name after the optional leading `$`.
pub fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn lexes_text_and_bare_placeholder() {
        let tokens = lex("name: ${NAME}\n").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Text("name: ".into()),
                TokenKind::Open,
                TokenKind::Name("NAME".into()),
                TokenKind::Close,
                TokenKind::Text("\n".into()),
            ]
        );
        assert_eq!(tokens[1].span, Span::new(6, 8));
        assert_eq!(tokens[2].span, Span::new(8, 12));
    }

    #[test]
    fn lexes_nested_default() {
        let tokens = lex("${A:-x${B}y}").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Open,
                TokenKind::Name("A".into()),
                TokenKind::Operator(DefaultOperator::UnsetOrEmpty),
                TokenKind::Text("x".into()),
                TokenKind::Open,
                TokenKind::Name("B".into()),
                TokenKind::Close,
                TokenKind::Text("y".into()),
                TokenKind::Close,
            ]
        );
    }

    #[test]
    fn dollar_escape_only_applies_at_top_level() {
        let tokens = lex("$${X} ${A-$$}").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Text("${X} ".into()),
                TokenKind::Open,
                TokenKind::Name("A".into()),
                TokenKind::Operator(DefaultOperator::Unset),
                TokenKind::Text("$$".into()),
                TokenKind::Close,
            ]
        );
    }

    #[test]
    fn backslash_escapes_inside_default() {
        let tokens = lex(r"${A:=a\}b} c\d").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Open,
                TokenKind::Name("A".into()),
                TokenKind::Operator(DefaultOperator::AssignUnsetOrEmpty),
                TokenKind::Text("a}b".into()),
                TokenKind::Close,
                TokenKind::Text(r" c\d".into()),
            ]
        );
    }

    #[test]
    fn stray_braces_and_dollars_are_text() {
        let tokens = lex("} $ {$x}").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Text("} $ {$x}".into())]);
    }

    #[test]
    fn accepts_leading_dollar_in_name() {
        let tokens = lex("${$HOME}").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Name("$HOME".into()));
    }

    #[test]
    fn errors_on_unterminated_placeholder() {
        let err = lex("a ${A:-b").unwrap_err();
        assert!(err.to_string().contains("unterminated placeholder"));
        assert_eq!(err.span(), Some(Span::new(2, 8)));
    }

    #[test]
    fn errors_on_missing_name() {
        let err = lex("${}").unwrap_err();
        assert!(err.to_string().contains("missing variable name"));
    }

    #[test]
    fn errors_on_illegal_character_after_name() {
        let err = lex("${A B}").unwrap_err();
        assert!(err.to_string().contains("unexpected character ' '"));
        let err = lex("${A:1}").unwrap_err();
        assert!(err.to_string().contains("expected '-' or '='"));
    }

    #[test]
    fn accepts_nesting_up_to_the_limit() {
        let source = format!(
            "{}x{}",
            "${A:-".repeat(MAX_NESTING_DEPTH),
            "}".repeat(MAX_NESTING_DEPTH)
        );
        assert!(lex(&source).is_ok());
    }

    #[test]
    fn errors_on_nesting_past_the_limit() {
        let depth = 2_000;
        let source = format!("{}x{}", "${A:-".repeat(depth), "}".repeat(depth));
        let err = lex(&source).unwrap_err();
        assert!(err.to_string().contains("placeholder nesting too deep"));
        let start = MAX_NESTING_DEPTH * "${A:-".len();
        assert_eq!(err.span(), Some(Span::new(start, start + 2)));
    }

    #[test]
    fn rejects_other_shell_expansions() {
        for source in [
            "${A:+x}", "${A+x}", "${A:?msg}", "${#A}", "${A#x}", "${A%x}", "${A/x/y}", "${A^^}",
            "${A,,}",
        ] {
            let err = lex(source).unwrap_err();
            assert!(
                err.to_string().contains("bad substitution"),
                "{source}: {err}"
            );
        }
    }

    #[test]
    fn errors_on_dangling_escape() {
        let err = lex("${A:-\\").unwrap_err();
        assert!(err.to_string().contains("unterminated escape sequence"));
    }
}
