//! Recursive-descent parser for Mica.
//!
//! Produces an arena-allocated [`Module`]. The parser is infallible about
//! positions: every node carries the span of the source text it was parsed
//! from, which the engine later uses for span-based text edits.

mod declarations;
mod expressions;
mod statements;

use crate::arena::Arena;
use crate::ast::Module;
use crate::error::SyntaxError;
use crate::span::{Span, Spanned};
use crate::string_interner::{StringId, StringInterner};
use crate::token::{Token, TokenKind};
use std::sync::Arc;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    arena: &'a Arena,
    interner: Arc<StringInterner>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, arena: &'a Arena, interner: &Arc<StringInterner>) -> Self {
        Self {
            tokens,
            pos: 0,
            arena,
            interner: Arc::clone(interner),
        }
    }

    /// Parse a whole module.
    pub fn parse(mut self) -> Result<&'a Module<'a>, SyntaxError> {
        let start = self.peek_span();
        let mut items = Vec::new();
        while !self.at(TokenKind::Eof) {
            items.push(self.parse_item()?);
        }
        let span = Span::new(start.start, self.peek_span().end);
        Ok(self.arena.alloc(Module {
            items: self.arena.alloc_slice_clone(&items),
            span,
        }))
    }

    pub(crate) fn arena(&self) -> &'a Arena {
        self.arena
    }

    // Token cursor helpers

    pub(crate) fn peek(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    pub(crate) fn peek_at(&self, offset: usize) -> TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    pub(crate) fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.peek()) == std::mem::discriminant(&kind)
    }

    /// Consume the token if it matches `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek().describe()
            )))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<Spanned<StringId>, SyntaxError> {
        match self.peek() {
            TokenKind::Ident(id) => {
                let span = self.peek_span();
                self.advance();
                Ok(Spanned::new(id, span))
            }
            other => Err(self.error_here(format!(
                "expected identifier, found {}",
                other.describe()
            ))),
        }
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.peek_span())
    }

    /// Save the cursor so a speculative parse can be rolled back.
    pub(crate) fn checkpoint(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    pub(crate) fn resolve(&self, id: StringId) -> String {
        self.interner.resolve(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExpressionKind, FunctionBody, Item, Statement};
    use crate::lexer::Lexer;
    use indoc::indoc;

    fn parse_source<'a>(source: &str, arena: &'a Arena) -> &'a Module<'a> {
        let interner = Arc::new(StringInterner::new());
        let tokens = Lexer::new(source, &interner).tokenize().unwrap();
        Parser::new(tokens, arena, &interner).parse().unwrap()
    }

    #[test]
    fn parses_expression_bodied_function() {
        let arena = Arena::new();
        let module = parse_source("fn add(a: Int, b: Int) -> Int = a + b", &arena);
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        assert_eq!(decl.params.len(), 2);
        assert!(matches!(decl.body, FunctionBody::Expression(_)));
    }

    #[test]
    fn parses_extension_function() {
        let arena = Arena::new();
        let module = parse_source(
            "fn doubled(this x: Int) -> Int { return x * 2 }",
            &arena,
        );
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        assert!(decl.is_extension());
    }

    #[test]
    fn parses_class_with_members() {
        let arena = Arena::new();
        let module = parse_source(
            indoc! {"
                class Rect {
                    let w: Int
                    let h: Int
                    static let SIDES = 4
                    prop area: Int { return self.w * self.h }
                    static fn unit() -> Rect = Rect(1, 1)
                }
            "},
            &arena,
        );
        let Item::Class(class) = &module.items[0] else {
            panic!("expected class");
        };
        assert_eq!(class.members.len(), 5);
    }

    #[test]
    fn parses_generic_call_with_type_arguments() {
        let arena = Arena::new();
        let module = parse_source(
            indoc! {"
                fn main() {
                    first<Int>(xs)
                }
            "},
            &arena,
        );
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        let FunctionBody::Block(block) = &decl.body else {
            panic!("expected block body");
        };
        let Statement::Expression(expr) = &block.statements[0] else {
            panic!("expected expression statement");
        };
        let ExpressionKind::Call(_, args, type_args) = &expr.kind else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 1);
        assert_eq!(type_args.len(), 1);
    }

    #[test]
    fn less_than_is_not_a_type_argument_list() {
        let arena = Arena::new();
        let module = parse_source(
            indoc! {"
                fn main() {
                    if a < b {
                        use(a)
                    }
                }
            "},
            &arena,
        );
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        let FunctionBody::Block(block) = &decl.body else {
            panic!("expected block body");
        };
        assert!(matches!(block.statements[0], Statement::If(_)));
    }

    #[test]
    fn parses_named_arguments_and_defaults() {
        let arena = Arena::new();
        let module = parse_source(
            indoc! {r#"
                fn pad(s: String, n: Int = 0) -> String = s
                fn main() {
                    pad("x", n: 2)
                }
            "#},
            &arena,
        );
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        assert!(decl.params[1].default.is_some());
        let Item::Function(main) = &module.items[1] else {
            panic!("expected function");
        };
        let FunctionBody::Block(block) = &main.body else {
            panic!("expected block");
        };
        let Statement::Expression(expr) = &block.statements[0] else {
            panic!("expected expression statement");
        };
        let ExpressionKind::Call(_, args, _) = &expr.kind else {
            panic!("expected call");
        };
        assert!(args[0].name.is_none());
        assert!(args[1].name.is_some());
    }

    #[test]
    fn parses_lambda_and_cast() {
        let arena = Arena::new();
        let module = parse_source(
            indoc! {"
                fn main() {
                    let f = |x| x + 1
                    let g = f as (Int) -> Int
                }
            "},
            &arena,
        );
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        let FunctionBody::Block(block) = &decl.body else {
            panic!("expected block");
        };
        assert_eq!(block.statements.len(), 2);
    }

    #[test]
    fn rejects_missing_paren() {
        let arena = Arena::new();
        let interner = Arc::new(StringInterner::new());
        let tokens = Lexer::new("fn broken(a: Int { }", &interner)
            .tokenize()
            .unwrap();
        assert!(Parser::new(tokens, &arena, &interner).parse().is_err());
    }
}
