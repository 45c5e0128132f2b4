//! Syntax layer for the Mica language.
//!
//! Provides everything the refactoring engine needs from a host compiler
//! platform: an arena-allocated AST, a lexer and recursive-descent parser,
//! interned identifiers, byte spans, and a printer that renders AST nodes
//! back into source text.
//!
//! The AST is immutable: nodes are allocated once in an [`arena::Arena`] and
//! rewrites always produce new nodes, never mutate existing ones.

pub mod arena;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod span;
pub mod string_interner;
pub mod token;

pub use arena::Arena;
pub use error::SyntaxError;
pub use lexer::Lexer;
pub use parser::Parser;
pub use printer::Printer;
pub use span::{Span, Spanned};
pub use string_interner::{StringId, StringInterner};

use std::sync::Arc;

/// Lex and parse a full module in one call.
pub fn parse_module<'arena>(
    source: &str,
    arena: &'arena Arena,
    interner: &Arc<StringInterner>,
) -> Result<&'arena ast::Module<'arena>, SyntaxError> {
    let tokens = Lexer::new(source, interner).tokenize()?;
    Parser::new(tokens, arena, interner).parse()
}
