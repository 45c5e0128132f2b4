//! Expression nodes.

use crate::ast::statement::Block;
use crate::ast::types::TypeExpr;
use crate::span::{Span, Spanned};
use crate::string_interner::StringId;

#[derive(Debug, Clone)]
pub struct Expression<'a> {
    pub kind: ExpressionKind<'a>,
    pub span: Span,
}

impl<'a> Expression<'a> {
    pub fn new(kind: ExpressionKind<'a>, span: Span) -> Self {
        Self { kind, span }
    }

    /// True for expressions that never need parentheses when spliced into
    /// another expression.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Literal(_)
                | ExpressionKind::Identifier(_)
                | ExpressionKind::SelfRef
                | ExpressionKind::Member(..)
                | ExpressionKind::Index(..)
                | ExpressionKind::Call(..)
                | ExpressionKind::Tuple(_)
                | ExpressionKind::Parenthesized(_)
        )
    }
}

#[derive(Debug, Clone)]
pub enum ExpressionKind<'a> {
    Literal(Literal),
    Identifier(StringId),
    /// The receiver of the enclosing method or property body.
    SelfRef,
    Unary(UnaryOp, &'a Expression<'a>),
    Binary(BinaryOp, &'a Expression<'a>, &'a Expression<'a>),
    /// Callee, arguments, explicit type arguments.
    ///
    /// A method or extension call is a `Call` whose callee is a `Member`.
    Call(
        &'a Expression<'a>,
        &'a [Argument<'a>],
        &'a [TypeExpr<'a>],
    ),
    Member(&'a Expression<'a>, Spanned<StringId>),
    Index(&'a Expression<'a>, &'a Expression<'a>),
    Tuple(&'a [Expression<'a>]),
    Lambda(&'a [Spanned<StringId>], LambdaBody<'a>),
    Cast(&'a Expression<'a>, &'a TypeExpr<'a>),
    Parenthesized(&'a Expression<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(StringId),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone)]
pub enum LambdaBody<'a> {
    Expression(&'a Expression<'a>),
    Block(Block<'a>),
}

/// A call argument, optionally named (`count: 3`).
#[derive(Debug, Clone)]
pub struct Argument<'a> {
    pub name: Option<Spanned<StringId>>,
    pub value: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}
