//! Statement nodes.

use crate::ast::expression::Expression;
use crate::ast::types::TypeExpr;
use crate::span::{Span, Spanned};
use crate::string_interner::StringId;

#[derive(Debug, Clone)]
pub struct Block<'a> {
    pub statements: &'a [Statement<'a>],
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Statement<'a> {
    Let(&'a LetStatement<'a>),
    Assign(&'a AssignStatement<'a>),
    Expression(Expression<'a>),
    If(&'a IfStatement<'a>),
    While(&'a WhileStatement<'a>),
    For(&'a ForStatement<'a>),
    Return(&'a ReturnStatement<'a>),
    Block(Block<'a>),
}

impl<'a> Statement<'a> {
    pub fn span(&self) -> Span {
        match self {
            Statement::Let(s) => s.span,
            Statement::Assign(s) => s.span,
            Statement::Expression(e) => e.span,
            Statement::If(s) => s.span,
            Statement::While(s) => s.span,
            Statement::For(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::Block(b) => b.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LetStatement<'a> {
    pub pattern: Pattern<'a>,
    pub ty: Option<TypeExpr<'a>>,
    pub value: Expression<'a>,
    pub span: Span,
}

/// Binding pattern of a `let`.
#[derive(Debug, Clone)]
pub enum Pattern<'a> {
    Identifier(Spanned<StringId>),
    Tuple(&'a [Spanned<StringId>], Span),
}

#[derive(Debug, Clone)]
pub struct AssignStatement<'a> {
    /// Identifier, member access or index expression.
    pub target: Expression<'a>,
    pub value: Expression<'a>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStatement<'a> {
    pub condition: Expression<'a>,
    pub then_block: Block<'a>,
    pub else_branch: Option<ElseBranch<'a>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ElseBranch<'a> {
    If(&'a IfStatement<'a>),
    Block(Block<'a>),
}

#[derive(Debug, Clone)]
pub struct WhileStatement<'a> {
    pub condition: Expression<'a>,
    pub body: Block<'a>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStatement<'a> {
    pub variable: Spanned<StringId>,
    pub iterable: Expression<'a>,
    pub body: Block<'a>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement<'a> {
    pub value: Option<Expression<'a>>,
    pub span: Span,
}
