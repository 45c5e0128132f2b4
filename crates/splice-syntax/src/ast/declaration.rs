//! Top-level items and class members.

use crate::ast::expression::Expression;
use crate::ast::statement::Block;
use crate::ast::types::TypeExpr;
use crate::span::{Span, Spanned};
use crate::string_interner::StringId;

#[derive(Debug, Clone)]
pub struct Module<'a> {
    pub items: &'a [Item<'a>],
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Item<'a> {
    Function(&'a FunctionDecl<'a>),
    Class(&'a ClassDecl<'a>),
}

#[derive(Debug, Clone)]
pub struct FunctionDecl<'a> {
    pub name: Spanned<StringId>,
    pub type_params: &'a [Spanned<StringId>],
    pub params: &'a [Param<'a>],
    pub return_type: Option<TypeExpr<'a>>,
    pub body: FunctionBody<'a>,
    /// Only meaningful for class methods.
    pub is_static: bool,
    pub span: Span,
}

impl<'a> FunctionDecl<'a> {
    /// True when the first parameter carries the `this` modifier, making
    /// this an extension function callable as `receiver.name(..)`.
    pub fn is_extension(&self) -> bool {
        self.params.first().is_some_and(|p| p.is_this)
    }
}

#[derive(Debug, Clone)]
pub enum FunctionBody<'a> {
    /// `= expr` expression body.
    Expression(&'a Expression<'a>),
    Block(Block<'a>),
    /// `extern fn` signature without a body.
    Extern,
}

#[derive(Debug, Clone)]
pub struct Param<'a> {
    pub name: Spanned<StringId>,
    pub ty: TypeExpr<'a>,
    pub default: Option<Expression<'a>>,
    /// `this` receiver parameter of an extension function.
    pub is_this: bool,
    /// Trailing `...` variadic parameter.
    pub is_variadic: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassDecl<'a> {
    pub name: Spanned<StringId>,
    pub members: &'a [Member<'a>],
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Member<'a> {
    Field(&'a FieldDecl<'a>),
    Const(&'a ConstDecl<'a>),
    Method(&'a FunctionDecl<'a>),
    Property(&'a PropertyDecl<'a>),
}

impl<'a> Member<'a> {
    pub fn name(&self) -> StringId {
        match self {
            Member::Field(f) => f.name.node,
            Member::Const(c) => c.name.node,
            Member::Method(m) => m.name.node,
            Member::Property(p) => p.name.node,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Member::Field(_) => false,
            Member::Const(_) => true,
            Member::Method(m) => m.is_static,
            Member::Property(p) => p.is_static,
        }
    }
}

/// Instance field: `let name: T`.
#[derive(Debug, Clone)]
pub struct FieldDecl<'a> {
    pub name: Spanned<StringId>,
    pub ty: TypeExpr<'a>,
    pub span: Span,
}

/// Class constant: `static let NAME = expr`.
#[derive(Debug, Clone)]
pub struct ConstDecl<'a> {
    pub name: Spanned<StringId>,
    pub ty: Option<TypeExpr<'a>>,
    pub value: Expression<'a>,
    pub span: Span,
}

/// Property accessor: `prop name: T { .. }` or `prop name: T = expr`.
#[derive(Debug, Clone)]
pub struct PropertyDecl<'a> {
    pub name: Spanned<StringId>,
    pub ty: TypeExpr<'a>,
    pub body: FunctionBody<'a>,
    pub is_static: bool,
    pub span: Span,
}
