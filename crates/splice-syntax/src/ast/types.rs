//! Type annotation nodes.

use crate::span::Span;
use crate::string_interner::StringId;

#[derive(Debug, Clone)]
pub struct TypeExpr<'a> {
    pub kind: TypeKind<'a>,
    pub span: Span,
}

impl<'a> TypeExpr<'a> {
    pub fn new(kind: TypeKind<'a>, span: Span) -> Self {
        Self { kind, span }
    }

    /// True when the type is a function type `(..) -> T`.
    pub fn is_function(&self) -> bool {
        matches!(self.kind, TypeKind::Function(..))
    }
}

#[derive(Debug, Clone)]
pub enum TypeKind<'a> {
    /// Named type with optional arguments: `Int`, `List<Int>`.
    Named(StringId, &'a [TypeExpr<'a>]),
    /// Function type: `(Int, Int) -> Int`.
    Function(&'a [TypeExpr<'a>], &'a TypeExpr<'a>),
    /// Tuple type: `(Int, String)`.
    Tuple(&'a [TypeExpr<'a>]),
}
