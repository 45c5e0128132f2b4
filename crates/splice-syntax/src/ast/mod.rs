//! Arena-allocated AST for Mica.
//!
//! Nodes borrow from an [`crate::arena::Arena`]; child lists are arena
//! slices. Node identity (the arena address of a node) is stable for the
//! lifetime of the arena, which is what the refactoring engine keys its
//! substitution maps on.

pub mod declaration;
pub mod expression;
pub mod statement;
pub mod types;

pub use declaration::{
    ClassDecl, ConstDecl, FieldDecl, FunctionBody, FunctionDecl, Item, Member, Module, Param,
    PropertyDecl,
};
pub use expression::{Argument, BinaryOp, Expression, ExpressionKind, LambdaBody, Literal, UnaryOp};
pub use statement::{
    AssignStatement, Block, ElseBranch, ForStatement, IfStatement, LetStatement, Pattern,
    ReturnStatement, Statement, WhileStatement,
};
pub use types::{TypeExpr, TypeKind};
