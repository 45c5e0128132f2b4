//! Structural rewriting of the body against a substitution map.
//!
//! The rewriter carries no policy: every decision was made while building
//! the [`SubstitutionMap`], and this pass just produces a copy of the body
//! with mapped nodes replaced. Unmapped nodes are copied unchanged, with
//! children allocated in the destination arena.

use splice_syntax::ast::{
    Argument, Block, ElseBranch, Expression, ExpressionKind, IfStatement, LambdaBody, Pattern,
    Statement, TypeExpr, TypeKind,
};
use splice_syntax::{Arena, Spanned, StringId};

use crate::inline::substitution::{Replacement, SubstitutionMap};
use crate::sema::NodeKey;

pub struct InlineRewriter<'a, 'c> {
    map: &'c SubstitutionMap<'a>,
    arena: &'a Arena,
}

impl<'a, 'c> InlineRewriter<'a, 'c> {
    pub fn new(map: &'c SubstitutionMap<'a>, arena: &'a Arena) -> Self {
        Self { map, arena }
    }

    pub fn rewrite_expression(&self, expr: &'a Expression<'a>) -> Expression<'a> {
        match self.map.nodes.get(&NodeKey::of(expr)) {
            // Replacement trees can carry mapped nodes of their own, for
            // instance a default value naming a static of the declaring
            // class, so they go through the rewriter too.
            Some(Replacement::Expression(replacement)) => self.rewrite_expression(replacement),
            Some(Replacement::Rename(fresh)) => {
                Expression::new(ExpressionKind::Identifier(*fresh), expr.span)
            }
            None => self.rewrite_expression_children(expr),
        }
    }

    fn rewrite_expression_children(&self, expr: &'a Expression<'a>) -> Expression<'a> {
        let kind = match &expr.kind {
            ExpressionKind::Literal(_)
            | ExpressionKind::Identifier(_)
            | ExpressionKind::SelfRef => expr.kind.clone(),
            ExpressionKind::Unary(op, operand) => {
                ExpressionKind::Unary(*op, self.alloc_expression(operand))
            }
            ExpressionKind::Binary(op, left, right) => ExpressionKind::Binary(
                *op,
                self.alloc_expression(left),
                self.alloc_expression(right),
            ),
            ExpressionKind::Call(callee, args, type_args) => {
                let args: Vec<Argument<'a>> = args
                    .iter()
                    .map(|arg| Argument {
                        name: arg.name,
                        value: self.rewrite_expression(&arg.value),
                    })
                    .collect();
                let type_args: Vec<TypeExpr<'a>> =
                    type_args.iter().map(|ty| self.rewrite_type(ty)).collect();
                ExpressionKind::Call(
                    self.alloc_expression(callee),
                    self.arena.alloc_slice_clone(&args),
                    self.arena.alloc_slice_clone(&type_args),
                )
            }
            ExpressionKind::Member(receiver, name) => {
                ExpressionKind::Member(self.alloc_expression(receiver), *name)
            }
            ExpressionKind::Index(base, index) => {
                ExpressionKind::Index(self.alloc_expression(base), self.alloc_expression(index))
            }
            ExpressionKind::Tuple(elements) => {
                let elements: Vec<Expression<'a>> = elements
                    .iter()
                    .map(|element| self.rewrite_expression(element))
                    .collect();
                ExpressionKind::Tuple(self.arena.alloc_slice_clone(&elements))
            }
            ExpressionKind::Lambda(params, body) => {
                let params: Vec<Spanned<StringId>> =
                    params.iter().map(|param| self.rewrite_binder(param)).collect();
                let body = match body {
                    LambdaBody::Expression(e) => LambdaBody::Expression(self.alloc_expression(e)),
                    LambdaBody::Block(b) => LambdaBody::Block(self.rewrite_block(b)),
                };
                ExpressionKind::Lambda(self.arena.alloc_slice_copy(&params), body)
            }
            ExpressionKind::Cast(operand, ty) => ExpressionKind::Cast(
                self.alloc_expression(operand),
                self.arena.alloc(self.rewrite_type(ty)),
            ),
            ExpressionKind::Parenthesized(inner) => {
                ExpressionKind::Parenthesized(self.alloc_expression(inner))
            }
        };
        Expression::new(kind, expr.span)
    }

    fn alloc_expression(&self, expr: &'a Expression<'a>) -> &'a Expression<'a> {
        self.arena.alloc(self.rewrite_expression(expr))
    }

    pub fn rewrite_statement(&self, statement: &'a Statement<'a>) -> Statement<'a> {
        match statement {
            Statement::Let(s) => {
                let rewritten = splice_syntax::ast::LetStatement {
                    pattern: self.rewrite_pattern(&s.pattern),
                    ty: s.ty.as_ref().map(|ty| self.rewrite_type(ty)),
                    value: self.rewrite_expression(&s.value),
                    span: s.span,
                };
                Statement::Let(self.arena.alloc(rewritten))
            }
            Statement::Assign(s) => {
                let rewritten = splice_syntax::ast::AssignStatement {
                    target: self.rewrite_expression(&s.target),
                    value: self.rewrite_expression(&s.value),
                    span: s.span,
                };
                Statement::Assign(self.arena.alloc(rewritten))
            }
            Statement::Expression(e) => Statement::Expression(self.rewrite_expression(e)),
            Statement::If(s) => Statement::If(self.arena.alloc(self.rewrite_if(s))),
            Statement::While(s) => {
                let rewritten = splice_syntax::ast::WhileStatement {
                    condition: self.rewrite_expression(&s.condition),
                    body: self.rewrite_block(&s.body),
                    span: s.span,
                };
                Statement::While(self.arena.alloc(rewritten))
            }
            Statement::For(s) => {
                let rewritten = splice_syntax::ast::ForStatement {
                    variable: self.rewrite_binder(&s.variable),
                    iterable: self.rewrite_expression(&s.iterable),
                    body: self.rewrite_block(&s.body),
                    span: s.span,
                };
                Statement::For(self.arena.alloc(rewritten))
            }
            Statement::Return(s) => {
                let rewritten = splice_syntax::ast::ReturnStatement {
                    value: s.value.as_ref().map(|value| self.rewrite_expression(value)),
                    span: s.span,
                };
                Statement::Return(self.arena.alloc(rewritten))
            }
            Statement::Block(b) => Statement::Block(self.rewrite_block(b)),
        }
    }

    fn rewrite_if(&self, s: &'a IfStatement<'a>) -> IfStatement<'a> {
        IfStatement {
            condition: self.rewrite_expression(&s.condition),
            then_block: self.rewrite_block(&s.then_block),
            else_branch: s.else_branch.as_ref().map(|branch| match branch {
                ElseBranch::If(nested) => ElseBranch::If(self.arena.alloc(self.rewrite_if(nested))),
                ElseBranch::Block(block) => ElseBranch::Block(self.rewrite_block(block)),
            }),
            span: s.span,
        }
    }

    pub fn rewrite_block(&self, block: &Block<'a>) -> Block<'a> {
        let statements: Vec<Statement<'a>> = block
            .statements
            .iter()
            .map(|statement| self.rewrite_statement(statement))
            .collect();
        Block {
            statements: self.arena.alloc_slice_clone(&statements),
            span: block.span,
        }
    }

    fn rewrite_pattern(&self, pattern: &'a Pattern<'a>) -> Pattern<'a> {
        match pattern {
            Pattern::Identifier(name) => Pattern::Identifier(self.rewrite_binder(name)),
            Pattern::Tuple(names, span) => {
                let names: Vec<Spanned<StringId>> =
                    names.iter().map(|name| self.rewrite_binder(name)).collect();
                Pattern::Tuple(self.arena.alloc_slice_copy(&names), *span)
            }
        }
    }

    /// A declaration-site identifier, renamed when the map says so.
    fn rewrite_binder(&self, name: &'a Spanned<StringId>) -> Spanned<StringId> {
        match self.map.nodes.get(&NodeKey::of(name)) {
            Some(Replacement::Rename(fresh)) => Spanned::new(*fresh, name.span),
            _ => *name,
        }
    }

    pub fn rewrite_type(&self, ty: &'a TypeExpr<'a>) -> TypeExpr<'a> {
        match &ty.kind {
            TypeKind::Named(name, args) => {
                if let Some(replacement) = self.map.type_args.get(name) {
                    return (*replacement).clone();
                }
                let args: Vec<TypeExpr<'a>> = args.iter().map(|arg| self.rewrite_type(arg)).collect();
                TypeExpr::new(
                    TypeKind::Named(*name, self.arena.alloc_slice_clone(&args)),
                    ty.span,
                )
            }
            TypeKind::Function(params, ret) => {
                let params: Vec<TypeExpr<'a>> =
                    params.iter().map(|param| self.rewrite_type(param)).collect();
                TypeExpr::new(
                    TypeKind::Function(
                        self.arena.alloc_slice_clone(&params),
                        self.arena.alloc(self.rewrite_type(ret)),
                    ),
                    ty.span,
                )
            }
            TypeKind::Tuple(elements) => {
                let elements: Vec<TypeExpr<'a>> = elements
                    .iter()
                    .map(|element| self.rewrite_type(element))
                    .collect();
                TypeExpr::new(
                    TypeKind::Tuple(self.arena.alloc_slice_clone(&elements)),
                    ty.span,
                )
            }
        }
    }
}
