//! Expression and type parsing.

use super::Parser;
use crate::ast::{
    Argument, BinaryOp, Expression, ExpressionKind, LambdaBody, Literal, TypeExpr, TypeKind,
    UnaryOp,
};
use crate::error::SyntaxError;
use crate::span::{Span, Spanned};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> Result<Expression<'a>, SyntaxError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expression<'a>, SyntaxError> {
        let mut left = self.parse_cast()?;
        loop {
            let Some(op) = self.peek_binary_op() else {
                return Ok(left);
            };
            let prec = op.precedence();
            if prec < min_prec {
                return Ok(left);
            }
            self.advance();
            // Left-associative: right operand binds one level tighter.
            let right = self.parse_binary(prec + 1)?;
            let span = left.span.merge(right.span);
            left = Expression::new(
                ExpressionKind::Binary(op, self.arena().alloc(left), self.arena().alloc(right)),
                span,
            );
        }
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        match self.peek() {
            TokenKind::OrOr => Some(BinaryOp::Or),
            TokenKind::AndAnd => Some(BinaryOp::And),
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Rem),
            _ => None,
        }
    }

    fn parse_cast(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let mut expr = self.parse_unary()?;
        while self.eat(TokenKind::As) {
            let ty = self.parse_type()?;
            let span = expr.span.merge(ty.span);
            expr = Expression::new(
                ExpressionKind::Cast(self.arena().alloc(expr), self.arena().alloc(ty)),
                span,
            );
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let op = match self.peek() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expression::new(
                ExpressionKind::Unary(op, self.arena().alloc(operand)),
                span,
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_ident()?;
                    let span = expr.span.merge(name.span);
                    expr = Expression::new(
                        ExpressionKind::Member(self.arena().alloc(expr), name),
                        span,
                    );
                }
                TokenKind::LParen => {
                    expr = self.parse_call(expr, Vec::new())?;
                }
                TokenKind::Lt => {
                    // Speculative: `f<Int>(x)` is a generic call, `f < g` is a
                    // comparison. Only a type-argument list followed by `(`
                    // commits to the call interpretation.
                    let checkpoint = self.checkpoint();
                    match self.try_parse_type_arguments() {
                        Some(type_args) if self.at(TokenKind::LParen) => {
                            expr = self.parse_call(expr, type_args)?;
                        }
                        _ => {
                            self.rewind(checkpoint);
                            return Ok(expr);
                        }
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let end = self.expect(TokenKind::RBracket)?.span;
                    let span = expr.span.merge(end);
                    expr = Expression::new(
                        ExpressionKind::Index(self.arena().alloc(expr), self.arena().alloc(index)),
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    fn try_parse_type_arguments(&mut self) -> Option<Vec<TypeExpr<'a>>> {
        debug_assert!(self.at(TokenKind::Lt));
        self.advance();
        let mut type_args = Vec::new();
        loop {
            match self.parse_type() {
                Ok(ty) => type_args.push(ty),
                Err(_) => return None,
            }
            if self.eat(TokenKind::Gt) {
                return Some(type_args);
            }
            if !self.eat(TokenKind::Comma) {
                return None;
            }
        }
    }

    fn parse_call(
        &mut self,
        callee: Expression<'a>,
        type_args: Vec<TypeExpr<'a>>,
    ) -> Result<Expression<'a>, SyntaxError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_argument()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RParen)?.span;
        let span = callee.span.merge(end);
        Ok(Expression::new(
            ExpressionKind::Call(
                self.arena().alloc(callee),
                self.arena().alloc_slice_clone(&args),
                self.arena().alloc_slice_clone(&type_args),
            ),
            span,
        ))
    }

    fn parse_argument(&mut self) -> Result<Argument<'a>, SyntaxError> {
        // `name: expr` is a named argument.
        if let TokenKind::Ident(_) = self.peek() {
            if matches!(self.peek_at(1), TokenKind::Colon) {
                let name = self.expect_ident()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expression()?;
                return Ok(Argument {
                    name: Some(name),
                    value,
                });
            }
        }
        Ok(Argument {
            name: None,
            value: self.parse_expression()?,
        })
    }

    fn parse_primary(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let span = self.peek_span();
        match self.peek() {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::Int(value)),
                    span,
                ))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::Float(value)),
                    span,
                ))
            }
            TokenKind::Str(id) => {
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::Str(id)),
                    span,
                ))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::Bool(true)),
                    span,
                ))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::Bool(false)),
                    span,
                ))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::Nil),
                    span,
                ))
            }
            TokenKind::SelfKw => {
                self.advance();
                Ok(Expression::new(ExpressionKind::SelfRef, span))
            }
            TokenKind::Ident(id) => {
                self.advance();
                Ok(Expression::new(ExpressionKind::Identifier(id), span))
            }
            TokenKind::LParen => self.parse_paren_or_tuple(),
            TokenKind::Pipe | TokenKind::OrOr => self.parse_lambda(),
            other => Err(self.error_here(format!(
                "expected expression, found {}",
                other.describe()
            ))),
        }
    }

    fn parse_paren_or_tuple(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let start = self.expect(TokenKind::LParen)?.span;
        let first = self.parse_expression()?;
        if self.eat(TokenKind::Comma) {
            let mut elements = vec![first];
            loop {
                elements.push(self.parse_expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            let end = self.expect(TokenKind::RParen)?.span;
            return Ok(Expression::new(
                ExpressionKind::Tuple(self.arena().alloc_slice_clone(&elements)),
                Span::new(start.start, end.end),
            ));
        }
        let end = self.expect(TokenKind::RParen)?.span;
        Ok(Expression::new(
            ExpressionKind::Parenthesized(self.arena().alloc(first)),
            Span::new(start.start, end.end),
        ))
    }

    fn parse_lambda(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let start = self.peek_span();
        let mut params: Vec<Spanned<_>> = Vec::new();
        if self.eat(TokenKind::OrOr) {
            // `||` lexes as a single token: a lambda with no parameters.
        } else {
            self.expect(TokenKind::Pipe)?;
            if !self.at(TokenKind::Pipe) {
                loop {
                    params.push(self.expect_ident()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::Pipe)?;
        }
        let body = if self.at(TokenKind::LBrace) {
            LambdaBody::Block(self.parse_block()?)
        } else {
            let expr = self.parse_expression()?;
            LambdaBody::Expression(self.arena().alloc(expr))
        };
        let span = Span::new(start.start, self.previous_span().end);
        Ok(Expression::new(
            ExpressionKind::Lambda(self.arena().alloc_slice_copy(&params), body),
            span,
        ))
    }

    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr<'a>, SyntaxError> {
        let start = self.peek_span();
        match self.peek() {
            TokenKind::Ident(id) => {
                self.advance();
                let mut args = Vec::new();
                if self.eat(TokenKind::Lt) {
                    loop {
                        args.push(self.parse_type()?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(TokenKind::Gt)?;
                }
                let span = Span::new(start.start, self.previous_span().end);
                Ok(TypeExpr::new(
                    TypeKind::Named(id, self.arena().alloc_slice_clone(&args)),
                    span,
                ))
            }
            TokenKind::LParen => {
                self.advance();
                let mut elements = Vec::new();
                if !self.at(TokenKind::RParen) {
                    loop {
                        elements.push(self.parse_type()?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen)?;
                if self.eat(TokenKind::Arrow) {
                    let ret = self.parse_type()?;
                    let span = Span::new(start.start, self.previous_span().end);
                    return Ok(TypeExpr::new(
                        TypeKind::Function(
                            self.arena().alloc_slice_clone(&elements),
                            self.arena().alloc(ret),
                        ),
                        span,
                    ));
                }
                let span = Span::new(start.start, self.previous_span().end);
                if elements.len() == 1 {
                    // `(T)` is just `T`.
                    return Ok(elements.swap_remove(0));
                }
                Ok(TypeExpr::new(
                    TypeKind::Tuple(self.arena().alloc_slice_clone(&elements)),
                    span,
                ))
            }
            other => Err(self.error_here(format!("expected type, found {}", other.describe()))),
        }
    }
}
