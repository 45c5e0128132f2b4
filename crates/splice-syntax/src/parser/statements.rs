//! Statement and block parsing.

use super::Parser;
use crate::ast::{
    AssignStatement, Block, ElseBranch, ExpressionKind, ForStatement, IfStatement, LetStatement,
    Pattern, ReturnStatement, Statement, WhileStatement,
};
use crate::error::SyntaxError;
use crate::span::Span;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    pub(crate) fn parse_block(&mut self) -> Result<Block<'a>, SyntaxError> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Block {
            statements: self.arena().alloc_slice_clone(&statements),
            span: Span::new(start.start, end.end),
        })
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Statement<'a>, SyntaxError> {
        match self.peek() {
            TokenKind::Let => self.parse_let(),
            TokenKind::If => Ok(Statement::If(self.parse_if()?)),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block()?)),
            _ => self.parse_expression_or_assign(),
        }
    }

    fn parse_let(&mut self) -> Result<Statement<'a>, SyntaxError> {
        let start = self.expect(TokenKind::Let)?.span;
        let pattern = self.parse_pattern()?;
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = Span::new(start.start, self.previous_span().end);
        Ok(Statement::Let(self.arena().alloc(LetStatement {
            pattern,
            ty,
            value,
            span,
        })))
    }

    fn parse_pattern(&mut self) -> Result<Pattern<'a>, SyntaxError> {
        if self.at(TokenKind::LParen) {
            let start = self.advance().span;
            let mut names = Vec::new();
            loop {
                names.push(self.expect_ident()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            let end = self.expect(TokenKind::RParen)?.span;
            Ok(Pattern::Tuple(
                self.arena().alloc_slice_copy(&names),
                Span::new(start.start, end.end),
            ))
        } else {
            Ok(Pattern::Identifier(self.expect_ident()?))
        }
    }

    fn parse_if(&mut self) -> Result<&'a IfStatement<'a>, SyntaxError> {
        let start = self.expect(TokenKind::If)?.span;
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;
        let else_branch = if self.eat(TokenKind::Else) {
            if self.at(TokenKind::If) {
                Some(ElseBranch::If(self.parse_if()?))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };
        let span = Span::new(start.start, self.previous_span().end);
        Ok(self.arena().alloc(IfStatement {
            condition,
            then_block,
            else_branch,
            span,
        }))
    }

    fn parse_while(&mut self) -> Result<Statement<'a>, SyntaxError> {
        let start = self.expect(TokenKind::While)?.span;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = Span::new(start.start, self.previous_span().end);
        Ok(Statement::While(self.arena().alloc(WhileStatement {
            condition,
            body,
            span,
        })))
    }

    fn parse_for(&mut self) -> Result<Statement<'a>, SyntaxError> {
        let start = self.expect(TokenKind::For)?.span;
        let variable = self.expect_ident()?;
        self.expect(TokenKind::In)?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = Span::new(start.start, self.previous_span().end);
        Ok(Statement::For(self.arena().alloc(ForStatement {
            variable,
            iterable,
            body,
            span,
        })))
    }

    fn parse_return(&mut self) -> Result<Statement<'a>, SyntaxError> {
        let start = self.expect(TokenKind::Return)?.span;
        // `return` with no value when the next token can't start an expression.
        let value = if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = Span::new(start.start, self.previous_span().end);
        Ok(Statement::Return(
            self.arena().alloc(ReturnStatement { value, span }),
        ))
    }

    fn parse_expression_or_assign(&mut self) -> Result<Statement<'a>, SyntaxError> {
        let expr = self.parse_expression()?;
        if self.eat(TokenKind::Eq) {
            if !matches!(
                expr.kind,
                ExpressionKind::Identifier(_)
                    | ExpressionKind::Member(..)
                    | ExpressionKind::Index(..)
            ) {
                return Err(SyntaxError::new("invalid assignment target", expr.span));
            }
            let value = self.parse_expression()?;
            let span = Span::new(expr.span.start, self.previous_span().end);
            return Ok(Statement::Assign(self.arena().alloc(AssignStatement {
                target: expr,
                value,
                span,
            })));
        }
        Ok(Statement::Expression(expr))
    }
}
