//! Item and member parsing.

use super::Parser;
use crate::ast::{
    ClassDecl, ConstDecl, FieldDecl, FunctionBody, FunctionDecl, Item, Member, Param, PropertyDecl,
};
use crate::error::SyntaxError;
use crate::span::Span;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    pub(crate) fn parse_item(&mut self) -> Result<Item<'a>, SyntaxError> {
        match self.peek() {
            TokenKind::Fn => {
                let decl = self.parse_function(false, false)?;
                Ok(Item::Function(decl))
            }
            TokenKind::Extern => {
                self.advance();
                let decl = self.parse_function(false, true)?;
                Ok(Item::Function(decl))
            }
            TokenKind::Class => Ok(Item::Class(self.parse_class()?)),
            other => Err(self.error_here(format!(
                "expected `fn`, `extern` or `class`, found {}",
                other.describe()
            ))),
        }
    }

    /// Parse a function declaration. The leading `fn` has not been consumed
    /// yet; `extern` (if any) has.
    pub(crate) fn parse_function(
        &mut self,
        is_static: bool,
        is_extern: bool,
    ) -> Result<&'a FunctionDecl<'a>, SyntaxError> {
        let start = self.expect(TokenKind::Fn)?.span;
        let name = self.expect_ident()?;

        let mut type_params = Vec::new();
        if self.eat(TokenKind::Lt) {
            loop {
                type_params.push(self.expect_ident()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Gt)?;
        }

        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;

        let return_type = if self.eat(TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = if is_extern {
            FunctionBody::Extern
        } else if self.eat(TokenKind::Eq) {
            let expr = self.parse_expression()?;
            FunctionBody::Expression(self.arena().alloc(expr))
        } else {
            FunctionBody::Block(self.parse_block()?)
        };

        let span = Span::new(start.start, self.previous_span().end);
        Ok(self.arena().alloc(FunctionDecl {
            name,
            type_params: self.arena().alloc_slice_copy(&type_params),
            params: self.arena().alloc_slice_clone(&params),
            return_type,
            body,
            is_static,
            span,
        }))
    }

    fn parse_params(&mut self) -> Result<Vec<Param<'a>>, SyntaxError> {
        let mut params = Vec::new();
        if self.at(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let start = self.peek_span();
            let is_this = self.eat(TokenKind::This);
            if is_this && !params.is_empty() {
                return Err(self.error_here("`this` is only allowed on the first parameter"));
            }
            let name = self.expect_ident()?;
            if params.iter().any(|p: &Param| p.name.node == name.node) {
                return Err(SyntaxError::new(
                    format!("duplicate parameter `{}`", self.resolve(name.node)),
                    name.span,
                ));
            }
            self.expect(TokenKind::Colon)?;
            let is_variadic = self.eat(TokenKind::Ellipsis);
            let ty = self.parse_type()?;
            let default = if self.eat(TokenKind::Eq) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            let span = Span::new(start.start, self.previous_span().end);
            params.push(Param {
                name,
                ty,
                default,
                is_this,
                is_variadic,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_class(&mut self) -> Result<&'a ClassDecl<'a>, SyntaxError> {
        let start = self.expect(TokenKind::Class)?.span;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) {
            members.push(self.parse_member()?);
        }
        let end = self.expect(TokenKind::RBrace)?.span;

        Ok(self.arena().alloc(ClassDecl {
            name,
            members: self.arena().alloc_slice_clone(&members),
            span: Span::new(start.start, end.end),
        }))
    }

    fn parse_member(&mut self) -> Result<Member<'a>, SyntaxError> {
        let is_static = self.eat(TokenKind::Static);
        match self.peek() {
            TokenKind::Fn => Ok(Member::Method(self.parse_function(is_static, false)?)),
            TokenKind::Let if is_static => Ok(Member::Const(self.parse_const()?)),
            TokenKind::Let => Ok(Member::Field(self.parse_field()?)),
            TokenKind::Prop => Ok(Member::Property(self.parse_property(is_static)?)),
            other => Err(self.error_here(format!(
                "expected class member, found {}",
                other.describe()
            ))),
        }
    }

    fn parse_field(&mut self) -> Result<&'a FieldDecl<'a>, SyntaxError> {
        let start = self.expect(TokenKind::Let)?.span;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let span = Span::new(start.start, self.previous_span().end);
        Ok(self.arena().alloc(FieldDecl { name, ty, span }))
    }

    fn parse_const(&mut self) -> Result<&'a ConstDecl<'a>, SyntaxError> {
        let start = self.expect(TokenKind::Let)?.span;
        let name = self.expect_ident()?;
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = Span::new(start.start, self.previous_span().end);
        Ok(self.arena().alloc(ConstDecl {
            name,
            ty,
            value,
            span,
        }))
    }

    fn parse_property(&mut self, is_static: bool) -> Result<&'a PropertyDecl<'a>, SyntaxError> {
        let start = self.expect(TokenKind::Prop)?.span;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;

        let body = if self.eat(TokenKind::Eq) {
            let expr = self.parse_expression()?;
            FunctionBody::Expression(self.arena().alloc(expr))
        } else {
            FunctionBody::Block(self.parse_block()?)
        };

        let span = Span::new(start.start, self.previous_span().end);
        Ok(self.arena().alloc(PropertyDecl {
            name,
            ty,
            body,
            is_static,
            span,
        }))
    }
}
