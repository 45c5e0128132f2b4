//! Building the node-level substitution map for one call site.
//!
//! A single scoped pass over the body decides, per identifier node, which
//! rule applies. First match wins:
//!
//! 1. a local declared in the body, possibly renamed for collisions;
//! 2. a parameter, replaced by its bound argument expression;
//! 3. a static member of the declaring class, qualified with the class name
//!    when the call site is outside that class;
//! 4. anything else is left untouched.
//!
//! `self` maps to the receiver expression, and type annotations naming one
//! of the declaration's type parameters map to the call site's explicit
//! type arguments.

use rustc_hash::FxHashMap;
use splice_syntax::ast::{
    Block, ClassDecl, ElseBranch, Expression, ExpressionKind, FunctionBody, LambdaBody, Pattern,
    Statement, TypeExpr, TypeKind,
};
use splice_syntax::{Arena, Span, Spanned, StringId, StringInterner};

use crate::inline::params::{BindingKind, BoundParameters};
use crate::inline::InlineError;
use crate::sema::NodeKey;

pub enum Replacement<'a> {
    /// Replace the node with an expression (argument, receiver, or a
    /// class-qualified member access).
    Expression(&'a Expression<'a>),
    /// Replace the identifier with a fresh name.
    Rename(StringId),
}

/// Everything the rewriter needs to know, keyed by node identity.
pub struct SubstitutionMap<'a> {
    pub nodes: FxHashMap<NodeKey, Replacement<'a>>,
    /// Type-parameter name to call-site type argument. Type parameters
    /// cannot be shadowed inside a body, so a name-keyed map suffices.
    pub type_args: FxHashMap<StringId, &'a TypeExpr<'a>>,
}

pub struct SubstitutionInput<'a, 'c> {
    pub body: &'a FunctionBody<'a>,
    pub bound: &'c BoundParameters<'a>,
    pub renames: &'c FxHashMap<NodeKey, StringId>,
    pub declaring_class: Option<&'a ClassDecl<'a>>,
    /// Class whose body encloses the call site, if any.
    pub site_class: Option<StringId>,
    pub type_params: &'a [Spanned<StringId>],
    pub site_type_args: &'a [TypeExpr<'a>],
}

pub fn build_substitution_map<'a>(
    input: SubstitutionInput<'a, '_>,
    arena: &'a Arena,
    interner: &StringInterner,
) -> Result<SubstitutionMap<'a>, InlineError> {
    let mut builder = Builder {
        bound: input.bound,
        renames: input.renames,
        declaring_class: input.declaring_class,
        site_class: input.site_class,
        type_params: input.type_params,
        site_type_args: input.site_type_args,
        arena,
        interner,
        scopes: vec![FxHashMap::default()],
        nodes: FxHashMap::default(),
        type_args: FxHashMap::default(),
        in_default: false,
    };

    match input.body {
        FunctionBody::Expression(expr) => builder.visit_expression(expr)?,
        FunctionBody::Block(block) => builder.visit_block(block)?,
        FunctionBody::Extern => {}
    }

    // Default values spliced for omitted arguments were written in the
    // declaration's scope, so statics they name need the same qualification
    // as statics in the body.
    builder.in_default = true;
    for binding in &input.bound.bindings {
        if binding.kind == BindingKind::DefaultValue {
            builder.visit_expression(binding.expression)?;
        }
    }

    Ok(SubstitutionMap {
        nodes: builder.nodes,
        type_args: builder.type_args,
    })
}

struct Builder<'a, 'c> {
    bound: &'c BoundParameters<'a>,
    renames: &'c FxHashMap<NodeKey, StringId>,
    declaring_class: Option<&'a ClassDecl<'a>>,
    site_class: Option<StringId>,
    type_params: &'a [Spanned<StringId>],
    site_type_args: &'a [TypeExpr<'a>],
    arena: &'a Arena,
    interner: &'c StringInterner,
    /// Lexical scopes for body-declared locals; values are declaration-site
    /// node keys.
    scopes: Vec<FxHashMap<StringId, NodeKey>>,
    nodes: FxHashMap<NodeKey, Replacement<'a>>,
    type_args: FxHashMap<StringId, &'a TypeExpr<'a>>,
    /// Set while visiting a default-value expression. Substituting a
    /// defaulted parameter into another default could chain default trees
    /// into a cycle, so rule 2 is limited to explicit bindings there.
    in_default: bool,
}

impl<'a> Builder<'a, '_> {
    fn declare(&mut self, name: &'a Spanned<StringId>) {
        let key = NodeKey::of(name);
        if let Some(fresh) = self.renames.get(&key) {
            self.nodes.insert(key, Replacement::Rename(*fresh));
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.node, key);
        }
    }

    fn lookup_local(&self, name: StringId) -> Option<NodeKey> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    fn visit_block(&mut self, block: &Block<'a>) -> Result<(), InlineError> {
        self.scopes.push(FxHashMap::default());
        for statement in block.statements {
            self.visit_statement(statement)?;
        }
        self.scopes.pop();
        Ok(())
    }

    fn visit_statement(&mut self, statement: &'a Statement<'a>) -> Result<(), InlineError> {
        match statement {
            Statement::Let(s) => {
                // Initializer sees the scope before the binding.
                self.visit_expression(&s.value)?;
                if let Some(ty) = &s.ty {
                    self.visit_type(ty)?;
                }
                match &s.pattern {
                    Pattern::Identifier(name) => self.declare(name),
                    Pattern::Tuple(names, _) => {
                        for name in *names {
                            self.declare(name);
                        }
                    }
                }
                Ok(())
            }
            Statement::Assign(s) => {
                self.visit_expression(&s.target)?;
                self.visit_expression(&s.value)
            }
            Statement::Expression(e) => self.visit_expression(e),
            Statement::If(s) => self.visit_if(s),
            Statement::While(s) => {
                self.visit_expression(&s.condition)?;
                self.visit_block(&s.body)
            }
            Statement::For(s) => {
                self.visit_expression(&s.iterable)?;
                self.scopes.push(FxHashMap::default());
                self.declare(&s.variable);
                for inner in s.body.statements {
                    self.visit_statement(inner)?;
                }
                self.scopes.pop();
                Ok(())
            }
            Statement::Return(s) => match &s.value {
                Some(value) => self.visit_expression(value),
                None => Ok(()),
            },
            Statement::Block(b) => self.visit_block(b),
        }
    }

    fn visit_if(&mut self, s: &'a splice_syntax::ast::IfStatement<'a>) -> Result<(), InlineError> {
        self.visit_expression(&s.condition)?;
        self.visit_block(&s.then_block)?;
        match &s.else_branch {
            Some(ElseBranch::If(nested)) => self.visit_if(nested),
            Some(ElseBranch::Block(block)) => self.visit_block(block),
            None => Ok(()),
        }
    }

    fn visit_expression(&mut self, expr: &'a Expression<'a>) -> Result<(), InlineError> {
        match &expr.kind {
            ExpressionKind::Literal(_) => Ok(()),
            ExpressionKind::Identifier(name) => {
                self.resolve_identifier(expr, *name);
                Ok(())
            }
            ExpressionKind::SelfRef => {
                if let Some(receiver) = self.bound.self_expression {
                    self.nodes
                        .insert(NodeKey::of(expr), Replacement::Expression(receiver));
                }
                Ok(())
            }
            ExpressionKind::Unary(_, operand) => self.visit_expression(operand),
            ExpressionKind::Binary(_, left, right) => {
                self.visit_expression(left)?;
                self.visit_expression(right)
            }
            ExpressionKind::Call(callee, args, type_args) => {
                self.visit_expression(callee)?;
                for arg in *args {
                    self.visit_expression(&arg.value)?;
                }
                for ty in *type_args {
                    self.visit_type(ty)?;
                }
                Ok(())
            }
            ExpressionKind::Member(receiver, _) => self.visit_expression(receiver),
            ExpressionKind::Index(base, index) => {
                self.visit_expression(base)?;
                self.visit_expression(index)
            }
            ExpressionKind::Tuple(elements) => {
                for element in *elements {
                    self.visit_expression(element)?;
                }
                Ok(())
            }
            ExpressionKind::Lambda(params, body) => {
                self.scopes.push(FxHashMap::default());
                for param in *params {
                    self.declare(param);
                }
                let result = match body {
                    LambdaBody::Expression(e) => self.visit_expression(e),
                    LambdaBody::Block(b) => {
                        let mut result = Ok(());
                        for statement in b.statements {
                            result = self.visit_statement(statement);
                            if result.is_err() {
                                break;
                            }
                        }
                        result
                    }
                };
                self.scopes.pop();
                result
            }
            ExpressionKind::Cast(operand, ty) => {
                self.visit_expression(operand)?;
                self.visit_type(ty)
            }
            ExpressionKind::Parenthesized(inner) => self.visit_expression(inner),
        }
    }

    fn resolve_identifier(&mut self, expr: &'a Expression<'a>, name: StringId) {
        // Rule 1: body-declared local, renamed if it collides at the site.
        if let Some(decl_key) = self.lookup_local(name) {
            if let Some(fresh) = self.renames.get(&decl_key) {
                self.nodes
                    .insert(NodeKey::of(expr), Replacement::Rename(*fresh));
            }
            return;
        }
        // Rule 2: parameter reference becomes the bound expression.
        if let Some(binding) = self.bound.binding_for(name) {
            if !self.in_default || binding.kind != BindingKind::DefaultValue {
                self.nodes
                    .insert(NodeKey::of(expr), Replacement::Expression(binding.expression));
            }
            return;
        }
        // Rule 3: static member of the declaring class needs qualification
        // when the splice point is outside that class.
        if let Some(class) = self.declaring_class {
            let is_static_member = class
                .members
                .iter()
                .any(|m| m.name() == name && m.is_static());
            if is_static_member && self.site_class != Some(class.name.node) {
                let qualified = self.qualify(class.name.node, name);
                self.nodes
                    .insert(NodeKey::of(expr), Replacement::Expression(qualified));
            }
        }
        // Rule 4: global name, left as is.
    }

    fn qualify(&self, class: StringId, member: StringId) -> &'a Expression<'a> {
        let class_expr = self.arena.alloc(Expression::new(
            ExpressionKind::Identifier(class),
            Span::dummy(),
        ));
        self.arena.alloc(Expression::new(
            ExpressionKind::Member(class_expr, Spanned::new(member, Span::dummy())),
            Span::dummy(),
        ))
    }

    fn visit_type(&mut self, ty: &'a TypeExpr<'a>) -> Result<(), InlineError> {
        match &ty.kind {
            TypeKind::Named(name, args) => {
                if let Some(position) = self
                    .type_params
                    .iter()
                    .position(|param| param.node == *name)
                {
                    match self.site_type_args.get(position) {
                        Some(replacement) => {
                            self.type_args.insert(*name, replacement);
                        }
                        None => {
                            return Err(InlineError::UnresolvedTypeArgument {
                                name: self.interner.resolve(*name),
                            });
                        }
                    }
                }
                for arg in *args {
                    self.visit_type(arg)?;
                }
                Ok(())
            }
            TypeKind::Function(params, ret) => {
                for param in *params {
                    self.visit_type(param)?;
                }
                self.visit_type(ret)
            }
            TypeKind::Tuple(elements) => {
                for element in *elements {
                    self.visit_type(element)?;
                }
                Ok(())
            }
        }
    }
}
