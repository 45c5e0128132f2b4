//! Call-site discovery and reference classification.
//!
//! A reference to the target is either *direct* (a call or property read the
//! engine knows how to inline) or *indirect* (the name used as a value, or a
//! member access that nominal resolution cannot pin to the target). Indirect
//! references never fail the inline pass, but they veto declaration removal.

use splice_syntax::ast::{
    Argument, Block, ElseBranch, Expression, ExpressionKind, FunctionBody, Item, LambdaBody,
    Member, Module, Statement, TypeExpr,
};
use splice_syntax::{Span, StringId};

use crate::sema::{GlobalIndex, InlineTarget};
use crate::workspace::Document;

/// A direct reference with everything the binder and rewriter need.
#[derive(Clone, Copy)]
pub struct CallSite<'a> {
    /// The call expression, or the member access for a property read.
    pub node: &'a Expression<'a>,
    pub receiver: Option<&'a Expression<'a>>,
    /// The receiver names the class itself (`Geometry.scale(x)`).
    pub receiver_is_class: bool,
    pub args: &'a [Argument<'a>],
    pub type_args: &'a [TypeExpr<'a>],
    /// Span of the innermost statement containing the site.
    pub statement_span: Span,
    /// The site is exactly an expression statement, making a statement-form
    /// splice possible.
    pub is_expression_statement: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndirectReason {
    /// The name is used as a value rather than called or read.
    ValueUse,
    /// Several declarations share the name and the receiver's type is
    /// unknown, so the reference cannot be pinned to the target.
    Ambiguous,
}

pub enum Reference<'a> {
    Direct(CallSite<'a>),
    Indirect { span: Span, reason: IndirectReason },
}

impl Reference<'_> {
    pub fn span(&self) -> Span {
        match self {
            Reference::Direct(site) => site.node.span,
            Reference::Indirect { span, .. } => *span,
        }
    }
}

/// Every reference to `target` in `doc`, in source order.
pub fn find_references<'a>(
    doc: &Document<'a>,
    index: &GlobalIndex<'a>,
    target: &InlineTarget<'a>,
) -> Vec<Reference<'a>> {
    collect_raw_sites(doc.module)
        .into_iter()
        .filter_map(|raw| classify(index, target, &raw))
        .collect()
}

/// The innermost direct call site containing `offset`, together with the
/// declaration it resolves to.
pub fn find_site_at<'a>(
    doc: &Document<'a>,
    index: &GlobalIndex<'a>,
    offset: u32,
) -> Option<(CallSite<'a>, InlineTarget<'a>)> {
    collect_raw_sites(doc.module)
        .into_iter()
        .filter(|raw| raw.node.span.contains_offset(offset))
        .filter_map(|raw| resolve_raw(index, &raw).map(|target| (raw.into_call_site(), target)))
        .min_by_key(|(site, _)| site.node.span.len())
}

// Raw syntactic occurrences, before any resolution.

#[derive(Clone, Copy)]
enum SiteShape<'a> {
    /// `name(args)`
    CallIdent { name: StringId },
    /// `recv.name(args)`
    CallMember {
        receiver: &'a Expression<'a>,
        name: StringId,
    },
    /// `recv.name` outside call position
    MemberRead {
        receiver: &'a Expression<'a>,
        name: StringId,
    },
    /// `name` outside call position
    IdentUse { name: StringId },
}

#[derive(Clone, Copy)]
struct RawSite<'a> {
    node: &'a Expression<'a>,
    shape: SiteShape<'a>,
    args: &'a [Argument<'a>],
    type_args: &'a [TypeExpr<'a>],
    statement_span: Span,
    is_expression_statement: bool,
}

impl<'a> RawSite<'a> {
    fn into_call_site(self) -> CallSite<'a> {
        let (receiver, receiver_is_class) = match self.shape {
            SiteShape::CallIdent { .. } | SiteShape::IdentUse { .. } => (None, false),
            SiteShape::CallMember { receiver, .. } | SiteShape::MemberRead { receiver, .. } => {
                (Some(receiver), false)
            }
        };
        CallSite {
            node: self.node,
            receiver,
            receiver_is_class,
            args: self.args,
            type_args: self.type_args,
            statement_span: self.statement_span,
            is_expression_statement: self.is_expression_statement,
        }
    }

    fn into_static_call_site(self) -> CallSite<'a> {
        let mut site = self.into_call_site();
        site.receiver_is_class = true;
        site
    }
}

fn collect_raw_sites<'a>(module: &'a Module<'a>) -> Vec<RawSite<'a>> {
    let mut collector = SiteCollector {
        sites: Vec::new(),
        statement_span: module.span,
    };
    collector.walk_module(module);
    collector.sites
}

struct SiteCollector<'a> {
    sites: Vec<RawSite<'a>>,
    statement_span: Span,
}

impl<'a> SiteCollector<'a> {
    fn walk_module(&mut self, module: &'a Module<'a>) {
        for item in module.items {
            match item {
                Item::Function(decl) => self.walk_body(&decl.body, decl.span),
                Item::Class(class) => {
                    for member in class.members {
                        match member {
                            Member::Field(_) => {}
                            Member::Const(decl) => {
                                self.statement_span = decl.span;
                                self.walk_expression(&decl.value, false);
                            }
                            Member::Method(decl) => self.walk_body(&decl.body, decl.span),
                            Member::Property(decl) => self.walk_body(&decl.body, decl.span),
                        }
                    }
                }
            }
        }
    }

    fn walk_body(&mut self, body: &'a FunctionBody<'a>, decl_span: Span) {
        match body {
            FunctionBody::Expression(expr) => {
                self.statement_span = decl_span;
                self.walk_expression(expr, false);
            }
            FunctionBody::Block(block) => self.walk_block(block),
            FunctionBody::Extern => {}
        }
    }

    fn walk_block(&mut self, block: &Block<'a>) {
        for statement in block.statements {
            self.walk_statement(statement);
        }
    }

    fn walk_statement(&mut self, statement: &'a Statement<'a>) {
        self.statement_span = statement.span();
        match statement {
            Statement::Let(s) => self.walk_expression(&s.value, false),
            Statement::Assign(s) => {
                self.walk_expression(&s.target, false);
                self.walk_expression(&s.value, false);
            }
            Statement::Expression(e) => self.walk_expression(e, true),
            Statement::If(s) => self.walk_if(s),
            Statement::While(s) => {
                self.walk_expression(&s.condition, false);
                self.walk_block(&s.body);
            }
            Statement::For(s) => {
                self.walk_expression(&s.iterable, false);
                self.walk_block(&s.body);
            }
            Statement::Return(s) => {
                if let Some(value) = &s.value {
                    self.walk_expression(value, false);
                }
            }
            Statement::Block(b) => self.walk_block(b),
        }
    }

    fn walk_if(&mut self, s: &'a splice_syntax::ast::IfStatement<'a>) {
        self.statement_span = s.span;
        self.walk_expression(&s.condition, false);
        self.walk_block(&s.then_block);
        match &s.else_branch {
            Some(ElseBranch::If(nested)) => self.walk_if(nested),
            Some(ElseBranch::Block(block)) => self.walk_block(block),
            None => {}
        }
    }

    fn walk_expression(&mut self, expr: &'a Expression<'a>, is_statement: bool) {
        match &expr.kind {
            ExpressionKind::Literal(_) | ExpressionKind::SelfRef => {}
            ExpressionKind::Identifier(name) => self.push(
                expr,
                SiteShape::IdentUse { name: *name },
                &[],
                &[],
                false,
            ),
            ExpressionKind::Unary(_, operand) => self.walk_expression(operand, false),
            ExpressionKind::Binary(_, left, right) => {
                self.walk_expression(left, false);
                self.walk_expression(right, false);
            }
            ExpressionKind::Call(callee, args, type_args) => {
                match &callee.kind {
                    ExpressionKind::Identifier(name) => {
                        self.push(
                            expr,
                            SiteShape::CallIdent { name: *name },
                            args,
                            type_args,
                            is_statement,
                        );
                    }
                    ExpressionKind::Member(receiver, name) => {
                        self.push(
                            expr,
                            SiteShape::CallMember {
                                receiver,
                                name: name.node,
                            },
                            args,
                            type_args,
                            is_statement,
                        );
                        self.walk_expression(receiver, false);
                    }
                    _ => self.walk_expression(callee, false),
                }
                for arg in *args {
                    self.walk_expression(&arg.value, false);
                }
            }
            ExpressionKind::Member(receiver, name) => {
                self.push(
                    expr,
                    SiteShape::MemberRead {
                        receiver,
                        name: name.node,
                    },
                    &[],
                    &[],
                    false,
                );
                self.walk_expression(receiver, false);
            }
            ExpressionKind::Index(base, index) => {
                self.walk_expression(base, false);
                self.walk_expression(index, false);
            }
            ExpressionKind::Tuple(elements) => {
                for element in *elements {
                    self.walk_expression(element, false);
                }
            }
            ExpressionKind::Lambda(_, body) => match body {
                LambdaBody::Expression(e) => self.walk_expression(e, false),
                LambdaBody::Block(b) => {
                    let saved = self.statement_span;
                    self.walk_block(b);
                    self.statement_span = saved;
                }
            },
            ExpressionKind::Cast(operand, _) => self.walk_expression(operand, false),
            ExpressionKind::Parenthesized(inner) => self.walk_expression(inner, false),
        }
    }

    fn push(
        &mut self,
        node: &'a Expression<'a>,
        shape: SiteShape<'a>,
        args: &'a [Argument<'a>],
        type_args: &'a [TypeExpr<'a>],
        is_expression_statement: bool,
    ) {
        self.sites.push(RawSite {
            node,
            shape,
            args,
            type_args,
            statement_span: self.statement_span,
            is_expression_statement,
        });
    }
}

// Classification against a known target.

fn classify<'a>(
    index: &GlobalIndex<'a>,
    target: &InlineTarget<'a>,
    raw: &RawSite<'a>,
) -> Option<Reference<'a>> {
    let target_name = target.name();
    let span = raw.node.span;
    let indirect = |reason| Some(Reference::Indirect { span, reason });

    match (&raw.shape, target) {
        // Top-level function, including an extension called in free form.
        (SiteShape::CallIdent { name }, InlineTarget::Function { class: None, .. })
            if *name == target_name =>
        {
            Some(Reference::Direct(raw.into_call_site()))
        }
        (SiteShape::IdentUse { name }, InlineTarget::Function { class: None, .. })
            if *name == target_name =>
        {
            indirect(IndirectReason::ValueUse)
        }

        (SiteShape::CallMember { receiver, name }, _) if *name == target_name => {
            classify_member(index, target, raw, *receiver, true)
        }
        (SiteShape::MemberRead { receiver, name }, _) if *name == target_name => {
            classify_member(index, target, raw, *receiver, false)
        }

        _ => None,
    }
}

fn classify_member<'a>(
    index: &GlobalIndex<'a>,
    target: &InlineTarget<'a>,
    raw: &RawSite<'a>,
    receiver: &'a Expression<'a>,
    is_call: bool,
) -> Option<Reference<'a>> {
    let name = target.name();
    let span = raw.node.span;
    let indirect = |reason| Some(Reference::Indirect { span, reason });

    // `Class.name(..)` / `Class.name`: static access through the class name.
    if let Some(class_name) = class_receiver(index, receiver) {
        let declaring = target.declaring_class()?.name.node;
        if class_name != declaring {
            return None;
        }
        if target.binds_self() {
            // Static access to an instance member never resolves.
            return None;
        }
        return match (target, is_call) {
            (InlineTarget::Function { .. }, true) => {
                Some(Reference::Direct(raw.into_static_call_site()))
            }
            (InlineTarget::Property { .. }, false) => {
                Some(Reference::Direct(raw.into_static_call_site()))
            }
            // Reading a method as a value, or calling the value of a
            // property.
            _ => indirect(IndirectReason::ValueUse),
        };
    }

    // Instance access: `recv.name(..)` or `recv.name`. Without receiver
    // types, resolution is nominal and must be unique.
    let extension = index
        .function(name)
        .filter(|entry| entry.decl.is_extension());
    let instance_hits: Vec<_> = index
        .members_named(name)
        .iter()
        .filter(|hit| !hit.member.is_static())
        .collect();
    let candidates = extension.iter().count() + instance_hits.len();

    match target {
        InlineTarget::Function { class: None, .. } => {
            // Extension target.
            if !target.is_extension() {
                return None;
            }
            if candidates > 1 {
                return indirect(IndirectReason::Ambiguous);
            }
            if is_call {
                Some(Reference::Direct(raw.into_call_site()))
            } else {
                indirect(IndirectReason::ValueUse)
            }
        }
        InlineTarget::Function { class: Some(class), decl, .. } => {
            if decl.is_static {
                // Static methods are only reachable through the class name,
                // handled above.
                return None;
            }
            if candidates > 1 {
                return indirect(IndirectReason::Ambiguous);
            }
            if !instance_hits
                .iter()
                .any(|hit| std::ptr::eq(hit.class, *class))
            {
                return None;
            }
            if is_call {
                Some(Reference::Direct(raw.into_call_site()))
            } else {
                indirect(IndirectReason::ValueUse)
            }
        }
        InlineTarget::Property { class, decl, .. } => {
            if decl.is_static {
                return None;
            }
            if candidates > 1 {
                return indirect(IndirectReason::Ambiguous);
            }
            if !instance_hits
                .iter()
                .any(|hit| std::ptr::eq(hit.class, *class))
            {
                return None;
            }
            if is_call {
                // Calling the value a property yields.
                indirect(IndirectReason::ValueUse)
            } else {
                Some(Reference::Direct(raw.into_call_site()))
            }
        }
    }
}

fn class_receiver<'a>(index: &GlobalIndex<'a>, receiver: &Expression<'a>) -> Option<StringId> {
    match receiver.kind {
        ExpressionKind::Identifier(name) if index.class(name).is_some() => Some(name),
        _ => None,
    }
}

// Target-agnostic resolution, used to find what a site at a cursor offset
// refers to.

fn resolve_raw<'a>(index: &GlobalIndex<'a>, raw: &RawSite<'a>) -> Option<InlineTarget<'a>> {
    match &raw.shape {
        SiteShape::CallIdent { name } => {
            let entry = index.function(*name)?;
            Some(InlineTarget::Function {
                doc: entry.doc,
                decl: entry.decl,
                class: None,
            })
        }
        SiteShape::CallMember { receiver, name } => {
            if let Some(class_name) = class_receiver(index, receiver) {
                let hit = index.class_member(class_name, *name)?;
                if !hit.member.is_static() {
                    return None;
                }
                return match hit.member {
                    Member::Method(decl) => Some(InlineTarget::Function {
                        doc: hit.doc,
                        decl,
                        class: Some(hit.class),
                    }),
                    _ => None,
                };
            }
            resolve_instance_member(index, *name, true)
        }
        SiteShape::MemberRead { receiver, name } => {
            if let Some(class_name) = class_receiver(index, receiver) {
                let hit = index.class_member(class_name, *name)?;
                if !hit.member.is_static() {
                    return None;
                }
                return match hit.member {
                    Member::Property(decl) => Some(InlineTarget::Property {
                        doc: hit.doc,
                        decl,
                        class: hit.class,
                    }),
                    _ => None,
                };
            }
            resolve_instance_member(index, *name, false)
        }
        SiteShape::IdentUse { .. } => None,
    }
}

fn resolve_instance_member<'a>(
    index: &GlobalIndex<'a>,
    name: StringId,
    is_call: bool,
) -> Option<InlineTarget<'a>> {
    let extension = index
        .function(name)
        .filter(|entry| entry.decl.is_extension());
    let instance_hits: Vec<_> = index
        .members_named(name)
        .iter()
        .filter(|hit| !hit.member.is_static())
        .collect();

    if extension.iter().count() + instance_hits.len() != 1 {
        return None;
    }
    if let Some(entry) = extension {
        if !is_call {
            return None;
        }
        return Some(InlineTarget::Function {
            doc: entry.doc,
            decl: entry.decl,
            class: None,
        });
    }
    match (instance_hits[0].member, is_call) {
        (Member::Method(decl), true) => Some(InlineTarget::Function {
            doc: instance_hits[0].doc,
            decl,
            class: Some(instance_hits[0].class),
        }),
        (Member::Property(decl), false) => Some(InlineTarget::Property {
            doc: instance_hits[0].doc,
            decl,
            class: instance_hits[0].class,
        }),
        _ => None,
    }
}
