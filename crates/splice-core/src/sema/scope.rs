//! Declared-symbol collection and name visibility.

use rustc_hash::FxHashSet;
use splice_syntax::ast::{
    ElseBranch, Expression, ExpressionKind, FunctionBody, FunctionDecl, Item, LambdaBody, Member,
    Pattern, Statement,
};
use splice_syntax::StringId;

use crate::sema::{GlobalIndex, NodeKey};
use crate::workspace::Document;

/// A local binding introduced somewhere inside a body: `let` patterns,
/// `for` variables and lambda parameters.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredSymbol {
    pub name: StringId,
    /// Key of the declaration-site identifier node.
    pub key: NodeKey,
}

/// Every local binding declared anywhere in `body`, in source order.
pub fn declared_in_body<'a>(body: &'a FunctionBody<'a>) -> Vec<DeclaredSymbol> {
    let mut out = Vec::new();
    match body {
        FunctionBody::Expression(expr) => collect_expression(expr, &mut out),
        FunctionBody::Block(block) => collect_statements(block.statements, &mut out),
        FunctionBody::Extern => {}
    }
    out
}

fn collect_statements<'a>(statements: &'a [Statement<'a>], out: &mut Vec<DeclaredSymbol>) {
    for statement in statements {
        collect_statement(statement, out);
    }
}

fn collect_statement<'a>(statement: &'a Statement<'a>, out: &mut Vec<DeclaredSymbol>) {
    match statement {
        Statement::Let(s) => {
            collect_expression(&s.value, out);
            match &s.pattern {
                Pattern::Identifier(name) => out.push(DeclaredSymbol {
                    name: name.node,
                    key: NodeKey::of(name),
                }),
                Pattern::Tuple(names, _) => {
                    for name in *names {
                        out.push(DeclaredSymbol {
                            name: name.node,
                            key: NodeKey::of(name),
                        });
                    }
                }
            }
        }
        Statement::Assign(s) => {
            collect_expression(&s.target, out);
            collect_expression(&s.value, out);
        }
        Statement::Expression(e) => collect_expression(e, out),
        Statement::If(s) => {
            collect_expression(&s.condition, out);
            collect_statements(s.then_block.statements, out);
            let mut branch = s.else_branch.as_ref();
            while let Some(b) = branch {
                match b {
                    ElseBranch::If(nested) => {
                        collect_expression(&nested.condition, out);
                        collect_statements(nested.then_block.statements, out);
                        branch = nested.else_branch.as_ref();
                    }
                    ElseBranch::Block(block) => {
                        collect_statements(block.statements, out);
                        branch = None;
                    }
                }
            }
        }
        Statement::While(s) => {
            collect_expression(&s.condition, out);
            collect_statements(s.body.statements, out);
        }
        Statement::For(s) => {
            out.push(DeclaredSymbol {
                name: s.variable.node,
                key: NodeKey::of(&s.variable),
            });
            collect_expression(&s.iterable, out);
            collect_statements(s.body.statements, out);
        }
        Statement::Return(s) => {
            if let Some(value) = &s.value {
                collect_expression(value, out);
            }
        }
        Statement::Block(b) => collect_statements(b.statements, out),
    }
}

fn collect_expression<'a>(expr: &'a Expression<'a>, out: &mut Vec<DeclaredSymbol>) {
    match &expr.kind {
        ExpressionKind::Literal(_) | ExpressionKind::Identifier(_) | ExpressionKind::SelfRef => {}
        ExpressionKind::Unary(_, operand) => collect_expression(operand, out),
        ExpressionKind::Binary(_, left, right) => {
            collect_expression(left, out);
            collect_expression(right, out);
        }
        ExpressionKind::Call(callee, args, _) => {
            collect_expression(callee, out);
            for arg in *args {
                collect_expression(&arg.value, out);
            }
        }
        ExpressionKind::Member(receiver, _) => collect_expression(receiver, out),
        ExpressionKind::Index(base, index) => {
            collect_expression(base, out);
            collect_expression(index, out);
        }
        ExpressionKind::Tuple(elements) => {
            for element in *elements {
                collect_expression(element, out);
            }
        }
        ExpressionKind::Lambda(params, body) => {
            for param in *params {
                out.push(DeclaredSymbol {
                    name: param.node,
                    key: NodeKey::of(param),
                });
            }
            match body {
                LambdaBody::Expression(e) => collect_expression(e, out),
                LambdaBody::Block(b) => collect_statements(b.statements, out),
            }
        }
        ExpressionKind::Cast(operand, _) => collect_expression(operand, out),
        ExpressionKind::Parenthesized(inner) => collect_expression(inner, out),
    }
}

/// Names visible at `offset` in `doc`: every top-level declaration in the
/// workspace plus, when the offset falls inside a function or class member,
/// that member's parameters, type parameters and all of its locals.
///
/// Visibility is deliberately position-insensitive within a body; a name
/// declared later in the same body still counts as taken.
pub fn visible_names_at<'a>(
    index: &GlobalIndex<'a>,
    doc: &Document<'a>,
    offset: u32,
) -> FxHashSet<StringId> {
    let mut names: FxHashSet<StringId> = index.top_level_names().collect();

    for item in doc.module.items {
        match item {
            Item::Function(decl) if decl.span.contains_offset(offset) => {
                add_function_scope(decl, &mut names);
            }
            Item::Class(class) if class.span.contains_offset(offset) => {
                for member in class.members {
                    names.insert(member.name());
                }
                for member in class.members {
                    match member {
                        Member::Method(decl) if decl.span.contains_offset(offset) => {
                            add_function_scope(decl, &mut names);
                        }
                        Member::Property(decl) if decl.span.contains_offset(offset) => {
                            for symbol in declared_in_body(&decl.body) {
                                names.insert(symbol.name);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    names
}

/// Name of the class whose body contains `offset`, if any.
pub fn enclosing_class_name(doc: &Document<'_>, offset: u32) -> Option<StringId> {
    doc.module.items.iter().find_map(|item| match item {
        Item::Class(class) if class.span.contains_offset(offset) => Some(class.name.node),
        _ => None,
    })
}

fn add_function_scope(decl: &FunctionDecl<'_>, names: &mut FxHashSet<StringId>) {
    for param in decl.params {
        names.insert(param.name.node);
    }
    for type_param in decl.type_params {
        names.insert(type_param.node);
    }
    for symbol in declared_in_body(&decl.body) {
        names.insert(symbol.name);
    }
}
