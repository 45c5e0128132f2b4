//! Binding call-site arguments to declaration parameters.
//!
//! Every parameter of the target must end up with exactly one bound
//! expression: a positional or named argument, the call's receiver (for the
//! `this` parameter of an extension), or the parameter's declared default.
//! Bound expressions are wrapped in parentheses when splicing them bare
//! could change how they re-parse inside the body.

use splice_syntax::ast::{Expression, ExpressionKind, Param, TypeExpr};
use splice_syntax::{Arena, StringId, StringInterner};

use crate::inline::InlineError;
use crate::sema::references::CallSite;
use crate::sema::InlineTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Explicit argument at the call site.
    Argument,
    /// No argument given; the parameter's default value is used.
    DefaultValue,
    /// The receiver of an extension call bound to the `this` parameter.
    Receiver,
}

#[derive(Clone)]
pub struct ParameterBinding<'a> {
    pub param: &'a Param<'a>,
    pub ordinal: usize,
    pub expression: &'a Expression<'a>,
    pub kind: BindingKind,
}

/// Result of binding one call site against the target's signature.
pub struct BoundParameters<'a> {
    /// Expression `self` stands for in the body, for instance members.
    pub self_expression: Option<&'a Expression<'a>>,
    /// One binding per declared parameter, indexed by ordinal.
    pub bindings: Vec<ParameterBinding<'a>>,
}

impl<'a> BoundParameters<'a> {
    pub fn binding_for(&self, name: StringId) -> Option<&ParameterBinding<'a>> {
        self.bindings.iter().find(|b| b.param.name.node == name)
    }
}

pub fn bind_parameters<'a>(
    site: &CallSite<'a>,
    target: &InlineTarget<'a>,
    arena: &'a Arena,
    interner: &StringInterner,
) -> Result<BoundParameters<'a>, InlineError> {
    let params = target.params();
    let mut slots: Vec<Option<ParameterBinding<'a>>> = vec![None; params.len()];
    let mut self_expression = None;
    let mut first_positional = 0usize;

    if let Some(receiver) = site.receiver.filter(|_| !site.receiver_is_class) {
        if target.binds_self() {
            self_expression = Some(prepare_receiver(receiver, arena));
        } else if target.is_extension() {
            // Reduced extension call: the receiver binds the `this`
            // parameter and explicit arguments shift by one ordinal.
            slots[0] = Some(ParameterBinding {
                param: &params[0],
                ordinal: 0,
                expression: prepare_receiver(receiver, arena),
                kind: BindingKind::Receiver,
            });
            first_positional = 1;
        }
    }
    if target.binds_self() && self_expression.is_none() {
        return Err(InlineError::UnbindableArgument {
            name: "self".to_string(),
        });
    }

    let mut next_positional = first_positional;
    for arg in site.args {
        match arg.name {
            Some(name) => {
                let Some(ordinal) = params
                    .iter()
                    .position(|p| p.name.node == name.node && !p.is_this)
                else {
                    return Err(unbindable(interner, name.node));
                };
                if slots[ordinal].is_some() {
                    return Err(unbindable(interner, name.node));
                }
                slots[ordinal] = Some(ParameterBinding {
                    param: &params[ordinal],
                    ordinal,
                    expression: prepare_argument(&arg.value, &params[ordinal], arena),
                    kind: BindingKind::Argument,
                });
            }
            None => {
                let ordinal = if next_positional < params.len() {
                    next_positional
                } else {
                    // Surplus positional argument; only a trailing variadic
                    // parameter could absorb it, and then only as the sole
                    // element.
                    match params.last() {
                        Some(last) if last.is_variadic => params.len() - 1,
                        Some(last) => return Err(unbindable(interner, last.name.node)),
                        None => {
                            return Err(InlineError::UnbindableArgument {
                                name: interner.resolve(target.name()),
                            })
                        }
                    }
                };
                if slots[ordinal].is_some() {
                    return Err(unbindable(interner, params[ordinal].name.node));
                }
                slots[ordinal] = Some(ParameterBinding {
                    param: &params[ordinal],
                    ordinal,
                    expression: prepare_argument(&arg.value, &params[ordinal], arena),
                    kind: BindingKind::Argument,
                });
                next_positional += 1;
            }
        }
    }

    // Unfilled slots fall back to declared defaults.
    let mut bindings = Vec::with_capacity(params.len());
    for (ordinal, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(binding) => bindings.push(binding),
            None => {
                let param = &params[ordinal];
                let Some(default) = &param.default else {
                    return Err(unbindable(interner, param.name.node));
                };
                bindings.push(ParameterBinding {
                    param,
                    ordinal,
                    expression: prepare_default(default, arena),
                    kind: BindingKind::DefaultValue,
                });
            }
        }
    }

    Ok(BoundParameters {
        self_expression,
        bindings,
    })
}

fn unbindable(interner: &StringInterner, name: StringId) -> InlineError {
    InlineError::UnbindableArgument {
        name: interner.resolve(name),
    }
}

/// Prepare an argument expression for splicing into the body.
fn prepare_argument<'a>(
    value: &'a Expression<'a>,
    param: &'a Param<'a>,
    arena: &'a Arena,
) -> &'a Expression<'a> {
    // A bare lambda bound to a function-typed parameter gets an explicit
    // cast so the spliced expression keeps the parameter's declared type.
    if param.ty.is_function() && matches!(value.kind, ExpressionKind::Lambda(..)) {
        let cast = cast_to(arena, parenthesized(arena, value), &param.ty);
        return parenthesized(arena, cast);
    }
    if value.is_atomic() {
        value
    } else {
        parenthesized(arena, value)
    }
}

fn prepare_receiver<'a>(receiver: &'a Expression<'a>, arena: &'a Arena) -> &'a Expression<'a> {
    if receiver.is_atomic() {
        receiver
    } else {
        parenthesized(arena, receiver)
    }
}

fn prepare_default<'a>(default: &'a Expression<'a>, arena: &'a Arena) -> &'a Expression<'a> {
    if default.is_atomic() {
        default
    } else {
        parenthesized(arena, default)
    }
}

fn parenthesized<'a>(arena: &'a Arena, expr: &'a Expression<'a>) -> &'a Expression<'a> {
    arena.alloc(Expression::new(
        ExpressionKind::Parenthesized(expr),
        expr.span,
    ))
}

fn cast_to<'a>(
    arena: &'a Arena,
    expr: &'a Expression<'a>,
    ty: &'a TypeExpr<'a>,
) -> &'a Expression<'a> {
    arena.alloc(Expression::new(
        ExpressionKind::Cast(expr, ty),
        expr.span,
    ))
}
