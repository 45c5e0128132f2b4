//! Inlining one call site.
//!
//! The site is identified by a byte offset; the declaration it resolves to
//! stays in place. This is the pipeline the bulk orchestrator reuses per
//! site, so all validation lives here.

use std::sync::Arc;

use splice_syntax::ast::{ElseBranch, Expression, FunctionBody, Statement};
use splice_syntax::printer::{print_expression, print_statements_indented};
use splice_syntax::span::line_indentation;
use splice_syntax::{Arena, StringInterner};

use crate::edit::{apply_edits, TextEdit};
use crate::inline::params::bind_parameters;
use crate::inline::rename::symbols_to_rename;
use crate::inline::rewriter::InlineRewriter;
use crate::inline::substitution::{build_substitution_map, SubstitutionInput};
use crate::inline::{InlineError, InlineOptions};
use crate::sema::references::{find_site_at, CallSite};
use crate::sema::scope::{declared_in_body, enclosing_class_name, visible_names_at};
use crate::sema::{GlobalIndex, InlineTarget};
use crate::workspace::{Document, DocumentId, Workspace};

/// How the body will be spliced at a particular site.
enum BodyForm<'a> {
    /// Replace the call expression with a single expression.
    Expression(&'a Expression<'a>),
    /// Replace the enclosing expression statement with the body's
    /// statement list.
    Statements(&'a [Statement<'a>]),
}

fn body_form<'a>(
    target: &InlineTarget<'a>,
    site: &CallSite<'a>,
    options: &InlineOptions,
) -> Result<BodyForm<'a>, InlineError> {
    let uninlinable = |reason: &str| {
        Err(InlineError::UninlinableBody {
            reason: reason.to_string(),
        })
    };

    match target.body() {
        FunctionBody::Extern => uninlinable("declaration is extern and has no body"),
        FunctionBody::Expression(expr) => Ok(BodyForm::Expression(expr)),
        FunctionBody::Block(block) => {
            // A block that is just `return expr` inlines as an expression.
            if let [Statement::Return(ret)] = block.statements {
                if let Some(value) = &ret.value {
                    return Ok(BodyForm::Expression(value));
                }
            }
            if target.has_value() {
                return uninlinable("block body is not a single return");
            }
            if !site.is_expression_statement {
                return uninlinable("statement body can only replace an expression statement");
            }
            if block.statements.is_empty() {
                return uninlinable("body is empty");
            }
            if block.statements.len() > options.max_inline_statements {
                return uninlinable("body exceeds the statement limit");
            }
            if contains_return(block.statements) {
                return uninlinable("body contains return statements");
            }
            Ok(BodyForm::Statements(block.statements))
        }
    }
}

/// Returns in statement position anywhere in the spliced statements would
/// change the caller's control flow. Lambda bodies do not count; their
/// returns stay local to the lambda.
fn contains_return(statements: &[Statement<'_>]) -> bool {
    statements.iter().any(|statement| match statement {
        Statement::Return(_) => true,
        Statement::If(s) => if_contains_return(s),
        Statement::While(s) => contains_return(s.body.statements),
        Statement::For(s) => contains_return(s.body.statements),
        Statement::Block(b) => contains_return(b.statements),
        _ => false,
    })
}

fn if_contains_return(s: &splice_syntax::ast::IfStatement<'_>) -> bool {
    contains_return(s.then_block.statements)
        || match &s.else_branch {
            Some(ElseBranch::If(nested)) => if_contains_return(nested),
            Some(ElseBranch::Block(block)) => contains_return(block.statements),
            None => false,
        }
}

/// Run the full per-site pipeline and produce the text edit for `site`.
pub(crate) fn compute_site_edit<'b>(
    index: &GlobalIndex<'b>,
    doc: &Document<'b>,
    site: &CallSite<'b>,
    target: &InlineTarget<'b>,
    options: &InlineOptions,
    arena: &'b Arena,
    interner: &StringInterner,
) -> Result<TextEdit, InlineError> {
    if target.doc() == doc.id && target.span().contains_offset(site.node.span.start) {
        return Err(InlineError::RecursiveCallSite);
    }

    let form = body_form(target, site, options)?;
    let bound = bind_parameters(site, target, arena, interner)?;
    let declared = declared_in_body(target.body());
    let visible = visible_names_at(index, doc, site.node.span.start);
    let renames = symbols_to_rename(&declared, &visible, interner);
    let site_class = enclosing_class_name(doc, site.node.span.start);

    let map = build_substitution_map(
        SubstitutionInput {
            body: target.body(),
            bound: &bound,
            renames: &renames,
            declaring_class: target.declaring_class(),
            site_class,
            type_params: target.type_params(),
            site_type_args: site.type_args,
        },
        arena,
        interner,
    )?;
    let rewriter = InlineRewriter::new(&map, arena);

    match form {
        BodyForm::Expression(expr) => {
            let rewritten = rewriter.rewrite_expression(expr);
            let text = if rewritten.is_atomic() {
                print_expression(interner, &rewritten)
            } else {
                // Parenthesize so the splice binds as one operand in the
                // surrounding expression.
                format!("({})", print_expression(interner, &rewritten))
            };
            Ok(TextEdit::new(site.node.span, text))
        }
        BodyForm::Statements(statements) => {
            let rewritten: Vec<Statement<'b>> = statements
                .iter()
                .map(|statement| rewriter.rewrite_statement(statement))
                .collect();
            let indent = line_indentation(&doc.text, site.statement_span.start);
            let text = print_statements_indented(interner, &rewritten, indent);
            Ok(TextEdit::new(site.statement_span, text))
        }
    }
}

#[derive(Debug)]
pub struct SingleOutcome<'a> {
    /// Snapshot with the edited document reparsed.
    pub workspace: Workspace<'a>,
    pub document: DocumentId,
    pub edit: TextEdit,
}

/// Inline the call site at `offset` in `document`, leaving the declaration
/// in place.
pub fn inline_at<'a>(
    workspace: &Workspace<'a>,
    document: DocumentId,
    offset: u32,
    options: &InlineOptions,
    arena: &'a Arena,
    interner: &Arc<StringInterner>,
) -> Result<SingleOutcome<'a>, InlineError> {
    let doc = workspace
        .document(document)
        .ok_or(InlineError::UnknownDocument)?;
    let index = GlobalIndex::build(workspace);
    let (site, target) =
        find_site_at(doc, &index, offset).ok_or(InlineError::NoCallSite)?;
    tracing::debug!(
        doc = %doc.name,
        offset,
        target = %interner.resolve(target.name()),
        "inlining single call site"
    );

    let edit = compute_site_edit(&index, doc, &site, &target, options, arena, interner)?;
    let new_text = apply_edits(&doc.text, std::slice::from_ref(&edit));
    let workspace = workspace.with_document_text(document, new_text, arena, interner)?;

    Ok(SingleOutcome {
        workspace,
        document,
        edit,
    })
}
