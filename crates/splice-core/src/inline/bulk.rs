//! Inlining every call site of a declaration, then removing it.
//!
//! Per-document work (reference discovery, binding, rewriting, rendering)
//! is pure and runs in parallel; each worker allocates rewritten nodes in
//! its own scratch arena and hands back plain text edits. Applying the
//! edits and reparsing is sequential, with the declaring document committed
//! last so the declaration is only deleted after every caller was rewritten.
//!
//! The declaration is removed only when every reference in the workspace
//! was a direct call site that inlined successfully. Indirect references
//! (the name used as a value, or an ambiguous member access) and failed
//! sites leave the declaration in place, but successful sites are still
//! committed.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use splice_syntax::span::line_col;
use splice_syntax::{Arena, Span, StringInterner};

use crate::cancel::CancellationToken;
use crate::edit::{apply_edits, TextEdit};
use crate::inline::single::compute_site_edit;
use crate::inline::{InlineError, InlineOptions};
use crate::sema::references::{find_references, IndirectReason, Reference};
use crate::sema::{resolve_target, GlobalIndex, InlineTarget};
use crate::workspace::{Document, DocumentId, Workspace};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SiteStatus {
    /// The call site was rewritten.
    Inlined,
    /// The call site was left untouched; the declaration stays.
    Skipped { reason: String },
    /// Not a call site: the name is referenced in a way the engine will not
    /// rewrite. Blocks removal.
    Indirect { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteOutcome {
    pub document: String,
    pub line: u32,
    pub column: u32,
    #[serde(flatten)]
    pub status: SiteStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineReport {
    pub target: String,
    pub sites: Vec<SiteOutcome>,
    pub declaration_removed: bool,
}

#[derive(Debug)]
pub struct BulkOutcome<'a> {
    pub workspace: Workspace<'a>,
    pub report: InlineReport,
}

struct DocOutcome {
    doc: DocumentId,
    edits: Vec<TextEdit>,
    sites: Vec<SiteOutcome>,
    cancelled: bool,
}

/// Inline every reachable call site of `name` and delete the declaration if
/// nothing refers to it afterwards.
pub fn inline_and_remove<'a>(
    workspace: &Workspace<'a>,
    name: &str,
    options: &InlineOptions,
    cancel: &CancellationToken,
    arena: &'a Arena,
    interner: &Arc<StringInterner>,
) -> Result<BulkOutcome<'a>, InlineError> {
    let index = GlobalIndex::build(workspace);
    let target = resolve_target(&index, interner, name).ok_or_else(|| {
        InlineError::UnknownDeclaration {
            name: name.to_string(),
        }
    })?;
    tracing::info!(target_name = name, documents = workspace.len(), "bulk inline");

    let documents: Vec<&Document<'a>> = workspace.documents().collect();
    let outcomes: Vec<DocOutcome> = documents
        .into_par_iter()
        .map(|doc| process_document(doc, &index, target, options, cancel, interner))
        .collect();

    if cancel.is_cancelled() || outcomes.iter().any(|o| o.cancelled) {
        return Err(InlineError::Cancelled);
    }

    let mut sites = Vec::new();
    for outcome in &outcomes {
        sites.extend(outcome.sites.iter().cloned());
    }
    let declaration_removed = options.remove_declaration
        && sites
            .iter()
            .all(|site| matches!(site.status, SiteStatus::Inlined));

    // Commit per document; the declaring document goes last so its callers
    // elsewhere are rewritten against the unchanged declaration.
    let declaring = target.doc();
    let mut ordered: Vec<&DocOutcome> = outcomes.iter().collect();
    ordered.sort_by_key(|o| o.doc == declaring);

    let mut result = workspace.clone();
    for outcome in ordered {
        if cancel.is_cancelled() {
            return Err(InlineError::Cancelled);
        }
        let mut edits = outcome.edits.clone();
        if outcome.doc == declaring && declaration_removed {
            let doc = result
                .document(declaring)
                .ok_or(InlineError::UnknownDocument)?;
            edits.push(TextEdit::new(removal_span(&doc.text, target.span()), ""));
        }
        if edits.is_empty() {
            continue;
        }
        let doc = result
            .document(outcome.doc)
            .ok_or(InlineError::UnknownDocument)?;
        let new_text = apply_edits(&doc.text, &edits);
        result = result.with_document_text(outcome.doc, new_text, arena, interner)?;
    }

    Ok(BulkOutcome {
        workspace: result,
        report: InlineReport {
            target: name.to_string(),
            sites,
            declaration_removed,
        },
    })
}

fn process_document<'a>(
    doc: &Document<'a>,
    index: &GlobalIndex<'a>,
    target: InlineTarget<'a>,
    options: &InlineOptions,
    cancel: &CancellationToken,
    interner: &StringInterner,
) -> DocOutcome {
    let mut outcome = DocOutcome {
        doc: doc.id,
        edits: Vec::new(),
        sites: Vec::new(),
        cancelled: false,
    };
    if cancel.is_cancelled() {
        outcome.cancelled = true;
        return outcome;
    }

    // Rewritten nodes only live long enough to be rendered, so each worker
    // gets its own scratch arena.
    let scratch = Arena::new();
    let references = find_references(doc, index, &target);
    tracing::debug!(doc = %doc.name, references = references.len(), "scanning document");

    for reference in &references {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            return outcome;
        }
        let (line, column) = line_col(&doc.text, reference.span().start);
        let status = match reference {
            Reference::Direct(site) => {
                match compute_site_edit(index, doc, site, &target, options, &scratch, interner) {
                    // Nested call sites yield edits over the same text. The
                    // outermost site comes first in source order and wins;
                    // anything it encloses waits for a later run.
                    Ok(edit) if outcome.edits.iter().any(|prev| prev.span.overlaps(edit.span)) => {
                        SiteStatus::Skipped {
                            reason: "nested inside another inlined call site".to_string(),
                        }
                    }
                    Ok(edit) => {
                        outcome.edits.push(edit);
                        SiteStatus::Inlined
                    }
                    Err(error) => SiteStatus::Skipped {
                        reason: error.to_string(),
                    },
                }
            }
            Reference::Indirect { reason, .. } => SiteStatus::Indirect {
                reason: match reason {
                    IndirectReason::ValueUse => "used as a value".to_string(),
                    IndirectReason::Ambiguous => "ambiguous reference".to_string(),
                },
            },
        };
        outcome.sites.push(SiteOutcome {
            document: doc.name.clone(),
            line,
            column,
            status,
        });
    }
    outcome
}

/// Expand the declaration span to whole lines, swallowing one following
/// blank line so deleting the declaration does not leave a double gap.
fn removal_span(text: &str, span: Span) -> Span {
    let start = text[..span.start as usize]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0) as u32;

    let bytes = text.as_bytes();
    let mut end = (span.end as usize).min(text.len());
    while end < text.len() && (bytes[end] == b' ' || bytes[end] == b'\t') {
        end += 1;
    }
    if end < text.len() && bytes[end] == b'\n' {
        end += 1;
    }
    let mut lookahead = end;
    while lookahead < text.len() && (bytes[lookahead] == b' ' || bytes[lookahead] == b'\t') {
        lookahead += 1;
    }
    if lookahead < text.len() && bytes[lookahead] == b'\n' {
        end = lookahead + 1;
    }
    Span::new(start, end as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_span_takes_whole_lines_and_one_blank() {
        let text = "fn a() -> Int = 1\n\nfn b() -> Int = 2\n";
        let span = Span::new(0, 17);
        let expanded = removal_span(text, span);
        assert_eq!(&text[expanded.start as usize..expanded.end as usize], "fn a() -> Int = 1\n\n");
    }

    #[test]
    fn removal_span_at_end_of_file() {
        let text = "fn a() -> Int = 1\n\nfn b() -> Int = 2\n";
        let span = Span::new(19, 36);
        let expanded = removal_span(text, span);
        assert_eq!(&text[expanded.start as usize..expanded.end as usize], "fn b() -> Int = 2\n");
    }
}
