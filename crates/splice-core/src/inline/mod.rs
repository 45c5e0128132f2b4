//! The inline engine.
//!
//! Pipeline for one call site: validate the body form, bind arguments to
//! parameters ([`params`]), pick collision-free names for the body's locals
//! ([`rename`]), build the node-level substitution map ([`substitution`]),
//! rewrite the body ([`rewriter`]) and render it into a span edit
//! ([`single`]). The bulk orchestrator ([`bulk`]) runs that pipeline over
//! every reference in the workspace and removes the declaration when it can
//! prove nothing still refers to it.

pub mod bulk;
pub mod params;
pub mod rename;
pub mod rewriter;
pub mod single;
pub mod substitution;

use thiserror::Error;

/// Tuning knobs passed into both orchestrators.
#[derive(Debug, Clone)]
pub struct InlineOptions {
    /// Upper bound on the number of statements spliced per call site.
    /// Statement-form bodies above this count are rejected as uninlinable
    /// rather than exploding every caller.
    pub max_inline_statements: usize,
    /// Whether the bulk orchestrator deletes the declaration once every
    /// reference inlined. With this off the declaration always stays.
    pub remove_declaration: bool,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            max_inline_statements: 64,
            remove_declaration: true,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InlineError {
    #[error("no inlinable call site at the requested position")]
    NoCallSite,

    #[error("declaration `{name}` was not found in the workspace")]
    UnknownDeclaration { name: String },

    #[error("document is not part of the workspace")]
    UnknownDocument,

    #[error("cannot bind an argument for parameter `{name}`")]
    UnbindableArgument { name: String },

    #[error("the declaration's body cannot be inlined: {reason}")]
    UninlinableBody { reason: String },

    #[error("type parameter `{name}` has no corresponding type argument at the call site")]
    UnresolvedTypeArgument { name: String },

    #[error("call site is inside the declaration being inlined")]
    RecursiveCallSite,

    #[error("operation was cancelled")]
    Cancelled,

    #[error("{0}")]
    Syntax(#[from] splice_syntax::SyntaxError),
}
