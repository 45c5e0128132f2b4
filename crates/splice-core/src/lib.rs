//! Inline-definition refactoring engine for Mica workspaces.
//!
//! The engine takes an immutable [`workspace::Workspace`] snapshot, locates
//! call sites of a target function, method, extension function or property,
//! and splices the declaration's body into each site with arguments
//! substituted for parameters. Edits are span-based text replacements, so
//! formatting outside the splice points is preserved byte for byte.
//!
//! Two entry points are exposed:
//!
//! * [`inline::single::inline_at`] rewrites one call site identified by a
//!   byte offset and leaves the declaration in place.
//! * [`inline::bulk::inline_and_remove`] rewrites every call site of a named
//!   declaration across the workspace and deletes the declaration when all
//!   references were direct calls that inlined successfully.

pub mod cancel;
pub mod edit;
pub mod inline;
pub mod sema;
pub mod workspace;

pub use cancel::CancellationToken;
pub use edit::TextEdit;
pub use inline::bulk::{inline_and_remove, BulkOutcome, InlineReport, SiteOutcome, SiteStatus};
pub use inline::single::{inline_at, SingleOutcome};
pub use inline::{InlineError, InlineOptions};
pub use workspace::{Document, DocumentId, Workspace};
