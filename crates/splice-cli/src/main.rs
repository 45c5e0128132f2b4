//! Command-line front end for the inline refactoring engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use walkdir::WalkDir;

use splice_core::{
    inline_and_remove, inline_at, CancellationToken, DocumentId, InlineOptions, SiteStatus,
    Workspace,
};
use splice_syntax::span::line_start_offset;
use splice_syntax::{Arena, StringInterner};

#[derive(Parser, Debug)]
#[command(name = "splice", version, about = "Inline-definition refactoring for Mica projects")]
struct SpliceCli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inline a function, method, extension or property into its call sites.
    Inline {
        /// Project directory containing `.mica` sources.
        dir: PathBuf,

        /// Declaration to inline: `name` or `Class.member`. Required unless
        /// `--at` selects a single call site.
        #[arg(long)]
        function: Option<String>,

        /// Inline only the call site at `file:line:column` and keep the
        /// declaration.
        #[arg(long, value_name = "FILE:LINE:COL", conflicts_with = "function")]
        at: Option<String>,

        /// Remove the declaration when every reference was inlined.
        #[arg(long, requires = "function")]
        remove: bool,

        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Compute and report the edits without writing any file.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of statements spliced per call site.
        #[arg(long, default_value_t = 64)]
        max_statements: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = SpliceCli::parse();
    match cli.command {
        Command::Inline {
            dir,
            function,
            at,
            remove,
            format,
            dry_run,
            max_statements,
        } => run_inline(
            &dir,
            function.as_deref(),
            at.as_deref(),
            remove,
            format,
            dry_run,
            max_statements,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_inline(
    dir: &Path,
    function: Option<&str>,
    at: Option<&str>,
    remove: bool,
    format: Format,
    dry_run: bool,
    max_statements: usize,
) -> Result<ExitCode> {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let (workspace, paths) = load_workspace(dir, &arena, &interner)?;
    if workspace.is_empty() {
        bail!("no .mica files found under {}", dir.display());
    }
    let options = InlineOptions {
        max_inline_statements: max_statements,
        remove_declaration: remove,
    };

    let (updated, all_inlined) = match (function, at) {
        (_, Some(position)) => {
            let (doc_id, offset) = locate(&workspace, position)?;
            let outcome = inline_at(&workspace, doc_id, offset, &options, &arena, &interner)
                .with_context(|| format!("inlining call site at {position}"))?;
            if format == Format::Text {
                println!("inlined 1 call site at {position}");
            }
            (outcome.workspace, true)
        }
        (Some(name), None) => {
            let cancel = CancellationToken::new();
            let outcome =
                inline_and_remove(&workspace, name, &options, &cancel, &arena, &interner)
                    .with_context(|| format!("inlining `{name}`"))?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&outcome.report)?),
                Format::Text => print_report(&outcome.report),
            }
            let all_inlined = outcome
                .report
                .sites
                .iter()
                .all(|site| matches!(site.status, SiteStatus::Inlined));
            (outcome.workspace, all_inlined)
        }
        (None, None) => bail!("one of --function or --at is required"),
    };

    if !dry_run {
        write_back(&workspace, &updated, &paths)?;
    } else {
        info!("dry run, not writing files");
    }
    Ok(if all_inlined {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Parse every `.mica` file under `dir` into one workspace snapshot.
fn load_workspace<'a>(
    dir: &Path,
    arena: &'a Arena,
    interner: &Arc<StringInterner>,
) -> Result<(Workspace<'a>, Vec<(DocumentId, PathBuf)>)> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "mica")
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    let mut workspace = Workspace::new();
    let mut paths = Vec::with_capacity(files.len());
    for path in files {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .strip_prefix(dir)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        let id = workspace
            .add_document(name, text, arena, interner)
            .with_context(|| format!("parsing {}", path.display()))?;
        paths.push((id, path));
    }
    Ok((workspace, paths))
}

/// Resolve a `file:line:column` position to a document and byte offset.
fn locate(workspace: &Workspace<'_>, position: &str) -> Result<(DocumentId, u32)> {
    let mut parts = position.rsplitn(3, ':');
    let column: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .context("position must be file:line:column")?;
    let line: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .context("position must be file:line:column")?;
    let file = parts.next().context("position must be file:line:column")?;

    let doc = workspace
        .document_by_name(file)
        .with_context(|| format!("no document named {file}"))?;
    let line_start = line_start_offset(&doc.text, line)
        .with_context(|| format!("{file} has no line {line}"))?;
    Ok((doc.id, line_start + column.saturating_sub(1)))
}

fn print_report(report: &splice_core::InlineReport) {
    for site in &report.sites {
        let status = match &site.status {
            SiteStatus::Inlined => "inlined".to_string(),
            SiteStatus::Skipped { reason } => format!("skipped ({reason})"),
            SiteStatus::Indirect { reason } => format!("indirect ({reason})"),
        };
        println!(
            "{}:{}:{}: {}",
            site.document, site.line, site.column, status
        );
    }
    if report.declaration_removed {
        println!("declaration `{}` removed", report.target);
    } else {
        println!("declaration `{}` kept", report.target);
    }
}

/// Write every document whose text changed between the two snapshots.
fn write_back(
    before: &Workspace<'_>,
    after: &Workspace<'_>,
    paths: &[(DocumentId, PathBuf)],
) -> Result<()> {
    for (id, path) in paths {
        let (Some(old), Some(new)) = (before.document(*id), after.document(*id)) else {
            continue;
        };
        if old.text != new.text {
            fs::write(path, &new.text)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "updated");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_args_parse() {
        let cli = SpliceCli::parse_from([
            "splice", "inline", "proj", "--function", "area", "--remove", "--format", "json",
        ]);
        match cli.command {
            Command::Inline {
                function,
                remove,
                format,
                ..
            } => {
                assert_eq!(function.as_deref(), Some("area"));
                assert!(remove);
                assert_eq!(format, Format::Json);
            }
        }
    }

    #[test]
    fn at_conflicts_with_function() {
        let result = SpliceCli::try_parse_from([
            "splice", "inline", "proj", "--function", "area", "--at", "a.mica:3:5",
        ]);
        assert!(result.is_err());
    }
}
