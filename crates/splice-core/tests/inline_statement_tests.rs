//! Statement-form inlining: void bodies spliced over expression statements.

use std::sync::Arc;

use indoc::indoc;
use splice_core::{inline_at, DocumentId, InlineError, InlineOptions, Workspace};
use splice_syntax::{Arena, StringInterner};

fn workspace<'a>(
    arena: &'a Arena,
    interner: &Arc<StringInterner>,
    source: &str,
) -> Workspace<'a> {
    let mut ws = Workspace::new();
    ws.add_document("main.mica", source.to_string(), arena, interner)
        .unwrap();
    ws
}

fn offset_of(ws: &Workspace<'_>, needle: &str) -> (DocumentId, u32) {
    let doc = ws.document_by_name("main.mica").unwrap();
    let offset = doc.text.find(needle).unwrap() as u32;
    (doc.id, offset)
}

fn run(source: &str, needle: &str) -> Result<String, InlineError> {
    run_with(source, needle, &InlineOptions::default())
}

fn run_with(source: &str, needle: &str, options: &InlineOptions) -> Result<String, InlineError> {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let ws = workspace(&arena, &interner, source);
    let (doc, offset) = offset_of(&ws, needle);
    let outcome = inline_at(&ws, doc, offset, options, &arena, &interner)?;
    Ok(outcome.workspace.document(doc).unwrap().text.clone())
}

#[test]
fn void_body_replaces_the_expression_statement() {
    let source = indoc! {r#"
        fn log_twice(msg: String) {
            print(msg)
            print(msg)
        }

        fn main() {
            log_twice("hi")
        }
    "#};
    let result = run(source, "log_twice(\"hi\")").unwrap();
    let expected = indoc! {r#"
        fn log_twice(msg: String) {
            print(msg)
            print(msg)
        }

        fn main() {
            print("hi")
            print("hi")
        }
    "#};
    assert_eq!(result, expected);
}

#[test]
fn spliced_statements_keep_the_call_sites_indentation() {
    let source = indoc! {"
        fn setup(flag: Bool) {
            if flag {
                init()
            }
        }

        fn main() {
            if ready() {
                setup(true)
            }
        }
    "};
    let result = run(source, "setup(true)").unwrap();
    let expected = indoc! {"
        fn setup(flag: Bool) {
            if flag {
                init()
            }
        }

        fn main() {
            if ready() {
                if true {
                    init()
                }
            }
        }
    "};
    assert_eq!(result, expected);
}

#[test]
fn void_body_in_value_position_is_uninlinable() {
    let source = indoc! {"
        fn emit(x: Int) {
            send(x)
            send(x)
        }

        fn main() {
            let r = emit(1)
        }
    "};
    let err = run(source, "emit(1)").unwrap_err();
    assert!(matches!(err, InlineError::UninlinableBody { .. }));
}

#[test]
fn bodies_with_returns_do_not_splice_as_statements() {
    let source = indoc! {"
        fn bail(flag: Bool) {
            if flag {
                return
            }
            log()
        }

        fn main() {
            bail(true)
        }
    "};
    let err = run(source, "bail(true)").unwrap_err();
    assert!(matches!(err, InlineError::UninlinableBody { .. }));
}

#[test]
fn statement_limit_is_enforced() {
    let source = indoc! {"
        fn chatter(x: Int) {
            send(x)
            send(x)
            send(x)
        }

        fn main() {
            chatter(9)
        }
    "};
    let options = InlineOptions {
        max_inline_statements: 2,
        ..InlineOptions::default()
    };
    let err = run_with(source, "chatter(9)", &options).unwrap_err();
    assert!(matches!(err, InlineError::UninlinableBody { .. }));
}

#[test]
fn locals_in_spliced_statements_survive_untouched_when_free() {
    let source = indoc! {"
        fn swap_report(a: Int, b: Int) {
            let lo = a
            let hi = b
            report(lo, hi)
        }

        fn main() {
            swap_report(1, 2)
        }
    "};
    let result = run(source, "swap_report(1, 2)").unwrap();
    assert!(result.contains("    let lo = 1\n    let hi = 2\n    report(lo, hi)"));
}
