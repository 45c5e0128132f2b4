//! Collision handling for body locals spliced into a caller's scope.

use std::sync::Arc;

use indoc::indoc;
use splice_core::{inline_at, DocumentId, InlineOptions, Workspace};
use splice_syntax::{Arena, StringInterner};

fn run(source: &str, needle: &str) -> String {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let mut ws = Workspace::new();
    ws.add_document("main.mica", source.to_string(), &arena, &interner)
        .unwrap();
    let doc = ws.document_by_name("main.mica").unwrap();
    let offset = doc.text.find(needle).unwrap() as u32;
    let doc: DocumentId = doc.id;
    let outcome = inline_at(
        &ws,
        doc,
        offset,
        &InlineOptions::default(),
        &arena,
        &interner,
    )
    .unwrap();
    outcome.workspace.document(doc).unwrap().text.clone()
}

#[test]
fn colliding_local_is_renamed_consistently() {
    let source = indoc! {"
        fn double_sum(a: Int, b: Int) {
            let total = a + b
            print(total)
        }

        fn main() {
            let total = 5
            double_sum(total, 1)
        }
    "};
    let result = run(source, "double_sum(total, 1)");
    let expected = indoc! {"
        fn double_sum(a: Int, b: Int) {
            let total = a + b
            print(total)
        }

        fn main() {
            let total = 5
            let total1 = total + 1
            print(total1)
        }
    "};
    assert_eq!(result, expected);
}

#[test]
fn suffix_skips_names_already_visible() {
    let source = indoc! {"
        fn announce(x: Int) {
            let v = x * 2
            print(v)
        }

        fn main() {
            let v = 1
            let v1 = 2
            announce(v + v1)
        }
    "};
    let result = run(source, "announce(v + v1)");
    assert!(result.contains("let v2 = (v + v1) * 2"), "got:\n{result}");
    assert!(result.contains("print(v2)"), "got:\n{result}");
}

#[test]
fn two_colliding_locals_get_distinct_names() {
    let source = indoc! {"
        fn pair_out(x: Int) {
            let a = x
            let b = x + 1
            emit(a, b)
        }

        fn main(a: Int, b: Int) {
            pair_out(a + b)
        }
    "};
    let result = run(source, "pair_out(a + b)");
    assert!(result.contains("let a1 = (a + b)"), "got:\n{result}");
    assert!(result.contains("let b1 = (a + b) + 1"), "got:\n{result}");
    assert!(result.contains("emit(a1, b1)"), "got:\n{result}");
}

#[test]
fn shadowing_lambda_parameter_is_left_alone() {
    // The lambda's own `n` shadows nothing at the call site, and parameter
    // substitution must not reach through it.
    let source = indoc! {"
        fn tally(xs: List<Int>, n: Int) -> Int = xs.fold(n, |n| n + 1)

        fn main(values: List<Int>) {
            let t = tally(values, 0)
        }
    "};
    let result = run(source, "tally(values, 0)");
    assert!(
        result.contains("let t = values.fold(0, |n| n + 1)"),
        "got:\n{result}"
    );
}

#[test]
fn loop_variable_collisions_are_renamed() {
    let source = indoc! {"
        fn walk(xs: List<Int>) {
            for item in xs {
                visit(item)
            }
        }

        fn main(item: Int, rest: List<Int>) {
            walk(rest)
        }
    "};
    let result = run(source, "walk(rest)");
    assert!(result.contains("for item1 in rest {"), "got:\n{result}");
    assert!(result.contains("visit(item1)"), "got:\n{result}");
}
