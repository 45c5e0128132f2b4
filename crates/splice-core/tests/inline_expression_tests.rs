//! Expression-form inlining through the single-site entry point.

use std::sync::Arc;

use indoc::indoc;
use splice_core::{inline_at, DocumentId, InlineError, InlineOptions, Workspace};
use splice_syntax::{Arena, StringInterner};

fn workspace<'a>(
    arena: &'a Arena,
    interner: &Arc<StringInterner>,
    sources: &[(&str, &str)],
) -> Workspace<'a> {
    let mut ws = Workspace::new();
    for (name, text) in sources {
        ws.add_document(*name, text.to_string(), arena, interner)
            .unwrap();
    }
    ws
}

fn offset_of(ws: &Workspace<'_>, doc: &str, needle: &str) -> (DocumentId, u32) {
    let doc = ws.document_by_name(doc).unwrap();
    let offset = doc.text.find(needle).unwrap() as u32;
    (doc.id, offset)
}

fn inline_and_read(source: &str, needle: &str) -> String {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let ws = workspace(&arena, &interner, &[("main.mica", source)]);
    let (doc, offset) = offset_of(&ws, "main.mica", needle);
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
fn positional_arguments_substitute_into_the_body() {
    let source = indoc! {"
        fn add(a: Int, b: Int) -> Int = a + b

        fn main() {
            let total = add(2, 3)
        }
    "};
    let result = inline_and_read(source, "add(2, 3)");
    assert!(result.contains("let total = (2 + 3)"), "got:\n{result}");
}

#[test]
fn missing_argument_falls_back_to_the_default() {
    let source = indoc! {"
        fn scale(x: Int, factor: Int = 10) -> Int = x * factor

        fn main() {
            let y = scale(5)
        }
    "};
    let result = inline_and_read(source, "scale(5)");
    assert!(result.contains("let y = (5 * 10)"), "got:\n{result}");
}

#[test]
fn named_arguments_bind_by_parameter_name() {
    let source = indoc! {"
        fn span(value: Int, low: Int, high: Int) -> Int = value + low + high

        fn main() {
            let s = span(value: 9, high: 10, low: 0)
        }
    "};
    let result = inline_and_read(source, "span(value: 9");
    assert!(result.contains("let s = (9 + 0 + 10)"), "got:\n{result}");
}

#[test]
fn non_atomic_arguments_are_parenthesized() {
    let source = indoc! {"
        fn square(x: Int) -> Int = x * x

        fn main(a: Int, b: Int) {
            let q = square(a + b)
        }
    "};
    let result = inline_and_read(source, "square(a + b)");
    assert!(
        result.contains("let q = ((a + b) * (a + b))"),
        "got:\n{result}"
    );
}

#[test]
fn extension_receiver_binds_the_this_parameter() {
    let source = indoc! {"
        fn first(this xs: List<Int>) -> Int = xs[0]

        fn main(numbers: List<Int>) {
            let x = numbers.first()
        }
    "};
    let result = inline_and_read(source, "numbers.first()");
    assert!(result.contains("let x = numbers[0]"), "got:\n{result}");
}

#[test]
fn single_return_block_inlines_as_an_expression() {
    let source = indoc! {"
        fn negate(x: Int) -> Int {
            return 0 - x
        }

        fn main() {
            let n = negate(4)
        }
    "};
    let result = inline_and_read(source, "negate(4)");
    assert!(result.contains("let n = (0 - 4)"), "got:\n{result}");
}

#[test]
fn static_members_get_qualified_outside_their_class() {
    let source = indoc! {"
        class Geometry {
            static let FACTOR = 3
            static fn scale(x: Int) -> Int = x * FACTOR
        }

        fn main() {
            let y = Geometry.scale(7)
        }
    "};
    let result = inline_and_read(source, "Geometry.scale(7)");
    assert!(
        result.contains("let y = (7 * Geometry.FACTOR)"),
        "got:\n{result}"
    );
}

#[test]
fn static_named_by_a_default_value_is_qualified() {
    let source = indoc! {"
        class Geometry {
            static let BASE = 4
            static fn pad(x: Int, margin: Int = BASE) -> Int = x + margin
        }

        fn main() {
            let p = Geometry.pad(2)
        }
    "};
    let result = inline_and_read(source, "Geometry.pad(2)");
    assert!(
        result.contains("let p = (2 + Geometry.BASE)"),
        "got:\n{result}"
    );
}

#[test]
fn property_read_substitutes_the_receiver_for_self() {
    let source = indoc! {"
        class Circle {
            let radius: Int
            prop area: Int = self.radius * self.radius * 3
        }

        fn main(c: Circle) {
            let a = c.area
        }
    "};
    let result = inline_and_read(source, "c.area");
    assert!(
        result.contains("let a = (c.radius * c.radius * 3)"),
        "got:\n{result}"
    );
}

#[test]
fn explicit_type_arguments_replace_type_parameters() {
    let source = indoc! {"
        fn convert<T>(x: Int) -> T = x as T

        fn main() {
            let y = convert<Float>(1)
        }
    "};
    let result = inline_and_read(source, "convert<Float>(1)");
    assert!(result.contains("let y = (1 as Float)"), "got:\n{result}");
}

#[test]
fn lambda_argument_gets_a_function_type_cast() {
    let source = indoc! {"
        fn apply(f: (Int) -> Int, x: Int) -> Int = f(x)

        fn main() {
            let r = apply(|n| n + 1, 5)
        }
    "};
    let result = inline_and_read(source, "apply(|n|");
    assert!(
        result.contains("let r = ((|n| n + 1) as (Int) -> Int)(5)"),
        "got:\n{result}"
    );
}

#[test]
fn missing_type_argument_is_an_error() {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let source = indoc! {"
        fn convert<T>(x: Int) -> T = x as T

        fn main() {
            let y = convert(1)
        }
    "};
    let ws = workspace(&arena, &interner, &[("main.mica", source)]);
    let (doc, offset) = offset_of(&ws, "main.mica", "convert(1)");
    let err = inline_at(
        &ws,
        doc,
        offset,
        &InlineOptions::default(),
        &arena,
        &interner,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        InlineError::UnresolvedTypeArgument { ref name } if name == "T"
    ));
}

#[test]
fn missing_required_argument_is_an_error() {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let source = indoc! {"
        fn add(a: Int, b: Int) -> Int = a + b

        fn main() {
            let t = add(1)
        }
    "};
    let ws = workspace(&arena, &interner, &[("main.mica", source)]);
    let (doc, offset) = offset_of(&ws, "main.mica", "add(1)");
    let err = inline_at(
        &ws,
        doc,
        offset,
        &InlineOptions::default(),
        &arena,
        &interner,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        InlineError::UnbindableArgument { ref name } if name == "b"
    ));
}

#[test]
fn extern_declarations_are_uninlinable() {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let source = indoc! {"
        extern fn read_line() -> String

        fn main() {
            let line = read_line()
        }
    "};
    let ws = workspace(&arena, &interner, &[("main.mica", source)]);
    let doc = ws.document_by_name("main.mica").unwrap();
    let offset = doc.text.rfind("read_line()").unwrap() as u32;
    let doc = doc.id;
    let err = inline_at(
        &ws,
        doc,
        offset,
        &InlineOptions::default(),
        &arena,
        &interner,
    )
    .unwrap_err();
    assert!(matches!(err, InlineError::UninlinableBody { .. }));
}

#[test]
fn call_inside_the_declaration_is_rejected() {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let source = indoc! {"
        fn fact(n: Int) -> Int = n * fact(n - 1)

        fn main() {
            let f = fact(3)
        }
    "};
    let ws = workspace(&arena, &interner, &[("main.mica", source)]);
    let (doc, offset) = offset_of(&ws, "main.mica", "fact(n - 1)");
    let err = inline_at(
        &ws,
        doc,
        offset,
        &InlineOptions::default(),
        &arena,
        &interner,
    )
    .unwrap_err();
    assert!(matches!(err, InlineError::RecursiveCallSite));
}

#[test]
fn no_call_site_at_offset_is_an_error() {
    let arena = Arena::new();
    let interner = Arc::new(StringInterner::new());
    let source = indoc! {"
        fn main() {
            let x = 1
        }
    "};
    let ws = workspace(&arena, &interner, &[("main.mica", source)]);
    let doc = ws.document_by_name("main.mica").unwrap().id;
    let err = inline_at(
        &ws,
        doc,
        4,
        &InlineOptions::default(),
        &arena,
        &interner,
    )
    .unwrap_err();
    assert!(matches!(err, InlineError::NoCallSite));
}

#[test]
fn formatting_outside_the_splice_is_preserved() {
    let source = "fn add(a: Int, b: Int) -> Int = a + b\n\nfn main() {\n    let total  =  add(2, 3)  // sum\n}\n";
    let result = inline_and_read(source, "add(2, 3)");
    assert_eq!(
        result,
        "fn add(a: Int, b: Int) -> Int = a + b\n\nfn main() {\n    let total  =  (2 + 3)  // sum\n}\n"
    );
}
