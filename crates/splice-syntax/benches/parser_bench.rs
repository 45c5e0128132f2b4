use criterion::{black_box, criterion_group, criterion_main, Criterion};
use splice_syntax::{Arena, Lexer, Parser, StringInterner};
use std::sync::Arc;

fn sample_source(functions: usize) -> String {
    let mut source = String::new();
    for i in 0..functions {
        source.push_str(&format!(
            "fn work{i}(a: Int, b: Int = {i}) -> Int {{\n    let total = a + b * {i}\n    if total > 100 {{\n        return total - 100\n    }}\n    return total\n}}\n\n"
        ));
    }
    source
}

fn bench_parse(c: &mut Criterion) {
    let source = sample_source(100);
    c.bench_function("parse_100_functions", |b| {
        b.iter(|| {
            let arena = Arena::new();
            let interner = Arc::new(StringInterner::new());
            let tokens = Lexer::new(black_box(&source), &interner).tokenize().unwrap();
            let module = Parser::new(tokens, &arena, &interner).parse().unwrap();
            black_box(module.items.len())
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
