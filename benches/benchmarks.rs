//! Performance benchmarks for query compilation
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use knowledge_query::query::{QueryMatch, QuerySpec, StandardParser, compile};
use knowledge_query::utils::sanitize_terms;

fn bench_sanitize(c: &mut Criterion) {
    let inputs = vec![
        ("short", "cat".to_string()),
        ("words", "the quick brown fox jumps over the lazy dog".to_string()),
        ("syntax", "(cats AND dogs) OR \"birds\" -fish; NEAR ADJ".to_string()),
        ("long_term", "ü".repeat(400)),
    ];

    let mut group = c.benchmark_group("sanitize");
    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, text| {
            b.iter(|| sanitize_terms(black_box(text)))
        });
    }
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let parser = StandardParser::default();

    let specs = vec![
        ("match_all", QuerySpec::builder().build()),
        ("single_char", QuerySpec::builder().search_terms("x").build()),
        (
            "title",
            QuerySpec::builder().search_terms("brown bear habitat").build(),
        ),
        (
            "synopsis_corrected",
            QuerySpec::builder()
                .search_terms("brwn bear habitat")
                .corrected_terms("brown bear habitat")
                .match_(QueryMatch::TitleAndSynopsis)
                .build(),
        ),
        (
            "filtered",
            QuerySpec::builder()
                .search_terms("brown bear")
                .tags_match_any(["animals", "nature", "mammals"])
                .tags_match_all(["featured"])
                .ids(["ekn://app/aaaa", "ekn://app/bbbb", "ekn+zim://wiki/A/Bear"])
                .content_type("text/html")
                .excluded_tags(["spam"])
                .build(),
        ),
    ];

    let mut group = c.benchmark_group("compile");
    for (name, spec) in &specs {
        group.bench_with_input(BenchmarkId::from_parameter(name), spec, |b, spec| {
            b.iter(|| compile(black_box(spec), &parser))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sanitize, bench_compile);

criterion_main!(benches);
