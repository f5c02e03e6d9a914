//! Benchmarks for teixcerpt extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic TEI documents and in-memory lookup tables.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use teixcerpt::extract::{ExtractOptions, Extractor};
use teixcerpt::lookup::{LookupTables, MetadataResolver, Table};

/// Creates a TEI document with `excerpt_count` excerpts, each preceded by
/// a paragraph of omitted prose.
fn create_test_tei(excerpt_count: usize) -> String {
    let mut body = String::new();
    for i in 0..excerpt_count {
        body.push_str(&format!(
            "<p>Commentary paragraph {} that is left out of the excerpt file.</p>\n",
            i
        ));
        let status = if i % 3 == 0 { "draft" } else { "finalized" };
        body.push_str(&format!(
            "<p><seg type=\"excerpt\" status=\"{}\">Excerpt {} with <hi rend=\"italic\">markup</hi> inside.</seg></p>\n",
            status, i
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
<teiHeader>
<fileDesc>
<titleStmt><title>Benchmark</title><author>Unknown</author><principal>P</principal></titleStmt>
<publicationStmt><p>Unpublished</p></publicationStmt>
<sourceDesc><msDesc><msIdentifier><idno type="TibSchol">T{:04}</idno></msIdentifier></msDesc></sourceDesc>
</fileDesc>
</teiHeader>
<text><body>
{}</body></text>
</TEI>
"#,
        500, body
    )
}

/// Creates a resolver with `rows` instances, each pointing at its own work.
fn create_resolver(rows: usize) -> MetadataResolver {
    let instances = (0..rows)
        .map(|i| {
            vec![
                format!("T{:04}", i),
                format!(
                    "[{{'label': 'has as an instance', 'subj': {{'label': 'Work {} ({})'}}, 'obj': {{'label': 'T{:04}'}}}}]",
                    i, i, i
                ),
            ]
        })
        .collect();
    let works = (0..rows)
        .map(|i| {
            vec![
                format!("https://example.org/apis/work/{}/", i),
                format!(
                    "[{{'label': 'is author of', 'subj': {{'label': 'Author {} ({})'}}, 'obj': {{'label': 'Work {} ({})'}}}}]",
                    i,
                    i + 10_000,
                    i,
                    i
                ),
            ]
        })
        .collect();

    let tables = LookupTables::new(
        Table::from_rows(&["tibschol_ref", "relations"], instances),
        Table::from_rows(&["url", "relations"], works),
        None,
    );
    MetadataResolver::new(tables).unwrap()
}

/// Benchmark parsing at various document sizes.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("tei_parsing");

    for excerpt_count in [10, 100, 1000].iter() {
        let xml = create_test_tei(*excerpt_count);

        group.bench_function(format!("{}_excerpts", excerpt_count), |b| {
            b.iter(|| teixcerpt::parse_str(black_box(&xml)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the full extraction pass, header lookup included.
fn bench_extraction(c: &mut Criterion) {
    let resolver = create_resolver(1000);
    let extractor = Extractor::new(&resolver, ExtractOptions::default());
    let mut group = c.benchmark_group("extraction");

    for excerpt_count in [10, 100, 1000].iter() {
        let doc = teixcerpt::parse_str(&create_test_tei(*excerpt_count)).unwrap();

        group.bench_function(format!("{}_excerpts", excerpt_count), |b| {
            b.iter(|| extractor.extract(black_box(&doc)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark identifier lookup in a large instance table.
fn bench_lookup(c: &mut Criterion) {
    use teixcerpt::lookup::MetadataSource;

    let resolver = create_resolver(5000);
    c.bench_function("resolve_idno", |b| {
        b.iter(|| resolver.resolve(black_box("T2500")).unwrap());
    });
}

criterion_group!(benches, bench_parsing, bench_extraction, bench_lookup);
criterion_main!(benches);
