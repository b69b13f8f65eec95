use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uri_kit::{query::Query, Parts, Uri};

criterion_group!(
    benches,
    bench_parse,
    bench_resolve,
    bench_render,
    bench_render_relative,
    bench_query_decode,
    bench_query_encode,
);
criterion_main!(benches);

const PARSE_CASE: &str = "https://example.com:8080/search?q=%E6%B5%8B%E8%AF%95#fragment";
const RESOLVE_CASE_BASE: &str = "http://example.com/foo/bar";
const RESOLVE_CASE_REF: &str = "../baz?x=1";
const QUERY_CASE: &str = "pg=3&lang=en&encval=one+%26+another+%2B+complex+values+%3D+2&one=1\
                          &two%5Ba%5D=ey&two%5Bb%5D=bee&two%5Bc%5D%5Bi%5D=ay&two%5Bc%5D%5Bii%5D=ayay";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| Uri::parse(black_box(PARSE_CASE))));
}

fn bench_resolve(c: &mut Criterion) {
    let base = Uri::parse(RESOLVE_CASE_BASE).unwrap();

    c.bench_function("resolve", |b| {
        b.iter(|| Uri::parse_relative(black_box(RESOLVE_CASE_REF), black_box(&base)))
    });
}

fn bench_render(c: &mut Criterion) {
    let uri = Uri::parse(PARSE_CASE).unwrap();

    c.bench_function("render", |b| b.iter(|| black_box(&uri).render(Parts::ALL)));
}

fn bench_render_relative(c: &mut Criterion) {
    let base = Uri::parse(RESOLVE_CASE_BASE).unwrap();
    let uri = Uri::parse_relative(RESOLVE_CASE_REF, &base).unwrap();

    c.bench_function("render_relative", |b| {
        b.iter(|| black_box(&uri).render_relative(black_box(&base)))
    });
}

fn bench_query_decode(c: &mut Criterion) {
    c.bench_function("query_decode", |b| {
        b.iter(|| Query::decode(black_box(QUERY_CASE)))
    });
}

fn bench_query_encode(c: &mut Criterion) {
    let query = Query::decode(QUERY_CASE).unwrap();

    c.bench_function("query_encode", |b| b.iter(|| black_box(&query).encode()));
}
