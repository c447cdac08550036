use criterion::{criterion_group, criterion_main, Criterion};
use span_url::Url;
use std::hint::black_box;

criterion_group!(benches, bench_parse, bench_normalize, bench_parse_url);
criterion_main!(benches);

const INPUT: &str = "https://user@example.com:8042/over/there?name=ferret#nose";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| {
        b.iter(|| {
            let _ = black_box(Url::new(black_box(INPUT)));
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    let u = Url::new("eXamPLE://us%65r@Some.Address:1234/this/is/a/path?with&a&query=param");
    c.bench_function("normalize", |b| {
        b.iter(|| {
            let _ = black_box(black_box(&u).normalize());
        })
    });
}

fn bench_parse_url(c: &mut Criterion) {
    c.bench_function("parse_url", |b| {
        b.iter(|| {
            let _ = black_box(url::Url::parse(black_box(INPUT)));
        })
    });
}
