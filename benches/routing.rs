use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fukurou::fetch::{Request, RequestMode};
use fukurou::router::RouteClassifier;
use http::Method;

fn classifier() -> RouteClassifier {
    RouteClassifier::new(
        "https://app.example",
        [".css", ".js", ".json", ".png", ".jpg", ".jpeg", ".svg", ".webp", ".ico"]
            .into_iter()
            .map(String::from)
            .collect(),
    )
}

fn bench_classify(c: &mut Criterion) {
    let classifier = classifier();

    let navigation = Request::navigate("https://app.example/");
    let asset = Request::get("https://app.example/assets/deep/path/style.css?v=42");
    let other = Request::get("https://app.example/fonts/body.woff2");
    let cross_origin = Request::get("https://cdn.example/lib/vendor.js");
    let post = Request::new(
        Method::POST,
        "https://app.example/api/commands",
        RequestMode::NoCors,
    );

    let mut group = c.benchmark_group("route_classification");
    group.bench_function("navigation", |b| {
        b.iter(|| classifier.classify(black_box(&navigation)))
    });
    group.bench_function("static_asset", |b| {
        b.iter(|| classifier.classify(black_box(&asset)))
    });
    group.bench_function("other", |b| b.iter(|| classifier.classify(black_box(&other))));
    group.bench_function("cross_origin_bypass", |b| {
        b.iter(|| classifier.classify(black_box(&cross_origin)))
    });
    group.bench_function("non_get_bypass", |b| {
        b.iter(|| classifier.classify(black_box(&post)))
    });
    group.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
