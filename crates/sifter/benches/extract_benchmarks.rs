//! Extraction performance benchmarks.
//!
//! Measures container scanning and the whole-page fallback over synthetic
//! result pages of increasing size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sifter::{Extractor, ProviderRegistry};

/// Generate a DuckDuckGo-style result page with `results` entries.
///
/// When `email_at` is set, that result's snippet carries an address.
fn generate_result_page(results: usize, email_at: Option<usize>) -> String {
    let mut page = String::from("<html><head><script>var t = 1;</script></head><body>");
    for i in 0..results {
        let snippet = if Some(i) == email_at {
            format!("Contact agent{}@realty.example.com for listings", i)
        } else {
            format!("Listing {} in Austin, TX. Call 555-01{:02}.", i, i % 100)
        };
        page.push_str(&format!(
            r#"<div class="result results_links"><h2><a class="result__a" href="https://r{i}.example/">Result {i}</a></h2><a class="result__snippet">{snippet}</a></div>"#
        ));
    }
    page.push_str("<footer>Questions? help@search.example.org</footer></body></html>");
    page
}

fn bench_container_hit(c: &mut Criterion) {
    let extractor = Extractor::new(ProviderRegistry::builtin()).unwrap();
    let mut group = c.benchmark_group("extract_container_hit");

    for results in [10, 30, 100] {
        let page = generate_result_page(results, Some(2));
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(results), &page, |b, page| {
            b.iter(|| extractor.extract(black_box(page), "duckduckgo"))
        });
    }

    group.finish();
}

fn bench_page_fallback(c: &mut Criterion) {
    let extractor = Extractor::new(ProviderRegistry::builtin()).unwrap();
    let mut group = c.benchmark_group("extract_page_fallback");

    for results in [10, 30, 100] {
        let page = generate_result_page(results, None);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(results), &page, |b, page| {
            b.iter(|| extractor.extract(black_box(page), "duckduckgo"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_container_hit, bench_page_fallback);
criterion_main!(benches);
