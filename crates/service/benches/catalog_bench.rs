use criterion::{criterion_group, criterion_main, Criterion};

use models::catalog::{NewProduct, Product, ProductStatus};
use service::services::{CatalogQuery, SortKey};

fn products(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| {
            let mut input = NewProduct::new(format!("Product {i}"), (i % 500) as f64 * 1000.0);
            input.category_id = Some(format!("c{}", i % 12));
            let status = if i % 7 == 0 { ProductStatus::Archived } else { ProductStatus::Published };
            input.into_product(i.to_string(), status).unwrap()
        })
        .collect()
}

fn bench_browse(c: &mut Criterion) {
    let all = products(2_000);
    let query = CatalogQuery {
        q: Some("product 1".into()),
        min_price: Some(10_000.0),
        max_price: Some(400_000.0),
        sort: SortKey::PriceDesc,
        ..Default::default()
    }
    .with_categories("c1,c3,c5");

    c.bench_function("catalog_browse_2k", |b| {
        b.iter(|| query.apply(all.clone()));
    });
}

criterion_group!(benches, bench_browse);
criterion_main!(benches);
