use std::collections::BTreeSet;

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use glowcart::managers::cart::total_of;
use glowcart::managers::NewUser;
use glowcart::models::{CartItem, Category, Product, ProductStatus};
use glowcart::{Collection, ProductQuery, ProductSort, Shop};
use rust_decimal::Decimal;

// --- Helpers ---

fn catalog(size: usize) -> Vec<Product> {
  (0..size)
    .map(|i| {
      let mut p = Product {
        id: format!("p{}", i),
        name: format!("Product {}", i),
        description: Some("Hydrating everyday formula".to_string()),
        category: Category::ALL[i % Category::ALL.len()],
        price: Decimal::from(50 + (i % 400) as i64),
        original_price: (i % 3 == 0).then(|| Decimal::from(500)),
        discount: None,
        stock: (i % 20) as u32,
        status: ProductStatus::InStock,
        featured: i % 10 == 0,
        rating: (i % 50) as f32 / 10.0,
        review_count: i as u32,
        tags: BTreeSet::from(["vegan".to_string()]),
        sku: format!("SKU{}", i),
        image: None,
        created_at: Utc::now(),
      };
      p.normalize();
      p
    })
    .collect()
}

fn seeded_shop(size: usize) -> Shop {
  let shop = Shop::in_memory().unwrap();
  shop
    .context()
    .storage
    .save(Collection::Products, &catalog(size))
    .unwrap();
  shop
}

// --- Benchmark Functions ---

fn bench_catalog_query(c: &mut Criterion) {
  let mut group = c.benchmark_group("CatalogQuery");
  for size in [100usize, 1_000, 5_000] {
    let shop = seeded_shop(size);
    let query = ProductQuery::new()
      .search("product 1")
      .in_stock_only()
      .sort(ProductSort::PriceLowHigh)
      .limit(24);
    group.throughput(Throughput::Elements(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &query, |b, q| {
      b.iter(|| shop.catalog().query(q))
    });
  }
  group.finish();
}

fn bench_cart_total(c: &mut Criterion) {
  let mut group = c.benchmark_group("CartTotal");
  for lines in [1usize, 10, 100] {
    let items: Vec<CartItem> = catalog(lines)
      .iter()
      .map(|p| CartItem::from_product(p, 2))
      .collect();
    group.bench_with_input(BenchmarkId::from_parameter(lines), &items, |b, items| {
      b.iter(|| total_of(items))
    });
  }
  group.finish();
}

fn bench_checkout(c: &mut Criterion) {
  let mut group = c.benchmark_group("Checkout");
  for catalog_size in [100usize, 1_000] {
    group.bench_function(BenchmarkId::from_parameter(catalog_size), |b| {
      b.iter_batched(
        || {
          let shop = seeded_shop(catalog_size);
          let profile = shop.profile();
          let user = profile
            .register(NewUser {
              name: "Bench".to_string(),
              email: "bench@example.ma".to_string(),
              phone: String::new(),
              password: "benchmark".to_string(),
            })
            .unwrap();
          profile.login(&user.email, "benchmark").unwrap();
          for id in ["p1", "p2", "p5", "p7"] {
            shop.cart().add_to_cart(id, 1).unwrap();
          }
          shop
        },
        |shop| shop.checkout().checkout().unwrap(),
        BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

criterion_group!(benches, bench_catalog_query, bench_cart_total, bench_checkout);
criterion_main!(benches);
