// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use glowcart::managers::NewUser;
use glowcart::models::{Category, Product, ProductStatus, User};
use glowcart::store::KeyWrite;
use glowcart::{
  Collection, EventListener, MemoryStore, Notifier, RecordStore, Severity, Shop, ShopContext, ShopEvent,
  ShopSettings, Storage, StoreResult,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::Level;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Collaborator doubles ---
#[derive(Default)]
pub struct RecordingNotifier {
  pub messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
  pub fn severities(&self) -> Vec<Severity> {
    self.messages.lock().iter().map(|(_, s)| *s).collect()
  }

  pub fn last(&self) -> Option<(String, Severity)> {
    self.messages.lock().last().cloned()
  }

  pub fn clear(&self) {
    self.messages.lock().clear();
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&self, message: &str, severity: Severity) {
    self.messages.lock().push((message.to_string(), severity));
  }
}

#[derive(Default)]
pub struct RecordingListener {
  pub events: Mutex<Vec<ShopEvent>>,
}

impl RecordingListener {
  pub fn names(&self) -> Vec<&'static str> {
    self.events.lock().iter().map(ShopEvent::name).collect()
  }

  pub fn clear(&self) {
    self.events.lock().clear();
  }
}

impl EventListener for RecordingListener {
  fn on_event(&self, event: &ShopEvent) {
    self.events.lock().push(event.clone());
  }
}

/// Memory store whose writes can be made to fail on demand.
#[derive(Default)]
pub struct FlakyStore {
  pub inner: MemoryStore,
  pub fail_writes: AtomicBool,
}

impl FlakyStore {
  pub fn set_failing(&self, failing: bool) {
    self.fail_writes.store(failing, Ordering::SeqCst);
  }
}

impl RecordStore for FlakyStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    self.inner.get(key)
  }

  fn write_batch(&self, writes: Vec<KeyWrite>) -> StoreResult<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk unplugged").into());
    }
    self.inner.write_batch(writes)
  }

  fn keys(&self) -> StoreResult<Vec<String>> {
    self.inner.keys()
  }
}

// --- Fixtures ---
pub fn product(id: &str, name: &str, category: Category, price: i64, original: Option<i64>, stock: u32) -> Product {
  let mut p = Product {
    id: id.to_string(),
    name: name.to_string(),
    description: Some(format!("{} by Glow", name)),
    category,
    price: Decimal::from(price),
    original_price: original.map(Decimal::from),
    discount: None,
    stock,
    status: ProductStatus::InStock,
    featured: false,
    rating: 4.0,
    review_count: 10,
    tags: BTreeSet::new(),
    sku: id.to_uppercase(),
    image: None,
    created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
  };
  p.normalize();
  p
}

/// p1 lipstick on sale (170 from 200, stock 10), p2 hair oil (120, stock 3),
/// p3 serum sold out, p4 featured perfume on sale.
pub fn fixture_catalog() -> Vec<Product> {
  let mut p1 = product("p1", "Velvet Lipstick", Category::Lips, 170, Some(200), 10);
  p1.tags = ["matte".to_string(), "red".to_string()].into_iter().collect();
  p1.rating = 4.6;
  let mut p2 = product("p2", "Argan Hair Oil", Category::Hair, 120, None, 3);
  p2.tags = ["argan".to_string()].into_iter().collect();
  p2.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
  let p3 = product("p3", "Rose Face Serum", Category::Face, 250, None, 0);
  let mut p4 = product("p4", "Oud Perfume", Category::Perfumes, 480, Some(600), 8);
  p4.featured = true;
  p4.rating = 4.9;
  vec![p1, p2, p3, p4]
}

pub fn customer_input(name: &str, email: &str) -> NewUser {
  NewUser {
    name: name.to_string(),
    email: email.to_string(),
    phone: "+212 600 000 000".to_string(),
    password: "secret123".to_string(),
  }
}

pub struct TestShop {
  pub shop: Shop,
  pub storage: Storage,
  pub notifier: Arc<RecordingNotifier>,
  pub listener: Arc<RecordingListener>,
}

impl TestShop {
  pub fn ctx(&self) -> &ShopContext {
    self.shop.context()
  }

  /// Registers and signs in a customer.
  pub fn sign_in_customer(&self) -> User {
    let input = customer_input("Amal", "amal@example.ma");
    let password = input.password.clone();
    let user = self.shop.profile().register(input).expect("register customer");
    self.shop.profile().login(&user.email, &password).expect("login customer")
  }

  /// Bootstraps and signs in the shop admin.
  pub fn sign_in_admin(&self) -> User {
    let input = customer_input("Admin", "admin@glow.ma");
    let password = input.password.clone();
    let admin = self
      .shop
      .profile()
      .bootstrap_admin(input)
      .expect("bootstrap admin")
      .expect("no admin yet");
    self.shop.profile().login(&admin.email, &password).expect("login admin")
  }

  pub fn products(&self) -> Vec<Product> {
    self.storage.load(Collection::Products).expect("products readable")
  }

  pub fn stock_of(&self, product_id: &str) -> u32 {
    self
      .products()
      .into_iter()
      .find(|p| p.id == product_id)
      .map(|p| p.stock)
      .expect("product present")
  }
}

pub fn shop_on(backend: Arc<dyn RecordStore>) -> TestShop {
  setup_tracing();
  let storage = Storage::new(backend);
  storage
    .save(Collection::Products, &fixture_catalog())
    .expect("seed catalog");
  let notifier = Arc::new(RecordingNotifier::default());
  let listener = Arc::new(RecordingListener::default());
  let ctx = ShopContext::new(storage.clone(), ShopSettings::default()).with_notifier(notifier.clone());
  ctx.events.subscribe(listener.clone());
  let shop = Shop::new(ctx).expect("checkout pipeline wires up");
  TestShop {
    shop,
    storage,
    notifier,
    listener,
  }
}

/// A shop over a fresh in-memory store seeded with `fixture_catalog`.
pub fn test_shop() -> TestShop {
  shop_on(Arc::new(MemoryStore::new()))
}
