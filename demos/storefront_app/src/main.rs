// storefront_app/src/main.rs

mod config;
mod errors;
mod seed;
mod services;
mod walkthrough;

use crate::config::AppConfig;
use crate::services::link_log::LoggedLinks;
use crate::services::toast_log::ConsoleToasts;

use glowcart::{FileStore, MessagingHandoff, Shop, ShopContext, ShopEvent, Storage};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront demo...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e.into());
    }
  };

  let mut file_store = FileStore::open(&app_config.store_path)?;
  if let Some(quota) = app_config.store_quota_bytes {
    file_store = file_store.with_quota(quota);
  }
  let storage = Storage::new(Arc::new(file_store));

  if app_config.seed_catalog {
    seed::seed_if_empty(&storage)?;
  }

  let links = Arc::new(LoggedLinks::default());
  let ctx = ShopContext::new(storage, app_config.shop_settings()).with_notifier(Arc::new(ConsoleToasts));
  ctx
    .events
    .subscribe(Arc::new(MessagingHandoff::new(app_config.handoff_settings(), links.clone())));
  ctx.events.subscribe(Arc::new(|event: &ShopEvent| {
    tracing::debug!(event = event.name(), "Shop event.");
  }));
  tracing::info!(listeners = ctx.events.listener_count(), "Shop events wired.");

  let shop = Shop::new(ctx)?;
  walkthrough::run(&shop)?;

  for url in links.opened() {
    println!("{}", url);
  }
  tracing::info!(store = %app_config.store_path.display(), "Storefront demo finished.");
  Ok(())
}
