// storefront_app/src/services/link_log.rs

//! Stands in for the browser: records and logs outbound messaging links
//! instead of opening them.

use glowcart::LinkSink;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Default)]
pub struct LoggedLinks {
  opened: Mutex<Vec<String>>,
}

impl LoggedLinks {
  pub fn opened(&self) -> Vec<String> {
    self.opened.lock().map(|links| links.clone()).unwrap_or_default()
  }
}

impl LinkSink for LoggedLinks {
  fn open(&self, url: &str) {
    info!(url, "Opening order handoff link.");
    if let Ok(mut links) = self.opened.lock() {
      links.push(url.to_string());
    }
  }
}
