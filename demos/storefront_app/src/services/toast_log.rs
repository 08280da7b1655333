// storefront_app/src/services/toast_log.rs

use glowcart::{Notifier, Severity};
use tracing::{info, warn};

/// Prints notifications the way the storefront would toast them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleToasts;

impl Notifier for ConsoleToasts {
  fn notify(&self, message: &str, severity: Severity) {
    match severity {
      Severity::Info | Severity::Success => info!(target: "toast", %severity, "{}", message),
      Severity::Warning | Severity::Error => warn!(target: "toast", %severity, "{}", message),
    }
  }
}
