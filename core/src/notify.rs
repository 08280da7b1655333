// glowcart/src/notify.rs

//! Transient user notifications ("toasts"). Fire-and-forget.

use std::fmt;

use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Success,
  Warning,
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Severity::Info => "info",
      Severity::Success => "success",
      Severity::Warning => "warning",
      Severity::Error => "error",
    })
  }
}

pub trait Notifier: Send + Sync {
  fn notify(&self, message: &str, severity: Severity);
}

/// Writes notifications to the log. Default for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, message: &str, severity: Severity) {
    match severity {
      Severity::Info | Severity::Success => event!(Level::INFO, %severity, "{}", message),
      Severity::Warning => event!(Level::WARN, %severity, "{}", message),
      Severity::Error => event!(Level::ERROR, %severity, "{}", message),
    }
  }
}
