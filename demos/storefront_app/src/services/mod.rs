// storefront_app/src/services/mod.rs

pub mod link_log;
pub mod toast_log;
