// glowcart/src/managers/mod.rs

//! Collection managers. Each one loads the collections it needs from the
//! store, works on them in memory and writes them back. They share nothing
//! but the `ShopContext`; concurrent writers to one collection are
//! last-write-wins.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod offers;
pub mod orders;
pub mod profile;
pub mod tips;
pub mod wishlist;

pub use admin::{AdminConsole, CustomerSummary, DashboardStats, ProductInput, TopSeller};
pub use cart::CartManager;
pub use catalog::{CatalogManager, ProductQuery, ProductSort};
pub use checkout::{CheckoutData, CheckoutService};
pub use offers::{OfferInput, OfferManager};
pub use orders::{OrderFilter, OrderManager};
pub use profile::{AddressInput, NewUser, ProfileManager, ProfileUpdate};
pub use tips::{TipInput, TipManager};
pub use wishlist::WishlistManager;
