//! Decora
//!
//! Business logic for a decoration storefront: catalog search, a cart with a
//! single coupon slot, one pricing function shared by the cart summary and
//! checkout, a four step checkout that places orders, order tracking,
//! notifications, a mock session, and wallpaper and curtain calculators.

pub mod auth;
pub mod calculator;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod notifications;
pub mod observability;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod reports;
pub mod room;
pub mod storage;
