//! NightBox storefront library.
//!
//! A small night-time food delivery storefront: product catalog, account
//! registration and login, and a per-user cart, served as server-rendered
//! HTML. The crate exposes the application as a library so the binary, the
//! CLI and the integration tests all build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
