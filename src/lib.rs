//! Moovies: movie discovery and personal list tracking.
//!
//! The server side proxies a third-party movie catalog and keeps three personal
//! lists per user (favourites, watched, watchlist). The `client` module holds the
//! browser-side list synchronisation and category/search browsing logic.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
