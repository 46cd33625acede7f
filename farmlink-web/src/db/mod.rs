//! Database operations for farmlink-web

pub mod products;
pub mod sessions;
pub mod users;
pub mod videos;
