//! # Matchday Gateway
//! Minimal HTTP surface: health checks plus the channel-binding admin route.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
