//! # Matchday Source
//! Fixture data clients. Currently one backend: api-football v3.

pub mod api_football;

pub use api_football::ApiFootballClient;
