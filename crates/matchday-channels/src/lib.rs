//! # Matchday Channels
//! Notification sink implementations.

pub mod discord;

pub use discord::DiscordSink;
