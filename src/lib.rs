#![deny(missing_docs)]
//! Link Info Bot
//!
//! A Telegram bot that looks up video links through an oEmbed endpoint and
//! replies with the title, author and thumbnail, plus a liveness endpoint for
//! hosting platforms.

/// Telegram handlers and reply rendering
pub mod bot;
/// Configuration management
pub mod config;
/// URL extraction from message text
pub mod links;
/// Liveness HTTP endpoint
pub mod liveness;
/// oEmbed metadata lookup
pub mod metadata;
/// Process runtime: liveness server plus Telegram dispatcher
pub mod runner;
