//! # chat-enhance
//!
//! Enhancement modules for a chat interface: fenced code-block rendering
//! with syntax highlighting, light/dark theming, message helpers (timestamps,
//! typing indicator), chat export and persisted preferences.
//!
//! Everything UI-facing goes through [`core::document::Document`]; the
//! in-memory [`core::page::Page`] implements it and renders itself as HTML.

pub mod core;
