//! Application identity from Cargo.toml.
//!
//! Single source of truth for the app name and version; the name also prefixes storage keys.

/// Application name (from Cargo.toml `package.name`).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Application version (from Cargo.toml `package.version`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Vendor / organization, used in ProjectDirs.
pub const VENDOR: &str = "polymorphl";
