pub mod app;
pub mod cli;
pub mod clipboard;
pub mod codeblock;
pub mod config;
pub mod document;
pub mod enhancements;
pub mod export;
pub mod message;
pub mod messages;
pub mod page;
pub mod paths;
pub mod preferences;
pub mod storage;
pub mod styles;
pub mod theme;
