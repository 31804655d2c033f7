//! CLI commands: render, copy, theme, prefs, export, config.
//!
//! Each command writes plain text to `out`; errors are returned to the binary.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local, Utc};

use crate::core::app;
use crate::core::clipboard::{self, Clipboard, ClipboardError, CopyButton};
use crate::core::codeblock::{self, syntax_style_block};
use crate::core::config::{Config, ConfigError};
use crate::core::document::{ChatElement, Document};
use crate::core::enhancements::Enhancements;
use crate::core::export::{self, ExportError, ExportFormat, ExportService};
use crate::core::message::{self, ConversationError, Role};
use crate::core::messages::MessageEnhancer;
use crate::core::page::Page;
use crate::core::preferences::{PreferenceKey, PreferenceUpdate, PreferencesError};
use crate::core::storage::{FileStorage, StorageError};
use crate::core::styles;
use crate::core::theme::{Theme, ThemeParseError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
    #[error(transparent)]
    Theme(#[from] ThemeParseError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("Failed to read conversation {}: {source}", .path.display())]
    Conversation {
        path: PathBuf,
        source: ConversationError,
    },
}

/// Read a message from `path`, or stdin when it is absent or `-`.
pub fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn enhancements(config: &Config) -> Enhancements<FileStorage> {
    Enhancements::new(config.storage(), ExportService::from_config(config))
}

/// Run the `render` command: print the processed message, or with `page`
/// the whole page with every enhancement applied.
pub fn run_render(
    config: &Config,
    input: &str,
    page: bool,
    now: DateTime<Local>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if !page {
        writeln!(out, "{}", codeblock::process_message(input))?;
        return Ok(());
    }
    let mut doc = Page::with_title(&config.export_title);
    let mut all = enhancements(config);
    all.init(&mut doc, now.naive_local())?;
    all.messages
        .add_message_to_chat(&mut doc, input, false, now.naive_local());
    write!(out, "{}", doc.to_html())?;
    Ok(())
}

/// Run the `copy` command: the original source of code block `index` (0-based)
/// goes to `target`. Returns the copied text.
pub fn run_copy(
    input: &str,
    index: usize,
    target: &mut dyn Clipboard,
) -> Result<String, CliError> {
    let html = codeblock::process_message(input);
    let blocks = clipboard::code_elements(&html);
    let block = blocks.get(index).ok_or(ClipboardError::NoBlock {
        index,
        count: blocks.len(),
    })?;
    let mut button = CopyButton::new();
    let text = button.copy(block, target, Instant::now())?;
    log::debug!("Copy button reads '{}'", button.label(Instant::now()));
    Ok(text)
}

/// Run the `theme` command without arguments: print the saved theme.
pub fn run_theme_show(config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "{}", enhancements(config).theme.current())?;
    Ok(())
}

pub fn run_theme_toggle(config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    let theme = enhancements(config).toggle_theme(&mut Page::new())?;
    writeln!(out, "{}", theme)?;
    Ok(())
}

pub fn run_theme_set(config: &Config, theme: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let theme: Theme = theme.parse()?;
    enhancements(config).set_preference(&mut Page::new(), PreferenceUpdate::Theme(theme))?;
    writeln!(out, "{}", theme)?;
    Ok(())
}

/// Print the code block styles for the saved theme.
pub fn run_theme_css(config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    let theme = enhancements(config).theme.current();
    write!(
        out,
        "{}{}",
        syntax_style_block(theme),
        styles::CODE_BLOCK_CSS
    )?;
    Ok(())
}

pub fn run_prefs_show(config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    let prefs = enhancements(config).preferences.preferences();
    let json = serde_json::to_string_pretty(&prefs).map_err(PreferencesError::from)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

pub fn run_prefs_get(config: &Config, key: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let key: PreferenceKey = key.parse()?;
    let value = enhancements(config).preferences.get(key);
    match value.as_str() {
        Some(s) => writeln!(out, "{}", s)?,
        None => writeln!(out, "{}", value)?,
    }
    Ok(())
}

pub fn run_prefs_set(
    config: &Config,
    key: &str,
    value: &str,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let update = PreferenceUpdate::parse(key, value)?;
    let prefs = enhancements(config).set_preference(&mut Page::new(), update)?;
    writeln!(out, "{} = {}", update.key(), prefs.get(update.key()))?;
    Ok(())
}

pub fn run_prefs_reset(config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    enhancements(config).reset_preferences(&mut Page::new())?;
    writeln!(out, "Preferences reset to defaults")?;
    Ok(())
}

/// Load a conversation file onto a fresh page, as the chat would have shown it.
pub fn conversation_page(
    config: &Config,
    path: &Path,
    now: DateTime<Local>,
) -> Result<Page, CliError> {
    let conversation_error = |source| CliError::Conversation {
        path: path.to_path_buf(),
        source,
    };
    let json = fs::read_to_string(path)?;
    let entries = message::parse_conversation(&json).map_err(conversation_error)?;

    let prefs = enhancements(config).preferences.preferences();
    let enhancer = MessageEnhancer::new(&prefs);
    let mut page = Page::with_title(&config.export_title);
    for entry in entries {
        let is_user = entry.role == Role::User;
        let mut element =
            enhancer.create_message_element(&entry.content, is_user, now.naive_local());
        if entry.timestamp.is_some() {
            element.timestamp = entry.timestamp;
        }
        page.append_chat_element(ChatElement::Message(element));
    }
    Ok(page)
}

/// Run the `export` command. Returns the path of the written file.
pub fn run_export(
    config: &Config,
    conversation: &Path,
    format: &str,
    out_dir: Option<&Path>,
    open: bool,
    out: &mut dyn Write,
) -> Result<PathBuf, CliError> {
    let format: ExportFormat = format.parse()?;
    let now = Utc::now();
    let page = conversation_page(config, conversation, now.with_timezone(&Local))?;
    let file = ExportService::from_config(config).export_chat(&page, format, now)?;
    let dir = out_dir.unwrap_or(&config.export_dir);
    let path = file.save_in(dir)?;
    writeln!(out, "{}", path.display())?;
    if open {
        export::open(&path)?;
    }
    Ok(path)
}

/// Run the `config` command: display paths and export settings.
pub fn run_config(config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    let storage = config.storage();
    writeln!(out, "Version:      {} {}", app::NAME, app::VERSION)?;
    writeln!(out, "Data:         {}", config.data_dir.display())?;
    writeln!(out, "Storage:      {}", storage.path().display())?;
    writeln!(out, "Exports:      {}", config.export_dir.display())?;
    writeln!(out, "Export title: {}", config.export_title)?;
    writeln!(out, "File prefix:  {}", config.file_prefix)?;
    let formats: Vec<_> = ExportFormat::ALL.iter().map(|f| f.as_str()).collect();
    writeln!(out, "Formats:      {}", formats.join(", "))?;
    Ok(())
}
