//! Chat history export as text, HTML, JSON or Markdown.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;

use crate::core::codeblock::escape_html;
use crate::core::config::{Config, DEFAULT_EXPORT_TITLE, DEFAULT_FILE_PREFIX};
use crate::core::document::{ChatElement, Document, HeaderButton};
use crate::core::message::{ChatMessage, Role};
use crate::core::messages::format_timestamp;

/// Id of the header export button.
pub const EXPORT_BUTTON_ID: &str = "export-button";

const HTML_EXPORT_CSS: &str = "\
        body { font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; color: #333; }
        h1 { color: #3498db; text-align: center; border-bottom: 2px solid #3498db; padding-bottom: 10px; }
        .message { margin-bottom: 20px; padding: 15px; border-radius: 10px; }
        .user { background-color: #e1f5fe; margin-left: 50px; }
        .bot { background-color: #f0f0f0; margin-right: 50px; }
        .timestamp { font-size: 0.8rem; color: #888; text-align: right; margin-top: 5px; }
        .role { font-weight: bold; margin-bottom: 5px; }
        .user .role { color: #2980b9; }
        .bot .role { color: #27ae60; }
        .content { white-space: pre-wrap; }
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Html,
    Json,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Text,
        ExportFormat::Html,
        ExportFormat::Json,
        ExportFormat::Markdown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Html => "text/html",
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "html" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unknown export format '{0}' (expected text, html, json or markdown)")]
    UnknownFormat(String),
    #[error("Failed to encode export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: opener::OpenError,
    },
}

/// A rendered export, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub content: String,
    pub filename: String,
    pub mime_type: &'static str,
}

impl ExportFile {
    /// Write the file into `dir` (created if missing). Returns its path.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)?;
        log::info!("Exported {} ({})", path.display(), self.mime_type);
        Ok(path)
    }
}

/// Open a saved export with the system handler.
pub fn open(path: &Path) -> Result<(), ExportError> {
    opener::open(path).map_err(|source| ExportError::Open {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Serialize)]
struct JsonExport<'a> {
    title: &'a str,
    timestamp: String,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportService {
    title: String,
    file_prefix: String,
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_TITLE, DEFAULT_FILE_PREFIX)
    }
}

impl ExportService {
    pub fn new(title: impl Into<String>, file_prefix: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_prefix: file_prefix.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.export_title, &config.file_prefix)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add the header export button if the page has none.
    pub fn init(&self, doc: &mut dyn Document) {
        if !doc.has_element(EXPORT_BUTTON_ID) {
            doc.add_header_button(HeaderButton {
                id: EXPORT_BUTTON_ID.to_string(),
                class: None,
                icon: "💾".to_string(),
                label: "Export chat history".to_string(),
            });
        }
    }

    pub fn to_text(&self, messages: &[ChatMessage]) -> String {
        let mut text = format!(
            "{}\n{}\n\n",
            self.title,
            "=".repeat(self.title.chars().count())
        );
        for message in messages {
            text.push_str(&format!(
                "[{}] {}: {}\n\n",
                message.timestamp,
                message.role.display_name(),
                message.content
            ));
        }
        text
    }

    pub fn to_html(&self, messages: &[ChatMessage]) -> String {
        let title = escape_html(&self.title);
        let mut html = format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n    \
             <meta charset=\"UTF-8\">\n    \
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
             <title>{title}</title>\n    \
             <style>\n{HTML_EXPORT_CSS}    </style>\n\
             </head>\n\
             <body>\n    \
             <h1>{title}</h1>"
        );
        for message in messages {
            let class = match message.role {
                Role::User => "user",
                Role::Bot => "bot",
            };
            html.push_str(&format!(
                "\n    <div class=\"message {class}\">\n        \
                 <div class=\"role\">{}</div>\n        \
                 <div class=\"content\">{}</div>\n        \
                 <div class=\"timestamp\">{}</div>\n    \
                 </div>",
                message.role.display_name(),
                escape_html(&message.content),
                escape_html(&message.timestamp),
            ));
        }
        html.push_str("\n</body>\n</html>");
        html
    }

    pub fn to_json(&self, messages: &[ChatMessage], now: DateTime<Utc>) -> Result<String, ExportError> {
        let export = JsonExport {
            title: &self.title,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            messages,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    pub fn to_markdown(&self, messages: &[ChatMessage]) -> String {
        let mut markdown = format!("# {}\n\n", self.title);
        for message in messages {
            markdown.push_str(&format!(
                "### {} ({})\n\n{}\n\n---\n\n",
                message.role.display_name(),
                message.timestamp,
                message.content
            ));
        }
        markdown
    }

    /// `<prefix>-<YYYY-MM-DDTHH-MM-SS>.<ext>`, time in UTC.
    pub fn filename(&self, format: ExportFormat, now: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            self.file_prefix,
            now.format("%Y-%m-%dT%H-%M-%S"),
            format.extension()
        )
    }

    /// Render every message on the page in `format`.
    pub fn export_chat(
        &self,
        doc: &dyn Document,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<ExportFile, ExportError> {
        let messages = messages_from(doc, now);
        let content = match format {
            ExportFormat::Text => self.to_text(&messages),
            ExportFormat::Html => self.to_html(&messages),
            ExportFormat::Json => self.to_json(&messages, now)?,
            ExportFormat::Markdown => self.to_markdown(&messages),
        };
        log::debug!("Exporting {} messages as {}", messages.len(), format);
        Ok(ExportFile {
            content,
            filename: self.filename(format, now),
            mime_type: format.mime_type(),
        })
    }
}

/// Chat messages on the page: trimmed text content, with the element's
/// timestamp or the local time of `now`.
pub fn messages_from(doc: &dyn Document, now: DateTime<Utc>) -> Vec<ChatMessage> {
    let fallback = format_timestamp(now.with_timezone(&Local).naive_local());
    doc.chat_elements()
        .iter()
        .filter_map(|element| match element {
            ChatElement::Message(message) => Some(ChatMessage {
                role: message.role,
                content: message.text_content().trim().to_string(),
                timestamp: message
                    .timestamp
                    .clone()
                    .unwrap_or_else(|| fallback.clone()),
            }),
            ChatElement::TypingIndicator => None,
        })
        .collect()
}

#[cfg(test)]
mod tests;
