//! Copy control of rendered code blocks.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;

use crate::core::codeblock::text_content;

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
/// Class carried by the button while it shows [`COPIED_LABEL`].
pub const COPIED_CLASS: &str = "copied";
/// How long the button shows [`COPIED_LABEL`] after the latest copy.
pub const COPIED_DURATION: Duration = Duration::from_secs(2);

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<code\b[^>]*>(.*?)</code>").expect("Invalid code regex"));

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(#[from] arboard::Error),
    #[error("Failed to write copied text: {0}")]
    Io(#[from] std::io::Error),
    #[error("No code element in block")]
    NoCode,
    #[error("No code block #{index} (message has {count})")]
    NoBlock { index: usize, count: usize },
}

/// Destination of copied text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner.set_text(text.to_string())?;
        Ok(())
    }
}

/// Text content of the first `<code>` element in `block_html`: span tags
/// stripped, entities decoded. For a rendered block this is the original body.
pub fn code_text(block_html: &str) -> Option<String> {
    CODE_RE
        .captures(block_html)
        .and_then(|caps| caps.get(1))
        .map(|m| text_content(m.as_str()))
}

/// Every `<code>` element of `html` (markup included), in document order.
pub fn code_elements(html: &str) -> Vec<&str> {
    CODE_RE.find_iter(html).map(|m| m.as_str()).collect()
}

/// State of one block's copy button.
#[derive(Debug, Clone, Default)]
pub struct CopyButton {
    copied_until: Option<Instant>,
}

impl CopyButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the code of `block_html` and switch to the copied state until
    /// [`COPIED_DURATION`] after `now`. A failed copy leaves the state unchanged.
    pub fn copy(
        &mut self,
        block_html: &str,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<String, ClipboardError> {
        let text = code_text(block_html).ok_or(ClipboardError::NoCode)?;
        clipboard.set_text(&text)?;
        self.copied_until = Some(now + COPIED_DURATION);
        log::debug!("Copied {} bytes of code", text.len());
        Ok(text)
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_copied(now) {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// Button class list at `now`.
    pub fn class_list(&self, now: Instant) -> String {
        let mut classes = String::from("copy-code-button");
        if self.is_copied(now) {
            classes.push(' ');
            classes.push_str(COPIED_CLASS);
        }
        classes
    }
}
