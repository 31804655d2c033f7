//! Fenced code blocks in chat messages: extraction, classification,
//! escaping, highlighting and the rendered container.
//!
//! ```text
//! message -> fenced block -> Language::resolve (tag only) -> escape_html
//!         -> highlight -> container template, substituted in place
//! ```

mod escape;
mod highlight;
mod language;
mod palette;
mod rules;

pub use escape::{decode_html, escape_html, text_content};
pub use highlight::{TokenKind, TokenSpan, highlight};
pub use language::Language;
pub use palette::{SYNTAX_STYLE_ID, syntax_style_block, token_color};

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::document::Document;
use crate::core::styles;
use crate::core::theme::Theme;

/// Label shown when a fence carries no language tag.
pub const PLAINTEXT_LABEL: &str = "plaintext";

/// Three backticks, optional tag, newline, shortest body, three backticks.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9#]+)?\n(.*?)```").expect("Invalid fence regex")
});

/// A fenced block as authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language_tag: Option<String>,
    pub body: String,
}

impl CodeBlock {
    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            language_tag: caps.get(1).map(|m| m.as_str().to_string()),
            body: caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
        }
    }

    /// Header label: the trimmed tag, or `plaintext` without one.
    pub fn label(&self) -> &str {
        self.language_tag
            .as_deref()
            .map(str::trim)
            .unwrap_or(PLAINTEXT_LABEL)
    }

    /// Language used for highlighting. `None` without a tag: the classifier is skipped.
    pub fn language(&self) -> Option<Language> {
        self.language_tag.as_deref().map(Language::resolve)
    }

    /// Escaped and highlighted body.
    pub fn highlighted(&self) -> String {
        highlight(&escape_html(&self.body), self.language())
    }
}

/// Heuristic for already-rendered content: any `<pre` or `<code` substring.
///
/// A message that merely mentions those strings is also left alone.
pub fn contains_rendered_markup(message: &str) -> bool {
    message.contains("<pre") || message.contains("<code")
}

/// Replace every fenced block of `message` with its rendered container.
/// Text outside the fences is left untouched.
pub fn process_message(message: &str) -> String {
    if contains_rendered_markup(message) {
        log::debug!("Message already contains block markup; skipping code block processing");
        return message.to_string();
    }
    FENCE_RE
        .replace_all(message, |caps: &Captures<'_>| {
            render_block(&CodeBlock::from_captures(caps))
        })
        .into_owned()
}

/// Fenced blocks of `message`, left to right, bodies verbatim.
pub fn extract_blocks(message: &str) -> Vec<CodeBlock> {
    FENCE_RE
        .captures_iter(message)
        .map(|caps| CodeBlock::from_captures(&caps))
        .collect()
}

/// Container markup for one block: header with label and copy control, then the code.
pub fn render_block(block: &CodeBlock) -> String {
    let label = escape_html(block.label());
    format!(
        "<div class=\"code-block\">\n    \
         <div class=\"code-header\">\n        \
         <span class=\"code-language\">{label}</span>\n        \
         <button class=\"copy-code-button\" type=\"button\">Copy</button>\n    \
         </div>\n    \
         <pre><code class=\"language-{label}\">{code}</code></pre>\n\
         </div>",
        code = block.highlighted(),
    )
}

/// Theme currently shown by the document: `dark` body class, else light.
pub fn document_theme(doc: &dyn Document) -> Theme {
    if doc.has_body_class(Theme::Dark.as_str()) {
        Theme::Dark
    } else {
        Theme::Light
    }
}

/// Install the block layout styles and the token colors for `theme`.
pub fn install_styles(doc: &mut dyn Document, theme: Theme) {
    apply_theme_colors(doc, theme);
    doc.upsert_style(styles::CODE_BLOCK_STYLE_ID, styles::CODE_BLOCK_CSS);
}

/// Regenerate the token color style block.
pub fn apply_theme_colors(doc: &mut dyn Document, theme: Theme) {
    log::debug!("Applying {} syntax colors", theme);
    doc.upsert_style(SYNTAX_STYLE_ID, &syntax_style_block(theme));
}
