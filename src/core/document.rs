//! Document interface the enhancement services act on, and the elements it holds.
//!
//! Services never reach for ambient UI state: every operation receives the
//! document explicitly. [`crate::core::page::Page`] is the in-memory implementation.

use crate::core::codeblock::{escape_html, text_content};
use crate::core::message::Role;

/// Id of the chat container element.
pub const CHAT_CONTAINER_ID: &str = "chat-messages";

/// Class carried by a message's timestamp element.
pub const TIMESTAMP_CLASS: &str = "message-timestamp";

/// Class added to freshly created messages.
pub const ANIMATION_CLASS: &str = "message-animation";

/// A button placed in the page header (theme toggle, preferences, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderButton {
    pub id: String,
    pub class: Option<String>,
    pub icon: String,
    /// Used for both `aria-label` and `title`.
    pub label: String,
}

/// One chat message as shown in the chat container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageElement {
    pub role: Role,
    /// Inner HTML (processed message content).
    pub html: String,
    pub timestamp: Option<String>,
    pub animated: bool,
}

impl MessageElement {
    /// Space-separated class list of the element.
    pub fn class_list(&self) -> String {
        let mut classes = format!("message {}", self.role.message_class());
        if self.animated {
            classes.push(' ');
            classes.push_str(ANIMATION_CLASS);
        }
        classes
    }

    /// Message text without markup. Code block headers (label and copy
    /// control) are left out so only the code itself remains.
    pub fn text_content(&self) -> String {
        let mut html = self.html.as_str();
        let mut kept = String::with_capacity(html.len());
        while let Some(start) = html.find("<div class=\"code-header\">") {
            kept.push_str(&html[..start]);
            let after = &html[start..];
            match after.find("</div>") {
                Some(end) => html = &after[end + "</div>".len()..],
                None => {
                    html = "";
                    break;
                }
            }
        }
        kept.push_str(html);
        text_content(&kept)
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<div class=\"{}\">{}", self.class_list(), self.html);
        if let Some(ts) = &self.timestamp {
            out.push_str(&format!(
                "<div class=\"{TIMESTAMP_CLASS}\">{}</div>",
                escape_html(ts)
            ));
        }
        out.push_str("</div>");
        out
    }
}

/// Children of the chat container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatElement {
    Message(MessageElement),
    TypingIndicator,
}

impl ChatElement {
    pub fn to_html(&self) -> String {
        match self {
            ChatElement::Message(message) => message.to_html(),
            ChatElement::TypingIndicator => "<div class=\"typing-indicator-container\">\n    \
                 <div class=\"message bot-message\">\n        \
                 <div class=\"typing-indicator\"><span></span><span></span><span></span></div>\n    \
                 </div>\n\
                 </div>"
                .to_string(),
        }
    }
}

/// Operations the enhancement services perform on the page.
pub trait Document {
    /// Add (`enabled`) or remove a class on the body.
    fn set_body_class(&mut self, class: &str, enabled: bool);
    fn has_body_class(&self, class: &str) -> bool;

    /// Set the content of `<meta name="...">`.
    fn set_meta(&mut self, name: &str, content: &str);

    /// Set a custom property on the root element (e.g. `--font-size-factor`).
    fn set_root_property(&mut self, name: &str, value: &str);

    /// Create or replace the style element with this id.
    fn upsert_style(&mut self, id: &str, css: &str);

    /// Whether an element (header button, style) with this id exists.
    fn has_element(&self, id: &str) -> bool;

    fn add_header_button(&mut self, button: HeaderButton);

    /// Update `aria-label` and `title` of a header button. Unknown ids are ignored.
    fn set_button_label(&mut self, id: &str, label: &str);

    fn chat_elements(&self) -> &[ChatElement];
    fn chat_elements_mut(&mut self) -> &mut [ChatElement];
    fn append_chat_element(&mut self, element: ChatElement);

    /// Remove the typing indicator. Returns whether one was present.
    fn remove_typing_indicator(&mut self) -> bool;

    fn scroll_chat_to_bottom(&mut self);
}
