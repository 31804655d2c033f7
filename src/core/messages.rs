//! Message presentation: typing indicator, timestamps, processed message elements.

use chrono::NaiveDateTime;

use crate::core::codeblock;
use crate::core::document::{ChatElement, Document, MessageElement};
use crate::core::message::Role;
use crate::core::preferences::Preferences;
use crate::core::styles;

/// Wall-clock format of message timestamps.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

pub fn format_timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEnhancer {
    highlighting: bool,
    auto_scroll: bool,
}

impl Default for MessageEnhancer {
    fn default() -> Self {
        Self {
            highlighting: true,
            auto_scroll: true,
        }
    }
}

impl MessageEnhancer {
    pub fn new(prefs: &Preferences) -> Self {
        let mut enhancer = Self::default();
        enhancer.configure(prefs);
        enhancer
    }

    /// Follow the code highlighting and auto-scroll preferences.
    pub fn configure(&mut self, prefs: &Preferences) {
        self.highlighting = prefs.code_highlighting;
        self.auto_scroll = prefs.auto_scroll;
    }

    pub fn highlighting(&self) -> bool {
        self.highlighting
    }

    /// Install the message styles and timestamp the messages already on the page.
    pub fn init(&self, doc: &mut dyn Document, now: NaiveDateTime) {
        doc.upsert_style(styles::MESSAGE_STYLE_ID, styles::MESSAGE_CSS);
        add_timestamps_to_all(doc, now);
    }

    /// Append the typing indicator unless one is already shown.
    pub fn show_typing_indicator(&self, doc: &mut dyn Document) {
        if doc
            .chat_elements()
            .iter()
            .any(|e| matches!(e, ChatElement::TypingIndicator))
        {
            return;
        }
        doc.append_chat_element(ChatElement::TypingIndicator);
        self.scroll(doc);
    }

    pub fn hide_typing_indicator(&self, doc: &mut dyn Document) {
        if !doc.remove_typing_indicator() {
            log::trace!("No typing indicator to hide");
        }
    }

    /// Render code blocks when highlighting is enabled; otherwise the content is kept as is.
    pub fn process_content(&self, content: &str) -> String {
        if self.highlighting {
            codeblock::process_message(content)
        } else {
            content.to_string()
        }
    }

    pub fn create_message_element(
        &self,
        content: &str,
        is_user: bool,
        now: NaiveDateTime,
    ) -> MessageElement {
        let mut element = MessageElement {
            role: if is_user { Role::User } else { Role::Bot },
            html: self.process_content(content),
            timestamp: None,
            animated: false,
        };
        add_timestamp(&mut element, now);
        element.animated = true;
        element
    }

    /// Create a message element, append it to the chat and return a copy of it.
    pub fn add_message_to_chat(
        &self,
        doc: &mut dyn Document,
        content: &str,
        is_user: bool,
        now: NaiveDateTime,
    ) -> MessageElement {
        let element = self.create_message_element(content, is_user, now);
        doc.append_chat_element(ChatElement::Message(element.clone()));
        self.scroll(doc);
        element
    }

    fn scroll(&self, doc: &mut dyn Document) {
        if self.auto_scroll {
            doc.scroll_chat_to_bottom();
        }
    }
}

/// Stamp `element` with `now` unless it already has a timestamp.
pub fn add_timestamp(element: &mut MessageElement, now: NaiveDateTime) {
    if element.timestamp.is_none() {
        element.timestamp = Some(format_timestamp(now));
    }
}

pub fn add_timestamps_to_all(doc: &mut dyn Document, now: NaiveDateTime) {
    for element in doc.chat_elements_mut() {
        if let ChatElement::Message(message) = element {
            add_timestamp(message, now);
        }
    }
}
