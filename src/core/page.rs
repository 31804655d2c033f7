//! In-memory page: the [`Document`] implementation used by the CLI and tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::codeblock::escape_html;
use crate::core::document::{CHAT_CONTAINER_ID, ChatElement, Document, HeaderButton};

#[derive(Debug, Clone, Default)]
pub struct Page {
    title: String,
    body_classes: BTreeSet<String>,
    meta: BTreeMap<String, String>,
    root_properties: BTreeMap<String, String>,
    /// Style elements in insertion order, `(id, css)`.
    styles: Vec<(String, String)>,
    header_buttons: Vec<HeaderButton>,
    chat: Vec<ChatElement>,
    /// Number of chat elements visible when the chat was last scrolled to the bottom.
    scrolled_to: usize,
}

impl Page {
    pub fn new() -> Self {
        Self::with_title("Chat")
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    pub fn root_property(&self, name: &str) -> Option<&str> {
        self.root_properties.get(name).map(String::as_str)
    }

    pub fn style(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(style_id, _)| style_id == id)
            .map(|(_, css)| css.as_str())
    }

    pub fn header_buttons(&self) -> &[HeaderButton] {
        &self.header_buttons
    }

    /// Whether the last chat element was in view after the latest scroll.
    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scrolled_to == self.chat.len()
    }

    /// Render the whole page as a standalone HTML document.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        for (name, content) in &self.meta {
            html.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                escape_html(name),
                escape_html(content)
            ));
        }
        html.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        if !self.root_properties.is_empty() {
            html.push_str("<style id=\"root-properties\">\n:root {");
            for (name, value) in &self.root_properties {
                html.push_str(&format!(" {}: {};", name, value));
            }
            html.push_str(" }\n</style>\n");
        }
        for (id, css) in &self.styles {
            html.push_str(&format!("<style id=\"{}\">\n{}</style>\n", escape_html(id), css));
        }
        html.push_str("</head>\n");

        let classes: Vec<&str> = self.body_classes.iter().map(String::as_str).collect();
        html.push_str(&format!("<body class=\"{}\">\n<header>\n", classes.join(" ")));
        for button in &self.header_buttons {
            let class = button
                .class
                .as_deref()
                .map(|c| format!(" class=\"{}\"", escape_html(c)))
                .unwrap_or_default();
            let label = escape_html(&button.label);
            html.push_str(&format!(
                "<button id=\"{}\"{} aria-label=\"{label}\" title=\"{label}\">{}</button>\n",
                escape_html(&button.id),
                class,
                button.icon,
            ));
        }
        html.push_str(&format!("</header>\n<div id=\"{CHAT_CONTAINER_ID}\">\n"));
        for element in &self.chat {
            html.push_str(&element.to_html());
            html.push('\n');
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

impl Document for Page {
    fn set_body_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            self.body_classes.insert(class.to_string());
        } else {
            self.body_classes.remove(class);
        }
    }

    fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    fn set_meta(&mut self, name: &str, content: &str) {
        self.meta.insert(name.to_string(), content.to_string());
    }

    fn set_root_property(&mut self, name: &str, value: &str) {
        self.root_properties
            .insert(name.to_string(), value.to_string());
    }

    fn upsert_style(&mut self, id: &str, css: &str) {
        match self.styles.iter_mut().find(|(style_id, _)| style_id == id) {
            Some((_, existing)) => *existing = css.to_string(),
            None => self.styles.push((id.to_string(), css.to_string())),
        }
    }

    fn has_element(&self, id: &str) -> bool {
        self.header_buttons.iter().any(|b| b.id == id)
            || self.styles.iter().any(|(style_id, _)| style_id == id)
            || id == CHAT_CONTAINER_ID
    }

    fn add_header_button(&mut self, button: HeaderButton) {
        self.header_buttons.push(button);
    }

    fn set_button_label(&mut self, id: &str, label: &str) {
        if let Some(button) = self.header_buttons.iter_mut().find(|b| b.id == id) {
            button.label = label.to_string();
        }
    }

    fn chat_elements(&self) -> &[ChatElement] {
        &self.chat
    }

    fn chat_elements_mut(&mut self) -> &mut [ChatElement] {
        &mut self.chat
    }

    fn append_chat_element(&mut self, element: ChatElement) {
        self.chat.push(element);
    }

    fn remove_typing_indicator(&mut self) -> bool {
        let before = self.chat.len();
        self.chat
            .retain(|e| !matches!(e, ChatElement::TypingIndicator));
        self.scrolled_to = self.scrolled_to.min(self.chat.len());
        before != self.chat.len()
    }

    fn scroll_chat_to_bottom(&mut self) {
        self.scrolled_to = self.chat.len();
    }
}
