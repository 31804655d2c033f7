use chrono::TimeZone;
use serde_json::Value;

use super::*;
use crate::core::document::MessageElement;
use crate::core::page::Page;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 9).unwrap()
}

fn message(role: Role, content: &str, timestamp: &str) -> ChatMessage {
    ChatMessage {
        role,
        content: content.to_string(),
        timestamp: timestamp.to_string(),
    }
}

fn conversation() -> Vec<ChatMessage> {
    vec![
        message(Role::User, "hi", "10:00:00"),
        message(Role::Bot, "a < b", "10:00:01"),
    ]
}

fn service() -> ExportService {
    ExportService::new("Chat History", "chat")
}

#[test]
fn text_layout() {
    assert_eq!(
        service().to_text(&conversation()),
        "Chat History\n============\n\n\
         [10:00:00] You: hi\n\n\
         [10:00:01] AI: a < b\n\n"
    );
}

#[test]
fn markdown_layout() {
    assert_eq!(
        service().to_markdown(&conversation()),
        "# Chat History\n\n\
         ### You (10:00:00)\n\nhi\n\n---\n\n\
         ### AI (10:00:01)\n\na < b\n\n---\n\n"
    );
}

#[test]
fn html_escapes_content_and_marks_roles() {
    let html = ExportService::new("Q&A", "chat").to_html(&conversation());
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Q&amp;A</title>"));
    assert!(html.contains("<div class=\"message user\">"));
    assert!(html.contains("<div class=\"message bot\">"));
    assert!(html.contains("<div class=\"content\">a &lt; b</div>"));
    assert!(html.contains("<div class=\"role\">AI</div>"));
    assert!(html.ends_with("</body>\n</html>"));
}

#[test]
fn json_layout() {
    let json = service().to_json(&conversation(), now()).unwrap();
    assert!(json.contains("\n  \"title\": \"Chat History\""));
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["timestamp"], "2024-03-09T14:05:09.000Z");
    assert_eq!(value["messages"][0]["role"], "user");
    assert_eq!(value["messages"][1]["role"], "bot");
    assert_eq!(value["messages"][1]["content"], "a < b");
}

#[test]
fn file_names_and_mime_types() {
    let expected = [
        (ExportFormat::Text, "chat-2024-03-09T14-05-09.txt", "text/plain"),
        (ExportFormat::Html, "chat-2024-03-09T14-05-09.html", "text/html"),
        (ExportFormat::Json, "chat-2024-03-09T14-05-09.json", "application/json"),
        (ExportFormat::Markdown, "chat-2024-03-09T14-05-09.md", "text/markdown"),
    ];
    let page = Page::new();
    for (format, filename, mime) in expected {
        let file = service().export_chat(&page, format, now()).unwrap();
        assert_eq!(file.filename, filename);
        assert_eq!(file.mime_type, mime);
    }
}

#[test]
fn format_parsing_accepts_aliases() {
    assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
    assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
    assert!(matches!(
        "pdf".parse::<ExportFormat>(),
        Err(ExportError::UnknownFormat(_))
    ));
}

#[test]
fn messages_come_from_page_text_without_code_headers() {
    let mut page = Page::new();
    page.append_chat_element(ChatElement::Message(MessageElement {
        role: Role::Bot,
        html: crate::core::codeblock::process_message("  Try:\n```js\nlet x = \"<b>\";\n```\n"),
        timestamp: Some("09:00:00".to_string()),
        animated: true,
    }));
    page.append_chat_element(ChatElement::TypingIndicator);

    let messages = messages_from(&page, now());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].timestamp, "09:00:00");
    assert!(messages[0].content.starts_with("Try:\n"));
    assert!(messages[0].content.contains("let x = \"<b>\";"));
    assert!(!messages[0].content.contains("Copy"));
}

#[test]
fn missing_timestamp_uses_local_export_time() {
    let mut page = Page::new();
    page.append_chat_element(ChatElement::Message(MessageElement {
        role: Role::User,
        html: "hello".to_string(),
        timestamp: None,
        animated: false,
    }));
    let expected = format_timestamp(now().with_timezone(&Local).naive_local());
    assert_eq!(messages_from(&page, now())[0].timestamp, expected);
}

#[test]
fn save_in_writes_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut page = Page::new();
    page.append_chat_element(ChatElement::Message(MessageElement {
        role: Role::User,
        html: "hello".to_string(),
        timestamp: Some("08:00:00".to_string()),
        animated: false,
    }));
    let file = service()
        .export_chat(&page, ExportFormat::Text, now())
        .unwrap();
    let path = file.save_in(&tmp.path().join("exports")).unwrap();
    assert_eq!(path.file_name().unwrap(), "chat-2024-03-09T14-05-09.txt");
    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.ends_with("[08:00:00] You: hello\n\n"));
}

#[test]
fn init_adds_export_button_once() {
    let mut page = Page::new();
    service().init(&mut page);
    service().init(&mut page);
    assert_eq!(page.header_buttons().len(), 1);
    assert_eq!(page.header_buttons()[0].id, EXPORT_BUTTON_ID);
}
