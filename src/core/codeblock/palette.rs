//! Token colors per theme and the style block generated from them.

use crate::core::theme::Theme;

use super::highlight::TokenKind;

/// Style element id holding the token colors.
pub const SYNTAX_STYLE_ID: &str = "code-highlight-styles";

const LIGHT: [(TokenKind, &str); 9] = [
    (TokenKind::Keyword, "#0077aa"),
    (TokenKind::String, "#669900"),
    (TokenKind::Number, "#aa5500"),
    (TokenKind::Comment, "#999999"),
    (TokenKind::Function, "#3311bb"),
    (TokenKind::Operator, "#ff3300"),
    (TokenKind::Variable, "#0055aa"),
    (TokenKind::Property, "#7d2727"),
    (TokenKind::Punctuation, "#666666"),
];

const DARK: [(TokenKind, &str); 9] = [
    (TokenKind::Keyword, "#569cd6"),
    (TokenKind::String, "#ce9178"),
    (TokenKind::Number, "#b5cea8"),
    (TokenKind::Comment, "#6a9955"),
    (TokenKind::Function, "#dcdcaa"),
    (TokenKind::Operator, "#d4d4d4"),
    (TokenKind::Variable, "#9cdcfe"),
    (TokenKind::Property, "#4ec9b0"),
    (TokenKind::Punctuation, "#d4d4d4"),
];

/// Color of `kind` under `theme`.
pub fn token_color(theme: Theme, kind: TokenKind) -> &'static str {
    let table = match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    };
    table
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, color)| *color)
        .unwrap_or("inherit")
}

/// One `.code-KIND { color: ...; }` rule per token kind.
pub fn syntax_style_block(theme: Theme) -> String {
    TokenKind::ALL
        .iter()
        .map(|kind| {
            format!(
                ".{} {{ color: {}; }}\n",
                kind.class_name(),
                token_color(theme, *kind)
            )
        })
        .collect()
}
