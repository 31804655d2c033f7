//! Per-language rule tables. Patterns run over escaped text, so quotes and
//! angle brackets appear as `&quot;`, `&#039;`, `&lt;` and `&gt;`.

use std::sync::LazyLock;

use super::highlight::{Rule, TokenKind};
use super::language::Language;

const JS_KEYWORDS: &[&str] = &[
    "const", "let", "var", "function", "return", "if", "else", "for", "while", "class", "import",
    "export", "from", "try", "catch", "throw", "new", "this", "super", "extends", "async",
    "await", "yield", "typeof", "instanceof", "in", "of", "null", "undefined", "true", "false",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "class", "import", "from", "as", "return", "if", "elif", "else", "for", "while", "try",
    "except", "finally", "with", "in", "is", "not", "and", "or", "True", "False", "None",
    "lambda", "global", "nonlocal", "raise", "assert", "yield", "break", "continue", "pass",
];

/// Double-quoted string on one line: anything but a closing `&quot;`.
const DOUBLE_QUOTED: &str = r"&quot;(?:[^&\n]|&(?:amp|lt|gt|#039);)*&quot;";

/// Single-quoted string on one line: anything but a closing `&#039;`.
const SINGLE_QUOTED: &str = r"&#039;(?:[^&\n]|&(?:amp|lt|gt|quot);)*&#039;";

const NUMBER: &str = r"\b\d+(?:\.\d+)?\b";

fn keywords(words: &[&str]) -> String {
    format!(r"\b(?:{})\b", words.join("|"))
}

static JAVASCRIPT: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::whole(r"(?s)/\*.*?\*/", TokenKind::Comment),
        Rule::whole(r"(?m)//.*$", TokenKind::Comment),
        Rule::whole(
            &format!(r"{DOUBLE_QUOTED}|{SINGLE_QUOTED}|`[^`]*`"),
            TokenKind::String,
        ),
        Rule::whole(&keywords(JS_KEYWORDS), TokenKind::Keyword),
        Rule::whole(NUMBER, TokenKind::Number),
        Rule::groups(r"\b([A-Za-z_$][\w$]*)\s*\(", &[(1, TokenKind::Function)]),
    ]
});

static PYTHON: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::whole(r"(?m)#.*$", TokenKind::Comment),
        Rule::whole(
            &format!(r"{DOUBLE_QUOTED}|{SINGLE_QUOTED}"),
            TokenKind::String,
        ),
        Rule::groups(
            r"\b(def)\s+([A-Za-z_]\w*)\s*\(",
            &[(1, TokenKind::Keyword), (2, TokenKind::Function)],
        ),
        Rule::whole(&keywords(PYTHON_KEYWORDS), TokenKind::Keyword),
        Rule::whole(NUMBER, TokenKind::Number),
    ]
});

static HTML: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::groups(r"&lt;/?([A-Za-z0-9]+)", &[(1, TokenKind::Keyword)]),
        Rule::groups(
            r"\s([A-Za-z0-9_-]+)=(?:&quot;|&#039;)",
            &[(1, TokenKind::Property)],
        ),
        Rule::groups(
            r"=(?:&quot;|&#039;)((?:[^&]|&(?:amp|lt|gt);)*)(?:&quot;|&#039;)",
            &[(1, TokenKind::String)],
        ),
    ]
});

static CSS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::groups(r"([A-Za-z0-9_\-.#:*\[\]=]+)\s*\{", &[(1, TokenKind::Keyword)]),
        Rule::groups(r"(?m)(?:^|[\s{;])([A-Za-z-]+)\s*:", &[(1, TokenKind::Property)]),
        Rule::groups(r":[ \t]*([\w .\-#%,()]+);", &[(1, TokenKind::String)]),
    ]
});

static JSON: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let key = r"&quot;(?:[^&]|&(?:amp|lt|gt|#039);)*&quot;";
    vec![
        Rule::groups(&format!(r"({key})\s*:"), &[(1, TokenKind::Property)]),
        Rule::groups(&format!(r":\s*({key})"), &[(1, TokenKind::String)]),
        Rule::groups(r":\s*(-?\d+(?:\.\d+)?)", &[(1, TokenKind::Number)]),
        Rule::groups(r":\s*(true|false|null)\b", &[(1, TokenKind::Keyword)]),
    ]
});

/// Rule table for a language, or `None` when the language is shown unstyled.
pub(crate) fn for_language(language: Language) -> Option<&'static [Rule]> {
    match language {
        Language::JavaScript | Language::TypeScript => Some(JAVASCRIPT.as_slice()),
        Language::Python => Some(PYTHON.as_slice()),
        Language::Html => Some(HTML.as_slice()),
        Language::Css => Some(CSS.as_slice()),
        Language::Json => Some(JSON.as_slice()),
        Language::Bash
        | Language::Sql
        | Language::CSharp
        | Language::Java
        | Language::Php
        | Language::Ruby
        | Language::Go
        | Language::Rust
        | Language::PlainText => None,
    }
}
