//! Language tag classification.

use std::fmt;

/// Canonical language a fenced block's tag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Html,
    Css,
    Json,
    Bash,
    Sql,
    CSharp,
    Java,
    Php,
    Ruby,
    Go,
    Rust,
    PlainText,
}

/// Ordered alias table. Matching is case-insensitive on the whole tag; first hit wins.
const ALIASES: &[(Language, &[&str])] = &[
    (Language::JavaScript, &["javascript", "js", "jsx"]),
    (Language::Python, &["python", "py"]),
    (Language::Html, &["html", "xml"]),
    (Language::Css, &["css", "scss", "sass"]),
    (Language::Json, &["json"]),
    (Language::Bash, &["bash", "sh", "shell"]),
    (Language::Sql, &["sql"]),
    (Language::CSharp, &["csharp", "c#"]),
    (Language::Java, &["java"]),
    (Language::Php, &["php"]),
    (Language::Ruby, &["ruby", "rb"]),
    (Language::Go, &["go"]),
    (Language::Rust, &["rust"]),
    (Language::TypeScript, &["typescript", "ts"]),
];

impl Language {
    /// Resolve a fence tag. Unknown tags resolve to [`Language::PlainText`].
    pub fn resolve(tag: &str) -> Language {
        ALIASES
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a.eq_ignore_ascii_case(tag)))
            .map(|(language, _)| *language)
            .unwrap_or(Language::PlainText)
    }

    /// Canonical identifier (e.g. `csharp`, `plaintext`).
    pub fn id(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Html => "html",
            Language::Css => "css",
            Language::Json => "json",
            Language::Bash => "bash",
            Language::Sql => "sql",
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::PlainText => "plaintext",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        assert_eq!(Language::resolve("PY"), Language::Python);
        assert_eq!(Language::resolve("python"), Language::Python);
        assert_eq!(Language::resolve("py"), Language::Python);
        assert_eq!(Language::resolve("Js"), Language::JavaScript);
    }

    #[test]
    fn resolve_aliases() {
        assert_eq!(Language::resolve("jsx"), Language::JavaScript);
        assert_eq!(Language::resolve("ts"), Language::TypeScript);
        assert_eq!(Language::resolve("xml"), Language::Html);
        assert_eq!(Language::resolve("scss"), Language::Css);
        assert_eq!(Language::resolve("sh"), Language::Bash);
        assert_eq!(Language::resolve("C#"), Language::CSharp);
        assert_eq!(Language::resolve("rb"), Language::Ruby);
    }

    #[test]
    fn resolve_requires_whole_tag() {
        assert_eq!(Language::resolve("jsonx"), Language::PlainText);
        assert_eq!(Language::resolve("j"), Language::PlainText);
    }

    #[test]
    fn resolve_unknown_falls_back() {
        assert_eq!(Language::resolve("notalanguage"), Language::PlainText);
        assert_eq!(Language::resolve(""), Language::PlainText);
    }

    #[test]
    fn every_alias_round_trips_to_its_language() {
        for (language, aliases) in ALIASES {
            for alias in *aliases {
                assert_eq!(Language::resolve(alias), *language, "alias {alias}");
            }
        }
    }
}
