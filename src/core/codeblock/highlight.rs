//! Token-span highlighting over escaped code.
//!
//! Each language routine is an ordered list of [`Rule`]s. [`tokenize`] walks
//! the text once: at every step the rule whose next token starts earliest
//! wins (ties go to the rule listed first), its capture groups become spans,
//! and scanning resumes after the last span. Text inside an accepted span is
//! never classified again, and no span may cut through an HTML entity.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::language::Language;
use super::rules;

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:amp|lt|gt|quot|#039);").expect("Invalid entity regex")
});

/// Highlighting category. Rendered as `<span class="code-KIND">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    String,
    Number,
    Comment,
    Function,
    Operator,
    Variable,
    Property,
    Punctuation,
}

impl TokenKind {
    pub const ALL: [TokenKind; 9] = [
        TokenKind::Keyword,
        TokenKind::String,
        TokenKind::Number,
        TokenKind::Comment,
        TokenKind::Function,
        TokenKind::Operator,
        TokenKind::Variable,
        TokenKind::Property,
        TokenKind::Punctuation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Comment => "comment",
            TokenKind::Function => "function",
            TokenKind::Operator => "operator",
            TokenKind::Variable => "variable",
            TokenKind::Property => "property",
            TokenKind::Punctuation => "punctuation",
        }
    }

    /// CSS class carried by spans of this kind.
    pub fn class_name(self) -> String {
        format!("code-{}", self.name())
    }
}

/// A classified byte range of the escaped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

/// One pattern of a language routine and the token kind of each capture group.
pub(crate) struct Rule {
    regex: Regex,
    groups: Vec<(usize, TokenKind)>,
}

impl Rule {
    /// The whole match is one token.
    pub(crate) fn whole(pattern: &str, kind: TokenKind) -> Self {
        Self::groups(pattern, &[(0, kind)])
    }

    /// Selected capture groups are tokens; the rest of the match is context.
    pub(crate) fn groups(pattern: &str, groups: &[(usize, TokenKind)]) -> Self {
        Self {
            regex: Regex::new(pattern).expect("Invalid highlight rule"),
            groups: groups.to_vec(),
        }
    }
}

/// A rule's next acceptable match.
struct Candidate {
    start: usize,
    tokens: Vec<TokenSpan>,
}

impl Candidate {
    fn first_token_start(&self) -> usize {
        self.tokens
            .iter()
            .map(|t| t.range.start)
            .min()
            .unwrap_or(self.start)
    }

    fn last_token_end(&self) -> usize {
        self.tokens
            .iter()
            .map(|t| t.range.end)
            .max()
            .unwrap_or(self.start)
    }
}

/// Highlight escaped code. `None` (no fence tag) and languages without a
/// routine return the escaped text unchanged.
pub fn highlight(escaped: &str, language: Option<Language>) -> String {
    let Some(rules) = language.and_then(rules::for_language) else {
        return escaped.to_string();
    };
    render_spans(escaped, &tokenize(escaped, rules))
}

/// Classify `escaped` into ordered, non-overlapping spans.
pub(crate) fn tokenize(escaped: &str, rules: &[Rule]) -> Vec<TokenSpan> {
    let entities: Vec<Range<usize>> = ENTITY_RE.find_iter(escaped).map(|m| m.range()).collect();
    let mut pending: Vec<Option<Candidate>> = rules
        .iter()
        .map(|rule| next_candidate(rule, escaped, 0, &entities))
        .collect();
    let mut spans = Vec::new();
    let mut pos = 0;

    loop {
        for (rule, slot) in rules.iter().zip(pending.iter_mut()) {
            if slot.as_ref().is_some_and(|c| c.first_token_start() < pos) {
                *slot = next_candidate(rule, escaped, pos, &entities);
            }
        }
        let best = pending
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (c.first_token_start(), i)))
            .min();
        let Some((_, index)) = best else {
            break;
        };
        let Some(candidate) = pending[index].take() else {
            break;
        };
        pos = candidate.last_token_end();
        spans.extend(candidate.tokens);
        pending[index] = next_candidate(&rules[index], escaped, pos, &entities);
    }

    spans.sort_by_key(|s| s.range.start);
    spans
}

/// First match of `rule` at or after `from` that yields at least one token
/// and splits no entity.
fn next_candidate(
    rule: &Rule,
    text: &str,
    from: usize,
    entities: &[Range<usize>],
) -> Option<Candidate> {
    let mut at = from;
    while at <= text.len() {
        let caps = rule.regex.captures_at(text, at)?;
        let whole = caps.get(0)?;
        let tokens: Vec<TokenSpan> = rule
            .groups
            .iter()
            .filter_map(|&(group, kind)| {
                caps.get(group)
                    .filter(|m| !m.is_empty())
                    .map(|m| TokenSpan {
                        range: m.range(),
                        kind,
                    })
            })
            .collect();
        if !tokens.is_empty() && !tokens.iter().any(|t| cuts_entity(&t.range, entities)) {
            return Some(Candidate {
                start: whole.start(),
                tokens,
            });
        }
        at = text[whole.start()..]
            .chars()
            .next()
            .map(|c| whole.start() + c.len_utf8())?;
    }
    None
}

/// True when `range` overlaps an entity without containing all of it.
/// `entities` is sorted and non-overlapping.
fn cuts_entity(range: &Range<usize>, entities: &[Range<usize>]) -> bool {
    let first = entities.partition_point(|e| e.end <= range.start);
    entities[first..]
        .iter()
        .take_while(|e| e.start < range.end)
        .any(|e| !(range.start <= e.start && e.end <= range.end))
}

/// Wrap each span in its markup; text between spans is copied through.
pub(crate) fn render_spans(escaped: &str, spans: &[TokenSpan]) -> String {
    let mut out = String::with_capacity(escaped.len() + spans.len() * 32);
    let mut pos = 0;
    for span in spans {
        out.push_str(&escaped[pos..span.range.start]);
        out.push_str("<span class=\"");
        out.push_str(&span.kind.class_name());
        out.push_str("\">");
        out.push_str(&escaped[span.range.clone()]);
        out.push_str("</span>");
        pos = span.range.end;
    }
    out.push_str(&escaped[pos..]);
    out
}
