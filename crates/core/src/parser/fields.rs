//! Clause extraction from a declaration body.
//!
//! A clause value runs from its keyword to the next keyword-looking token
//! that opens a line (outside braces), the `::=` token, or the end of the
//! body.

use super::lexer::{Token, TokenKind, is_keyword_like, tokenize, unquote};
use mibscope_api::{EnumEntry, Revision, SequenceMember};

pub struct FieldReader<'a> {
    body: &'a str,
    tokens: Vec<Token>,
}

impl<'a> FieldReader<'a> {
    pub fn new(body: &'a str) -> Self {
        Self {
            body,
            tokens: tokenize(body),
        }
    }

    fn keyword_positions(&self, key: &str) -> impl Iterator<Item = usize> + '_ {
        let key = key.to_string();
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.is_ident(self.body, &key))
            .map(|(i, _)| i)
    }

    /// Token index range `[from, to)` holding the value of the clause whose
    /// keyword sits at `at`.
    fn value_range(&self, at: usize) -> (usize, usize) {
        let from = at + 1;
        let mut depth: i32 = 0;
        let mut to = from;
        while to < self.tokens.len() {
            let tok = &self.tokens[to];
            match tok.kind {
                TokenKind::Assign => break,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Ident
                    if to > from
                        && depth <= 0
                        && tok.line_start
                        && is_keyword_like(tok.text(self.body)) =>
                {
                    break;
                }
                _ => {}
            }
            to += 1;
        }
        (from, to)
    }

    fn span_text(&self, (from, to): (usize, usize)) -> &'a str {
        if from >= to {
            return "";
        }
        &self.body[self.tokens[from].start..self.tokens[to - 1].end]
    }

    fn first_range(&self, key: &str) -> Option<(usize, usize)> {
        let at = self.keyword_positions(key).next()?;
        Some(self.value_range(at))
    }

    pub fn has(&self, key: &str) -> bool {
        self.keyword_positions(key).next().is_some()
    }

    /// Raw clause value with whitespace collapsed; empty when absent.
    pub fn field(&self, key: &str) -> String {
        self.first_range(key)
            .map(|r| collapse(self.span_text(r)))
            .unwrap_or_default()
    }

    /// Like [`field`](Self::field), but a value that starts with a quoted
    /// string yields the string's contents.
    pub fn text(&self, key: &str) -> String {
        let Some((from, to)) = self.first_range(key) else {
            return String::new();
        };
        match self.tokens.get(from) {
            Some(t) if from < to && t.kind == TokenKind::Str => collapse(unquote(t.text(self.body))),
            _ => collapse(self.span_text((from, to))),
        }
    }

    /// DESCRIPTION-style value: the first quoted span inside the clause,
    /// trimmed, line breaks kept.
    pub fn quoted(&self, key: &str) -> String {
        let Some((from, to)) = self.first_range(key) else {
            return String::new();
        };
        self.tokens[from..to]
            .iter()
            .find(|t| t.kind == TokenKind::Str)
            .map(|t| unquote(t.text(self.body)).trim().to_string())
            .unwrap_or_else(|| collapse(self.span_text((from, to))))
    }

    /// Identifiers of a clause such as `OBJECTS { a, b }`. Without braces
    /// every identifier in the value is returned.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.first_range(key)
            .map(|r| self.idents_in(r))
            .unwrap_or_default()
    }

    /// First identifier of every occurrence of `key`, e.g. each `SUPPORTS`.
    pub fn each_first_ident(&self, key: &str) -> Vec<String> {
        self.keyword_positions(key)
            .filter_map(|at| {
                let (from, to) = self.value_range(at);
                self.tokens[from..to]
                    .iter()
                    .find(|t| t.kind == TokenKind::Ident)
                    .map(|t| t.text(self.body).to_string())
            })
            .collect()
    }

    fn idents_in(&self, (from, to): (usize, usize)) -> Vec<String> {
        let slice = &self.tokens[from..to];
        let inner = match slice.iter().position(|t| t.kind == TokenKind::LBrace) {
            Some(open) => {
                let close = slice[open..]
                    .iter()
                    .position(|t| t.kind == TokenKind::RBrace)
                    .map_or(slice.len(), |p| open + p);
                &slice[open + 1..close]
            }
            None => slice,
        };
        inner
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| t.text(self.body).to_string())
            .collect()
    }

    /// Ordered `REVISION "date" DESCRIPTION "text"` pairs.
    pub fn revisions(&self) -> Vec<Revision> {
        let mut revisions = Vec::new();
        let mut i = 0;
        while i < self.tokens.len() {
            if !self.tokens[i].is_ident(self.body, "REVISION") {
                i += 1;
                continue;
            }
            let (from, to) = self.value_range(i);
            let date = self.tokens[from..to]
                .iter()
                .find(|t| t.kind == TokenKind::Str)
                .map(|t| unquote(t.text(self.body)).trim().to_string())
                .unwrap_or_else(|| collapse(self.span_text((from, to))));

            let mut description = String::new();
            let mut j = to;
            while j < self.tokens.len() && !self.tokens[j].is_ident(self.body, "REVISION") {
                if self.tokens[j].is_ident(self.body, "DESCRIPTION") {
                    if let Some(s) = self.tokens.get(j + 1).filter(|t| t.kind == TokenKind::Str) {
                        description = unquote(s.text(self.body)).trim().to_string();
                    }
                    break;
                }
                j += 1;
            }
            revisions.push(Revision { date, description });
            i = to.max(i + 1);
        }
        revisions
    }
}

/// Collapse every whitespace run to a single space.
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decompose the first `{ label(n), ... }` list of a SYNTAX value. Entries
/// without a parenthesized number are skipped.
pub fn extract_enums(syntax: &str) -> Vec<EnumEntry> {
    let tokens = tokenize(syntax);
    let Some(open) = tokens.iter().position(|t| t.kind == TokenKind::LBrace) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut depth = 0;
    let mut entry: Vec<&Token> = Vec::new();
    for tok in &tokens[open..] {
        match tok.kind {
            TokenKind::LBrace => {
                depth += 1;
                if depth == 1 {
                    continue;
                }
            }
            TokenKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    entries.extend(enum_entry(syntax, &entry));
                    break;
                }
            }
            TokenKind::Comma if depth == 1 => {
                entries.extend(enum_entry(syntax, &entry));
                entry.clear();
                continue;
            }
            _ => {}
        }
        entry.push(tok);
    }
    entries
}

fn enum_entry(src: &str, tokens: &[&Token]) -> Option<EnumEntry> {
    match tokens {
        [label, open, value, close]
            if label.kind == TokenKind::Ident
                && open.kind == TokenKind::LParen
                && value.kind == TokenKind::Number
                && close.kind == TokenKind::RParen =>
        {
            let value = value.text(src).parse::<i64>().ok()?;
            Some(EnumEntry::new(label.text(src), value))
        }
        _ => None,
    }
}

/// Split a SEQUENCE body into `name Type` members.
pub fn sequence_members(body: &str) -> Vec<SequenceMember> {
    let mut members = Vec::new();
    let mut depth = 0;
    let mut current = String::new();
    for c in body.chars() {
        match c {
            '(' | '{' => depth += 1,
            ')' | '}' => depth -= 1,
            ',' if depth == 0 => {
                members.extend(sequence_member(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    members.extend(sequence_member(&current));
    members
}

fn sequence_member(text: &str) -> Option<SequenceMember> {
    let text = text.trim();
    let (name, syntax) = text.split_once(char::is_whitespace)?;
    Some(SequenceMember {
        name: name.to_string(),
        syntax: collapse(syntax),
    })
}
