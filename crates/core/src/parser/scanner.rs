//! Declaration scanner.
//!
//! A small recursive-descent pass over the token stream. Only the heads of
//! top-level constructs are matched structurally; everything between a head
//! and its `::=` is kept as raw body text for the field extractor.

use super::imports::parse_imports;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{MibscopeError, Result};
use mibscope_api::{Diagnostic, ImportMap, NodeKind};
use tracing::debug;

/// A recognized declaration before OID resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: NodeKind,
    /// Text between the head and `::=`. For SEQUENCE, the member list.
    pub body: String,
    /// Contents of the trailing `{ ... }`, when there is one.
    pub arc: Option<String>,
    /// Byte offset of the declaration name.
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct ScanOutput {
    pub module_name: String,
    pub declarations: Vec<Declaration>,
    pub imports: ImportMap,
    pub type_names: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Scan normalized module text.
pub fn scan(src: &str) -> Result<ScanOutput> {
    let (tokens, diagnostics) = Lexer::new(src).tokenize();
    let mut scanner = Scanner {
        src,
        tokens,
        pos: 0,
        out: ScanOutput {
            diagnostics,
            ..Default::default()
        },
    };
    scanner.header()?;
    scanner.body();
    debug!(
        "Scanned module {} with {} declarations",
        scanner.out.module_name,
        scanner.out.declarations.len()
    );
    Ok(scanner.out)
}

/// Returns the module name and the index just past `BEGIN`.
fn find_header(src: &str, tokens: &[Token]) -> Option<(String, usize)> {
    for i in 0..tokens.len().saturating_sub(1) {
        if tokens[i].kind != TokenKind::Ident || !tokens[i + 1].is_ident(src, "DEFINITIONS") {
            continue;
        }
        // Allow tag defaults such as `IMPLICIT TAGS` before `::=`.
        let mut j = i + 2;
        while j < tokens.len() && j < i + 5 && tokens[j].kind == TokenKind::Ident {
            j += 1;
        }
        if tokens.get(j).is_some_and(|t| t.kind == TokenKind::Assign)
            && tokens.get(j + 1).is_some_and(|t| t.is_ident(src, "BEGIN"))
        {
            return Some((tokens[i].text(src).to_string(), j + 2));
        }
    }
    None
}

fn has_lowercase(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_lowercase())
}

struct Scanner<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    out: ScanOutput,
}

enum Head {
    Macro(NodeKind),
    ObjectIdentifier,
    TextualConvention,
    Sequence,
    TypeAssignment,
    MacroDefinition,
    Imports,
    Exports,
    End,
}

impl<'a> Scanner<'a> {
    fn header(&mut self) -> Result<()> {
        let (name, pos) = find_header(self.src, &self.tokens).ok_or(MibscopeError::NoModuleHeader)?;
        self.out.module_name = name;
        self.pos = pos;
        Ok(())
    }

    fn tok(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    fn text(&self, i: usize) -> &'a str {
        self.tokens.get(i).map_or("", |t| t.text(self.src))
    }

    fn kind_at(&self, i: usize) -> Option<TokenKind> {
        self.tokens.get(i).map(|t| t.kind)
    }

    fn is_word(&self, i: usize, word: &str) -> bool {
        self.tok(i).is_some_and(|t| t.is_ident(self.src, word))
    }

    /// Classify the construct starting at token `i`, if any.
    fn head_at(&self, i: usize) -> Option<Head> {
        let tok = self.tok(i)?;
        if tok.kind != TokenKind::Ident {
            return None;
        }
        let word = tok.text(self.src);
        match word {
            "IMPORTS" => return Some(Head::Imports),
            "EXPORTS" => return Some(Head::Exports),
            "END" => return Some(Head::End),
            _ => {}
        }
        if self.is_word(i + 1, "MACRO") {
            return Some(Head::MacroDefinition);
        }
        if has_lowercase(word) {
            if let Some(kind) = NodeKind::from_macro(self.text(i + 1)) {
                return Some(Head::Macro(kind));
            }
            if self.is_word(i + 1, "OBJECT")
                && self.is_word(i + 2, "IDENTIFIER")
                && self.kind_at(i + 3) == Some(TokenKind::Assign)
            {
                return Some(Head::ObjectIdentifier);
            }
        }
        if self.kind_at(i + 1) == Some(TokenKind::Assign) {
            if self.is_word(i + 2, "TEXTUAL-CONVENTION") {
                return Some(Head::TextualConvention);
            }
            if self.is_word(i + 2, "SEQUENCE") && self.kind_at(i + 3) == Some(TokenKind::LBrace) {
                return Some(Head::Sequence);
            }
            return Some(Head::TypeAssignment);
        }
        None
    }

    fn body(&mut self) {
        while self.pos < self.tokens.len() {
            let Some(head) = self.head_at(self.pos) else {
                self.pos += 1;
                continue;
            };
            match head {
                Head::End => break,
                Head::Imports => {
                    let start = self.pos + 1;
                    let end = self.clause_end(start, "IMPORTS");
                    let imports = parse_imports(self.src, &self.tokens[start..end]);
                    for (module, symbols) in imports {
                        let entry = self.out.imports.entry(module).or_default();
                        for symbol in symbols {
                            if !entry.contains(&symbol) {
                                entry.push(symbol);
                            }
                        }
                    }
                    self.pos = self.after_clause(end);
                }
                Head::Exports => {
                    let end = self.clause_end(self.pos + 1, "EXPORTS");
                    self.pos = self.after_clause(end);
                }
                Head::MacroDefinition => self.macro_definition(),
                Head::Macro(kind) => self.macro_declaration(kind),
                Head::ObjectIdentifier => self.object_identifier(),
                Head::TextualConvention => self.textual_convention(),
                Head::Sequence => self.sequence(),
                Head::TypeAssignment => {
                    self.push_type_name(self.text(self.pos).to_string());
                    self.pos += 2;
                }
            }
        }
    }

    /// Index of the `;` closing an IMPORTS or EXPORTS clause. Without one the
    /// clause stops before the next line-start declaration head.
    fn clause_end(&mut self, from: usize, clause: &str) -> usize {
        for i in from..self.tokens.len() {
            if self.tokens[i].kind == TokenKind::Semicolon {
                return i;
            }
            if self.tokens[i].line_start && self.head_at(i).is_some() {
                self.out.diagnostics.push(Diagnostic::warning(
                    format!("{clause} clause is missing its closing ';'"),
                    Some(self.tokens[i].start),
                ));
                return i;
            }
        }
        self.tokens.len()
    }

    /// Resume after a clause, skipping its `;` when present.
    fn after_clause(&self, end: usize) -> usize {
        match self.kind_at(end) {
            Some(TokenKind::Semicolon) => end + 1,
            _ => end,
        }
    }

    fn push_type_name(&mut self, name: String) {
        if !self.out.type_names.contains(&name) {
            self.out.type_names.push(name);
        }
    }

    /// Byte span text between two token indices, `[from, to)`.
    fn span(&self, from: usize, to: usize) -> String {
        if from >= to || from >= self.tokens.len() {
            return String::new();
        }
        let start = self.tokens[from].start;
        let end = self.tokens[to.min(self.tokens.len()) - 1].end;
        self.src[start..end].to_string()
    }

    /// Index of the `}` matching the `{` at `open`, or the end of input.
    fn matching_brace(&self, open: usize) -> usize {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return i;
                    }
                }
                _ => {}
            }
        }
        self.tokens.len()
    }

    fn macro_definition(&mut self) {
        let name = self.text(self.pos).to_string();
        let offset = self.tokens[self.pos].start;
        let end = (self.pos + 2..self.tokens.len())
            .find(|&i| self.is_word(i, "END"))
            .unwrap_or(self.tokens.len());
        self.out.diagnostics.push(Diagnostic::info(
            format!("skipped MACRO definition {name}"),
            Some(offset),
        ));
        self.push_type_name(name);
        self.pos = end + 1;
    }

    fn macro_declaration(&mut self, kind: NodeKind) {
        let name = self.text(self.pos).to_string();
        let offset = self.tokens[self.pos].start;
        let body_start = self.pos + 2;

        let mut i = body_start;
        while i < self.tokens.len() {
            if self.tokens[i].kind == TokenKind::Assign {
                break;
            }
            if self.head_at(i).is_some() && self.tokens[i].line_start {
                break;
            }
            i += 1;
        }
        let body = self.span(body_start, i);

        if self.kind_at(i) != Some(TokenKind::Assign) {
            self.out.diagnostics.push(Diagnostic::warning(
                format!("{name} has no OID assignment"),
                Some(offset),
            ));
            self.push_declaration(name, kind, body, None, offset);
            self.pos = i;
            return;
        }

        match self.kind_at(i + 1) {
            Some(TokenKind::LBrace) => {
                let close = self.matching_brace(i + 1);
                let arc = self.span(i + 2, close);
                self.push_declaration(name, kind, body, Some(arc), offset);
                self.pos = close + 1;
            }
            Some(TokenKind::Number) if kind == NodeKind::TrapType => {
                let number = self.text(i + 1);
                let arc = trap_arc(self.src, &self.tokens[body_start..i], number);
                self.push_declaration(name, kind, body, arc, offset);
                self.pos = i + 2;
            }
            _ => {
                self.out.diagnostics.push(Diagnostic::warning(
                    format!("{name} has a malformed OID assignment"),
                    Some(offset),
                ));
                self.push_declaration(name, kind, body, None, offset);
                self.pos = i + 1;
            }
        }
    }

    fn object_identifier(&mut self) {
        let name = self.text(self.pos).to_string();
        let offset = self.tokens[self.pos].start;
        let assign = self.pos + 3;
        if self.kind_at(assign + 1) == Some(TokenKind::LBrace) {
            let close = self.matching_brace(assign + 1);
            let arc = self.span(assign + 2, close);
            self.push_declaration(name, NodeKind::ObjectIdentifier, String::new(), Some(arc), offset);
            self.pos = close + 1;
        } else {
            self.out.diagnostics.push(Diagnostic::warning(
                format!("{name} has a malformed OID assignment"),
                Some(offset),
            ));
            self.push_declaration(name, NodeKind::ObjectIdentifier, String::new(), None, offset);
            self.pos = assign + 1;
        }
    }

    fn textual_convention(&mut self) {
        let name = self.text(self.pos).to_string();
        let offset = self.tokens[self.pos].start;
        let body_start = self.pos + 3;
        let mut i = body_start;
        let mut depth = 0i32;
        while i < self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ if depth <= 0 && self.tokens[i].line_start && self.head_at(i).is_some() => break,
                _ => {}
            }
            i += 1;
        }
        let body = self.span(body_start, i);
        self.push_declaration(name, NodeKind::TextualConvention, body, None, offset);
        self.pos = i;
    }

    fn sequence(&mut self) {
        let name = self.text(self.pos).to_string();
        let offset = self.tokens[self.pos].start;
        let open = self.pos + 3;
        let close = self.matching_brace(open);
        let body = self.span(open + 1, close);
        self.push_declaration(name, NodeKind::Sequence, body, None, offset);
        self.pos = close + 1;
    }

    fn push_declaration(
        &mut self,
        name: String,
        kind: NodeKind,
        body: String,
        arc: Option<String>,
        offset: usize,
    ) {
        self.out.declarations.push(Declaration {
            name,
            kind,
            body,
            arc,
            offset,
        });
    }
}

/// SMIv1 traps hang under `enterprise.0.n`.
fn trap_arc(src: &str, body: &[Token], number: &str) -> Option<String> {
    let at = body.iter().position(|t| t.is_ident(src, "ENTERPRISE"))?;
    let enterprise = body[at + 1..]
        .iter()
        .take_while(|t| t.kind != TokenKind::Ident || !super::lexer::is_keyword_like(t.text(src)))
        .find(|t| matches!(t.kind, TokenKind::Ident | TokenKind::Number))?;
    Some(format!("{} 0 {number}", enterprise.text(src)))
}
