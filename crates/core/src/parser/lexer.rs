//! Tokenizer for comment-free MIB text.
//!
//! Tokens borrow nothing; each carries a byte span into the text it was
//! produced from. Quoted strings are single tokens, so structure inside a
//! DESCRIPTION never leaks into the grammar.

use mibscope_api::Diagnostic;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword: a letter followed by letters, digits, `-` or `_`.
    Ident,
    /// Decimal number, optionally negative.
    Number,
    /// Double-quoted string, quotes included.
    Str,
    /// Hex or binary string such as `'0A'H`.
    Binary,
    /// `::=`
    Assign,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,
    DotDot,
    Pipe,
    /// Anything else, one character wide.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// First token on its line.
    pub line_start: bool,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    pub fn is_ident(&self, src: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(src) == word
    }
}

/// True for tokens shaped like an SMI clause keyword (`SYNTAX`, `MAX-ACCESS`).
pub fn is_keyword_like(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_uppercase()
        && bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || *b == b'-')
}

/// Strip the surrounding quotes of a `Str` token's text.
pub fn unquote(text: &str) -> &str {
    let inner = text.strip_prefix('"').unwrap_or(text);
    inner.strip_suffix('"').unwrap_or(inner)
}

pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    saw_newline: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            saw_newline: true,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        (tokens, self.diagnostics)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.saw_newline = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let b = self.peek()?;

        let kind = match b {
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b'|' => self.single(TokenKind::Pipe),
            b'.' => {
                self.pos += 1;
                if self.peek() == Some(b'.') {
                    self.pos += 1;
                    TokenKind::DotDot
                } else {
                    TokenKind::Dot
                }
            }
            b':' if self.peek_at(1) == Some(b':') && self.peek_at(2) == Some(b'=') => {
                self.pos += 3;
                TokenKind::Assign
            }
            b'-' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.pos += 1;
                self.scan_digits();
                TokenKind::Number
            }
            b'"' => self.scan_string(),
            b'\'' => self.scan_binary(),
            b if b.is_ascii_digit() => {
                self.scan_digits();
                TokenKind::Number
            }
            b if b.is_ascii_alphabetic() => {
                self.scan_ident();
                TokenKind::Ident
            }
            _ => {
                // Step a whole character so spans stay on UTF-8 boundaries.
                let width = self.src[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.pos += width;
                TokenKind::Other
            }
        };

        let line_start = std::mem::replace(&mut self.saw_newline, false);
        Some(Token {
            kind,
            start,
            end: self.pos,
            line_start,
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn scan_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn scan_ident(&mut self) {
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        match find_byte(&self.bytes[self.pos..], b'"') {
            Some(offset) => self.pos += offset + 1,
            None => {
                self.diagnostics.push(Diagnostic::warning(
                    "unterminated string literal",
                    Some(start),
                ));
                self.pos = self.bytes.len();
            }
        }
        TokenKind::Str
    }

    fn scan_binary(&mut self) -> TokenKind {
        self.pos += 1;
        let rest = &self.bytes[self.pos..];
        let line = &rest[..find_byte(rest, b'\n').unwrap_or(rest.len())];
        match find_byte(line, b'\'') {
            Some(offset) => {
                self.pos += offset + 1;
                // Radix suffix: 'H' or 'B'.
                if self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
                    self.pos += 1;
                }
                TokenKind::Binary
            }
            None => TokenKind::Other,
        }
    }
}

fn find_byte(haystack: &[u8], quote: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == quote)
}

/// Convenience wrapper that drops lexer diagnostics.
pub fn tokenize(src: &str) -> Vec<Token> {
    Lexer::new(src).tokenize().0
}
