//! Arc expressions: the text inside `::= { ... }`.

use crate::parser::lexer::{Token, TokenKind, tokenize};
use mibscope_api::{Oid, OidSegment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArcToken {
    /// `1.3.6.1`
    Dotted(Vec<u32>),
    /// `31`
    Number(u32),
    /// `org(3)`
    Named { name: String, number: u32 },
    /// `mib-2`, or any token that is not a usable number.
    Name(String),
}

impl ArcToken {
    fn text(&self) -> String {
        match self {
            ArcToken::Dotted(arcs) => arcs
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("."),
            ArcToken::Number(n) => n.to_string(),
            ArcToken::Named { name, number } => format!("{name}({number})"),
            ArcToken::Name(name) => name.clone(),
        }
    }
}

/// A tokenized arc expression plus its `parent.arc` display form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcExpr {
    pub tokens: Vec<ArcToken>,
    pub display: String,
}

impl ArcExpr {
    pub fn parse(expr: &str) -> Self {
        let tokens = split(expr, &tokenize(expr));
        let display = tokens
            .iter()
            .map(ArcToken::text)
            .collect::<Vec<_>>()
            .join(".");
        Self { tokens, display }
    }

    /// The parent reference, when the expression starts with a name.
    pub fn parent_name(&self) -> Option<&str> {
        match self.tokens.first()? {
            ArcToken::Named { name, .. } | ArcToken::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Build the best path available given `lookup`. The result is fully
    /// numeric only when every reference was known.
    pub fn resolve<'t>(&self, lookup: impl Fn(&str) -> Option<&'t [u32]>) -> Oid {
        let mut oid = Oid::default();
        let Some((first, rest)) = self.tokens.split_first() else {
            return oid;
        };
        match first {
            ArcToken::Dotted(arcs) => oid.extend(&Oid::from_numbers(arcs)),
            ArcToken::Number(n) => oid.push(OidSegment::Num(*n)),
            // An unknown parent stays symbolic even when written `name(n)`.
            ArcToken::Named { name, .. } | ArcToken::Name(name) => match lookup(name) {
                Some(arcs) => oid.extend(&Oid::from_numbers(arcs)),
                None => oid.push(OidSegment::Sym(name.clone())),
            },
        }
        for token in rest {
            match token {
                ArcToken::Dotted(arcs) => oid.extend(&Oid::from_numbers(arcs)),
                ArcToken::Number(n) => oid.push(OidSegment::Num(*n)),
                ArcToken::Named { number, .. } => oid.push(OidSegment::Num(*number)),
                ArcToken::Name(name) => oid.push(OidSegment::Sym(name.clone())),
            }
        }
        oid
    }
}

fn split(src: &str, tokens: &[Token]) -> Vec<ArcToken> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        match tok.kind {
            TokenKind::Ident => {
                let name = tok.text(src).to_string();
                let named = matches!(
                    tokens.get(i + 1..i + 4),
                    Some([open, num, close])
                        if open.kind == TokenKind::LParen
                            && num.kind == TokenKind::Number
                            && close.kind == TokenKind::RParen
                );
                if named {
                    match tokens[i + 2].text(src).parse::<u32>() {
                        Ok(number) => out.push(ArcToken::Named { name, number }),
                        Err(_) => out.push(ArcToken::Name(name)),
                    }
                    i += 4;
                } else {
                    out.push(ArcToken::Name(name));
                    i += 1;
                }
            }
            TokenKind::Number => {
                // Absorb `n.n.n` runs written without spaces.
                let mut j = i;
                let mut parts = vec![tok.text(src)];
                while tokens.get(j + 1).is_some_and(|t| t.kind == TokenKind::Dot)
                    && tokens.get(j + 2).is_some_and(|t| {
                        t.kind == TokenKind::Number && t.start == tokens[j + 1].end
                    })
                {
                    parts.push(tokens[j + 2].text(src));
                    j += 2;
                }
                let numbers: Option<Vec<u32>> = parts.iter().map(|p| p.parse().ok()).collect();
                match numbers {
                    Some(n) if n.len() == 1 => out.push(ArcToken::Number(n[0])),
                    Some(n) => out.push(ArcToken::Dotted(n)),
                    None => out.push(ArcToken::Name(parts.join("."))),
                }
                i = j + 1;
            }
            // Separators and stray punctuation carry no arcs.
            _ => i += 1,
        }
    }
    out
}
