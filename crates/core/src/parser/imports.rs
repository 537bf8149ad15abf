use super::lexer::{Token, TokenKind};
use mibscope_api::ImportMap;

/// Parse the tokens of an IMPORTS clause (between `IMPORTS` and `;`).
///
/// Each `sym, sym FROM Module` run is attached to `Module`; a module named
/// twice accumulates symbols without duplicates. Symbols not followed by
/// `FROM` are dropped.
pub fn parse_imports(src: &str, tokens: &[Token]) -> ImportMap {
    let mut imports = ImportMap::new();
    let mut pending: Vec<String> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let tok = &tokens[i];
        if tok.is_ident(src, "FROM") {
            let Some(module) = tokens.get(i + 1).filter(|t| t.kind == TokenKind::Ident) else {
                pending.clear();
                i += 1;
                continue;
            };
            let symbols = imports.entry(module.text(src).to_string()).or_default();
            for symbol in pending.drain(..) {
                if !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
            i += 2;
            // `FROM Module { iso ... }` carries an object identifier we ignore.
            if tokens.get(i).is_some_and(|t| t.kind == TokenKind::LBrace) {
                while i < tokens.len() && tokens[i].kind != TokenKind::RBrace {
                    i += 1;
                }
                i += 1;
            }
            continue;
        }
        if tok.kind == TokenKind::Ident && !tok.text(src).ends_with('-') {
            pending.push(tok.text(src).to_string());
        }
        i += 1;
    }
    imports
}
