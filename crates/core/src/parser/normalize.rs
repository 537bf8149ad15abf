//! Comment stripping and line joining ahead of tokenization.

/// Full normalization pass: drop carriage returns, strip `--` comments,
/// then join identifiers broken across lines with a trailing hyphen.
pub fn normalize(text: &str) -> String {
    let without_cr: String = text.chars().filter(|&c| c != '\r').collect();
    join_continuations(&strip_comments(&without_cr))
}

/// Remove `--` comments that run to end of line. Quoted strings are copied
/// verbatim, including any `--` or line breaks inside them. An unterminated
/// string extends to the end of the text.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                // The newline itself is kept so line structure survives.
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Join `ident-<newline><indent>rest` into `ident-rest` outside strings.
pub fn join_continuations(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            in_string = !in_string;
        }
        out.push(c);
        i += 1;

        if in_string || c != '-' || chars.get(i) != Some(&'\n') {
            continue;
        }
        let continues_word = i >= 2 && chars[i - 2].is_ascii_alphanumeric();
        let mut j = i + 1;
        while j < chars.len() && (chars[j] == ' ' || chars[j] == '\t') {
            j += 1;
        }
        if continues_word && chars.get(j).is_some_and(|n| n.is_ascii_alphanumeric()) {
            i = j;
        }
    }
    out
}
