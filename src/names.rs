//! Identifier derivation for keys and environment names.
//!
//! A key contributes a PascalCase component to the Field Path (and to struct
//! type names) and a snake_case Rust field identifier.

// Strict and reserved keywords usable as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

// Keywords that cannot be written as `r#...`.
const PLAIN_KEYWORDS: &[&str] = &["crate", "self", "super", "Self", "_"];

/// Split on non-alphanumerics and on lower→upper / acronym→word boundaries.
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut cur = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !cur.is_empty() { out.push(std::mem::take(&mut cur)); }
            continue;
        }
        if c.is_uppercase() && !cur.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(std::mem::take(&mut cur));
            }
        }
        cur.push(c);
    }
    if !cur.is_empty() { out.push(cur); }
    out
}

/// `long_desc`, `longDesc` and `long-desc` all become `LongDesc`.
pub fn pascal_case(s: &str) -> String {
    words(s)
        .into_iter()
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().chain(cs).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn snake_case(s: &str) -> String {
    words(s).into_iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("_")
}

/// A Rust identifier for `s`, escaped where it would clash with a keyword
/// or start with a digit.
pub fn rust_ident(s: &str) -> String {
    let mut ident = snake_case(s);
    if ident.is_empty() {
        ident.push('_');
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if PLAIN_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    } else if RAW_KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

/// Upper-snake environment variable segment for one key.
pub fn env_var_segment(key: &str) -> String { snake_case(key).to_uppercase() }
