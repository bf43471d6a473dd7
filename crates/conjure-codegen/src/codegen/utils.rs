use heck::ToPascalCase;

/// Reserved words of common target languages that cannot be bare identifiers
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "default", "do", "dyn",
    "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in", "interface", "let",
    "loop", "match", "mod", "move", "mut", "package", "pub", "ref", "return", "self", "static",
    "struct", "super", "trait", "true", "type", "union", "unsafe", "use", "where", "while",
];

/// Convert an enum value or variant name to a PascalCase identifier
pub(super) fn value_to_variant_name(value: &str) -> String {
    // Remove leading special chars and convert to pascal case
    let clean = value.trim_start_matches(|c: char| !c.is_alphanumeric());
    let variant = clean.replace('-', "_").to_pascal_case();

    if variant.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{}", variant)
    } else if variant.is_empty() {
        "Unnamed".to_string()
    } else {
        variant
    }
}

/// Sanitize a string to be safe for identifiers
pub(super) fn sanitize_name(s: &str) -> String {
    if s.is_empty() {
        return "unnamed".to_string();
    }

    let mut sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        sanitized = format!("_{}", sanitized);
    }

    sanitized
}

/// Sanitized identifier, raw-escaped (`r#type`) when it is a keyword
pub(super) fn make_ident(s: &str) -> String {
    let sanitized = sanitize_name(s);
    if KEYWORDS.contains(&sanitized.as_str()) {
        format!("r#{}", sanitized)
    } else {
        sanitized
    }
}

/// Suffix repeated identifiers with `2`, `3`, ... in order of appearance
pub(super) fn dedupe_idents(idents: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(idents.len());
    for ident in idents {
        let mut candidate = ident.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{}{}", ident, n);
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}
