// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop a leading literal word (e.g. `"by "`) if present, ASCII case-insensitive.
pub fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> &'a str {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => s[prefix.len()..].trim_start(),
        _ => s,
    }
}

/// Digits only, then parse. `"1,234,567"` → 1234567. `None` when no digits at all.
pub fn parse_count(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { return None; }
    digits.parse().ok()
}

/// A rank cell must be a plain positive integer (surrounding whitespace allowed).
pub fn parse_rank(s: &str) -> Option<u32> {
    let t = s.trim();
    if t.is_empty() || !t.chars().all(|c| c.is_ascii_digit()) { return None; }
    t.parse().ok().filter(|r| *r > 0)
}
