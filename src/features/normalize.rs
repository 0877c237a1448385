//! Lightweight normalization helpers for URLs and look-alike labels.

use std::borrow::Cow;

/// Normalize common defanging schemes in a conservative way.
/// - hxxp:// -> http:// ; hxxps:// -> https://
/// - [.] and (.) -> .
///
/// Inputs longer than `max_len` are returned as-is.
pub fn normalize_defanged(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.len() > max_len {
        return Cow::Borrowed(s);
    }

    let defanged_scheme = s
        .get(..5)
        .is_some_and(|p| p.eq_ignore_ascii_case("hxxp:") || p.eq_ignore_ascii_case("hxxps"));
    let needs = defanged_scheme || s.contains("[.]") || s.contains("(.)");
    if !needs {
        return Cow::Borrowed(s);
    }

    let mut out = s.to_string();
    if defanged_scheme {
        // hxxp -> http, preserving the rest of the scheme
        out.replace_range(..4, "http");
    }
    out = out.replace("[.]", ".");
    out = out.replace("(.)", ".");
    Cow::Owned(out)
}

/// Rewrite visually confusable sequences to the letters they imitate.
///
/// `0→o, 1→l, 3→e, 4→a, 5→s`, then `rn→m, vv→w`. Pure string rewrite,
/// lowercase output.
pub fn normalize_confusables(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            '0' => 'o',
            '1' => 'l',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            other => other,
        })
        .collect();
    mapped.replace("rn", "m").replace("vv", "w")
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
