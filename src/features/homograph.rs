//! Detection of non-Latin characters that render like Latin letters.

use crate::core::HomographHit;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_script::UnicodeScript;

/// Confusable character -> the Latin letter it imitates.
static CONFUSABLES: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [
        // Cyrillic lowercase
        ('\u{0430}', 'a'),
        ('\u{0435}', 'e'),
        ('\u{043E}', 'o'),
        ('\u{0440}', 'p'),
        ('\u{0441}', 'c'),
        ('\u{0443}', 'y'),
        ('\u{0445}', 'x'),
        ('\u{0455}', 's'),
        ('\u{0456}', 'i'),
        ('\u{0458}', 'j'),
        ('\u{0501}', 'd'),
        ('\u{04BB}', 'h'),
        ('\u{04CF}', 'l'),
        ('\u{051B}', 'q'),
        ('\u{051D}', 'w'),
        // Cyrillic uppercase
        ('\u{0410}', 'A'),
        ('\u{0412}', 'B'),
        ('\u{0415}', 'E'),
        ('\u{041A}', 'K'),
        ('\u{041C}', 'M'),
        ('\u{041D}', 'H'),
        ('\u{041E}', 'O'),
        ('\u{0420}', 'P'),
        ('\u{0421}', 'C'),
        ('\u{0422}', 'T'),
        ('\u{0425}', 'X'),
        // Latin extensions
        ('\u{0261}', 'g'),
        ('\u{0251}', 'a'),
        ('\u{0131}', 'i'),
        // Greek
        ('\u{03BF}', 'o'),
        ('\u{03BD}', 'v'),
        ('\u{03C9}', 'w'),
        ('\u{03C4}', 't'),
        ('\u{03B1}', 'a'),
        ('\u{03B9}', 'i'),
        ('\u{03BA}', 'k'),
        ('\u{03C1}', 'p'),
        ('\u{03C5}', 'u'),
        ('\u{039F}', 'O'),
        ('\u{0391}', 'A'),
        ('\u{0392}', 'B'),
        ('\u{0395}', 'E'),
    ]
    .into_iter()
    .collect()
});

/// Latin letter imitated by `c`, if `c` is a known confusable.
pub fn looks_like(c: char) -> Option<char> {
    CONFUSABLES.get(&c).copied()
}

/// Distinct confusables in `text`, in order of first appearance.
pub fn scan(text: &str) -> Vec<HomographHit> {
    let mut hits: Vec<HomographHit> = Vec::new();
    for c in text.chars().filter(|c| !c.is_ascii()) {
        let Some(latin) = looks_like(c) else {
            continue;
        };
        if hits.iter().any(|h| h.found == c) {
            continue;
        }
        hits.push(HomographHit {
            found: c,
            looks_like: latin,
            script: c.script().full_name().to_string(),
        });
    }
    hits
}

/// Replace each confusable with the letter it imitates.
pub fn skeleton(text: &str) -> String {
    text.chars().map(|c| looks_like(c).unwrap_or(c)).collect()
}
