//! Word-level token pass: brand names outside the registrable label and
//! near-miss spellings of brands.

use crate::similarity::is_near_miss;

pub const TOKEN_BRANDS: [&str; 18] = [
    "google", "amazon", "paypal", "microsoft", "apple", "facebook", "netflix", "linkedin",
    "twitter", "instagram", "chase", "wellsfargo", "hotmail", "outlook", "yahoo", "whatsapp",
    "telegram", "snapchat",
];

/// Weight of an exact brand token outside the domain label.
const BRAND_ELSEWHERE: f64 = 0.3;
/// Weight of a token one or two edits from a brand.
const NEAR_MISS: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenOutcome {
    pub tokens: Vec<String>,
    /// Unscaled sum of token findings.
    pub score: f64,
    pub findings: Vec<String>,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '/' | '-' | '.' | '_' | '?' | '&' | '=')
}

/// Split one delimiter-free part into lowercase words, acronyms and digit runs.
fn split_words(part: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = part.char_indices().collect();
    let end_of = |i: usize| chars.get(i).map_or(part.len(), |(b, _)| *b);
    let run = |from: usize, pred: fn(&char) -> bool| {
        chars[from..].iter().take_while(|(_, c)| pred(c)).count()
    };

    let mut words = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (start, c) = chars[i];
        let len = if c.is_ascii_digit() {
            run(i, char::is_ascii_digit)
        } else if c.is_ascii_lowercase() {
            run(i, char::is_ascii_lowercase)
        } else if c.is_ascii_uppercase() {
            let upper = run(i, char::is_ascii_uppercase);
            let lower_after = run(i + upper, char::is_ascii_lowercase);
            match (upper, lower_after) {
                // "Word"
                (1, l) if l > 0 => 1 + l,
                // "HTTPServer": the acronym stops before the capital of the next word
                (u, l) if l > 0 => u - 1,
                (u, _) => u,
            }
        } else {
            i += 1;
            continue;
        };
        words.push(&part[start..end_of(i + len)]);
        i += len;
    }
    words
}

/// Tokens of a URL with its scheme removed.
pub fn tokenize(url: &str) -> Vec<String> {
    let lower = url.to_ascii_lowercase();
    let skip = if lower.starts_with("https://") {
        8
    } else if lower.starts_with("http://") {
        7
    } else {
        0
    };
    let rest = &url[skip..];
    let mut tokens = Vec::new();
    for part in rest.split(is_delimiter).filter(|p| !p.is_empty()) {
        let words = split_words(part);
        if words.is_empty() {
            tokens.push(part.to_string());
        } else {
            tokens.extend(words.into_iter().map(str::to_string));
        }
    }
    tokens
}

/// Run the token pass. `domain_label` is the registrable domain's leftmost
/// label; brand tokens contained in it are the site's own name.
pub fn analyze(url: &str, domain_label: &str) -> TokenOutcome {
    let tokens = tokenize(url);
    let mut score = 0.0;
    let mut findings = Vec::new();
    for token in &tokens {
        let token = token.to_lowercase();
        for brand in TOKEN_BRANDS {
            if token == brand {
                if !domain_label.contains(brand) {
                    score += BRAND_ELSEWHERE;
                    findings.push(format!("brand '{brand}' in path"));
                }
            } else if is_near_miss(&token, brand, 2) {
                score += NEAR_MISS;
                findings.push(format!("similar to '{brand}'"));
            }
        }
    }
    TokenOutcome {
        tokens,
        score,
        findings,
    }
}
