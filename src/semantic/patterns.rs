//! Weighted pattern table for the deterministic scorer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Where a pattern is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Host only, so path text cannot trigger it.
    Host,
    /// The whole lowercased URL.
    Url,
}

struct WeightedPattern {
    regex: Regex,
    description: &'static str,
    weight: f64,
    scope: Scope,
    /// Brand the pattern imitates; skipped on that brand's own domain.
    genuine: Option<&'static str>,
}

fn pattern(
    re: &str,
    description: &'static str,
    weight: f64,
    scope: Scope,
    genuine: Option<&'static str>,
) -> WeightedPattern {
    WeightedPattern {
        regex: Regex::new(re).expect("valid pattern"),
        description,
        weight,
        scope,
        genuine,
    }
}

static PATTERNS: Lazy<Vec<WeightedPattern>> = Lazy::new(|| {
    use Scope::{Host, Url};
    let brand = |re, description, weight, genuine| pattern(re, description, weight, Url, Some(genuine));
    vec![
        // Character confusables
        pattern(r"0", "'0' standing in for 'o'", 0.3, Host, None),
        pattern(r"1", "'1' standing in for 'l/i'", 0.3, Host, None),
        pattern(r"vv", "'vv' standing in for 'w'", 0.4, Host, None),
        pattern(r"rn", "'rn' standing in for 'm'", 0.35, Host, None),
        pattern(r"cl", "'cl' standing in for 'd'", 0.3, Host, None),
        // Hyphenated lure words
        pattern(r"-login", "login subdomain", 0.5, Url, None),
        pattern(r"-secure", "secure subdomain", 0.5, Url, None),
        pattern(r"-verify", "verify subdomain", 0.6, Url, None),
        pattern(r"-account", "account subdomain", 0.5, Url, None),
        pattern(r"-update", "update subdomain", 0.5, Url, None),
        pattern(r"-confirm", "confirm subdomain", 0.6, Url, None),
        // Brand spellings
        brand(r"paypa[l1]", "paypal mimicking", 0.7, "paypal"),
        brand(r"amaz[o0]n", "amazon mimicking", 0.7, "amazon"),
        brand(r"g[o0]{2}gle", "google mimicking", 0.7, "google"),
        brand(r"faceb[o0]{2}k", "facebook mimicking", 0.7, "facebook"),
        brand(r"micr[o0]s[o0]ft", "microsoft mimicking", 0.7, "microsoft"),
        brand(r"app[l1]e", "apple mimicking", 0.7, "apple"),
        brand(r"netf[l1]ix", "netflix mimicking", 0.7, "netflix"),
        brand(r"linked[l1]n", "linkedin mimicking", 0.6, "linkedin"),
        brand(r"hotmai[l1i]|hotma[l1i]{2}", "hotmail mimicking", 0.7, "hotmail"),
        brand(r"outl[o0]{2}k", "outlook mimicking", 0.7, "outlook"),
        brand(r"yah[o0]{2}", "yahoo mimicking", 0.7, "yahoo"),
        brand(r"twitt[e3]r", "twitter mimicking", 0.6, "twitter"),
        brand(r"instag(?:r)?am", "instagram mimicking", 0.6, "instagram"),
        brand(r"whatsap+", "whatsapp mimicking", 0.6, "whatsapp"),
        // Structure
        pattern(
            r"\.(?:xyz|tk|ml|ga|cf|gq|top|loan|work|click)(?:[/:?#]|$)",
            "suspicious tld",
            0.5,
            Url,
            None,
        ),
        pattern(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}", "ip address", 0.6, Url, None),
        pattern(r"%[0-9a-f]{2}", "url encoding", 0.2, Url, None),
        pattern(r"(?:[a-z0-9-]+\.){4,}", "many subdomains", 0.4, Url, None),
        pattern(r"[a-z0-9]{20,}", "long random string", 0.4, Url, None),
    ]
});

static SAFE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https://(?:www\.)?(?:google|amazon|microsoft|apple|facebook|github|linkedin)\.com(?:[/:?#]|$)",
    )
    .expect("valid pattern")
});

pub const SAFE_DESCRIPTION: &str = "Known legitimate domain";

/// Result of the pattern table over one URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternOutcome {
    /// Summed weights, capped at 1.0.
    pub score: f64,
    pub matched: Vec<String>,
    /// The URL hit the known-safe allowlist.
    pub safe: bool,
}

/// Score a lowercased URL. `host` and `domain_label` scope the host-only
/// patterns and the brand exclusions.
pub fn score(url: &str, host: &str, domain_label: &str, safe_score: f64) -> PatternOutcome {
    if SAFE_URL.is_match(url) {
        return PatternOutcome {
            score: safe_score,
            matched: vec![SAFE_DESCRIPTION.to_string()],
            safe: true,
        };
    }

    let mut score = 0.0;
    let mut matched = Vec::new();
    for p in PATTERNS.iter() {
        if p.genuine.is_some_and(|g| g == domain_label) {
            continue;
        }
        let haystack = match p.scope {
            Scope::Host => host,
            Scope::Url => url,
        };
        if p.regex.is_match(haystack) {
            score += p.weight;
            matched.push(p.description.to_string());
        }
    }

    let special = url.chars().filter(|c| matches!(c, '-' | '_' | '.')).count();
    if special > 5 {
        score += 0.2;
        matched.push("many special chars".to_string());
    }
    if url.chars().count() > 100 {
        score += 0.15;
        matched.push("long url".to_string());
    }
    if !url.starts_with("https://") {
        score += 0.1;
        matched.push("no https".to_string());
    }

    PatternOutcome {
        score: f64::min(score, 1.0),
        matched,
        safe: false,
    }
}
