//! Fixed vocabularies used by the extractor: TLDs, shorteners, phishing
//! keywords, brand dictionaries and redirect parameter names.

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

/// TLDs heavily abused by free or low-cost registration.
pub static SUSPICIOUS_TLDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "tk", "ml", "ga", "cf", "gq", "xyz", "top", "club", "online", "site", "website", "space",
        "pw", "cc", "ws", "info", "biz",
    ]
    .into_iter()
    .collect()
});

/// Link-shortening services (matched against the registrable domain).
pub static URL_SHORTENERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bit.ly",
        "tinyurl.com",
        "t.co",
        "goo.gl",
        "ow.ly",
        "is.gd",
        "buff.ly",
        "adf.ly",
        "bit.do",
        "mcaf.ee",
        "su.pr",
        "tiny.cc",
        "shorte.st",
        "cutt.ly",
        "rebrand.ly",
        "shorturl.at",
    ]
    .into_iter()
    .collect()
});

/// Phishing-related vocabulary, matched case-insensitively as substrings.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "login",
    "signin",
    "sign-in",
    "log-in",
    "account",
    "verify",
    "verification",
    "update",
    "confirm",
    "secure",
    "security",
    "banking",
    "bank",
    "paypal",
    "ebay",
    "amazon",
    "apple",
    "microsoft",
    "google",
    "facebook",
    "instagram",
    "netflix",
    "password",
    "credential",
    "authenticate",
    "wallet",
    "crypto",
    "bitcoin",
    "suspended",
    "unusual",
    "activity",
    "locked",
    "unlock",
    "restore",
    "recover",
    "urgent",
    "immediately",
    "expire",
    "limited",
    "free",
    "winner",
    "prize",
    "congratulation",
];

static KEYWORD_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::Standard)
        .build(SUSPICIOUS_KEYWORDS)
        .expect("valid keyword automaton")
});

/// Brands whose appearance in a subdomain suggests impersonation.
pub const SUBDOMAIN_BRANDS: &[&str] = &[
    "google",
    "facebook",
    "apple",
    "microsoft",
    "amazon",
    "paypal",
    "netflix",
    "instagram",
    "twitter",
    "linkedin",
];

/// High-value brands checked for typosquatting.
pub const TYPOSQUAT_BRANDS: &[&str] = &[
    "paypal",
    "amazon",
    "google",
    "facebook",
    "microsoft",
    "apple",
    "netflix",
    "instagram",
    "twitter",
    "linkedin",
    "dropbox",
    "chase",
    "wellsfargo",
    "bankofamerica",
    "citibank",
    "usbank",
    "ebay",
    "walmart",
    "bestbuy",
    "office365",
    "outlook",
    "yahoo",
    "icloud",
    "coinbase",
    "binance",
    "dhl",
    "fedex",
    "ups",
    "usps",
];

/// Query parameter names commonly abused for open redirects.
pub static REDIRECT_PARAMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "url",
        "redirect",
        "redirect_url",
        "redirect_uri",
        "redir",
        "next",
        "return",
        "returnurl",
        "return_url",
        "return_to",
        "goto",
        "dest",
        "destination",
        "continue",
        "forward",
        "rurl",
    ]
    .into_iter()
    .collect()
});

/// Distinct vocabulary words found in `text`, in vocabulary order.
pub fn find_keywords(text: &str) -> Vec<String> {
    let hits: BTreeSet<usize> = KEYWORD_MATCHER
        .find_overlapping_iter(text)
        .map(|m| m.pattern().as_usize())
        .collect();
    hits.into_iter()
        .map(|i| SUSPICIOUS_KEYWORDS[i].to_string())
        .collect()
}

pub fn is_suspicious_tld(tld: &str) -> bool {
    let last = tld.rsplit('.').next().unwrap_or(tld);
    SUSPICIOUS_TLDS.contains(last.to_ascii_lowercase().as_str())
}

pub fn is_shortener(domain: &str, host: &str) -> bool {
    URL_SHORTENERS.contains(domain) || URL_SHORTENERS.contains(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_overlap_and_ignore_case() {
        let found = find_keywords("http://EXAMPLE.com/Verification/SignIn");
        assert!(!found.contains(&"verify".to_string()));
        assert!(found.contains(&"verification".to_string()));
        assert!(found.contains(&"signin".to_string()));
    }

    #[test]
    fn keywords_are_distinct_and_ordered() {
        let found = find_keywords("login login paypal-login");
        assert_eq!(found, vec!["login".to_string(), "paypal".to_string()]);
    }

    #[test]
    fn shortener_exact_domain_only() {
        assert!(is_shortener("bit.ly", "bit.ly"));
        // "t.co" is a substring of microsoft.com but not a shortener
        assert!(!is_shortener("microsoft.com", "www.microsoft.com"));
    }

    #[test]
    fn tld_lookup() {
        assert!(is_suspicious_tld("tk"));
        assert!(is_suspicious_tld("XYZ"));
        assert!(!is_suspicious_tld("com"));
        assert!(!is_suspicious_tld("co.uk"));
    }
}
