//! Feature set extracted from a single URL.

use serde::{Deserialize, Serialize};

/// Names of the numeric projection, in vector order.
pub const FEATURE_NAMES: [&str; 26] = [
    "url_length",
    "domain_length",
    "subdomain_length",
    "path_length",
    "query_length",
    "num_dots",
    "num_hyphens",
    "num_underscores",
    "num_slashes",
    "num_at_symbols",
    "num_digits",
    "num_special_chars",
    "has_ip",
    "has_https",
    "has_port",
    "has_at_symbol",
    "entropy",
    "digit_ratio",
    "letter_ratio",
    "suspicious_tld",
    "subdomain_count",
    "num_suspicious_keywords",
    "is_shortened",
    "has_brand_in_subdomain",
    "excessive_subdomains",
    "long_domain",
];

/// Width of [`FeatureSet::numeric_vector`].
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// A confusable character found in the URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomographHit {
    pub found: char,
    pub looks_like: char,
    /// Unicode script of the confusable character (e.g. "Cyrillic").
    pub script: String,
}

/// Independent obfuscation indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObfuscationFlags {
    /// Share of the raw URL occupied by `%XX` escapes.
    pub percent_encoding_density: f64,
    /// Count of `%XX` escapes in the raw URL.
    pub percent_escapes: usize,
    pub has_punycode: bool,
    pub has_data_uri: bool,
    pub has_javascript_uri: bool,
    pub has_base64_blob: bool,
    pub has_redirect_param: bool,
}

/// Immutable lexical/structural description of one URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    // Lengths
    pub url_length: usize,
    pub domain_length: usize,
    pub subdomain_length: usize,
    pub path_length: usize,
    pub query_length: usize,

    // Character counts
    pub num_dots: usize,
    pub num_hyphens: usize,
    pub num_underscores: usize,
    pub num_slashes: usize,
    pub num_at_symbols: usize,
    pub num_ampersands: usize,
    pub num_equals: usize,
    pub num_digits: usize,
    pub num_special_chars: usize,

    // Ratios and entropy
    pub digit_ratio: f64,
    pub letter_ratio: f64,
    pub entropy: f64,

    // Structure
    pub scheme: String,
    pub host: String,
    /// Registrable domain (`example.com`), or the literal host for IPs.
    pub domain: String,
    pub subdomain: String,
    pub tld: String,
    pub path: String,
    pub query: String,
    pub subdomain_count: usize,

    // Flags
    pub has_ip: bool,
    pub has_https: bool,
    pub has_port: bool,
    pub has_at_symbol: bool,
    /// `@` inside the authority section (credential-prefix trick).
    pub has_userinfo: bool,
    pub has_double_slash_redirect: bool,
    pub is_shortened: bool,
    pub suspicious_tld: bool,
    pub excessive_subdomains: bool,
    pub long_domain: bool,
    pub has_brand_in_subdomain: bool,

    // Lexicon and lookalikes
    pub suspicious_keywords: Vec<String>,
    pub typosquatting_target: Option<String>,
    pub typosquatting_similarity: f64,
    pub is_typosquatting: bool,
    pub has_homograph: bool,
    pub homograph_chars: Vec<HomographHit>,
    pub obfuscation: ObfuscationFlags,

    /// Set when parsing failed and only the minimal set was produced.
    pub parse_error: Option<String>,
}

impl FeatureSet {
    /// Safe defaults for input that could not be parsed.
    pub fn minimal(raw: &str, error: impl Into<String>) -> Self {
        let lower = raw.trim_start().to_ascii_lowercase();
        Self {
            url_length: raw.chars().count(),
            entropy: crate::entropy::shannon_entropy(raw),
            has_https: lower.starts_with("https"),
            parse_error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Full host name (`sub.example.com`) used by domain allowlists.
    pub fn full_domain(&self) -> String {
        if self.subdomain.is_empty() {
            self.domain.clone()
        } else {
            format!("{}.{}", self.subdomain, self.domain)
        }
    }

    /// Leftmost label of the registrable domain (`example` for `example.com`).
    pub fn domain_label(&self) -> &str {
        self.domain.split('.').next().unwrap_or("")
    }

    /// Numeric projection consumed by the statistical classifier.
    pub fn numeric_vector(&self) -> [f64; FEATURE_COUNT] {
        let b = |v: bool| if v { 1.0 } else { 0.0 };
        [
            self.url_length as f64,
            self.domain_length as f64,
            self.subdomain_length as f64,
            self.path_length as f64,
            self.query_length as f64,
            self.num_dots as f64,
            self.num_hyphens as f64,
            self.num_underscores as f64,
            self.num_slashes as f64,
            self.num_at_symbols as f64,
            self.num_digits as f64,
            self.num_special_chars as f64,
            b(self.has_ip),
            b(self.has_https),
            b(self.has_port),
            b(self.has_at_symbol),
            self.entropy,
            self.digit_ratio,
            self.letter_ratio,
            b(self.suspicious_tld),
            self.subdomain_count as f64,
            self.suspicious_keywords.len() as f64,
            b(self.is_shortened),
            b(self.has_brand_in_subdomain),
            b(self.excessive_subdomains),
            b(self.long_domain),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_set_is_zeroed_but_keeps_entropy() {
        let f = FeatureSet::minimal("aaaa", "bad input");
        assert_eq!(f.url_length, 4);
        assert_eq!(f.entropy, 0.0);
        assert_eq!(f.domain_length, 0);
        assert!(f.suspicious_keywords.is_empty());
        assert_eq!(f.parse_error.as_deref(), Some("bad input"));
    }

    #[test]
    fn vector_width_matches_names() {
        let f = FeatureSet::default();
        assert_eq!(f.numeric_vector().len(), FEATURE_NAMES.len());
    }

    #[test]
    fn full_domain_joins_subdomain() {
        let f = FeatureSet {
            domain: "example.com".into(),
            subdomain: "a.b".into(),
            ..FeatureSet::default()
        };
        assert_eq!(f.full_domain(), "a.b.example.com");
        assert_eq!(f.domain_label(), "example");
    }
}
