//! URL feature extraction.
//!
//! Turns an arbitrary string into a [`FeatureSet`]. Extraction is total:
//! input that cannot be parsed yields [`FeatureSet::minimal`] with the parse
//! error recorded, never a panic or an error.
//!
//! Pipeline: bound the length, undo defanging, percent-decode, add a default
//! scheme, parse with `url`, then derive counts, lexicon hits, look-alikes and
//! obfuscation flags.

pub mod domain;
pub mod homograph;
pub mod lexicon;
pub mod normalize;
pub mod patterns;

use crate::config::ExtractorConfig;
use crate::core::FeatureSet;
use crate::entropy::shannon_entropy;
use crate::error::{PhishGuardError, Result};
use crate::similarity::{best_brand_match, MatchLimits};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use tracing::debug;
use url::{Host, Url};

pub use domain::{split_host, suffix_chain, HostParts};

/// Host and registrable domain of a URL, used by the intel gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub domain: String,
}

/// Parsed form of one URL.
struct Parsed<'a> {
    raw: &'a str,
    decoded: Cow<'a, str>,
    url: Url,
    host: String,
    is_ip: bool,
    parts: HostParts,
}

/// Stateless extractor bound to a configuration.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the full feature set. Never fails.
    pub fn extract(&self, raw: &str) -> FeatureSet {
        match self.parse(raw) {
            Ok(parsed) => self.build(parsed),
            Err(e) => {
                debug!(error = %e, "url did not parse; using minimal features");
                let bounded = normalize::truncate_chars(raw, self.config.max_url_length);
                FeatureSet::minimal(bounded, e.to_string())
            }
        }
    }

    /// Host and registrable domain only; empty strings when unparseable.
    pub fn target(&self, raw: &str) -> Target {
        self.parse(raw)
            .map(|p| Target {
                host: p.host,
                domain: p.parts.domain,
            })
            .unwrap_or_default()
    }

    fn parse<'a>(&self, raw: &'a str) -> Result<Parsed<'a>> {
        let bounded = normalize::truncate_chars(raw, self.config.max_url_length);
        let trimmed = bounded.trim();
        if trimmed.is_empty() {
            return Err(PhishGuardError::InvalidUrl("empty input".into()));
        }

        let defanged = normalize::normalize_defanged(trimmed, usize::MAX);
        let decoded: Cow<'a, str> = match defanged {
            Cow::Borrowed(s) => percent_decode_str(s).decode_utf8_lossy(),
            Cow::Owned(s) => Cow::Owned(percent_decode_str(&s).decode_utf8_lossy().into_owned()),
        };

        let has_scheme = patterns::RE_HIERARCHICAL_SCHEME.is_match(&decoded)
            || patterns::RE_OPAQUE_SCHEME.is_match(&decoded);
        let parsed = if has_scheme {
            Url::parse(&decoded)
        } else {
            Url::parse(&format!("http://{decoded}"))
        };
        let url = parsed.map_err(|e| PhishGuardError::InvalidUrl(e.to_string()))?;

        let is_ip = matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)));
        let host = url
            .host_str()
            .unwrap_or("")
            .trim_end_matches('.')
            .to_ascii_lowercase();
        let parts = split_host(&host, is_ip);

        Ok(Parsed {
            raw: bounded,
            decoded,
            url,
            host,
            is_ip,
            parts,
        })
    }

    fn build(&self, p: Parsed<'_>) -> FeatureSet {
        let cfg = &self.config;
        let text: &str = &p.decoded;
        let url_length = text.chars().count();

        let mut num_dots = 0;
        let mut num_hyphens = 0;
        let mut num_underscores = 0;
        let mut num_slashes = 0;
        let mut num_at_symbols = 0;
        let mut num_ampersands = 0;
        let mut num_equals = 0;
        let mut num_digits = 0;
        let mut num_letters = 0;
        let mut num_special_chars = 0;
        for c in text.chars() {
            match c {
                '.' => num_dots += 1,
                '-' => num_hyphens += 1,
                '_' => num_underscores += 1,
                '/' => num_slashes += 1,
                '@' => num_at_symbols += 1,
                '&' => num_ampersands += 1,
                '=' => num_equals += 1,
                _ => {}
            }
            if c.is_numeric() {
                num_digits += 1;
            } else if c.is_alphabetic() {
                num_letters += 1;
            } else if !matches!(c, '.' | '/' | '-' | '_') {
                num_special_chars += 1;
            }
        }
        let denom = url_length.max(1) as f64;

        let scheme = p.url.scheme().to_string();
        let path = p.url.path().to_string();
        let query = p.url.query().unwrap_or("").to_string();
        let subdomain_count = p.parts.subdomain_count();
        let domain_length = p.parts.domain.chars().count();

        let has_brand_in_subdomain = !p.parts.subdomain.is_empty()
            && lexicon::SUBDOMAIN_BRANDS
                .iter()
                .any(|b| p.parts.subdomain.contains(b));

        let (typosquatting_target, typosquatting_similarity, is_typosquatting) =
            self.typosquat(&p.parts, p.is_ip);

        let homograph_chars = homograph::scan(authority_of(text));
        let obfuscation = patterns::detect(&patterns::ObfuscationInput {
            raw: p.raw,
            decoded: text,
            url: &p.url,
            base64_min_run: cfg.base64_min_run,
        });

        FeatureSet {
            url_length,
            domain_length,
            subdomain_length: p.parts.subdomain.chars().count(),
            path_length: path.chars().count(),
            query_length: query.chars().count(),
            num_dots,
            num_hyphens,
            num_underscores,
            num_slashes,
            num_at_symbols,
            num_ampersands,
            num_equals,
            num_digits,
            num_special_chars,
            digit_ratio: num_digits as f64 / denom,
            letter_ratio: num_letters as f64 / denom,
            entropy: shannon_entropy(text),
            has_ip: p.is_ip,
            has_https: scheme == "https",
            has_port: has_explicit_port(authority_of(text)),
            has_at_symbol: num_at_symbols > 0,
            has_userinfo: !p.url.username().is_empty() || p.url.password().is_some(),
            has_double_slash_redirect: path.contains("//"),
            is_shortened: lexicon::is_shortener(&p.parts.domain, &p.host),
            suspicious_tld: !p.is_ip && lexicon::is_suspicious_tld(&p.parts.tld),
            excessive_subdomains: subdomain_count > cfg.excessive_subdomain_count,
            long_domain: domain_length > cfg.long_domain_length,
            has_brand_in_subdomain,
            suspicious_keywords: lexicon::find_keywords(text),
            typosquatting_target,
            typosquatting_similarity,
            is_typosquatting,
            has_homograph: !homograph_chars.is_empty(),
            homograph_chars,
            obfuscation,
            scheme,
            host: p.host,
            domain: p.parts.domain,
            subdomain: p.parts.subdomain,
            tld: p.parts.tld,
            path,
            query,
            subdomain_count,
            parse_error: None,
        }
    }

    /// Compare the registrable label (and its hyphen-separated parts) with
    /// the brand dictionary.
    fn typosquat(&self, parts: &HostParts, is_ip: bool) -> (Option<String>, f64, bool) {
        if is_ip || parts.domain.is_empty() {
            return (None, 0.0, false);
        }
        let label = parts.domain.split('.').next().unwrap_or("");
        let candidates = std::iter::once(label).chain(label.split('-').filter(|s| *s != label));
        let limits = MatchLimits {
            max_distance: self.config.typosquat_max_distance,
            min_brand_len: self.config.typosquat_min_length,
            max_len: self.config.max_token_length,
        };
        match best_brand_match(candidates, lexicon::TYPOSQUAT_BRANDS.iter().copied(), &limits) {
            Some(m) if m.similarity > self.config.typosquat_threshold => {
                (Some(m.brand), m.similarity, true)
            }
            Some(m) => (None, m.similarity, false),
            None => (None, 0.0, false),
        }
    }
}

/// Authority section (`user@host:port`) of a decoded URL; the whole text
/// for scheme-less or opaque input.
fn authority_of(text: &str) -> &str {
    let rest = text.find("://").map_or(text, |i| &text[i + 3..]);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// A `:digits` suffix after the host, including the scheme's default port,
/// which the parsed URL does not keep.
fn has_explicit_port(authority: &str) -> bool {
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let port = if host_port.starts_with('[') {
        host_port.rsplit_once("]:").map(|(_, p)| p)
    } else {
        host_port.rsplit_once(':').map(|(_, p)| p)
    };
    port.is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

/// Extract features with the default configuration.
pub fn extract(raw: &str) -> FeatureSet {
    FeatureExtractor::default().extract(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_search_is_plain() {
        let f = extract("https://www.google.com/search?q=weather");
        assert_eq!(f.domain, "google.com");
        assert_eq!(f.subdomain, "www");
        assert_eq!(f.tld, "com");
        assert!(f.has_https);
        assert!(!f.has_ip);
        assert!(!f.is_typosquatting);
        assert!(f.parse_error.is_none());
        assert_eq!(f.path, "/search");
        assert_eq!(f.query, "q=weather");
    }

    #[test]
    fn default_scheme_is_added() {
        let f = extract("example.com/login");
        assert_eq!(f.scheme, "http");
        assert_eq!(f.domain, "example.com");
        assert!(!f.has_https);
        assert!(f.suspicious_keywords.contains(&"login".to_string()));
    }

    #[test]
    fn ip_host() {
        let f = extract("http://192.168.1.1/login.php");
        assert!(f.has_ip);
        assert_eq!(f.domain, "192.168.1.1");
        assert!(!f.suspicious_tld);
        assert!(f.typosquatting_target.is_none());
    }

    #[test]
    fn typosquat_with_digit() {
        let f = extract("http://paypa1.com");
        assert!(f.is_typosquatting);
        assert_eq!(f.typosquatting_target.as_deref(), Some("paypal"));
        assert!(f.typosquatting_similarity > 0.7);
    }

    #[test]
    fn typosquat_on_hyphen_part() {
        let f = extract("http://secure-amaz0n.net/");
        assert_eq!(f.typosquatting_target.as_deref(), Some("amazon"));
    }

    #[test]
    fn genuine_brand_is_not_typosquatting() {
        let f = extract("https://www.paypal.com/signin");
        assert!(!f.is_typosquatting);
        assert!(f.typosquatting_target.is_none());
    }

    #[test]
    fn homograph_in_host() {
        let f = extract("http://p\u{0430}ypal.com");
        assert!(f.has_homograph);
        assert_eq!(f.homograph_chars[0].looks_like, 'a');
        // The url crate converts the host to its ASCII form
        assert!(f.obfuscation.has_punycode);
    }

    #[test]
    fn brand_in_subdomain_and_count() {
        let f = extract("http://paypal.secure-login.malicious.com/");
        assert!(f.has_brand_in_subdomain);
        assert_eq!(f.domain, "malicious.com");
        assert_eq!(f.subdomain_count, 2);
    }

    #[test]
    fn userinfo_trick() {
        let f = extract("http://paypal.com@evil.example/");
        assert!(f.has_userinfo);
        assert!(f.has_at_symbol);
        assert_eq!(f.domain, "evil.example");
    }

    #[test]
    fn defanged_and_encoded() {
        let f = extract("hxxp://evil[.]com/%6c%6f%67%69%6e");
        assert_eq!(f.domain, "evil.com");
        assert!(f.suspicious_keywords.contains(&"login".to_string()));
        assert_eq!(f.obfuscation.percent_escapes, 5);
    }

    #[test]
    fn unparseable_input_yields_minimal() {
        for raw in ["", "   ", "http://", "http://[::1"] {
            let f = extract(raw);
            assert!(f.parse_error.is_some(), "{raw:?}");
            assert_eq!(f.domain_length, 0);
        }
    }

    #[test]
    fn oversized_input_is_bounded() {
        let cfg = ExtractorConfig {
            max_url_length: 64,
            ..ExtractorConfig::default()
        };
        let long = format!("http://example.com/{}", "a".repeat(10_000));
        let f = FeatureExtractor::new(cfg).extract(&long);
        assert!(f.url_length <= 64);
    }

    #[test]
    fn target_exposes_host_and_domain() {
        let t = FeatureExtractor::default().target("https://mail.google.com/x");
        assert_eq!(t.host, "mail.google.com");
        assert_eq!(t.domain, "google.com");
        assert_eq!(FeatureExtractor::default().target(""), Target::default());
    }

    #[test]
    fn suspicious_tld_flag() {
        assert!(extract("http://free-prizes.tk").suspicious_tld);
        assert!(!extract("http://example.com").suspicious_tld);
    }

    #[test]
    fn non_latin_path_is_not_a_homograph() {
        let f = extract("https://ru.example.org/wiki/\u{0441}\u{043E}\u{0440}");
        assert!(!f.has_homograph);
    }

    #[test]
    fn default_ports_count_as_explicit() {
        assert!(extract("http://evil.example:80/login").has_port);
        assert!(extract("https://evil.example:443/").has_port);
        assert!(extract("http://evil.example:8080/").has_port);
        assert!(extract("http://user:pw@evil.example:80/").has_port);
        assert!(extract("http://[::1]:443/").has_port);
        assert!(!extract("http://user:pw@evil.example/").has_port);
        assert!(!extract("http://[::1]/").has_port);
        assert!(!extract("https://evil.example/a:1").has_port);
    }

    #[test]
    fn double_slash_in_path() {
        assert!(extract("http://example.com//evil.com/").has_double_slash_redirect);
    }
}
