//! Built-in rule catalog, ordered critical to low.

use super::{Hit, Rule, RuleContext, RuleId};
use crate::core::Severity;
use once_cell::sync::Lazy;
use regex::Regex;

/// Brands checked for mimicry in the host.
const MIMICRY_BRANDS: &[&str] = &[
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
    "steam",
    "ebay",
    "walmart",
    "target",
    "bestbuy",
    "outlook",
    "yahoo",
    "dhl",
    "fedex",
    "ups",
    "usps",
    "coinbase",
    "binance",
    "venmo",
    "zelle",
];

/// Words glued to a brand with a hyphen in mimicking hosts.
const MIMICRY_SUFFIXES: &[&str] = &[
    "secure", "login", "verify", "update", "account", "support", "help", "service", "team",
    "alert", "confirm", "auth", "billing", "payment", "recovery", "unlock", "suspended",
];

const HIGH_RISK_KEYWORDS: &[&str] = &["verify", "suspend", "confirm", "unlock", "unusual", "limited"];

const SENSITIVE_KEYWORDS: &[&str] = &[
    "login",
    "signin",
    "password",
    "account",
    "banking",
    "payment",
    "verify",
    "secure",
    "credential",
    "authenticate",
    "wallet",
    "crypto",
];

const PLAIN_HTTP_KEYWORDS: &[&str] = &["login", "signin", "password", "account", "banking", "payment"];

static RE_BRAND_THEN_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(paypal|amazon|google|facebook|microsoft|apple|netflix|instagram|twitter|linkedin)[-.]?(secure|login|verify|update|account|support|help|service)",
    )
    .expect("valid brand/word regex")
});

static RE_WORD_THEN_BRAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(secure|login|verify|update|account|support|help|service)[-.]?(paypal|amazon|google|facebook|microsoft|apple|netflix|instagram|twitter|linkedin)",
    )
    .expect("valid word/brand regex")
});

static RE_CONSONANT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[bcdfghjklmnpqrstvwxz]{4,}").expect("valid consonant regex"));
static RE_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,}").expect("valid digit regex"));
static RE_ALTERNATING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]\d[a-z]\d").expect("valid alternation regex"));

static RE_SUSPICIOUS_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"/\.well-known/|/wp-admin/|/wp-includes/|/login\.php|/signin\.php|/verify\.html|/account\.html|/secure/|/auth/|/validation/|/confirmation/",
    )
    .expect("valid path regex")
});

fn rule(
    id: RuleId,
    severity: Severity,
    weight: f64,
    always_run: bool,
    check: super::CheckFn,
) -> Rule {
    Rule {
        id,
        severity,
        weight,
        always_run,
        check,
    }
}

/// Every built-in rule.
pub fn all() -> Vec<Rule> {
    use RuleId::*;
    use Severity::*;
    vec![
        rule(Typosquatting, Critical, 0.95, false, typosquatting),
        rule(Homograph, Critical, 0.9, true, homograph),
        rule(BrandMimicry, Critical, 0.85, false, brand_mimicry),
        rule(DangerousScheme, Critical, 0.9, true, dangerous_scheme),
        rule(IpAddress, High, 0.8, false, ip_address),
        rule(AtSymbol, High, 0.7, false, at_symbol),
        rule(BrandInSubdomain, High, 0.8, false, brand_in_subdomain),
        rule(InsecureSensitivePage, High, 0.7, false, insecure_sensitive_page),
        rule(SuspiciousTld, Medium, 0.4, false, suspicious_tld),
        rule(SuspiciousKeywords, Medium, 0.4, false, suspicious_keywords),
        rule(ExcessiveSubdomains, Medium, 0.5, false, excessive_subdomains),
        rule(HighEntropy, Medium, 0.35, false, high_entropy),
        rule(DoubleSlashRedirect, Medium, 0.6, false, double_slash_redirect),
        rule(RandomStringDomain, Medium, 0.6, false, random_string_domain),
        rule(SuspiciousPath, Medium, 0.5, false, suspicious_path),
        rule(MultipleHyphens, Medium, 0.4, false, multiple_hyphens),
        rule(PunycodeDomain, Medium, 0.5, false, punycode_domain),
        rule(LongUrl, Low, 0.2, false, long_url),
        rule(UrlShortener, Low, 0.3, false, url_shortener),
        rule(MissingHttps, Low, 0.3, false, missing_https),
        rule(RedirectParameter, Low, 0.3, false, redirect_parameter),
    ]
}

/// Short brands must be a whole host token; longer ones may be embedded.
fn mentions(text: &str, brand: &str) -> bool {
    if brand.len() < 4 {
        text.split(['.', '-']).any(|t| t == brand)
    } else {
        text.contains(brand)
    }
}

// Critical

fn typosquatting(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    if f.is_typosquatting {
        let brand = f.typosquatting_target.as_deref().unwrap_or("a known brand");
        return Some(Hit::full(format!(
            "Typosquatting detected: '{}' mimics '{}' (similarity {:.2})",
            f.domain, brand, f.typosquatting_similarity
        )));
    }
    let host = f.host.as_str();
    RE_BRAND_THEN_WORD
        .find(host)
        .or_else(|| RE_WORD_THEN_BRAND.find(host))
        .map(|m| {
            Hit::scaled(
                0.8,
                format!("Suspicious brand + keyword combination in domain: {}", m.as_str()),
            )
        })
}

fn homograph(ctx: &RuleContext<'_>) -> Option<Hit> {
    let hit = ctx.features.homograph_chars.first()?;
    Some(Hit::full(format!(
        "Potential homograph attack: '{}' ({}) looks like '{}'",
        hit.found, hit.script, hit.looks_like
    )))
}

fn brand_mimicry(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    if f.has_ip || f.domain.is_empty() {
        return None;
    }
    let full = f.full_domain();
    for brand in MIMICRY_BRANDS.iter().copied() {
        if !mentions(&full, brand) {
            continue;
        }
        for word in MIMICRY_SUFFIXES {
            if full.contains(&format!("{brand}-{word}")) || full.contains(&format!("{word}-{brand}")) {
                return Some(Hit::full(format!(
                    "Brand mimicry: '{brand}' combined with suspicious suffix '{word}'"
                )));
            }
        }
        if mentions(&f.subdomain, brand) && !mentions(&f.domain, brand) {
            return Some(Hit::full(format!(
                "Brand '{brand}' in subdomain pointing to different domain"
            )));
        }
    }
    None
}

fn dangerous_scheme(ctx: &RuleContext<'_>) -> Option<Hit> {
    let o = &ctx.features.obfuscation;
    if o.has_data_uri {
        Some(Hit::full("Data URI scheme can hide malicious content"))
    } else if o.has_javascript_uri {
        Some(Hit::full("Script URI scheme executes code instead of loading a page"))
    } else {
        None
    }
}

// High

fn ip_address(ctx: &RuleContext<'_>) -> Option<Hit> {
    ctx.features
        .has_ip
        .then(|| Hit::full("URL contains IP address instead of domain"))
}

fn at_symbol(ctx: &RuleContext<'_>) -> Option<Hit> {
    ctx.features
        .has_userinfo
        .then(|| Hit::full("URL contains @ symbol which may hide real destination"))
}

fn brand_in_subdomain(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    f.has_brand_in_subdomain
        .then(|| Hit::full(format!("Brand name detected in subdomain: {}", f.subdomain)))
}

fn insecure_sensitive_page(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    if f.has_https || f.parse_error.is_some() {
        return None;
    }
    let found: Vec<&str> = f
        .suspicious_keywords
        .iter()
        .map(String::as_str)
        .filter(|k| SENSITIVE_KEYWORDS.contains(k))
        .take(3)
        .collect();
    (!found.is_empty()).then(|| {
        Hit::full(format!(
            "Sensitive page without HTTPS: contains '{}'",
            found.join(", ")
        ))
    })
}

// Medium

fn suspicious_tld(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    f.suspicious_tld
        .then(|| Hit::full(format!("Suspicious TLD detected: .{}", f.tld)))
}

fn suspicious_keywords(ctx: &RuleContext<'_>) -> Option<Hit> {
    let keywords = &ctx.features.suspicious_keywords;
    let high_risk: Vec<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|k| HIGH_RISK_KEYWORDS.iter().any(|h| k.starts_with(h)))
        .collect();

    if high_risk.len() >= 2 {
        Some(Hit::full(format!(
            "Multiple high-risk keywords found: {}",
            high_risk.iter().take(5).copied().collect::<Vec<_>>().join(", ")
        )))
    } else if keywords.len() >= 3 {
        Some(Hit::scaled(
            0.7,
            format!(
                "Multiple suspicious keywords found: {}",
                keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
            ),
        ))
    } else if let [one] = high_risk.as_slice() {
        Some(Hit::scaled(0.5, format!("High-risk keyword found: {one}")))
    } else {
        None
    }
}

fn excessive_subdomains(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    f.excessive_subdomains.then(|| {
        Hit::full(format!(
            "Excessive subdomains detected ({})",
            f.subdomain_count
        ))
    })
}

fn high_entropy(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    let cfg = ctx.config;
    if f.entropy > cfg.high_entropy_threshold && f.url_length < 80 {
        return Some(Hit::full(format!(
            "High entropy ({:.2}) suggests random/obfuscated URL",
            f.entropy
        )));
    }
    (f.entropy > cfg.very_high_entropy_threshold)
        .then(|| Hit::scaled(0.8, format!("Very high entropy ({:.2}) in URL", f.entropy)))
}

fn double_slash_redirect(ctx: &RuleContext<'_>) -> Option<Hit> {
    ctx.features
        .has_double_slash_redirect
        .then(|| Hit::full("Double slash in path may indicate redirect"))
}

fn random_string_domain(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    if f.has_ip {
        return None;
    }
    let label = f.domain_label().to_ascii_lowercase();
    if label.chars().count() < 5 {
        return None;
    }
    if RE_CONSONANT_RUN.is_match(&label)
        || RE_DIGIT_RUN.is_match(&label)
        || RE_ALTERNATING.is_match(&label)
    {
        return Some(Hit::full(format!(
            "Domain '{label}' appears randomly generated"
        )));
    }
    (f.entropy > 4.5 && label.chars().count() > 10)
        .then(|| Hit::scaled(0.8, "High entropy domain suggests random generation"))
}

fn suspicious_path(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    let path = f.path.to_ascii_lowercase();
    if let Some(m) = RE_SUSPICIOUS_PATH.find(&path) {
        return Some(Hit::full(format!(
            "Suspicious path pattern detected: {}",
            m.as_str()
        )));
    }
    let escapes = f.obfuscation.percent_escapes;
    (escapes > 3).then(|| {
        Hit::scaled(
            0.7,
            format!("Multiple encoded characters in URL ({escapes})"),
        )
    })
}

fn multiple_hyphens(ctx: &RuleContext<'_>) -> Option<Hit> {
    let hyphens = ctx.features.domain_label().matches('-').count();
    match hyphens {
        n if n >= 4 => Some(Hit::full(format!("Excessive hyphens in domain ({n})"))),
        3 => Some(Hit::scaled(
            0.6,
            "Multiple hyphens in domain may indicate phishing",
        )),
        _ => None,
    }
}

fn punycode_domain(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    f.obfuscation
        .has_punycode
        .then(|| Hit::full(format!("Internationalized (punycode) host: {}", f.host)))
}

// Low

fn long_url(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    let cfg = ctx.config;
    if f.url_length > cfg.long_url_threshold && (f.suspicious_tld || f.has_ip) {
        return Some(Hit::full(format!(
            "URL length ({}) exceeds threshold with suspicious indicators",
            f.url_length
        )));
    }
    (f.url_length > cfg.very_long_url_threshold)
        .then(|| Hit::full(format!("Very long URL ({} chars)", f.url_length)))
}

fn url_shortener(ctx: &RuleContext<'_>) -> Option<Hit> {
    ctx.features
        .is_shortened
        .then(|| Hit::full("URL uses shortening service"))
}

fn missing_https(ctx: &RuleContext<'_>) -> Option<Hit> {
    let f = ctx.features;
    if f.has_https || f.parse_error.is_some() {
        return None;
    }
    f.suspicious_keywords
        .iter()
        .any(|k| PLAIN_HTTP_KEYWORDS.contains(&k.as_str()))
        .then(|| Hit::full("Sensitive page without HTTPS encryption"))
}

fn redirect_parameter(ctx: &RuleContext<'_>) -> Option<Hit> {
    ctx.features
        .obfuscation
        .has_redirect_param
        .then(|| Hit::full("Query carries a redirect target parameter"))
}
