//! Obfuscation indicators: percent-encoding, punycode, script URIs,
//! base64 blobs and open-redirect parameters.

use crate::core::ObfuscationFlags;
use crate::features::lexicon::REDIRECT_PARAMS;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static RE_PERCENT_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").expect("valid percent escape regex"));

/// `scheme://` prefix.
pub(crate) static RE_HIERARCHICAL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.\-]*://").expect("valid scheme regex"));

/// Schemes that carry their payload inline instead of an authority.
pub(crate) static RE_OPAQUE_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:data|javascript|vbscript|mailto|blob):").expect("valid opaque scheme regex")
});

/// Inputs inspected by [`detect`].
pub struct ObfuscationInput<'a> {
    /// URL as received, before percent-decoding.
    pub raw: &'a str,
    /// Decoded text.
    pub decoded: &'a str,
    pub url: &'a Url,
    pub base64_min_run: usize,
}

pub fn detect(input: &ObfuscationInput<'_>) -> ObfuscationFlags {
    let raw_len = input.raw.chars().count();
    let percent_escapes = RE_PERCENT_ESCAPE.find_iter(input.raw).count();
    let percent_encoding_density = if raw_len == 0 {
        0.0
    } else {
        ((percent_escapes * 3) as f64 / raw_len as f64).min(1.0)
    };

    let scheme = input.url.scheme();
    let host = input.url.host_str().unwrap_or("");
    let lower = input.decoded.to_ascii_lowercase();

    ObfuscationFlags {
        percent_encoding_density,
        percent_escapes,
        has_punycode: host.split('.').any(|l| l.starts_with("xn--")),
        has_data_uri: scheme == "data" || lower.contains("data:text/html"),
        has_javascript_uri: matches!(scheme, "javascript" | "vbscript")
            || lower.contains("javascript:"),
        has_base64_blob: has_base64_run(input.decoded, input.base64_min_run),
        has_redirect_param: has_redirect_param(input.url),
    }
}

/// True if a query parameter name is a known redirect carrier.
pub fn has_redirect_param(url: &Url) -> bool {
    url.query_pairs()
        .any(|(k, _)| REDIRECT_PARAMS.contains(k.to_ascii_lowercase().as_str()))
}

/// True if `text` holds a run of at least `min_run` base64 characters that
/// mixes upper case, lower case and digits.
pub fn has_base64_run(text: &str, min_run: usize) -> bool {
    if min_run == 0 {
        return false;
    }
    let mut run = 0usize;
    let (mut upper, mut lower, mut digit) = (false, false, false);
    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_alphanumeric() || c == '+' || c == '=' {
            run += 1;
            upper |= c.is_ascii_uppercase();
            lower |= c.is_ascii_lowercase();
            digit |= c.is_ascii_digit();
            continue;
        }
        if run >= min_run && upper && lower && digit {
            return true;
        }
        run = 0;
        upper = false;
        lower = false;
        digit = false;
    }
    false
}
