//! Split a host into subdomain, registrable domain and public suffix.
//!
//! The suffix table is deliberately small: well-known two-label country
//! suffixes are recognized, anything else is treated as a single-label TLD
//! and the registrable domain is the last two labels.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static MULTI_LABEL_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "net.uk", "com.au", "net.au", "org.au",
        "edu.au", "gov.au", "co.nz", "org.nz", "co.jp", "ne.jp", "or.jp", "co.in", "org.in",
        "co.za", "co.kr", "com.br", "com.cn", "com.mx", "com.tr", "com.sg", "com.hk", "com.tw",
        "com.ar", "com.my", "com.ph", "com.ua", "com.pl", "co.il", "co.id",
    ]
    .into_iter()
    .collect()
});

/// Host decomposition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostParts {
    pub subdomain: String,
    /// Registrable domain including its suffix (`example.co.uk`).
    pub domain: String,
    pub tld: String,
}

impl HostParts {
    pub fn subdomain_count(&self) -> usize {
        if self.subdomain.is_empty() {
            0
        } else {
            self.subdomain.split('.').count()
        }
    }
}

/// Split `host` (already lowercased, no port). IP literals are returned as
/// the domain with no suffix.
pub fn split_host(host: &str, is_ip: bool) -> HostParts {
    let host = host.trim_end_matches('.');
    if is_ip {
        return HostParts {
            domain: host.to_string(),
            ..HostParts::default()
        };
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    match labels.len() {
        0 => HostParts::default(),
        1 => HostParts {
            domain: labels[0].to_string(),
            ..HostParts::default()
        },
        n => {
            let last_two = format!("{}.{}", labels[n - 2], labels[n - 1]);
            let suffix_labels = if n >= 3 && MULTI_LABEL_SUFFIXES.contains(last_two.as_str()) {
                2
            } else {
                1
            };
            let domain_start = n - suffix_labels - 1;
            HostParts {
                subdomain: labels[..domain_start].join("."),
                domain: labels[domain_start..].join("."),
                tld: labels[n - suffix_labels..].join("."),
            }
        }
    }
}

/// Every suffix of `host` down to and including its last label, longest first.
///
/// `a.b.example.com` yields `a.b.example.com`, `b.example.com`,
/// `example.com`, `com`.
pub fn suffix_chain(host: &str) -> impl Iterator<Item = &str> {
    let host = host.trim_end_matches('.');
    std::iter::successors(Some(host), |h| h.split_once('.').map(|(_, rest)| rest))
        .filter(|h| !h.is_empty())
}
