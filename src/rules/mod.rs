//! Heuristic rule engine.
//!
//! Rules are plain records `{id, severity, weight, check}` evaluated
//! independently over one [`FeatureSet`]. Aggregation is tiered: the
//! dominant severity picks a base score, extra matches in that tier add an
//! increment up to the tier cap, and matches spanning several severities
//! earn a flat bonus.

pub mod catalog;
pub mod legit;

use crate::config::{RuleConfig, TierScore};
use crate::core::{FeatureSet, MatchedRule, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub use legit::{is_known_legitimate, KNOWN_LEGITIMATE_DOMAINS};

/// Stable identifier of a catalog rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    Typosquatting,
    Homograph,
    BrandMimicry,
    DangerousScheme,
    IpAddress,
    AtSymbol,
    BrandInSubdomain,
    InsecureSensitivePage,
    SuspiciousTld,
    SuspiciousKeywords,
    ExcessiveSubdomains,
    HighEntropy,
    DoubleSlashRedirect,
    RandomStringDomain,
    SuspiciousPath,
    MultipleHyphens,
    PunycodeDomain,
    LongUrl,
    UrlShortener,
    MissingHttps,
    RedirectParameter,
}

impl RuleId {
    /// Human-readable rule name.
    pub fn name(&self) -> &'static str {
        match self {
            RuleId::Typosquatting => "Typosquatting Attack",
            RuleId::Homograph => "Potential Homograph Attack",
            RuleId::BrandMimicry => "Brand Mimicry",
            RuleId::DangerousScheme => "Dangerous URI Scheme",
            RuleId::IpAddress => "IP Address in URL",
            RuleId::AtSymbol => "At Symbol in URL",
            RuleId::BrandInSubdomain => "Brand in Subdomain",
            RuleId::InsecureSensitivePage => "Missing HTTPS on Sensitive Page",
            RuleId::SuspiciousTld => "Suspicious TLD",
            RuleId::SuspiciousKeywords => "Suspicious Keywords",
            RuleId::ExcessiveSubdomains => "Excessive Subdomains",
            RuleId::HighEntropy => "High Entropy URL",
            RuleId::DoubleSlashRedirect => "Double Slash Redirect",
            RuleId::RandomStringDomain => "Random String Domain",
            RuleId::SuspiciousPath => "Suspicious Path Pattern",
            RuleId::MultipleHyphens => "Multiple Hyphens in Domain",
            RuleId::PunycodeDomain => "Punycode Domain",
            RuleId::LongUrl => "Abnormally Long URL",
            RuleId::UrlShortener => "URL Shortener",
            RuleId::MissingHttps => "Missing HTTPS",
            RuleId::RedirectParameter => "Redirect Parameter",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs visible to a rule check.
pub struct RuleContext<'a> {
    pub url: &'a str,
    pub features: &'a FeatureSet,
    pub config: &'a RuleConfig,
}

/// A positive check. `scale` multiplies the rule's base weight for weaker
/// matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub scale: f64,
    pub reason: String,
}

impl Hit {
    pub fn full(reason: impl Into<String>) -> Self {
        Self {
            scale: 1.0,
            reason: reason.into(),
        }
    }

    pub fn scaled(scale: f64, reason: impl Into<String>) -> Self {
        Self {
            scale,
            reason: reason.into(),
        }
    }
}

pub type CheckFn = fn(&RuleContext<'_>) -> Option<Hit>;

/// One catalog entry.
#[derive(Clone)]
pub struct Rule {
    pub id: RuleId,
    pub severity: Severity,
    pub weight: f64,
    /// Evaluated even for allowlisted domains.
    pub always_run: bool,
    pub check: CheckFn,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("weight", &self.weight)
            .field("always_run", &self.always_run)
            .finish()
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleReport {
    pub matched_rules: Vec<MatchedRule>,
    pub rule_score: f64,
    /// Highest matched severity, `Info` when nothing matched.
    pub severity: Severity,
    /// Number of rules actually evaluated.
    pub rules_checked: usize,
    pub is_known_legitimate: bool,
}

impl RuleReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.matched_rules
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }
}

/// Rule engine over the built-in catalog.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    config: RuleConfig,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl RuleEngine {
    /// Engine over the catalog minus the rules disabled in `config`.
    pub fn new(config: RuleConfig) -> Self {
        let rules = catalog::all()
            .into_iter()
            .filter(|r| !config.disabled.contains(&r.id))
            .collect();
        Self { rules, config }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Drop a rule by id. Returns whether it was present.
    pub fn remove(&mut self, id: RuleId) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        self.rules.len() != before
    }

    /// Run the catalog over one URL's features.
    pub fn evaluate(&self, url: &str, features: &FeatureSet) -> RuleReport {
        let is_known_legitimate = is_known_legitimate(features);
        let ctx = RuleContext {
            url,
            features,
            config: &self.config,
        };

        let mut matched_rules = Vec::new();
        let mut rules_checked = 0;
        for rule in &self.rules {
            if is_known_legitimate && !rule.always_run {
                continue;
            }
            rules_checked += 1;
            if let Some(hit) = (rule.check)(&ctx) {
                matched_rules.push(MatchedRule {
                    id: rule.id,
                    name: rule.id.name().to_string(),
                    severity: rule.severity,
                    weight: rule.weight * hit.scale,
                    reason: hit.reason,
                });
            }
        }

        let (rule_score, severity) = aggregate(&matched_rules, &self.config);
        RuleReport {
            matched_rules,
            rule_score,
            severity,
            rules_checked,
            is_known_legitimate,
        }
    }
}

fn tier_for(config: &RuleConfig, severity: Severity) -> Option<TierScore> {
    match severity {
        Severity::Critical => Some(config.tiers.critical),
        Severity::High => Some(config.tiers.high),
        Severity::Medium => Some(config.tiers.medium),
        Severity::Low => Some(config.tiers.low),
        Severity::Info => None,
    }
}

/// Tiered score and dominant severity for a set of matches.
pub fn aggregate(matched: &[MatchedRule], config: &RuleConfig) -> (f64, Severity) {
    let Some(dominant) = matched.iter().map(|r| r.severity).max() else {
        return (0.0, Severity::Info);
    };
    let Some(tier) = tier_for(config, dominant) else {
        return (0.0, Severity::Info);
    };

    // Low tier counts every match; higher tiers count their own
    let in_tier = if dominant == Severity::Low {
        matched.len()
    } else {
        matched.iter().filter(|r| r.severity == dominant).count()
    };
    let mut score = (tier.base + tier.increment * in_tier.saturating_sub(1) as f64).min(tier.cap);

    let distinct: BTreeSet<Severity> = matched.iter().map(|r| r.severity).collect();
    if distinct.len() >= 2 {
        score = (score + config.mixed_severity_bonus).min(1.0);
    }
    ((score * 10_000.0).round() / 10_000.0, dominant)
}
