//! Hand-curated hosts that skip most heuristic rules.

use crate::core::FeatureSet;
use once_cell::sync::Lazy;
use std::collections::HashSet;

pub static KNOWN_LEGITIMATE_DOMAINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "google.com", "www.google.com", "mail.google.com", "drive.google.com", "docs.google.com",
        "amazon.com", "www.amazon.com", "aws.amazon.com",
        "microsoft.com", "www.microsoft.com", "login.microsoftonline.com", "outlook.live.com",
        "apple.com", "www.apple.com", "icloud.com",
        "facebook.com", "www.facebook.com", "m.facebook.com",
        "twitter.com", "www.twitter.com", "x.com",
        "linkedin.com", "www.linkedin.com",
        "github.com", "www.github.com",
        "netflix.com", "www.netflix.com",
        "youtube.com", "www.youtube.com",
        "instagram.com", "www.instagram.com",
        "paypal.com", "www.paypal.com",
        "ebay.com", "www.ebay.com",
        "chase.com", "www.chase.com", "secure.chase.com",
        "bankofamerica.com", "www.bankofamerica.com",
        "wellsfargo.com", "www.wellsfargo.com",
        "reddit.com", "www.reddit.com",
        "wikipedia.org", "www.wikipedia.org", "en.wikipedia.org",
        "stackoverflow.com", "www.stackoverflow.com",
        "dropbox.com", "www.dropbox.com",
        "spotify.com", "www.spotify.com",
        "zoom.us", "www.zoom.us",
        "slack.com", "www.slack.com",
        "notion.so", "www.notion.so",
        "figma.com", "www.figma.com",
        "portal.azure.com", "cloud.google.com",
        "outlook.com", "office.com", "office365.com",
        "yahoo.com", "mail.yahoo.com",
        "cnn.com", "www.cnn.com",
        "bbc.com", "www.bbc.com", "bbc.co.uk",
        "nytimes.com", "www.nytimes.com",
        "walmart.com", "www.walmart.com",
        "target.com", "www.target.com",
        "bestbuy.com", "www.bestbuy.com",
        "etsy.com", "www.etsy.com",
        "venmo.com", "www.venmo.com",
        "stripe.com", "www.stripe.com",
        "twitch.tv", "www.twitch.tv",
        "discord.com", "www.discord.com",
        "steam.com", "store.steampowered.com", "steampowered.com",
        "coinbase.com", "www.coinbase.com",
        "binance.com", "www.binance.com",
    ]
    .into_iter()
    .collect()
});

/// True when the registrable domain or the full host is allowlisted.
pub fn is_known_legitimate(features: &FeatureSet) -> bool {
    if features.domain.is_empty() {
        return false;
    }
    let domain = features.domain.as_str();
    KNOWN_LEGITIMATE_DOMAINS.contains(domain)
        || KNOWN_LEGITIMATE_DOMAINS.contains(features.full_domain().as_str())
        || domain
            .strip_prefix("www.")
            .is_some_and(|d| KNOWN_LEGITIMATE_DOMAINS.contains(d))
}
