//! Fallback training: a small labeled URL corpus plus seeded synthetic
//! feature vectors, fitted with full-batch gradient descent.

use super::model::{sigmoid, ClassifierModel, ModelSource, StandardScaler};
use crate::config::BootstrapConfig;
use crate::core::FEATURE_COUNT;
use crate::error::{PhishGuardError, Result};
use crate::features::FeatureExtractor;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const LEGITIMATE_URLS: &[&str] = &[
    "https://www.google.com/search?q=weather",
    "https://www.amazon.com/dp/B08N5WRWNW",
    "https://github.com/microsoft/vscode",
    "https://stackoverflow.com/questions/tagged/python",
    "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    "https://www.linkedin.com/in/example-profile",
    "https://www.facebook.com/settings",
    "https://twitter.com/home",
    "https://www.instagram.com/explore",
    "https://www.reddit.com/r/programming",
    "https://www.netflix.com/browse",
    "https://www.spotify.com/account/overview",
    "https://www.apple.com/shop/buy-iphone",
    "https://www.microsoft.com/en-us/windows",
    "https://www.dropbox.com/home",
    "https://mail.google.com/mail/u/0/#inbox",
    "https://www.paypal.com/myaccount/home",
    "https://www.ebay.com/myb/ActiveBids",
    "https://www.walmart.com/cart",
    "https://www.target.com/",
    "https://www.bestbuy.com/site/computer-accessories",
    "https://www.nytimes.com/section/world",
    "https://www.bbc.com/news",
    "https://www.cnn.com/politics",
    "https://www.weather.com/weather/today",
    "https://www.wikipedia.org/wiki/Main_Page",
    "https://docs.python.org/3/library/",
    "https://reactjs.org/docs/getting-started.html",
    "https://nodejs.org/en/download/",
    "https://www.npmjs.com/package/express",
    "https://pypi.org/project/requests/",
    "https://www.kaggle.com/datasets",
    "https://www.coursera.org/learn/machine-learning",
    "https://www.medium.com/@username",
    "https://www.pinterest.com/ideas/",
    "https://www.twitch.tv/directory",
    "https://discord.com/channels/@me",
    "https://slack.com/signin",
    "https://zoom.us/join",
    "https://meet.google.com/",
    "https://outlook.live.com/mail/0/inbox",
    "https://www.icloud.com/mail",
    "https://www.chase.com/personal/checking",
    "https://www.bankofamerica.com/",
    "https://www.wellsfargo.com/",
    "https://www.capitalone.com/",
];

pub const PHISHING_URLS: &[&str] = &[
    "http://paypa1-secure.com/login",
    "http://amaz0n-verify.com/account",
    "http://faceb00k-security.com/confirm",
    "http://g00gle-support.com/verify",
    "http://micr0soft-update.com/windows",
    "http://app1e-id.com/verify",
    "http://netf1ix-billing.com/update",
    "http://linkedln-security.com/signin",
    "http://tw1tter-verify.com/account",
    "http://paypal.secure-login.malicious.com/signin",
    "http://amazon.verify-account.phishing.net/update",
    "http://facebook.security-check.bad.org/confirm",
    "http://apple.id-verify.scam.com/account",
    "http://netflix.billing-update.fraud.net/payment",
    "http://192.168.1.1/paypal/login.html",
    "http://10.0.0.1/amazon/signin.php",
    "http://45.67.89.123/banking/secure/login",
    "http://paypal-secure.xyz/login",
    "http://amazon-verify.tk/account",
    "http://google-support.ml/help",
    "http://abc123xyz789.com/paypal/login",
    "http://qwerty12345.net/amazon/verify",
    "http://secure-paypal-account-verification-update-login-confirm.com/signin",
    "http://amazon-order-confirmation-verify-account-security.net/update",
    "http://pay-pal-secure-login-verify.com/account",
    "http://suspicious-site.com/wp-admin/paypal/login.php",
    "http://evil-domain.net/.hidden/amazon/verify.html",
    "http://bit.ly/paypal-verify-2024",
    "http://tinyurl.com/amazon-security",
    "http://paypal%2Dsecure.com/login",
    "http://banking-secure.com/login/account",
    "http://creditcard-verify.net/update/payment",
    "http://pаypal.com/login",
    "http://document.pdf.exe.malicious.com/download",
    "http://secure.login.verify.update.confirm.paypal.evil.com/signin",
    "http://urgent-verify-account-suspended.com/paypal/login",
    "http://winner-prize-claim-now.net/amazon/reward",
    "http://login-secure-verify.com/credentials/update",
    "http://secure.account-paypal.com/webapps/auth/signin",
    "http://login.microsoft-365.support-team.com/oauth2/authorize",
];

/// One numeric feature vector.
pub type Row = [f64; FEATURE_COUNT];

fn flag(rng: &mut StdRng, p: f64) -> f64 {
    if rng.gen_bool(p) {
        1.0
    } else {
        0.0
    }
}

fn int(rng: &mut StdRng, lo: u32, hi: u32) -> f64 {
    f64::from(rng.gen_range(lo..hi))
}

/// One synthetic vector in `FEATURE_NAMES` order.
fn synthetic_row(rng: &mut StdRng, phishing: bool) -> Row {
    if phishing {
        [
            int(rng, 50, 150),
            int(rng, 15, 40),
            int(rng, 10, 30),
            int(rng, 20, 80),
            int(rng, 10, 50),
            int(rng, 3, 8),
            int(rng, 1, 5),
            int(rng, 0, 3),
            int(rng, 3, 8),
            flag(rng, 0.2),
            int(rng, 5, 15),
            int(rng, 3, 10),
            flag(rng, 0.2),
            flag(rng, 0.6),
            flag(rng, 0.1),
            flag(rng, 0.15),
            rng.gen_range(4.0..5.5),
            rng.gen_range(0.1..0.25),
            rng.gen_range(0.4..0.6),
            flag(rng, 0.5),
            int(rng, 2, 5),
            int(rng, 1, 4),
            flag(rng, 0.3),
            flag(rng, 0.4),
            flag(rng, 0.4),
            flag(rng, 0.5),
        ]
    } else {
        [
            int(rng, 20, 60),
            int(rng, 5, 20),
            int(rng, 0, 10),
            int(rng, 0, 30),
            int(rng, 0, 20),
            int(rng, 1, 4),
            int(rng, 0, 2),
            0.0,
            int(rng, 2, 5),
            0.0,
            int(rng, 0, 5),
            int(rng, 0, 3),
            0.0,
            flag(rng, 0.9),
            0.0,
            0.0,
            rng.gen_range(3.0..4.0),
            rng.gen_range(0.05..0.15),
            rng.gen_range(0.6..0.8),
            0.0,
            int(rng, 0, 2),
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
        ]
    }
}

/// Synthetic vectors split evenly between the classes.
pub fn synthetic_corpus(seed: u64, samples: usize) -> (Vec<Row>, Vec<bool>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let per_class = samples / 2;
    let mut rows = Vec::with_capacity(per_class * 2);
    let mut labels = Vec::with_capacity(per_class * 2);
    for phishing in [false, true] {
        for _ in 0..per_class {
            rows.push(synthetic_row(&mut rng, phishing));
            labels.push(phishing);
        }
    }
    (rows, labels)
}

/// Feature vectors of the built-in labeled URLs.
pub fn real_corpus(extractor: &FeatureExtractor) -> (Vec<Row>, Vec<bool>) {
    let legit = LEGITIMATE_URLS.iter().map(|u| (u, false));
    let phish = PHISHING_URLS.iter().map(|u| (u, true));
    legit
        .chain(phish)
        .map(|(u, label)| (extractor.extract(u).numeric_vector(), label))
        .unzip()
}

/// Fit scaler and logistic regression on labeled rows.
pub fn fit(
    rows: &[Row],
    labels: &[bool],
    params: &BootstrapConfig,
    source: ModelSource,
) -> Result<ClassifierModel> {
    if rows.len() != labels.len() {
        return Err(PhishGuardError::Training(format!(
            "{} rows but {} labels",
            rows.len(),
            labels.len()
        )));
    }
    if !labels.contains(&true) || !labels.contains(&false) {
        return Err(PhishGuardError::Training(
            "both classes must be present".into(),
        ));
    }

    let as_vecs: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
    let scaler = StandardScaler::fit(&as_vecs);
    let x: Vec<Vec<f64>> = as_vecs.iter().map(|r| scaler.transform(r)).collect();
    let y: Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect();

    let n = x.len() as f64;
    let mut w = vec![0.0; FEATURE_COUNT];
    let mut b = 0.0;
    for _ in 0..params.epochs {
        let mut grad_w = vec![0.0; FEATURE_COUNT];
        let mut grad_b = 0.0;
        for (xi, yi) in x.iter().zip(&y) {
            let z = xi.iter().zip(&w).map(|(a, c)| a * c).sum::<f64>() + b;
            let err = sigmoid(z) - yi;
            for (g, v) in grad_w.iter_mut().zip(xi) {
                *g += err * v;
            }
            grad_b += err;
        }
        for (wj, gj) in w.iter_mut().zip(&grad_w) {
            *wj -= params.learning_rate * (gj / n + params.l2 * *wj);
        }
        b -= params.learning_rate * grad_b / n;
    }

    ClassifierModel::new(source, scaler, w, b, rows.len())
}

/// Share of rows the model labels correctly at `threshold`.
pub fn accuracy(model: &ClassifierModel, rows: &[Row], labels: &[bool], threshold: f64) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let correct = rows
        .iter()
        .zip(labels)
        .filter(|(r, l)| (model.predict_proba(r) >= threshold) == **l)
        .count();
    correct as f64 / rows.len() as f64
}

/// Deterministic shuffled split; `test_share` of the rows go to the test set.
pub fn split(
    rows: Vec<Row>,
    labels: Vec<bool>,
    test_share: f64,
    seed: u64,
) -> ((Vec<Row>, Vec<bool>), (Vec<Row>, Vec<bool>)) {
    let mut paired: Vec<(Row, bool)> = rows.into_iter().zip(labels).collect();
    paired.shuffle(&mut StdRng::seed_from_u64(seed));
    let n_test = (paired.len() as f64 * test_share).floor() as usize;
    let train = paired.split_off(n_test);
    (train.into_iter().unzip(), paired.into_iter().unzip())
}

/// Build the fallback model from the real and synthetic corpora.
pub fn bootstrap_model(extractor: &FeatureExtractor, params: &BootstrapConfig) -> Result<ClassifierModel> {
    let (mut rows, mut labels) = real_corpus(extractor);
    let (syn_rows, syn_labels) = synthetic_corpus(params.seed, params.synthetic_samples);
    rows.extend(syn_rows);
    labels.extend(syn_labels);
    fit(&rows, &labels, params, ModelSource::Bootstrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> BootstrapConfig {
        BootstrapConfig {
            synthetic_samples: 200,
            epochs: 100,
            ..BootstrapConfig::default()
        }
    }

    #[test]
    fn synthetic_corpus_is_seeded() {
        let a = synthetic_corpus(7, 20);
        let b = synthetic_corpus(7, 20);
        let c = synthetic_corpus(8, 20);
        assert_eq!(a, b);
        assert_ne!(a.0, c.0);
        assert_eq!(a.1.iter().filter(|l| **l).count(), 10);
    }

    #[test]
    fn synthetic_rows_respect_ranges() {
        let (rows, labels) = synthetic_corpus(42, 100);
        for (row, phishing) in rows.iter().zip(labels) {
            if phishing {
                assert!((50.0..150.0).contains(&row[0]));
                assert!((4.0..5.5).contains(&row[16]));
            } else {
                assert!((20.0..60.0).contains(&row[0]));
                assert_eq!(row[12], 0.0);
            }
        }
    }

    #[test]
    fn bootstrap_is_deterministic_and_accurate() {
        let ex = FeatureExtractor::default();
        let a = bootstrap_model(&ex, &quick()).unwrap();
        let b = bootstrap_model(&ex, &quick()).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let (rows, labels) = real_corpus(&ex);
        assert!(accuracy(&a, &rows, &labels, 0.5) > 0.75);
    }

    #[test]
    fn single_class_is_rejected() {
        let rows = vec![[0.0; FEATURE_COUNT]; 3];
        let err = fit(&rows, &[true, true, true], &quick(), ModelSource::Trained).unwrap_err();
        assert!(matches!(err, PhishGuardError::Training(_)));
    }

    #[test]
    fn split_is_deterministic() {
        let (rows, labels) = synthetic_corpus(1, 10);
        let (train, test) = split(rows.clone(), labels.clone(), 0.2, 3);
        let (train2, _) = split(rows, labels, 0.2, 3);
        assert_eq!(test.0.len(), 2);
        assert_eq!(train.0.len(), 8);
        assert_eq!(train, train2);
    }
}
