use crate::common::{detector, meta, urls};
use phishguard::{ListKind, Verdict};
use std::sync::Arc;
use std::thread;

#[test]
fn scans_run_while_admins_mutate_intel() {
    let d = Arc::new(detector());
    let writers: Vec<_> = (0..2)
        .map(|w| {
            let d = Arc::clone(&d);
            thread::spawn(move || {
                for i in 0..200 {
                    let host = format!("w{w}-{i}.blocked.test");
                    d.intel().add_indicator(&host, ListKind::Blacklist).unwrap();
                    if i % 2 == 0 {
                        d.intel().remove_indicator(&host, ListKind::Blacklist);
                    }
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let d = Arc::clone(&d);
            thread::spawn(move || {
                for url in urls::MALICIOUS.iter().cycle().take(40) {
                    let r = d.classify(url, &meta());
                    assert_eq!(r.verdict, Verdict::Malicious);
                }
            })
        })
        .collect();

    for h in writers.into_iter().chain(readers) {
        h.join().unwrap();
    }
    // Odd indices survive: 100 per writer
    assert_eq!(d.intel().stats().blacklist_count, 200);
    let r = d.classify("http://w1-199.blocked.test/", &meta());
    assert_eq!(r.verdict, Verdict::Malicious);
}

#[test]
fn model_swap_is_atomic_for_readers() {
    let d = Arc::new(detector());
    let original = d.classifier().current();
    let mut shifted = (*original).clone();
    shifted.bias += 3.0;
    let fingerprints = [original.fingerprint(), shifted.fingerprint()];

    let swapper = {
        let d = Arc::clone(&d);
        let (a, b) = ((*original).clone(), shifted.clone());
        thread::spawn(move || {
            for i in 0..50 {
                let next = if i % 2 == 0 { b.clone() } else { a.clone() };
                d.classifier().swap(next).unwrap();
            }
        })
    };
    for _ in 0..200 {
        let seen = d.classifier().model_info().fingerprint;
        assert!(fingerprints.contains(&seen));
        let r = d.classify("http://192.168.1.1/paypal/login.html", &meta());
        assert!((0.0..=1.0).contains(&r.ml_score));
    }
    swapper.join().unwrap();
}

#[test]
fn parallel_batch_matches_sequential() {
    let d = detector();
    let batch: Vec<String> = (0..64)
        .map(|i| format!("http://account-{i}-verify.example-{i}.xyz/login?id={i}"))
        .collect();
    let parallel = d.classify_many(&batch, &meta());
    for (url, r) in batch.iter().zip(&parallel) {
        let single = d.classify(url, &meta());
        assert_eq!(r.combined_score, single.combined_score);
        assert_eq!(r.matched_rules, single.matched_rules);
    }
}
