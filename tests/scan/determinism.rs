use crate::common::{detector, fixed_time, meta, urls};

#[test]
fn same_input_same_result() {
    let d = detector();
    for url in urls::BENIGN.iter().chain(urls::MALICIOUS).chain(urls::MALFORMED) {
        let a = d.classify_at(url, &meta(), fixed_time());
        let b = d.classify_at(url, &meta(), fixed_time());
        assert_eq!(a, b, "{url:?}");
        assert_eq!(a.to_json_string().unwrap(), b.to_json_string().unwrap());
    }
}

#[test]
fn non_latin_urls_are_bit_stable() {
    let d = detector();
    for url in urls::NON_LATIN {
        let first = d.classify_at(url, &meta(), fixed_time());
        let entropy = first.features.as_ref().map(|f| f.entropy.to_bits());
        for _ in 0..200 {
            let again = d.classify_at(url, &meta(), fixed_time());
            assert_eq!(again.features.as_ref().map(|f| f.entropy.to_bits()), entropy);
            assert_eq!(again, first, "{url:?}");
        }
    }
}

#[test]
fn independent_detectors_agree() {
    let (a, b) = (detector(), detector());
    assert_eq!(
        a.classifier().model_info().fingerprint,
        b.classifier().model_info().fingerprint
    );
    for url in urls::MALICIOUS {
        assert_eq!(
            a.classify_at(url, &meta(), fixed_time()),
            b.classify_at(url, &meta(), fixed_time())
        );
    }
}

#[test]
fn batch_preserves_order() {
    let d = detector();
    let batch: Vec<&str> = urls::BENIGN.iter().chain(urls::MALICIOUS).copied().collect();
    let results = d.classify_many(&batch, &meta());
    assert_eq!(results.len(), batch.len());
    for (url, r) in batch.iter().zip(&results) {
        assert_eq!(r.url, *url);
        let single = d.classify(url, &meta());
        assert_eq!(r.combined_score, single.combined_score);
    }
}
