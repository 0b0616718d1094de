use super::*;

#[test]
fn louvain_method_matches_runner() {
    let g = CsrGraph::from_undirected(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
    let out = louvain_method(&g, -1.0, 1e-6, 2).expect("louvain should succeed");
    let again = Louvain::new(LouvainConfig::default().with_threads(3))
        .run(&g)
        .unwrap();
    assert_eq!(out, again);
    assert_eq!(out.community_count(), 2);
}

#[test]
fn config_validation() {
    let ok = LouvainConfig::default();
    assert!(ok.validate().is_ok());
    assert!(ok.num_threads >= 1);
    for bad in [
        ok.clone().with_threshold(0.0),
        ok.clone().with_threshold(-1.0),
        ok.clone().with_threshold(f64::INFINITY),
        ok.clone().with_lower_bound(f64::NAN),
        ok.clone().with_threads(0),
    ] {
        match bad.validate() {
            Err(PartitionError::InvalidParameter { .. }) => {}
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }
}

#[test]
fn zero_threshold_rejected_before_any_pass() {
    let g = CsrGraph::from_undirected(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
    let err = louvain_method(&g, -1.0, 0.0, 2).unwrap_err();
    assert!(matches!(
        err,
        PartitionError::InvalidParameter { name: "threshold", .. }
    ));

    // the smallest positive threshold still stops once the assignment settles
    let out = louvain_method(&g, -1.0, f64::MIN_POSITIVE, 2).unwrap();
    assert_eq!(out.iterations, 3);
    assert_eq!(out.communities, vec![0, 0, 2, 2]);
}

#[test]
fn config_serde() {
    let cfg = LouvainConfig::default()
        .with_threads(6)
        .with_strategy(DeltaStrategy::SharedLock);
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"shared-lock\""));
    let back: LouvainConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}
