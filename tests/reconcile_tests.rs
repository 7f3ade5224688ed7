use geo::Point;
use geocluster::reconcile::{self, annotations_match};
use geocluster::{
    AltitudeBand, Annotation, AnnotationReconciler, ClusterEngine, ClusterSession, Config, Poi,
    Viewport,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cluster_at(count: usize, lat: f64, lon: f64) -> Annotation {
    Annotation::Cluster {
        centroid: Point::new(lon, lat),
        members: (0..count)
            .map(|i| Poi::new(format!("member-{}", i), lat, lon, ()))
            .collect(),
    }
}

fn ridge(n: usize) -> Vec<Poi> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Poi::new(
                format!("ridge-{}", i),
                37.0 + (t * 0.618).fract() * 0.8,
                127.0 + (t * 0.414).fract() * 0.8,
                (),
            )
        })
        .collect()
}

/// Same count, centroid drifted by less than the tolerance.
#[test]
fn test_cluster_drift_within_tolerance() {
    init_logging();
    let previous = vec![cluster_at(2, 10.0, 20.0)];
    let next = vec![cluster_at(2, 10.00001, 20.00001)];

    let delta = reconcile::diff(&previous, &next);
    assert!(delta.to_add.is_empty());
    assert!(delta.to_remove.is_empty());
}

/// Same centroid, different member count.
#[test]
fn test_cluster_count_change() {
    init_logging();
    let previous = vec![cluster_at(2, 10.0, 20.0)];
    let next = vec![cluster_at(3, 10.0, 20.0)];

    let delta = reconcile::diff(&previous, &next);
    assert_eq!(delta.to_remove, previous);
    assert_eq!(delta.to_add, next);
}

#[test]
fn test_diff_of_empty_sets() {
    init_logging();
    let delta = reconcile::diff::<()>(&[], &[]);
    assert!(delta.is_empty());
}

#[test]
fn test_idempotent_on_engine_output() {
    init_logging();
    let engine = ClusterEngine::new();
    let points = ridge(200);

    for altitude in [1_000.0, 30_000.0, 200_000.0, 600_000.0, 5_000_000.0] {
        let viewport = Viewport::new(37.4, 127.4, 2.0, 2.0, altitude);
        let annotations = engine.cluster(&points, &viewport);
        assert!(
            reconcile::diff(&annotations, &annotations).is_empty(),
            "altitude {}",
            altitude
        );
    }
}

#[test]
fn test_apply_reaches_next_across_zoom_sequence() {
    init_logging();
    let engine = ClusterEngine::new();
    let reconciler = AnnotationReconciler::new();
    let points = ridge(150);
    let altitudes = [
        2_000.0, 60_000.0, 400_000.0, 30_000.0, 5_000.0, 1_000_000.0, 100_000.0,
    ];

    let mut displayed: Vec<Annotation> = Vec::new();
    for altitude in altitudes {
        let viewport = Viewport::new(37.4, 127.4, 2.0, 2.0, altitude);
        let next = engine.cluster(&points, &viewport);
        let delta = reconciler.diff(&displayed, &next);
        displayed = reconciler.apply(&displayed, &delta);

        assert_eq!(displayed.len(), next.len(), "altitude {}", altitude);
        for annotation in &next {
            assert!(
                displayed
                    .iter()
                    .any(|shown| annotations_match(shown, annotation, reconciler.tolerance())),
                "missing annotation after applying delta at {}",
                altitude
            );
        }
    }
}

#[test]
fn test_panning_only_touches_edges() {
    init_logging();
    let engine = ClusterEngine::new();
    let points = ridge(300);
    let reconciler = AnnotationReconciler::new();

    let before = engine.cluster(&points, &Viewport::new(37.4, 127.4, 0.4, 0.4, 1_000.0));
    let after = engine.cluster(&points, &Viewport::new(37.45, 127.45, 0.4, 0.4, 1_000.0));
    let delta = reconciler.diff(&before, &after);

    let kept = before.len() - delta.to_remove.len();
    assert!(kept > 0, "overlapping views should share annotations");
    assert_eq!(kept + delta.to_add.len(), after.len());
}

#[test]
fn test_session_keeps_displayed_in_sync() {
    init_logging();
    let points = ridge(120);
    let mut session = ClusterSession::default();
    let reconciler = AnnotationReconciler::new();

    for altitude in [3_000.0, 40_000.0, 700_000.0, 3_000.0] {
        let viewport = Viewport::new(37.4, 127.4, 2.0, 2.0, altitude);
        session.update(&points, &viewport);
        let fresh = session.engine().cluster(&points, &viewport);
        assert!(reconciler.diff(session.displayed(), &fresh).is_empty());
    }

    let removal = session.update(&[], &Viewport::new(37.4, 127.4, 2.0, 2.0, 3_000.0));
    assert!(removal.to_add.is_empty());
    assert!(session.displayed().is_empty());
}

fn pair(label: &str, lat: f64, lon: f64) -> Vec<Poi> {
    (0..2)
        .map(|i| Poi::new(format!("{}-{}", label, i), lat, lon, ()))
        .collect()
}

/// Two neighbouring clusters of equal size, centroids within the tolerance
/// of each other, held in separate quadtree leaves.
#[test]
fn test_session_keeps_neighbour_when_other_cluster_leaves() {
    init_logging();
    // Only coincident points merge, so each pair is its own cluster
    let config = Config::default().with_altitude_bands(vec![AltitudeBand::new(0.0, 30, 0.0)]);
    let mut session = ClusterSession::new(ClusterEngine::with_config(config).unwrap());
    let viewport = Viewport::new(10.0001, 20.0, 1.0, 1.0, 100.0);

    let mut first: Vec<Poi> = pair("west", 10.0, 20.0);
    first.extend(pair("east", 10.00009, 20.0));
    let initial = session.update(&first, &viewport);
    assert_eq!(initial.to_add.len(), 2);
    assert!(initial.to_add.iter().all(|a| a.member_count() == 2));

    // The first pair goes away, the second drifts a little further
    let second = pair("east", 10.00018, 20.0);
    let delta = session.update(&second, &viewport);
    assert_eq!(delta.to_remove.len(), 1);
    assert!((delta.to_remove[0].coordinate().y() - 10.0).abs() < 1e-9);
    assert!(delta.to_add.is_empty());

    assert_eq!(session.displayed().len(), 1);
    assert!((session.displayed()[0].coordinate().y() - 10.00009).abs() < 1e-9);

    // A renderer applying the literal delta sees the same screen
    let reconciler = AnnotationReconciler::new();
    let mut rendered = reconciler.apply(&[], &initial);
    rendered = reconciler.apply(&rendered, &delta);
    assert_eq!(rendered, session.displayed());

    assert!(session.update(&second, &viewport).is_empty());
    assert_eq!(session.displayed().len(), 1);
}
