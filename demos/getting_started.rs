//! Getting Started
//!
//! Clusters a handful of Korean peaks at several camera altitudes and prints
//! the delta a map renderer would apply between frames.

use geocluster::prelude::*;
use std::error::Error;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== geocluster - Getting Started ===\n");

    let peaks = vec![
        Poi::new("Bukhansan", 37.6587, 126.9780, 836),
        Poi::new("Dobongsan", 37.6989, 127.0155, 740),
        Poi::new("Suraksan", 37.6953, 127.0814, 638),
        Poi::new("Gwanaksan", 37.4449, 126.9640, 632),
        Poi::new("Seoraksan", 38.1193, 128.4655, 1708),
        Poi::new("Odaesan", 37.7945, 128.5433, 1563),
        Poi::new("Jirisan", 35.3370, 127.7306, 1915),
        Poi::new("Hallasan", 33.3617, 126.5292, 1947),
    ];

    let mut session = ClusterSession::default();
    let view = Viewport::new(35.8, 127.5, 6.0, 4.0, 5_000.0);

    for altitude in [5_000.0, 40_000.0, 200_000.0, 1_000_000.0, 5_000.0] {
        let delta = session.update(&peaks, &view.with_altitude(altitude));
        let stats = session.last_stats();

        println!("Altitude {:>9.0} m", altitude);
        println!(
            "   {} annotations ({} clusters, {} singles)",
            stats.annotations(),
            stats.clusters,
            stats.singles
        );
        println!(
            "   delta: +{} / -{}",
            delta.to_add.len(),
            delta.to_remove.len()
        );

        for annotation in session.displayed() {
            let coordinate = annotation.coordinate();
            match annotation {
                Annotation::Single(poi) => println!(
                    "     {:<10} {:.4}, {:.4}  ({} m)",
                    poi.name,
                    coordinate.y(),
                    coordinate.x(),
                    poi.payload
                ),
                Annotation::Cluster { members, .. } => println!(
                    "     cluster of {} at {:.4}, {:.4}",
                    members.len(),
                    coordinate.y(),
                    coordinate.x()
                ),
            }
        }
        println!();
    }

    let config = Config::default().with_distance_metric(DistanceMetric::Geodesic);
    let engine = ClusterEngine::with_config(config)?;
    let annotations = engine.cluster(&peaks, &view.with_altitude(200_000.0));

    #[cfg(feature = "geojson")]
    println!(
        "GeoJSON:\n{}",
        geocluster::geojson::annotations_to_geojson(&annotations)?
    );
    #[cfg(not(feature = "geojson"))]
    println!("{} annotations with the geodesic metric", annotations.len());

    Ok(())
}
