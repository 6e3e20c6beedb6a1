//! Classifies a handful of probe points against an L-shaped loop.
//!
//! ```text
//! cargo run --example classify
//! RUST_LOG=modelgeom=trace cargo run --example classify   # show ray crossings
//! ```

use modelgeom::{classify_point, ModelGeomError, Point3D, Radians, Transformation, Vector3D};

fn main() -> Result<(), ModelGeomError> {
    // Default: WARN for everything, INFO for modelgeom.
    // Override with RUST_LOG env var (e.g. RUST_LOG=modelgeom=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("modelgeom=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Tilt the loop out of the XY plane so the plane fit does real work.
    let placement = Transformation::from_translation(Vector3D::new(10.0, 0.0, 5.0))
        * Transformation::rotation(Vector3D::new(1.0, 0.0, 0.0), Radians::from_degrees(30.0))?;

    let l_shape: Vec<Point3D> = [
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 2.0),
        (2.0, 2.0),
        (2.0, 4.0),
        (0.0, 4.0),
    ]
    .into_iter()
    .map(|(x, y)| placement * Point3D::new(x, y, 0.0))
    .collect();

    let probes = [
        ("inside", Point3D::new(1.0, 1.0, 0.0)),
        ("notch", Point3D::new(3.0, 3.0, 0.0)),
        ("corner", Point3D::new(2.0, 2.0, 0.0)),
        ("edge", Point3D::new(3.0, 2.0, 0.0)),
        ("above", Point3D::new(1.0, 1.0, 1.0)),
    ];

    for (name, local) in probes {
        let point = placement * local;
        let result = classify_point(&l_shape, point)?;
        println!(
            "{name:>8} ({:7.3}, {:7.3}, {:7.3}) -> {result:?}",
            point.x(),
            point.y(),
            point.z()
        );
    }
    Ok(())
}
