use streethub::{GeometryStrategy, NewStreet, Point, StoreConfig, StreetStore};

pub const BOTH_STRATEGIES: [GeometryStrategy; 2] =
    [GeometryStrategy::Database, GeometryStrategy::InMemory];

/// Creates a StreetStore backed by a database file in a fresh temp directory.
/// Returns both the store and the temp directory (which must be kept alive).
pub async fn create_test_store(strategy: GeometryStrategy) -> (StreetStore, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let config = test_config(&dir, strategy);
    let store = StreetStore::new(&config)
        .await
        .expect("Failed to create test store");
    (store, dir)
}

/// Store settings pointing at `streets.db` inside `dir`.
pub fn test_config(dir: &tempfile::TempDir, strategy: GeometryStrategy) -> StoreConfig {
    let url = format!("sqlite://{}", dir.path().join("streets.db").display());
    StoreConfig::new(url).with_database_geometry(strategy == GeometryStrategy::Database)
}

/// Creates a NewStreet with the given name, capacity and polyline.
pub fn make_new_street(name: &str, capacity: i32, points: &[(f64, f64)]) -> NewStreet {
    NewStreet::new(name, capacity).with_geometry(to_points(points))
}

pub fn to_points(points: &[(f64, f64)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}
