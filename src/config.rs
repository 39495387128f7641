use clap::Args;

use crate::core::db::GeometryStrategy;

pub const DATABASE_URL_DEFAULT: &str = "sqlite://streethub.db";
pub const MAX_CONNECTIONS_DEFAULT: u32 = 5;

/// Store settings, read once at startup.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// SQLite database URL, e.g. `sqlite://streets.db` or `sqlite::memory:`
    #[arg(long, env = "STREETHUB_DATABASE_URL", default_value = DATABASE_URL_DEFAULT)]
    pub database_url: String,

    /// Add geometry points with a single SQL statement instead of rewriting
    /// the whole polyline from memory
    #[arg(long, env = "STREETHUB_USE_DATABASE_GEOMETRY")]
    pub use_database_geometry: bool,

    /// Size of the connection pool
    #[arg(long, env = "STREETHUB_MAX_CONNECTIONS", default_value_t = MAX_CONNECTIONS_DEFAULT)]
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            use_database_geometry: false,
            max_connections: MAX_CONNECTIONS_DEFAULT,
        }
    }

    pub fn with_database_geometry(mut self, use_database_geometry: bool) -> Self {
        self.use_database_geometry = use_database_geometry;
        self
    }

    pub fn geometry_strategy(&self) -> GeometryStrategy {
        GeometryStrategy::from_flag(self.use_database_geometry)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DATABASE_URL_DEFAULT)
    }
}
