use std::{str::FromStr, time::Duration};

use sqlx::{
    Sqlite,
    pool::PoolConnection,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};

use crate::config::StoreConfig;
use crate::core::db::error::StoreResult;

pub(super) struct StoreState {
    database_url: String,
    pool: SqlitePool,
}

impl std::fmt::Debug for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreState")
            .field("database_url", &self.database_url)
            .field("connections", &self.pool.size())
            .finish()
    }
}

impl StoreState {
    /// Open the pool and bring the schema up to date.
    pub(super) async fn new(config: &StoreConfig) -> StoreResult<Self> {
        let connect_opts = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(connect_opts)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self {
            database_url: config.database_url.clone(),
            pool,
        })
    }

    pub(super) async fn conn(&self) -> StoreResult<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    /// Wait for checked-out connections to be returned, then close them all.
    pub(super) async fn close(&self) {
        self.pool.close().await;
    }
}
