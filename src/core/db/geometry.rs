//! The two interchangeable ways of adding a vertex to a street's polyline.
//!
//! Which one a store uses is fixed when it is opened. For the same starting
//! polyline and the same sequence of additions both produce the same ordered
//! coordinates.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use sqlx::{Connection, SqliteConnection};

use crate::core::db::error::StoreResult;
use crate::core::db::model::Point;
use crate::core::db::vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryStrategy {
    /// A single SQL statement inserts the vertex; the polyline is never loaded.
    Database,
    /// The polyline is loaded, edited in memory and written back.
    InMemory,
}

impl GeometryStrategy {
    pub fn from_flag(use_database_geometry: bool) -> Self {
        if use_database_geometry {
            GeometryStrategy::Database
        } else {
            GeometryStrategy::InMemory
        }
    }

    pub fn mutator(self) -> Arc<dyn GeometryMutator> {
        match self {
            GeometryStrategy::Database => Arc::new(DatabaseGeometryMutator),
            GeometryStrategy::InMemory => Arc::new(InMemoryGeometryMutator),
        }
    }
}

impl fmt::Display for GeometryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryStrategy::Database => f.write_str("database"),
            GeometryStrategy::InMemory => f.write_str("in-memory"),
        }
    }
}

/// Which end of the polyline a new vertex goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryEnd {
    Start,
    End,
}

impl GeometryEnd {
    pub fn from_add_to_end(add_to_end: bool) -> Self {
        if add_to_end {
            GeometryEnd::End
        } else {
            GeometryEnd::Start
        }
    }
}

#[async_trait]
pub trait GeometryMutator: Send + Sync + fmt::Debug {
    fn strategy(&self) -> GeometryStrategy;

    /// Add `point` at `end` of the street's polyline. An empty polyline
    /// becomes a single-vertex one regardless of `end`.
    ///
    /// Returns `false`, changing nothing, if the street does not exist.
    async fn add_point(
        &self,
        conn: &mut SqliteConnection,
        street_id: i64,
        point: Point,
        end: GeometryEnd,
    ) -> StoreResult<bool>;
}

// The vertex is only inserted when the street row exists, so the affected row
// count doubles as the existence check.
const APPEND_VERTEX_SQL: &str = r#"INSERT INTO street_vertex (street_id, position, x, y)
    SELECT s.id,
        COALESCE((SELECT MAX(v.position) FROM street_vertex v WHERE v.street_id = s.id), -1) + 1,
        ?2,
        ?3
    FROM street s
    WHERE s.id = ?1"#;

const PREPEND_VERTEX_SQL: &str = r#"INSERT INTO street_vertex (street_id, position, x, y)
    SELECT s.id,
        COALESCE((SELECT MIN(v.position) FROM street_vertex v WHERE v.street_id = s.id), 1) - 1,
        ?2,
        ?3
    FROM street s
    WHERE s.id = ?1"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseGeometryMutator;

#[async_trait]
impl GeometryMutator for DatabaseGeometryMutator {
    fn strategy(&self) -> GeometryStrategy {
        GeometryStrategy::Database
    }

    async fn add_point(
        &self,
        conn: &mut SqliteConnection,
        street_id: i64,
        point: Point,
        end: GeometryEnd,
    ) -> StoreResult<bool> {
        let sql = match end {
            GeometryEnd::End => APPEND_VERTEX_SQL,
            GeometryEnd::Start => PREPEND_VERTEX_SQL,
        };
        let result = sqlx::query(sql)
            .bind(street_id)
            .bind(point.x)
            .bind(point.y)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryGeometryMutator;

#[async_trait]
impl GeometryMutator for InMemoryGeometryMutator {
    fn strategy(&self) -> GeometryStrategy {
        GeometryStrategy::InMemory
    }

    async fn add_point(
        &self,
        conn: &mut SqliteConnection,
        street_id: i64,
        point: Point,
        end: GeometryEnd,
    ) -> StoreResult<bool> {
        // Take the write lock before reading so concurrent writers wait on the
        // busy timeout instead of failing the read-to-write upgrade.
        let mut tx = conn.begin_with("BEGIN IMMEDIATE").await?;
        if !vertex::street_exists(&mut *tx, street_id).await? {
            return Ok(false);
        }
        let mut points = vertex::load_vertices(&mut *tx, street_id).await?;
        match end {
            GeometryEnd::End => points.push(point),
            GeometryEnd::Start => points.insert(0, point),
        }
        vertex::replace_vertices(&mut *tx, street_id, &points).await?;
        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_follows_flag() {
        assert_eq!(GeometryStrategy::from_flag(true), GeometryStrategy::Database);
        assert_eq!(GeometryStrategy::from_flag(false), GeometryStrategy::InMemory);
        assert_eq!(
            GeometryStrategy::Database.mutator().strategy(),
            GeometryStrategy::Database
        );
        assert_eq!(
            GeometryStrategy::InMemory.mutator().strategy(),
            GeometryStrategy::InMemory
        );
    }

    #[test]
    fn end_follows_add_to_end() {
        assert_eq!(GeometryEnd::from_add_to_end(true), GeometryEnd::End);
        assert_eq!(GeometryEnd::from_add_to_end(false), GeometryEnd::Start);
    }
}
