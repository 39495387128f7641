mod error;
mod geometry;
mod model;
mod state;
mod street;
mod vertex;

use std::sync::Arc;

use sqlx::Connection;
use state::StoreState;

use crate::config::StoreConfig;

pub use error::{StoreError, StoreResult, ValidationError};
pub use geometry::{
    DatabaseGeometryMutator, GeometryEnd, GeometryMutator, GeometryStrategy,
    InMemoryGeometryMutator,
};
pub use model::{LineString, ParsePointError, Point};
pub use street::{NewStreet, STREET_NAME_MAX_CHARS, Street, StreetRepository};

/// Persisted streets plus the geometry strategy chosen when the store was opened.
///
/// Each call is its own unit of work. Geometry mutations take the SQLite write
/// lock up front, so concurrent ones queue behind each other; across separate
/// calls the last writer wins since there is no version column.
#[derive(Debug, Clone)]
pub struct StreetStore {
    state: Arc<StoreState>,
    mutator: Arc<dyn GeometryMutator>,
}

impl StreetStore {
    pub async fn new(config: &StoreConfig) -> StoreResult<Self> {
        let state = StoreState::new(config).await?;
        let mutator = config.geometry_strategy().mutator();
        tracing::info!(
            database_url = %config.database_url,
            strategy = %mutator.strategy(),
            "opened street store"
        );
        Ok(Self {
            state: Arc::new(state),
            mutator,
        })
    }

    pub fn geometry_strategy(&self) -> GeometryStrategy {
        self.mutator.strategy()
    }

    /// Close the connection pool. Clones of this store stop working as well.
    pub async fn close(&self) {
        self.state.close().await;
    }
}

#[derive(sqlx::FromRow)]
struct StreetRecord {
    id: i64,
    name: String,
    capacity: i32,
}

impl StreetRecord {
    fn into_street(self, geometry: LineString) -> Street {
        Street {
            id: self.id,
            name: self.name,
            geometry,
            capacity: self.capacity,
            _guard: (),
        }
    }
}

impl StreetRepository for StreetStore {
    async fn create_street(&self, street: &NewStreet) -> StoreResult<Street> {
        street.validate()?;
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        let id: i64 =
            sqlx::query_scalar(r#"INSERT INTO street (name, capacity) VALUES (?1, ?2) RETURNING id"#)
                .bind(street.name.as_str())
                .bind(street.capacity)
                .fetch_one(&mut *tx)
                .await?;
        vertex::replace_vertices(&mut *tx, id, street.geometry.points()).await?;
        tx.commit().await?;
        tracing::debug!(id, name = %street.name, vertices = street.geometry.len(), "created street");
        Ok(Street {
            id,
            name: street.name.clone(),
            geometry: street.geometry.clone(),
            capacity: street.capacity,
            _guard: (),
        })
    }

    async fn get_street_by_id(&self, id: i64) -> StoreResult<Option<Street>> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        let Some(record) = sqlx::query_as::<_, StreetRecord>(
            r#"SELECT id, name, capacity FROM street WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };
        let points = vertex::load_vertices(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(Some(record.into_street(LineString::new(points))))
    }

    async fn get_streets(&self) -> StoreResult<Vec<Street>> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        let records = sqlx::query_as::<_, StreetRecord>(
            r#"SELECT id, name, capacity FROM street ORDER BY id ASC"#,
        )
        .fetch_all(&mut *tx)
        .await?;
        let mut vertices = vertex::load_all_vertices(&mut *tx).await?;
        tx.commit().await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let points = vertices.remove(&record.id).unwrap_or_default();
                record.into_street(LineString::new(points))
            })
            .collect())
    }

    async fn update_street(&self, id: i64, street: &NewStreet) -> StoreResult<Street> {
        street.validate()?;
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        let changed = sqlx::query(r#"UPDATE street SET name = ?1, capacity = ?2 WHERE id = ?3"#)
            .bind(street.name.as_str())
            .bind(street.capacity)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if changed == 0 {
            return Err(StoreError::NotFound { id });
        }
        vertex::replace_vertices(&mut *tx, id, street.geometry.points()).await?;
        tx.commit().await?;
        tracing::debug!(id, "replaced street");
        Ok(Street {
            id,
            name: street.name.clone(),
            geometry: street.geometry.clone(),
            capacity: street.capacity,
            _guard: (),
        })
    }

    async fn delete_street(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.state.conn().await?;
        // street_vertex rows go with the street through ON DELETE CASCADE.
        let removed = sqlx::query(r#"DELETE FROM street WHERE id = ?1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        tracing::debug!(id, existed = removed > 0, "deleted street");
        Ok(())
    }

    async fn append_or_prepend_point(
        &self,
        street_id: i64,
        point: Point,
        add_to_end: bool,
    ) -> StoreResult<bool> {
        street::validate_point(&point)?;
        let end = GeometryEnd::from_add_to_end(add_to_end);
        let mut conn = self.state.conn().await?;
        let found = self
            .mutator
            .add_point(&mut conn, street_id, point, end)
            .await?;
        tracing::debug!(
            street_id,
            %point,
            ?end,
            strategy = %self.mutator.strategy(),
            found,
            "added point to street geometry"
        );
        Ok(found)
    }
}
