use std::collections::HashMap;

use sqlx::SqliteConnection;

use crate::core::db::error::StoreResult;
use crate::core::db::model::Point;

pub(super) async fn street_exists(conn: &mut SqliteConnection, street_id: i64) -> StoreResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM street WHERE id = ?1")
        .bind(street_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub(super) async fn load_vertices(
    conn: &mut SqliteConnection,
    street_id: i64,
) -> StoreResult<Vec<Point>> {
    let records: Vec<(f64, f64)> = sqlx::query_as(
        r#"SELECT x, y FROM street_vertex
        WHERE street_id = ?1
        ORDER BY position ASC"#,
    )
    .bind(street_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(records.into_iter().map(|(x, y)| Point { x, y }).collect())
}

/// Polylines of every street that has at least one vertex, keyed by street id.
pub(super) async fn load_all_vertices(
    conn: &mut SqliteConnection,
) -> StoreResult<HashMap<i64, Vec<Point>>> {
    let records: Vec<(i64, f64, f64)> = sqlx::query_as(
        r#"SELECT street_id, x, y FROM street_vertex
        ORDER BY street_id ASC, position ASC"#,
    )
    .fetch_all(&mut *conn)
    .await?;
    let mut map: HashMap<i64, Vec<Point>> = HashMap::new();
    for (street_id, x, y) in records {
        map.entry(street_id).or_default().push(Point { x, y });
    }
    Ok(map)
}

/// Overwrite a street's polyline with `points`, renumbering positions from 0.
/// Must run inside a transaction so the delete and inserts commit together.
pub(super) async fn replace_vertices(
    conn: &mut SqliteConnection,
    street_id: i64,
    points: &[Point],
) -> StoreResult<()> {
    sqlx::query("DELETE FROM street_vertex WHERE street_id = ?1")
        .bind(street_id)
        .execute(&mut *conn)
        .await?;
    for (position, point) in points.iter().enumerate() {
        let position = position as i64;
        sqlx::query(
            r#"INSERT INTO street_vertex (street_id, position, x, y) VALUES (?1, ?2, ?3, ?4)"#,
        )
        .bind(street_id)
        .bind(position)
        .bind(point.x)
        .bind(point.y)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
