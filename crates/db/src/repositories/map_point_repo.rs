//! Repository for the `map_points` table (tracking routes).
//!
//! Rows are only ever inserted; nothing here updates or deletes a point.

use sqlx::{PgConnection, PgPool};
use workout_core::types::{DbId, Timestamp};

use crate::models::tracking::{CreateMapPoint, MapPoint, RoutePoint};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, tracking_data_id, latitude, longitude, created_at, last_updated_at";

/// Provides append and read access to tracking routes.
pub struct MapPointRepo;

impl MapPointRepo {
    /// Append a point to the route of `tracking_data_id`.
    ///
    /// The room is not looked up first; callers authorize the room through
    /// the ownership cascade beforehand. A vanished room surfaces as a
    /// foreign-key violation.
    pub async fn append(
        pool: &PgPool,
        tracking_data_id: DbId,
        input: &CreateMapPoint,
        now: Timestamp,
    ) -> Result<MapPoint, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::append_inner(&mut conn, tracking_data_id, input, now).await
    }

    /// Find a single point by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MapPoint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM map_points WHERE id = $1");
        sqlx::query_as::<_, MapPoint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Full route of a tracking room, oldest point first.
    pub async fn list_route(
        pool: &PgPool,
        tracking_data_id: DbId,
    ) -> Result<Vec<RoutePoint>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::list_route_inner(&mut conn, tracking_data_id).await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert on an already checked-out connection or open transaction.
    pub(crate) async fn append_inner(
        conn: &mut PgConnection,
        tracking_data_id: DbId,
        input: &CreateMapPoint,
        now: Timestamp,
    ) -> Result<MapPoint, sqlx::Error> {
        let query = format!(
            "INSERT INTO map_points (tracking_data_id, latitude, longitude, created_at, last_updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MapPoint>(&query)
            .bind(tracking_data_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(now)
            .fetch_one(&mut *conn)
            .await
    }

    pub(crate) async fn list_route_inner(
        conn: &mut PgConnection,
        tracking_data_id: DbId,
    ) -> Result<Vec<RoutePoint>, sqlx::Error> {
        sqlx::query_as::<_, RoutePoint>(
            "SELECT id, latitude, longitude, tracking_data_id
             FROM map_points WHERE tracking_data_id = $1 ORDER BY id ASC",
        )
        .bind(tracking_data_id)
        .fetch_all(&mut *conn)
        .await
    }
}
